//! HTTP transport for MCP communication.
//!
//! JSON-RPC requests are POSTed to the current endpoint and the response
//! body is handed back as raw text; decoding is the frame decoder's job.
//! When a [`SettingsSource`] is attached, the endpoint is read from it on
//! every request so a URL change takes effect on the next call.

use std::sync::Arc;
use std::time::Duration;

use relay_config::SettingsSource;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use crate::error::{Result, RpcError};

/// Accept header declaring both plain JSON and event-stream responses.
pub const ACCEPT_JSON_AND_EVENT_STREAM: &str = "application/json, text/event-stream";

/// Configuration for HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Endpoint URL of the MCP server.
    pub url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout: Duration::from_secs(30),
            headers: Vec::new(),
        }
    }
}

impl HttpTransportConfig {
    /// Create a new HTTP transport config with the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// URL of the health endpoint next to the RPC endpoint.
    pub fn health_url(&self) -> String {
        health_url_for(&self.url)
    }
}

fn health_url_for(url: &str) -> String {
    format!("{}/health", url.trim_end_matches('/'))
}

/// Transport for communicating with an MCP server over HTTP.
pub struct HttpTransport {
    /// HTTP client (shared for connection pooling).
    client: reqwest::Client,
    /// Transport configuration.
    config: HttpTransportConfig,
    /// Live endpoint override, consulted per request.
    settings: Option<Arc<dyn SettingsSource>>,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    pub fn connect(config: HttpTransportConfig) -> Result<Self> {
        url::Url::parse(&config.url).map_err(|e| RpcError::InvalidUrl(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(5)
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| RpcError::network(format!("failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            url = %config.url,
            timeout_secs = config.timeout.as_secs(),
            "created MCP HTTP transport"
        );

        Ok(Self {
            client,
            config,
            settings: None,
        })
    }

    /// Read the endpoint from `settings` on every request.
    ///
    /// An empty live URL falls back to the configured one.
    pub fn with_settings(mut self, settings: Arc<dyn SettingsSource>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// The endpoint URL the next request will use.
    pub fn url(&self) -> String {
        match &self.settings {
            Some(settings) => {
                let live = settings.mcp_url();
                if live.trim().is_empty() {
                    self.config.url.clone()
                } else {
                    live
                }
            }
            None => self.config.url.clone(),
        }
    }

    /// The transport configuration.
    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    /// POST a serialized JSON-RPC request and return the raw response body.
    ///
    /// The body is read as text and never parsed here.
    pub async fn post_text(&self, json: String) -> Result<String> {
        let mut req = self
            .client
            .post(self.url())
            .header(ACCEPT, ACCEPT_JSON_AND_EVENT_STREAM)
            .header(CONTENT_TYPE, "application/json")
            .body(json);

        for (key, value) in &self.config.headers {
            req = req.header(key, value);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RpcError::Transport {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let text = resp
            .text()
            .await
            .map_err(|e| RpcError::network(format!("failed to read response body: {}", e)))?;

        tracing::trace!(body = %text, "received MCP HTTP response");
        Ok(text)
    }

    /// GET the health endpoint and parse its JSON body.
    pub async fn get_health<T: DeserializeOwned>(&self) -> Result<T> {
        let mut req = self.client.get(health_url_for(&self.url()));
        for (key, value) in &self.config.headers {
            req = req.header(key, value);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RpcError::Transport {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
