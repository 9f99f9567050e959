//! OpenAI-compatible chat completion backend.
//!
//! One POST per call with a bearer credential, a fixed model and fixed
//! generation parameters. The first choice's message content is the reply.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use relay_config::{ConfigError, LlmConfig, SettingsSource};
use reqwest::{header, Client, Response};
use serde::{Deserialize, Serialize};

use crate::backend::LlmBackend;
use crate::error::{CompletionError, Result};
use crate::types::Message;

/// Accept header sent with completion requests.
const ACCEPT_JSON_AND_EVENT_STREAM: &str = "application/json, text/event-stream";

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the OpenAI-compatible backend.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiConfig {
    /// Full chat completions URL.
    pub endpoint: String,
    /// Model identifier.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self::from_llm_config(&LlmConfig::default())
    }
}

impl OpenAiConfig {
    /// Build from the `[llm]` config section, applying defaults.
    pub fn from_llm_config(llm: &LlmConfig) -> Self {
        Self {
            endpoint: llm.endpoint().to_string(),
            model: llm.model().to_string(),
            max_tokens: llm.max_tokens(),
            temperature: llm.temperature(),
            timeout: llm.timeout(),
        }
    }

    /// Set a custom endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// OpenAI Backend
// ─────────────────────────────────────────────────────────────────────────────

/// OpenAI-compatible API backend.
pub struct OpenAiBackend {
    client: Client,
    config: OpenAiConfig,
    settings: Arc<dyn SettingsSource>,
}

impl OpenAiBackend {
    /// Create a new backend. The credential is read from `settings` per call.
    pub fn new(config: OpenAiConfig, settings: Arc<dyn SettingsSource>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CompletionError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            settings,
        })
    }

    /// The backend configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn to_openai_request<'a>(&'a self, messages: &'a [Message]) -> OpenAiChatRequest<'a> {
        OpenAiChatRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    /// Handle a response, successful or not.
    async fn handle_response(response: Response) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %body, "completion request rejected");
            return Err(CompletionError::Transport {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: OpenAiChatResponse = serde_json::from_str(&body)?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or(CompletionError::EmptyResponse)
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let credential = self.settings.credential();
        if credential.is_empty() {
            return Err(ConfigError::missing_credential().into());
        }

        let request = self.to_openai_request(messages);

        tracing::debug!(
            backend = "openai",
            model = %request.model,
            messages = request.messages.len(),
            "Sending OpenAI-compatible request"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, ACCEPT_JSON_AND_EVENT_STREAM)
            .header(header::AUTHORIZATION, format!("Bearer {}", credential))
            .json(&request)
            .send()
            .await?;

        Self::handle_response(response)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "completion failed"))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// OpenAI API Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct OpenAiChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
