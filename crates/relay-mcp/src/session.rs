//! MCP session management: handshake, health tracking and tool access.
//!
//! The [`SessionManager`] is the only writer of [`SessionState`]. Readers
//! either poll [`SessionManager::state`] or hold a `watch` receiver from
//! [`SessionManager::subscribe`] (e.g. a status indicator).
//!
//! ```text
//!            initialize / health probe
//! Unknown ───────────────► Checking ──► Healthy ◄──┐
//!                              │                   │ any later call
//!                              └────► Unavailable ─┘ may flip state
//! ```

use std::sync::Arc;

use relay_config::SettingsSource;
use serde_json::Value;
use tokio::sync::watch;

use crate::client::RpcClient;
use crate::error::Result;
use crate::protocol::{
    CallToolParams, ClientInfo, HealthResponse, InitializeParams, InitializeResult,
    ToolDescriptor,
};
use crate::transport::{HttpTransport, HttpTransportConfig};

/// Reachability of the remote tool layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No handshake or probe has completed yet.
    #[default]
    Unknown,
    /// A handshake or probe is in flight.
    Checking,
    /// The last call reached the server.
    Healthy,
    /// The last call could not reach the server.
    Unavailable,
}

impl SessionState {
    /// Whether the tool layer is believed reachable.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Short lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Checking => "checking",
            Self::Healthy => "healthy",
            Self::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the MCP handshake and every call made through it.
pub struct SessionManager {
    client: RpcClient,
    client_info: ClientInfo,
    state: watch::Sender<SessionState>,
}

impl SessionManager {
    /// Wrap an RPC client.
    pub fn new(client: RpcClient) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self {
            client,
            client_info: ClientInfo::default(),
            state,
        }
    }

    /// Create a session manager for the configured endpoint.
    pub fn connect(config: HttpTransportConfig) -> Result<Self> {
        Ok(Self::new(RpcClient::new(config)?))
    }

    /// Create a session manager whose endpoint is read from `settings` on
    /// every call. `config.url` is used while the live URL is empty.
    pub fn connect_with_settings(
        config: HttpTransportConfig,
        settings: Arc<dyn SettingsSource>,
    ) -> Result<Self> {
        let transport = HttpTransport::connect(config)?.with_settings(settings);
        Ok(Self::new(RpcClient::with_transport(transport)))
    }

    /// Override the client identity sent during `initialize`.
    pub fn with_client_info(mut self, client_info: ClientInfo) -> Self {
        self.client_info = client_info;
        self
    }

    /// The endpoint URL the next call will use.
    pub fn url(&self) -> String {
        self.client.url()
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn set_state(&self, next: SessionState) {
        let previous = self.state.send_replace(next);
        if previous != next && next != SessionState::Checking {
            tracing::debug!(from = %previous, to = %next, url = %self.url(), "MCP session state changed");
        }
    }

    /// Record the outcome of a regular call. Reaching the server at all, even
    /// with a JSON-RPC error, counts as healthy.
    fn observe<T>(&self, outcome: &Result<T>) {
        match outcome {
            Ok(_) => self.set_state(SessionState::Healthy),
            Err(e) if e.is_connectivity() => self.set_state(SessionState::Unavailable),
            Err(_) => self.set_state(SessionState::Healthy),
        }
    }

    /// Perform the MCP handshake.
    ///
    /// Success moves the session to `Healthy`; any failure moves it to
    /// `Unavailable` and is returned. Neither outcome is terminal.
    pub async fn initialize(&self) -> Result<InitializeResult> {
        let params = serde_json::to_value(InitializeParams::new(self.client_info.clone()))?;

        self.set_state(SessionState::Checking);
        match self.client.call("initialize", Some(params)).await {
            Ok(value) => {
                self.set_state(SessionState::Healthy);
                let result = InitializeResult::from_value(value);
                match result.server_info {
                    Some(ref info) => tracing::info!(
                        server = %info.name,
                        version = %info.version,
                        protocol = result.protocol_version.as_deref().unwrap_or("unknown"),
                        "MCP server initialized"
                    ),
                    None => tracing::info!(url = %self.url(), "MCP server initialized"),
                }
                Ok(result)
            }
            Err(e) => {
                self.set_state(SessionState::Unavailable);
                tracing::warn!(url = %self.url(), error = %e, "MCP initialize failed");
                Err(e)
            }
        }
    }

    /// Probe `GET <url>/health`.
    ///
    /// A `"ok"` status moves the session to `Healthy`, any other status to
    /// `Unavailable`; both are returned as `Ok`. HTTP or network failures
    /// move it to `Unavailable` and are returned as errors.
    pub async fn health_check(&self) -> Result<HealthResponse> {
        self.set_state(SessionState::Checking);
        match self.client.health().await {
            Ok(health) => {
                let next = if health.is_ok() {
                    SessionState::Healthy
                } else {
                    SessionState::Unavailable
                };
                self.set_state(next);
                Ok(health)
            }
            Err(e) => {
                self.set_state(SessionState::Unavailable);
                tracing::debug!(url = %self.url(), error = %e, "MCP health probe failed");
                Err(e)
            }
        }
    }

    /// List the server's tools.
    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        let result = self.call_method("tools/list", None).await?;
        let tools = ToolDescriptor::parse_list(&result);
        tracing::debug!(tool_count = tools.len(), "listed MCP tools");
        Ok(tools)
    }

    /// Call a tool by name. The result payload is returned unmodified.
    pub async fn call_tool(&self, name: &str, arguments: Option<Value>) -> Result<Value> {
        let params = serde_json::to_value(CallToolParams::new(name, arguments))?;
        let outcome = self.call_method("tools/call", Some(params)).await;
        match outcome {
            Ok(_) => tracing::debug!(tool = %name, "tool call succeeded"),
            Err(ref e) => tracing::debug!(tool = %name, error = %e, "tool call failed"),
        }
        outcome
    }

    /// Call an arbitrary named method.
    pub async fn call_method(&self, method: &str, params: Option<Value>) -> Result<Value> {
        let outcome = self.client.call(method, params).await;
        self.observe(&outcome);
        outcome
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("url", &self.url())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RpcError;
    use relay_config::SharedSettings;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn frame(payload: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_string(format!("event: message\ndata: {}\n\n", payload))
    }

    fn session_for(server: &MockServer) -> SessionManager {
        SessionManager::connect(HttpTransportConfig::new(format!("{}/mcp", server.uri()))).unwrap()
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(SessionState::default(), SessionState::Unknown);
        assert_eq!(SessionState::Unavailable.to_string(), "unavailable");
        assert!(SessionState::Healthy.is_healthy());
        assert!(!SessionState::Checking.is_healthy());
    }

    #[tokio::test]
    async fn test_initialize_success_sets_healthy() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mcp"))
            .and(body_partial_json(json!({
                "method": "initialize",
                "params": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {"name": "relay"}
                }
            })))
            .respond_with(frame(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {"tools": {}},
                    "serverInfo": {"name": "company-mcp", "version": "0.3.0"}
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = session_for(&server);
        assert_eq!(session.state(), SessionState::Unknown);

        let result = session.initialize().await.unwrap();
        assert_eq!(result.server_info.unwrap().name, "company-mcp");
        assert_eq!(session.state(), SessionState::Healthy);
    }

    #[tokio::test]
    async fn test_initialize_failure_sets_unavailable_then_recovers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(frame(json!({"jsonrpc": "2.0", "id": 2, "result": {}})))
            .mount(&server)
            .await;

        let session = session_for(&server);
        let err = session.initialize().await.unwrap_err();
        assert!(matches!(err, RpcError::Transport { status: 500, .. }));
        assert_eq!(session.state(), SessionState::Unavailable);

        session.initialize().await.unwrap();
        assert_eq!(session.state(), SessionState::Healthy);
    }

    #[tokio::test]
    async fn test_subscribers_observe_final_state() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let session = session_for(&server);
        let mut rx = session.subscribe();
        let _ = session.initialize().await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SessionState::Unavailable);
    }

    #[tokio::test]
    async fn test_calls_follow_endpoint_change() {
        let first = MockServer::start().await;
        let second = MockServer::start().await;
        for server in [&first, &second] {
            Mock::given(method("POST"))
                .and(path("/mcp"))
                .and(body_partial_json(json!({"method": "tools/list"})))
                .respond_with(frame(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": {"tools": [{"name": "getCompanies"}]}
                })))
                .expect(1)
                .mount(server)
                .await;
        }

        let settings = SharedSettings::new(None, format!("{}/mcp", first.uri()));
        let session = SessionManager::connect_with_settings(
            HttpTransportConfig::new(format!("{}/mcp", first.uri())),
            Arc::new(settings.clone()),
        )
        .unwrap();

        session.list_tools().await.unwrap();
        settings.set_mcp_url(format!("{}/mcp", second.uri()));
        assert_eq!(session.url(), format!("{}/mcp", second.uri()));
        session.list_tools().await.unwrap();

        first.verify().await;
        second.verify().await;
    }

    #[tokio::test]
    async fn test_list_tools() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "tools/list", "params": {}})))
            .respond_with(frame(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {"tools": [
                    {"name": "getCompanies", "description": "List all companies"},
                    {"name": "getCompanyByName"}
                ]}
            })))
            .mount(&server)
            .await;

        let tools = session_for(&server).list_tools().await.unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "getCompanies");
        assert!(tools[1].description.is_none());
    }

    #[tokio::test]
    async fn test_call_tool_sends_name_and_default_arguments() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "tools/call",
                "params": {"name": "getCompanies", "arguments": {}}
            })))
            .respond_with(frame(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {"content": [{"type": "text", "text": "[]"}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = session_for(&server);
        let result = session.call_tool("getCompanies", None).await.unwrap();
        assert_eq!(result["content"][0]["text"], "[]");
        assert_eq!(session.state(), SessionState::Healthy);
    }

    #[tokio::test]
    async fn test_remote_error_keeps_session_healthy() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(frame(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32602, "message": "Unknown tool"}
            })))
            .mount(&server)
            .await;

        let session = session_for(&server);
        let err = session.call_tool("missing", Some(json!({"x": 1}))).await.unwrap_err();
        assert!(matches!(err, RpcError::Protocol { code: -32602, .. }));
        assert_eq!(session.state(), SessionState::Healthy);
    }

    #[tokio::test]
    async fn test_call_method_with_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "resources/list",
                "params": {"cursor": "abc"}
            })))
            .respond_with(frame(json!({"result": {"resources": []}})))
            .mount(&server)
            .await;

        let result = session_for(&server)
            .call_method("resources/list", Some(json!({"cursor": "abc"})))
            .await
            .unwrap();
        assert_eq!(result, json!({"resources": []}));
    }

    #[tokio::test]
    async fn test_health_check_states() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mcp/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/mcp/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "starting"})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/mcp/health"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let session = session_for(&server);

        assert!(session.health_check().await.unwrap().is_ok());
        assert_eq!(session.state(), SessionState::Healthy);

        assert!(!session.health_check().await.unwrap().is_ok());
        assert_eq!(session.state(), SessionState::Unavailable);

        assert!(session.health_check().await.is_err());
        assert_eq!(session.state(), SessionState::Unavailable);
    }

    #[tokio::test]
    async fn test_health_check_follows_endpoint_change() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/mcp/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let settings = SharedSettings::new(None, "");
        let session = SessionManager::connect_with_settings(
            HttpTransportConfig::new("http://127.0.0.1:9/mcp"),
            Arc::new(settings.clone()),
        )
        .unwrap();
        settings.set_mcp_url(format!("{}/v2/mcp", server.uri()));

        assert!(session.health_check().await.unwrap().is_ok());
        assert_eq!(session.state(), SessionState::Healthy);
    }
}
