//! JSON-RPC client for a single MCP endpoint.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::error::Result;
use crate::frame::decode_frame;
use crate::protocol::{HealthResponse, JsonRpcRequest};
use crate::transport::{HttpTransport, HttpTransportConfig};

/// Issues JSON-RPC 2.0 calls over HTTP and decodes their framed responses.
///
/// Request ids come from a per-client monotonic counter, so concurrent
/// in-flight calls never share an id. No retries are performed here.
pub struct RpcClient {
    /// Transport for communicating with the server.
    transport: HttpTransport,
    /// Counter for generating unique request IDs.
    request_id: AtomicU64,
}

impl RpcClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::connect(config)?))
    }

    /// Create a client over an existing transport.
    pub fn with_transport(transport: HttpTransport) -> Self {
        Self {
            transport,
            request_id: AtomicU64::new(1),
        }
    }

    /// The endpoint URL the next call will use.
    pub fn url(&self) -> String {
        self.transport.url()
    }

    /// Get the next request ID.
    fn next_request_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Call `method` with `params` (an empty object when `None`) and return
    /// the decoded `result` payload.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value> {
        let request = JsonRpcRequest::new(self.next_request_id(), method, params);
        let json = serde_json::to_string(&request)?;

        tracing::trace!(id = request.id, method, json = %json, "sending MCP request");

        let body = self.transport.post_text(json).await.inspect_err(|e| {
            tracing::debug!(id = request.id, method, error = %e, "MCP request failed");
        })?;

        let result = decode_frame(&body).inspect_err(|e| {
            tracing::debug!(id = request.id, method, error = %e, "MCP response rejected");
        })?;

        tracing::debug!(id = request.id, method, "MCP request succeeded");
        Ok(result)
    }

    /// Probe the server's health endpoint.
    pub async fn health(&self) -> Result<HealthResponse> {
        self.transport.get_health().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FrameError, RpcError};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn frame(payload: Value) -> String {
        format!("event: message\ndata: {}\n\n", payload)
    }

    fn client_for(server: &MockServer) -> RpcClient {
        RpcClient::new(HttpTransportConfig::new(format!("{}/mcp", server.uri()))).unwrap()
    }

    #[test]
    fn test_request_ids_increment() {
        let client = RpcClient::new(HttpTransportConfig::new("http://localhost:8080/mcp")).unwrap();
        assert_eq!(client.next_request_id(), 1);
        assert_eq!(client.next_request_id(), 2);
        assert_eq!(client.next_request_id(), 3);
    }

    #[tokio::test]
    async fn test_call_returns_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mcp"))
            .and(body_partial_json(json!({
                "jsonrpc": "2.0",
                "method": "tools/list",
                "params": {}
            })))
            .and(|req: &Request| {
                req.headers
                    .get("accept")
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|v| v == "application/json, text/event-stream")
            })
            .and(|req: &Request| {
                req.headers
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|v| v == "application/json")
            })
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(frame(json!({"jsonrpc": "2.0", "id": 1, "result": {"tools": []}}))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.call("tools/list", None).await.unwrap();
        assert_eq!(result, json!({"tools": []}));
    }

    #[tokio::test]
    async fn test_call_surfaces_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(frame(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32601, "message": "Method not found"}
            }))))
            .mount(&server)
            .await;

        let err = client_for(&server).call("nope", None).await.unwrap_err();
        match err {
            RpcError::Protocol { code, message } => {
                assert_eq!(code, -32601);
                assert_eq!(message, "Method not found");
            }
            other => panic!("expected Protocol error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_surfaces_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).call("initialize", None).await.unwrap_err();
        match err {
            RpcError::Transport {
                status,
                status_text,
            } => {
                assert_eq!(status, 503);
                assert_eq!(status_text, "Service Unavailable");
            }
            other => panic!("expected Transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_rejects_plain_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"jsonrpc":"2.0","result":1}"#),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).call("initialize", None).await.unwrap_err();
        assert!(matches!(err, RpcError::Framing(FrameError::MissingDataLine)));
    }

    #[tokio::test]
    async fn test_call_network_failure() {
        // Nothing listens on port 9 locally
        let client = RpcClient::new(HttpTransportConfig::new("http://127.0.0.1:9/mcp")).unwrap();
        let err = client.call("initialize", None).await.unwrap_err();
        assert!(matches!(err, RpcError::Network(_)));
        assert!(err.is_connectivity());
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mcp/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        let health = client_for(&server).health().await.unwrap();
        assert!(health.is_ok());
    }
}
