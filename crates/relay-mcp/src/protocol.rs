//! JSON-RPC 2.0 protocol types for MCP.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol version.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

// ─────────────────────────────────────────────────────────────────────────────
// JSON-RPC Base Types
// ─────────────────────────────────────────────────────────────────────────────

/// A JSON-RPC request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0").
    pub jsonrpc: String,
    /// Request ID for correlating responses.
    pub id: u64,
    /// Method name to call.
    pub method: String,
    /// Method parameters. Always sent; an empty object when the caller has none.
    pub params: Value,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC request.
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params: params.unwrap_or_else(empty_object),
        }
    }
}

/// A JSON-RPC error object as carried in a frame's `error` field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    #[serde(default)]
    pub code: i64,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Optional additional data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Code assigned to errors that arrive without a usable `code`.
    pub const INTERNAL_ERROR: i64 = -32603;
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

// ─────────────────────────────────────────────────────────────────────────────
// MCP Protocol Types
// ─────────────────────────────────────────────────────────────────────────────

/// Client info sent during initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    pub version: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            name: "relay".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version.
    pub protocol_version: String,
    /// Client capabilities. Relay declares none.
    pub capabilities: Value,
    /// Client info.
    pub client_info: ClientInfo,
}

impl InitializeParams {
    /// Handshake parameters for the given client identity.
    pub fn new(client_info: ClientInfo) -> Self {
        Self {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: empty_object(),
            client_info,
        }
    }
}

impl Default for InitializeParams {
    fn default() -> Self {
        Self::new(ClientInfo::default())
    }
}

/// Server info returned during initialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name.
    #[serde(default)]
    pub name: String,
    /// Server version.
    #[serde(default)]
    pub version: String,
}

/// Result of the initialize request.
///
/// Servers vary in what they send back; anything missing is left empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitializeResult {
    /// Negotiated protocol version.
    pub protocol_version: Option<String>,
    /// Server capabilities, kept opaque.
    pub capabilities: Value,
    /// Server info.
    pub server_info: Option<ServerInfo>,
}

impl InitializeResult {
    /// Read a negotiated result out of a raw `result` payload.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// A tool advertised by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Tool name (unique identifier).
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's input parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl ToolDescriptor {
    /// Create a descriptor with a name and optional description.
    pub fn new(name: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            name: name.into(),
            description: description.map(str::to_string),
            input_schema: None,
        }
    }

    /// Extract descriptors from a `tools/list` result.
    ///
    /// Accepts `{"tools": [...]}` or a bare list. Entries that do not carry
    /// a string `name` are skipped.
    pub fn parse_list(payload: &Value) -> Vec<ToolDescriptor> {
        let items = match payload {
            Value::Array(items) => items.as_slice(),
            Value::Object(map) => match map.get("tools") {
                Some(Value::Array(items)) => items.as_slice(),
                _ => &[],
            },
            _ => &[],
        };

        items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect()
    }
}

/// Parameters for the tools/call request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments to pass to the tool.
    pub arguments: Value,
}

impl CallToolParams {
    /// Build call parameters; missing arguments become an empty object.
    pub fn new(name: impl Into<String>, arguments: Option<Value>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.unwrap_or_else(empty_object),
        }
    }
}

/// Body of the `GET <url>/health` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when the server considers itself healthy.
    #[serde(default)]
    pub status: String,
}

impl HealthResponse {
    /// Whether the server reported `"ok"`.
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let req = JsonRpcRequest::new(1, "initialize", Some(json!({"test": true})));
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"jsonrpc\":\"2.0\""));
        assert!(json.contains("\"id\":1"));
        assert!(json.contains("\"method\":\"initialize\""));
    }

    #[test]
    fn test_request_params_default_to_empty_object() {
        let req = JsonRpcRequest::new(7, "tools/list", None);
        assert_eq!(req.params, json!({}));
    }

    #[test]
    fn test_error_object_fields_default() {
        let err: JsonRpcError =
            serde_json::from_str(r#"{"code":-32600,"message":"Invalid Request"}"#).unwrap();
        assert_eq!(err.code, -32600);
        assert_eq!(err.message, "Invalid Request");

        let err: JsonRpcError = serde_json::from_str(r#"{"message":"no code"}"#).unwrap();
        assert_eq!(err.code, 0);
        assert!(err.data.is_none());
    }

    #[test]
    fn test_initialize_params() {
        let params = InitializeParams::default();
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["protocolVersion"], "2024-11-05");
        assert_eq!(value["capabilities"], json!({}));
        assert_eq!(value["clientInfo"]["name"], "relay");
    }

    #[test]
    fn test_initialize_result_is_lenient() {
        let result = InitializeResult::from_value(json!({
            "protocolVersion": "2024-11-05",
            "serverInfo": {"name": "companies", "version": "1.2.0"}
        }));
        assert_eq!(result.protocol_version.as_deref(), Some("2024-11-05"));
        assert_eq!(result.server_info.unwrap().name, "companies");

        let result = InitializeResult::from_value(json!("unexpected"));
        assert!(result.server_info.is_none());
    }

    #[test]
    fn test_parse_tool_list_shapes() {
        let wrapped = json!({"tools": [
            {"name": "getCompanies", "description": "List companies"},
            {"name": "ping"},
            {"description": "nameless"}
        ]});
        let tools = ToolDescriptor::parse_list(&wrapped);
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].description.as_deref(), Some("List companies"));
        assert!(tools[1].description.is_none());

        let bare = json!([{"name": "getCompanies"}]);
        assert_eq!(ToolDescriptor::parse_list(&bare).len(), 1);

        assert!(ToolDescriptor::parse_list(&json!(null)).is_empty());
        assert!(ToolDescriptor::parse_list(&json!({"tools": "nope"})).is_empty());
    }

    #[test]
    fn test_call_tool_params_default_arguments() {
        let params = CallToolParams::new("getCompanies", None);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, json!({"name": "getCompanies", "arguments": {}}));
    }

    #[test]
    fn test_health_response() {
        let ok: HealthResponse = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(ok.is_ok());
        let degraded: HealthResponse = serde_json::from_str(r#"{"status":"degraded"}"#).unwrap();
        assert!(!degraded.is_ok());
    }
}
