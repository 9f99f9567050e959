//! Single-event response frame decoding.
//!
//! The server wraps every JSON-RPC response in one server-sent event, even for
//! plain request/response calls. A frame is decoded by taking the first
//! `data: ` line and parsing the rest of it as the JSON-RPC response; no
//! incremental event-stream parsing is needed.

use serde_json::Value;

use crate::error::FrameError;
use crate::protocol::JsonRpcError;

/// Prefix of the line that carries the JSON payload.
pub const DATA_PREFIX: &str = "data: ";

/// Decode one raw response body into the JSON-RPC `result` value.
///
/// A payload carrying an `error` field fails with [`FrameError::RemoteError`];
/// a payload with neither `error` nor `result` decodes to `null`.
pub fn decode_frame(body: &str) -> Result<Value, FrameError> {
    let payload = body
        .lines()
        .find_map(|line| line.strip_prefix(DATA_PREFIX))
        .ok_or(FrameError::MissingDataLine)?;

    let value: Value = serde_json::from_str(payload).map_err(FrameError::MalformedJson)?;

    if let Some(error) = value.get("error").and_then(remote_error) {
        return Err(FrameError::RemoteError {
            code: error.code,
            message: error.message,
        });
    }

    Ok(value.get("result").cloned().unwrap_or(Value::Null))
}

/// Interpret an `error` field. Servers normally send `{code, message}`, but a
/// bare string is accepted as the message.
fn remote_error(field: &Value) -> Option<JsonRpcError> {
    match field {
        Value::Null => None,
        Value::String(message) => Some(JsonRpcError {
            code: JsonRpcError::INTERNAL_ERROR,
            message: message.clone(),
            data: None,
        }),
        other => Some(
            serde_json::from_value(other.clone()).unwrap_or_else(|_| JsonRpcError {
                code: JsonRpcError::INTERNAL_ERROR,
                message: other.to_string(),
                data: None,
            }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_result_field() {
        let body = "event: message\ndata: {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{\"tools\":[]}}\n\n";
        assert_eq!(decode_frame(body).unwrap(), json!({"tools": []}));
    }

    #[test]
    fn test_crlf_line_endings() {
        let body = "event: message\r\ndata: {\"result\":42}\r\n\r\n";
        assert_eq!(decode_frame(body).unwrap(), json!(42));
    }

    #[test]
    fn test_first_data_line_wins() {
        let body = "data: {\"result\":\"first\"}\ndata: {\"result\":\"second\"}\n";
        assert_eq!(decode_frame(body).unwrap(), json!("first"));
    }

    #[test]
    fn test_missing_data_line() {
        let err = decode_frame("event: message\n\n").unwrap_err();
        assert!(matches!(err, FrameError::MissingDataLine));

        // `data:` without the trailing space is not a data line here
        let err = decode_frame("data:{\"result\":1}").unwrap_err();
        assert!(matches!(err, FrameError::MissingDataLine));
    }

    #[test]
    fn test_malformed_json() {
        let err = decode_frame("event: message\ndata: {not json").unwrap_err();
        assert!(matches!(err, FrameError::MalformedJson(_)));
    }

    #[test]
    fn test_remote_error() {
        let body = "event: message\ndata: {\"jsonrpc\":\"2.0\",\"id\":3,\"error\":{\"code\":-32601,\"message\":\"Method not found\"}}";
        match decode_frame(body).unwrap_err() {
            FrameError::RemoteError { code, message } => {
                assert_eq!(code, -32601);
                assert_eq!(message, "Method not found");
            }
            other => panic!("expected RemoteError, got {other:?}"),
        }
    }

    #[test]
    fn test_error_wins_over_result() {
        let body = "data: {\"result\":1,\"error\":{\"code\":5,\"message\":\"no\"}}";
        assert!(matches!(
            decode_frame(body).unwrap_err(),
            FrameError::RemoteError { code: 5, .. }
        ));
    }

    #[test]
    fn test_string_error_and_null_error() {
        let body = "data: {\"error\":\"tool crashed\"}";
        match decode_frame(body).unwrap_err() {
            FrameError::RemoteError { message, .. } => assert_eq!(message, "tool crashed"),
            other => panic!("expected RemoteError, got {other:?}"),
        }

        let body = "data: {\"error\":null,\"result\":\"fine\"}";
        assert_eq!(decode_frame(body).unwrap(), json!("fine"));
    }

    #[test]
    fn test_non_object_error_is_still_remote() {
        match decode_frame("data: {\"error\":7,\"result\":\"ignored\"}").unwrap_err() {
            FrameError::RemoteError { code, message } => {
                assert_eq!(code, JsonRpcError::INTERNAL_ERROR);
                assert_eq!(message, "7");
            }
            other => panic!("expected RemoteError, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_result_is_null() {
        assert_eq!(decode_frame("data: {\"id\":1}").unwrap(), Value::Null);
    }
}
