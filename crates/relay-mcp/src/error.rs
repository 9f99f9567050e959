//! Error types for MCP operations.

use thiserror::Error;

/// Result type for MCP operations.
pub type Result<T> = std::result::Result<T, RpcError>;

/// Failure to decode a single event-stream response frame.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The body contained no line starting with `data: `.
    #[error("response frame has no 'data: ' line")]
    MissingDataLine,

    /// The `data: ` payload was not valid JSON.
    #[error("response frame payload is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    /// The payload carried a JSON-RPC `error` object.
    #[error("remote error {code}: {message}")]
    RemoteError {
        /// Error code from the server.
        code: i64,
        /// Error message from the server.
        message: String,
    },
}

/// Error type for a single JSON-RPC call.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The server answered with a non-2xx HTTP status.
    #[error("HTTP error {status} {status_text}")]
    Transport {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
    },

    /// The request never produced an HTTP response (DNS, connect, timeout, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a JSON-RPC error object.
    #[error("server error {code}: {message}")]
    Protocol {
        /// Error code from the server.
        code: i64,
        /// Error message from the server.
        message: String,
    },

    /// The response body could not be decoded as a frame.
    #[error("framing error: {0}")]
    Framing(FrameError),

    /// JSON serialization of the request failed.
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The configured endpoint is not a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl RpcError {
    /// Create a network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a protocol error from a remote error code and message.
    pub fn protocol(code: i64, message: impl Into<String>) -> Self {
        Self::Protocol {
            code,
            message: message.into(),
        }
    }

    /// True when the server could not be reached or refused the request at
    /// the HTTP level.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Network(_))
    }

    /// The HTTP status, if this is a transport failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<FrameError> for RpcError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::RemoteError { code, message } => Self::Protocol { code, message },
            other => Self::Framing(other),
        }
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
