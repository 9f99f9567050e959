//! Domain error types.

use thiserror::Error;

/// Failure to turn a tool payload into domain records.
#[derive(Debug, Error)]
pub enum NormalizationError {
    /// The embedded `content[0].text` was not valid JSON.
    #[error("tool returned unparseable text content: {0}")]
    UnparseableText(#[source] serde_json::Error),
}

/// Domain-level errors.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Completion call failed.
    #[error(transparent)]
    Completion(#[from] relay_llm::CompletionError),

    /// MCP call failed.
    #[error("MCP error: {0}")]
    Mcp(#[from] relay_mcp::RpcError),

    /// Tool payload could not be normalized.
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    /// The turn was superseded or cancelled before it finished.
    #[error("turn cancelled")]
    Cancelled,

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Text suitable for showing to the person chatting.
    pub fn user_message(&self) -> String {
        match self {
            DomainError::Completion(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
