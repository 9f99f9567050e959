//! Error types for the completion gateway.

use relay_config::ConfigError;
use thiserror::Error;

/// Result type alias using the completion error type.
pub type Result<T> = std::result::Result<T, CompletionError>;

/// Error type for completion calls.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Configuration problem (most often a missing API key).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The endpoint answered but returned no choices.
    #[error("completion response contained no choices")]
    EmptyResponse,

    /// Non-2xx HTTP status from the endpoint.
    #[error("HTTP {status} {status_text}")]
    Transport { status: u16, status_text: String },

    /// Network/connectivity error.
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CompletionError {
    /// HTTP status, if this is a transport failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if no credential was configured.
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::Config(ConfigError::MissingCredential { .. }))
    }

    /// Returns true if the endpoint rejected the credential (HTTP 401).
    pub fn is_auth_error(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns true if the request was rate limited (HTTP 429).
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// Text suitable for showing to the person chatting.
    pub fn user_message(&self) -> String {
        if self.is_missing_credential() {
            "Please set your OpenAI API key first (use /key <value> or set OPENAI_API_KEY)."
                .to_string()
        } else if self.is_auth_error() {
            "Invalid API key. Please check your OpenAI API key.".to_string()
        } else if self.is_rate_limited() {
            "Rate limit exceeded. Please wait a moment and try again.".to_string()
        } else {
            format!("Sorry, the language model request failed: {}", self)
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompletionError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            CompletionError::Network(format!("Connection failed: {}", err))
        } else {
            CompletionError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CompletionError {
    fn from(err: serde_json::Error) -> Self {
        CompletionError::Serialization(err.to_string())
    }
}
