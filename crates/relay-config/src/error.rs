//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration loading and credential lookup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to write a config file.
    #[error("failed to write config file '{path}': {source}")]
    WriteFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize config.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No API key is configured for the completion endpoint.
    #[error(
        "API key not configured. Set {env_var}, add api_key to the [llm] section, or use /key in chat"
    )]
    MissingCredential { env_var: String },
}

impl ConfigError {
    /// Missing-credential error naming the standard env var.
    pub fn missing_credential() -> Self {
        Self::MissingCredential {
            env_var: crate::secrets::API_KEY_ENV.to_string(),
        }
    }
}
