//! API key resolution.
//!
//! Resolution order:
//! 1. Environment variable (`OPENAI_API_KEY`)
//! 2. Config file (with warning)
//!
//! A key entered at runtime (the REPL's `/key`) is tracked as
//! [`SecretSource::Session`] and never written back to disk.

/// Environment variable holding the completion API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Result of API key resolution with provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    /// The secret value.
    pub value: String,
    /// Where the secret was found.
    pub source: SecretSource,
}

/// Where a secret was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Environment variable.
    EnvVar(String),
    /// Config file (plaintext, not recommended).
    ConfigFile,
    /// Entered during the current session.
    Session,
}

impl std::fmt::Display for SecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretSource::EnvVar(var) => write!(f, "env var {}", var),
            SecretSource::ConfigFile => write!(f, "config file (plaintext)"),
            SecretSource::Session => write!(f, "current session"),
        }
    }
}

/// Resolve the API key using the full resolution chain.
pub fn resolve_api_key(config_value: Option<&str>) -> Option<ResolvedSecret> {
    resolve_from(std::env::var(API_KEY_ENV).ok(), config_value)
}

fn resolve_from(env_value: Option<String>, config_value: Option<&str>) -> Option<ResolvedSecret> {
    if let Some(value) = env_value
        && !value.is_empty()
    {
        return Some(ResolvedSecret {
            value,
            source: SecretSource::EnvVar(API_KEY_ENV.to_string()),
        });
    }

    config_value
        .filter(|v| !v.is_empty())
        .map(|v| ResolvedSecret {
            value: v.to_string(),
            source: SecretSource::ConfigFile,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_wins() {
        let resolved = resolve_from(Some("sk-env".to_string()), Some("sk-file")).unwrap();
        assert_eq!(resolved.value, "sk-env");
        assert_eq!(resolved.source, SecretSource::EnvVar("OPENAI_API_KEY".to_string()));
    }

    #[test]
    fn test_empty_env_var_falls_through() {
        let resolved = resolve_from(Some(String::new()), Some("sk-file")).unwrap();
        assert_eq!(resolved.value, "sk-file");
        assert_eq!(resolved.source, SecretSource::ConfigFile);
    }

    #[test]
    fn test_nothing_available() {
        assert!(resolve_from(None, None).is_none());
        assert!(resolve_from(None, Some("")).is_none());
    }

    #[test]
    fn test_secret_source_display() {
        assert_eq!(
            SecretSource::EnvVar("OPENAI_API_KEY".to_string()).to_string(),
            "env var OPENAI_API_KEY"
        );
        assert_eq!(
            SecretSource::ConfigFile.to_string(),
            "config file (plaintext)"
        );
        assert_eq!(SecretSource::Session.to_string(), "current session");
    }
}
