//! Live settings read by the MCP and completion clients on every call.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::secrets::{resolve_api_key, ResolvedSecret, SecretSource};
use crate::RelayConfig;

/// Synchronous accessor for the values that may change while the process runs.
///
/// Implementations must be cheap to call; they are consulted per request.
pub trait SettingsSource: Send + Sync {
    /// The current API credential. Empty means unset.
    fn credential(&self) -> String;

    /// The current MCP endpoint URL.
    fn mcp_url(&self) -> String;
}

#[derive(Debug, Default)]
struct SettingsState {
    credential: Option<ResolvedSecret>,
    mcp_url: String,
}

/// Shared, runtime-mutable settings.
///
/// Clones share the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<SettingsState>>,
}

impl SharedSettings {
    /// Create settings from explicit values.
    pub fn new(credential: Option<&str>, mcp_url: impl Into<String>) -> Self {
        let settings = Self::default();
        settings.set_mcp_url(mcp_url);
        if let Some(value) = credential {
            settings.set_credential(value);
        }
        settings
    }

    /// Resolve settings from a loaded config (env var → config file).
    pub fn from_config(config: &RelayConfig) -> Self {
        let llm = config.llm();
        let credential = resolve_api_key(llm.api_key.as_deref());
        if let Some(ref secret) = credential {
            tracing::debug!(source = %secret.source, "resolved API key");
        }

        Self {
            inner: Arc::new(RwLock::new(SettingsState {
                credential,
                mcp_url: config.mcp().url().to_string(),
            })),
        }
    }

    /// Replace the credential for the rest of the session. An empty value clears it.
    pub fn set_credential(&self, value: &str) {
        let value = value.trim();
        self.inner.write().credential = (!value.is_empty()).then(|| ResolvedSecret {
            value: value.to_string(),
            source: SecretSource::Session,
        });
    }

    /// Remove the credential.
    pub fn clear_credential(&self) {
        self.inner.write().credential = None;
    }

    /// Where the current credential came from, if any.
    pub fn credential_source(&self) -> Option<SecretSource> {
        self.inner.read().credential.as_ref().map(|s| s.source.clone())
    }

    /// Whether a non-empty credential is set.
    pub fn has_credential(&self) -> bool {
        self.inner.read().credential.is_some()
    }

    /// Point at a different MCP endpoint.
    pub fn set_mcp_url(&self, url: impl Into<String>) {
        self.inner.write().mcp_url = url.into();
    }
}

impl SettingsSource for SharedSettings {
    fn credential(&self) -> String {
        self.inner
            .read()
            .credential
            .as_ref()
            .map(|s| s.value.clone())
            .unwrap_or_default()
    }

    fn mcp_url(&self) -> String {
        self.inner.read().mcp_url.clone()
    }
}
