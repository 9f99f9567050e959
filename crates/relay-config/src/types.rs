//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [llm]
//! model = "gpt-4o-mini"
//! endpoint = "https://api.openai.com/v1/chat/completions"
//! max_tokens = 1000
//! temperature = 0.7
//!
//! [mcp]
//! url = "http://localhost:8080/mcp"
//! domain_tool = "getCompanies"
//! headers = [["X-Api-Key", "..."]]
//! ```
//!
//! Every field is optional so that partial layers can be merged; accessors
//! fill in the defaults below.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default completion endpoint.
pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default upper bound on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default completion request timeout in seconds.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Default MCP endpoint.
pub const DEFAULT_MCP_URL: &str = "http://localhost:8080/mcp";

/// Default MCP request timeout in seconds.
pub const DEFAULT_MCP_TIMEOUT_SECS: u64 = 30;

/// Tool used to fetch the company listing for context enrichment.
pub const DEFAULT_DOMAIN_TOOL: &str = "getCompanies";

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Completion endpoint configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmConfig>,
    /// MCP server configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcp: Option<McpConfig>,
}

impl RelayConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// A config with every section present and set to its defaults.
    pub fn with_defaults() -> Self {
        Self {
            llm: Some(LlmConfig::with_defaults()),
            mcp: Some(McpConfig::with_defaults()),
        }
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> crate::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: RelayConfig) {
        if other.llm.is_some() {
            self.llm = other.llm;
        }

        if other.mcp.is_some() {
            self.mcp = other.mcp;
        }
    }

    /// The `[llm]` section, or defaults when absent.
    pub fn llm(&self) -> LlmConfig {
        self.llm.clone().unwrap_or_default()
    }

    /// The `[mcp]` section, or defaults when absent.
    pub fn mcp(&self) -> McpConfig {
        self.mcp.clone().unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LLM Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the OpenAI-compatible completion endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key (prefer the env var; warns if set here).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Full completion URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl LlmConfig {
    /// Every field set to its default, except the API key.
    pub fn with_defaults() -> Self {
        Self {
            api_key: None,
            model: Some(DEFAULT_MODEL.to_string()),
            endpoint: Some(DEFAULT_COMPLETION_ENDPOINT.to_string()),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            temperature: Some(DEFAULT_TEMPERATURE),
            timeout_secs: Some(DEFAULT_LLM_TIMEOUT_SECS),
        }
    }

    /// Returns true if an API key is stored directly in the config file.
    pub fn has_plaintext_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_COMPLETION_ENDPOINT)
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    pub fn temperature(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_LLM_TIMEOUT_SECS))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MCP Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the remote MCP server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct McpConfig {
    /// JSON-RPC endpoint. The health probe lives at `<url>/health`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Tool called to fetch domain records for context enrichment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_tool: Option<String>,
    /// HTTP headers to set (as [key, value] pairs).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<[String; 2]>,
}

impl McpConfig {
    /// Every field set to its default.
    pub fn with_defaults() -> Self {
        Self {
            url: Some(DEFAULT_MCP_URL.to_string()),
            timeout_secs: Some(DEFAULT_MCP_TIMEOUT_SECS),
            domain_tool: Some(DEFAULT_DOMAIN_TOOL.to_string()),
            headers: Vec::new(),
        }
    }

    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_MCP_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_MCP_TIMEOUT_SECS))
    }

    pub fn domain_tool(&self) -> &str {
        self.domain_tool.as_deref().unwrap_or(DEFAULT_DOMAIN_TOOL)
    }

    /// Headers as `(key, value)` tuples.
    pub fn header_pairs(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|[k, v]| (k.clone(), v.clone()))
            .collect()
    }
}
