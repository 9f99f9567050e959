//! Configuration system for Relay.
//!
//! Provides TOML-based configuration with:
//! - An `[llm]` section for the completion endpoint
//! - An `[mcp]` section for the tool server
//! - Config file layering (XDG user config + project-local overrides)
//! - API key resolution (env var → config file)
//!
//! The rest of the workspace reads the live credential and MCP endpoint
//! through the [`SettingsSource`] trait, so the REPL can swap a key at
//! runtime without rebuilding clients.

pub mod discovery;
pub mod error;
pub mod secrets;
pub mod settings;
pub mod types;

pub use discovery::{
    load_config, load_config_file, load_config_with_options, save_config, user_config_path,
    xdg_config_dir, xdg_config_path, ConfigSource, LoadedConfig,
};
pub use error::{ConfigError, Result};
pub use secrets::{resolve_api_key, ResolvedSecret, SecretSource, API_KEY_ENV};
pub use settings::{SettingsSource, SharedSettings};
pub use types::*;
