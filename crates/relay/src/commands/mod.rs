//! CLI command handlers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use relay_config::{LoadedConfig, RelayConfig, SharedSettings};
use relay_domain::DomainServices;
use relay_llm::{OpenAiBackend, OpenAiConfig};
use relay_mcp::{HttpTransportConfig, SessionManager, SessionState};
use serde::Serialize;

pub mod ask;
pub mod chat;
pub mod companies;
pub mod config;
pub mod repl;
pub mod status;
pub mod tools;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Override for the user config directory.
    pub config_dir: Option<PathBuf>,
    /// Override for the MCP endpoint.
    pub mcp_url: Option<String>,
}

impl Context {
    /// Discover and merge the config layers.
    pub fn load_config(&self) -> Result<LoadedConfig> {
        Ok(relay_config::load_config_with_options(
            None,
            self.config_dir.as_deref(),
        )?)
    }

    /// Load config and wire up the MCP session, completion backend and
    /// domain services. Nothing touches the network here.
    pub fn connect(&self) -> Result<Runtime> {
        let config = self.load_config()?.config;

        let mut mcp = config.mcp();
        if let Some(ref url) = self.mcp_url {
            mcp.url = Some(url.clone());
        }

        let settings = SharedSettings::from_config(&config);
        settings.set_mcp_url(mcp.url());

        let transport = mcp.header_pairs().into_iter().fold(
            HttpTransportConfig::new(mcp.url()).with_timeout(mcp.timeout()),
            |transport, (key, value)| transport.with_header(key, value),
        );
        let session = Arc::new(SessionManager::connect_with_settings(
            transport,
            Arc::new(settings.clone()),
        )?);

        let backend = OpenAiBackend::new(
            OpenAiConfig::from_llm_config(&config.llm()),
            Arc::new(settings.clone()),
        )?;
        let services = DomainServices::new(session.clone(), Arc::new(backend), mcp.domain_tool());

        Ok(Runtime {
            config,
            settings,
            session,
            services,
        })
    }
}

/// Everything a networked command needs.
pub struct Runtime {
    pub config: RelayConfig,
    pub settings: SharedSettings,
    pub session: Arc<SessionManager>,
    pub services: DomainServices,
}

impl Runtime {
    /// Handshake once and cache the tool list.
    ///
    /// Failures are logged and leave the session `Unavailable`; callers carry
    /// on regardless.
    pub async fn startup_check(&self) -> SessionState {
        match self.session.initialize().await {
            Ok(_) => {
                if let Err(e) = self.services.mcp().refresh_tools().await {
                    tracing::debug!(error = %e, "Tool list unavailable at startup");
                }
            }
            Err(e) => {
                tracing::debug!(url = %self.session.url(), error = %e, "Continuing without MCP session");
            }
        }
        self.session.state()
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
