//! Relay - terminal chat client with live MCP company context.
//!
//! Main entry point for the Relay CLI.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod commands;

use commands::{ask, chat, companies, config, status, tools};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Relay - chat with a language model grounded in live MCP company data
#[derive(Parser)]
#[command(name = "relay")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding config.toml and logs
    #[arg(long, global = true, env = "RELAY_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// MCP server endpoint (overrides [mcp].url)
    #[arg(long, global = true, env = "RELAY_MCP_URL")]
    pub mcp_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a one-shot question
    Ask(ask::AskArgs),

    /// Enter interactive chat mode (REPL)
    Chat(chat::ChatArgs),

    /// Show MCP server status
    Status(status::StatusArgs),

    /// List or call MCP tools
    Tools(tools::ToolsArgs),

    /// Show the company context sent with each turn
    Companies(companies::CompaniesArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_dir = cli
        .config_dir
        .clone()
        .or_else(relay_config::xdg_config_dir)
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let _guard = init_tracing(cli.verbose, &log_dir);

    let ctx = commands::Context {
        json_output: cli.json,
        verbose: cli.verbose,
        config_dir: cli.config_dir,
        mcp_url: cli.mcp_url,
    };

    match cli.command {
        Commands::Ask(args) => ask::run(args, &ctx).await,
        Commands::Chat(args) => chat::run(args, &ctx).await,
        Commands::Status(args) => status::run(args, &ctx).await,
        Commands::Tools(args) => tools::run(args, &ctx).await,
        Commands::Companies(args) => companies::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}

/// Console (stderr, human-readable) plus a daily rotating JSON file.
///
/// `RUST_LOG` replaces the console filter when set. The file layer is skipped
/// if the log directory cannot be created.
fn init_tracing(verbose: bool, log_dir: &Path) -> Option<WorkerGuard> {
    let console_filter = if verbose {
        "relay=debug,relay_mcp=debug,relay_llm=debug,relay_domain=debug,relay_config=debug,info"
    } else {
        "relay=info,relay_config=warn,error"
    };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(console_filter));

    let file = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("relay")
        .filename_suffix("log")
        .build(log_dir)
        .ok();
    let (file_layer, guard) = match file {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(EnvFilter::new(
                    "relay=trace,relay_mcp=trace,relay_llm=trace,relay_domain=trace,relay_config=trace,info",
                ));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .with(file_layer)
        .init();

    guard
}
