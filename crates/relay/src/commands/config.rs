//! Config command - configuration management.

use anyhow::Result;
use clap::{Args, Subcommand};
use relay_config::{API_KEY_ENV, RelayConfig, resolve_api_key};
use serde::Serialize;

use super::{Context, print_json};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved configuration
    Show,

    /// Show the user configuration file path
    Path,

    /// Write a config file with every default filled in
    Init {
        /// Create project-local config (./relay.toml) instead of user config
        #[arg(long)]
        local: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Path => cmd_path(ctx),
        ConfigCommand::Init { local, force } => cmd_init(ctx, local, force),
    }
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    sources: Vec<String>,
    api_key: Option<String>,
    config: RelayConfig,
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = ctx.load_config()?;
    let llm = loaded.config.llm();
    let mcp = loaded.config.mcp();
    let key = resolve_api_key(llm.api_key.as_deref());

    if ctx.json_output {
        let mut config = loaded.config.clone();
        if let Some(ref mut llm) = config.llm
            && llm.api_key.is_some()
        {
            llm.api_key = Some("<redacted>".to_string());
        }
        return print_json(&ShowOutput {
            sources: loaded
                .loaded_from()
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            api_key: key.map(|secret| secret.source.to_string()),
            config,
        });
    }

    println!("# Relay Configuration\n");

    let sources = loaded.loaded_from();
    if sources.is_empty() {
        println!("No config files loaded (using defaults)\n");
    } else {
        println!("Config files:");
        for source in &sources {
            println!("  {}", source.display());
        }
        println!();
    }

    println!("LLM:");
    println!("  model:       {}", llm.model());
    println!("  endpoint:    {}", llm.endpoint());
    println!("  max_tokens:  {}", llm.max_tokens());
    println!("  temperature: {}", llm.temperature());
    println!("  timeout:     {}s", llm.timeout().as_secs());
    match key {
        Some(secret) => println!("  api_key:     set ({})", secret.source),
        None => println!("  api_key:     not set (export {})", API_KEY_ENV),
    }
    println!();

    println!("MCP:");
    println!("  url:         {}", ctx.mcp_url.as_deref().unwrap_or(mcp.url()));
    println!("  timeout:     {}s", mcp.timeout().as_secs());
    println!("  domain_tool: {}", mcp.domain_tool());
    for (name, _) in mcp.header_pairs() {
        println!("  header:      {}: <set>", name);
    }

    if !loaded.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &loaded.warnings {
            println!("  {}", warning);
        }
    }

    Ok(())
}

fn cmd_path(ctx: &Context) -> Result<()> {
    match relay_config::user_config_path(ctx.config_dir.as_deref()) {
        Some(path) => println!("{}", path.display()),
        None => eprintln!("Could not determine config directory"),
    }
    Ok(())
}

fn cmd_init(ctx: &Context, local: bool, force: bool) -> Result<()> {
    let path = if local {
        std::path::PathBuf::from("relay.toml")
    } else {
        relay_config::user_config_path(ctx.config_dir.as_deref())
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
    };

    if path.exists() && !force {
        println!("Config file already exists: {}", path.display());
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    relay_config::save_config(&RelayConfig::with_defaults(), &path)?;
    println!("Created config file: {}", path.display());
    println!("Set your API key with: export {}=<key>", API_KEY_ENV);
    Ok(())
}
