//! Status command - probes the MCP server and reports the session state.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use relay_mcp::SessionState;
use serde::Serialize;

use super::{Context, print_json};

/// Arguments for the status command.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Also perform the initialize handshake
    #[arg(long)]
    pub handshake: bool,
}

/// Status response for JSON output.
#[derive(Debug, Serialize)]
struct StatusOutput {
    url: String,
    state: String,
    health: Option<String>,
    server: Option<String>,
    protocol_version: Option<String>,
    api_key: Option<String>,
    error: Option<String>,
}

/// Run the status command.
pub async fn run(args: StatusArgs, ctx: &Context) -> Result<()> {
    let runtime = ctx.connect()?;
    let session = &runtime.session;

    let mut output = StatusOutput {
        url: session.url(),
        state: String::new(),
        health: None,
        server: None,
        protocol_version: None,
        api_key: runtime
            .settings
            .credential_source()
            .map(|source| source.to_string()),
        error: None,
    };

    match session.health_check().await {
        Ok(health) => output.health = Some(health.status),
        Err(e) => output.error = Some(e.to_string()),
    }

    if args.handshake {
        match session.initialize().await {
            Ok(result) => {
                output.server = result
                    .server_info
                    .map(|info| format!("{} {}", info.name, info.version).trim().to_string());
                output.protocol_version = result.protocol_version;
                output.error = None;
            }
            Err(e) => output.error = Some(e.to_string()),
        }
    }

    let state = session.state();
    output.state = state.to_string();

    if ctx.json_output {
        return print_json(&output);
    }

    let dim = Style::new().dim();
    let indicator = match state {
        SessionState::Healthy => Style::new().green().apply_to("● healthy"),
        SessionState::Unavailable => Style::new().red().apply_to("● unavailable"),
        SessionState::Checking => Style::new().yellow().apply_to("● checking"),
        SessionState::Unknown => Style::new().yellow().apply_to("● unknown"),
    };

    println!();
    println!("{}", style("Relay MCP Status").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();
    println!("  {} {}", dim.apply_to("State:"), indicator);
    println!("  {} {}", dim.apply_to("Server:"), output.url);
    if let Some(ref health) = output.health {
        println!("  {} {}", dim.apply_to("Health:"), health);
    }
    if let Some(ref server) = output.server {
        println!("  {} {}", dim.apply_to("Name:"), server);
    }
    if let Some(ref version) = output.protocol_version {
        println!("  {} {}", dim.apply_to("Protocol:"), version);
    }
    println!(
        "  {} {}",
        dim.apply_to("API key:"),
        output.api_key.as_deref().unwrap_or("not set")
    );

    if let Some(ref error) = output.error
        && (ctx.verbose || !state.is_healthy())
    {
        println!();
        println!("  {} {}", dim.apply_to("Error:"), error);
    }
    println!();

    Ok(())
}
