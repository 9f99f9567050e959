//! Ask command - one-shot question with company context.

use anyhow::Result;
use clap::Args;
use console::Style;
use relay_llm::Message;
use serde::Serialize;

use super::{Context, print_json};

/// Arguments for the ask command.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question or prompt to send
    #[arg(required = true)]
    pub prompt: String,
}

/// Ask response for JSON output.
#[derive(Debug, Serialize)]
struct AskOutput {
    reply: String,
    tier: String,
    mcp_state: String,
}

/// Run the ask command.
pub async fn run(args: AskArgs, ctx: &Context) -> Result<()> {
    let runtime = ctx.connect()?;
    let dim = Style::new().dim();

    let state = runtime.startup_check().await;
    if ctx.verbose && !ctx.json_output {
        println!(
            "{}",
            dim.apply_to(format!("MCP: {} ({})", runtime.session.url(), state))
        );
        println!(
            "{}",
            dim.apply_to(format!("Model: {}", runtime.config.llm().model()))
        );
        println!();
    }

    let conversation = vec![Message::user(args.prompt)];
    let response = runtime
        .services
        .chat()
        .turn(&conversation)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if ctx.json_output {
        return print_json(&AskOutput {
            reply: response.reply,
            tier: response.tier.to_string(),
            mcp_state: runtime.session.state().to_string(),
        });
    }

    println!("{}", response.reply);
    if ctx.verbose {
        println!();
        println!(
            "{}",
            dim.apply_to(format!("[context: {}]", response.tier))
        );
    }

    Ok(())
}
