//! Tools command - list and call MCP tools directly.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use console::{Style, style};
use serde_json::Value;

use super::{Context, print_json};

/// Arguments for the tools command.
#[derive(Args, Debug)]
pub struct ToolsArgs {
    #[command(subcommand)]
    pub command: ToolsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ToolsCommand {
    /// List the tools the server advertises
    List,

    /// Call a tool and print its raw result
    Call {
        /// Tool name
        name: String,

        /// Arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
    },
}

/// Run the tools command.
pub async fn run(args: ToolsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ToolsCommand::List => cmd_list(ctx).await,
        ToolsCommand::Call { name, args } => cmd_call(ctx, &name, args.as_deref()).await,
    }
}

async fn cmd_list(ctx: &Context) -> Result<()> {
    let runtime = ctx.connect()?;
    let tools = runtime.services.mcp().refresh_tools().await?;

    if ctx.json_output {
        return print_json(&tools);
    }

    if tools.is_empty() {
        println!("No tools advertised by {}", runtime.session.url());
        return Ok(());
    }

    let dim = Style::new().dim();
    println!("{}", style(format!("Tools ({})", tools.len())).bold());
    for tool in &tools {
        println!("  {}", style(&tool.name).cyan());
        if let Some(ref description) = tool.description {
            println!("    {}", dim.apply_to(description));
        }
        if ctx.verbose
            && let Some(ref schema) = tool.input_schema
        {
            println!("    {}", dim.apply_to(schema.to_string()));
        }
    }

    Ok(())
}

async fn cmd_call(ctx: &Context, name: &str, raw_args: Option<&str>) -> Result<()> {
    let arguments = parse_arguments(raw_args)?;
    let runtime = ctx.connect()?;

    let result = runtime.services.mcp().call_tool(name, arguments).await?;

    if ctx.json_output {
        return print_json(&result);
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Parse `--args`, which must be a JSON object when given.
fn parse_arguments(raw: Option<&str>) -> Result<Option<Value>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value: Value = serde_json::from_str(raw).context("--args is not valid JSON")?;
    if !value.is_object() {
        anyhow::bail!("--args must be a JSON object");
    }
    Ok(Some(value))
}
