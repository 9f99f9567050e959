//! Companies command - shows the company context a chat turn would carry.

use anyhow::Result;
use clap::Args;
use relay_domain::format_company_data;
use serde::Serialize;
use serde_json::Value;

use super::{Context, print_json};

/// Arguments for the companies command.
#[derive(Args, Debug)]
pub struct CompaniesArgs {
    /// Tool to call instead of the configured one
    #[arg(long)]
    pub tool: Option<String>,

    /// Print the raw tool result as well
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Serialize)]
struct CompaniesOutput<'a> {
    tool: &'a str,
    context: String,
    payload: &'a Value,
}

/// Run the companies command.
pub async fn run(args: CompaniesArgs, ctx: &Context) -> Result<()> {
    let runtime = ctx.connect()?;
    let tool = args
        .tool
        .as_deref()
        .unwrap_or_else(|| runtime.services.chat().composer().domain_tool());

    let payload = runtime.services.mcp().call_tool(tool, None).await?;
    let context = format_company_data(&payload);

    if ctx.json_output {
        return print_json(&CompaniesOutput {
            tool,
            context,
            payload: &payload,
        });
    }

    println!("{}", context);
    if args.raw {
        println!();
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }
    Ok(())
}
