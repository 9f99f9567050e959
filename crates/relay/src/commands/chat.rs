//! Chat command - interactive REPL mode.

use anyhow::Result;
use clap::Args;

use super::Context;
use super::repl::Repl;

/// Arguments for the chat command.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Skip the MCP handshake at startup
    #[arg(long)]
    pub skip_check: bool,
}

/// Run the chat command (REPL).
pub async fn run(args: ChatArgs, ctx: &Context) -> Result<()> {
    let runtime = ctx.connect()?;

    if !args.skip_check {
        runtime.startup_check().await;
    }

    let mut repl = Repl::new(runtime, ctx.verbose)?;
    repl.run().await
}
