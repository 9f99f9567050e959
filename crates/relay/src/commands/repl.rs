//! REPL (Read-Eval-Print Loop) implementation for interactive chat.

use anyhow::Result;
use console::{Style, Term, style};
use relay_domain::{ChatResponse, DomainError, TurnScheduler};
use relay_llm::{Conversation, Message};
use relay_mcp::SessionState;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

use super::Runtime;

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SlashCommand {
    Quit,
    Help,
    Clear,
    Status,
    Tools,
    New,
    /// `/key` with no value shows where the key came from.
    Key(Option<String>),
    /// `/url` with no value shows the current MCP endpoint.
    Url(Option<String>),
    Empty,
    Unknown(String),
}

impl SlashCommand {
    fn parse(input: &str) -> Self {
        let body = input.strip_prefix('/').unwrap_or(input).trim();
        let (cmd, rest) = match body.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (body, ""),
        };

        match cmd {
            "quit" | "q" | "exit" => Self::Quit,
            "help" | "h" | "?" => Self::Help,
            "clear" | "cls" => Self::Clear,
            "status" => Self::Status,
            "tools" => Self::Tools,
            "new" => Self::New,
            "key" => Self::Key((!rest.is_empty()).then(|| rest.to_string())),
            "url" => Self::Url((!rest.is_empty()).then(|| rest.to_string())),
            "" => Self::Empty,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// REPL state and configuration.
pub struct Repl {
    runtime: Runtime,
    scheduler: TurnScheduler,
    conversation: Conversation,
    editor: Editor<(), DefaultHistory>,
    term: Term,
    verbose: bool,
}

impl Repl {
    /// Create a new REPL instance.
    pub fn new(runtime: Runtime, verbose: bool) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(true)
            .build();

        let editor = Editor::with_config(config)?;

        Ok(Self {
            runtime,
            scheduler: TurnScheduler::new(),
            conversation: Vec::new(),
            editor,
            term: Term::stdout(),
            verbose,
        })
    }

    /// Run the REPL loop.
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            let prompt = self.format_prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        match self.handle_slash_command(line).await {
                            Ok(ControlFlow::Continue) => continue,
                            Ok(ControlFlow::Exit) => break,
                            Err(e) => {
                                self.print_error(&format!("Command error: {}", e));
                                continue;
                            }
                        }
                    }

                    self.send_message(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!();
                    self.print_dim("(Interrupted - type /quit to exit)");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(e) => {
                    self.print_error(&format!("Input error: {}", e));
                    break;
                }
            }
        }

        self.scheduler.cancel_pending();
        self.print_dim("Goodbye!");
        Ok(())
    }

    /// Run one turn. Ctrl+C while waiting cancels it.
    ///
    /// The user message stays in the conversation only if a reply arrives.
    async fn send_message(&mut self, message: &str) {
        self.conversation.push(Message::user(message));

        let chat = self.runtime.services.chat().clone();
        let snapshot = self.conversation.clone();
        let handle = self
            .scheduler
            .schedule(async move { chat.turn(&snapshot).await });
        let token = handle.cancellation_token();

        let outcome = tokio::select! {
            result = handle.wait() => result,
            _ = tokio::signal::ctrl_c() => {
                token.cancel();
                Err(DomainError::Cancelled)
            }
        };

        match outcome {
            Ok(ChatResponse { reply, tier }) => {
                if self.verbose {
                    self.print_dim(&format!("[context: {}]", tier));
                }
                println!("{}", reply);
                println!();
                self.conversation.push(Message::assistant(reply));
            }
            Err(DomainError::Cancelled) => {
                self.conversation.pop();
                println!();
                self.print_dim("(Cancelled)");
            }
            Err(e) => {
                self.conversation.pop();
                self.print_error(&e.user_message());
            }
        }
    }

    /// Handle a slash command.
    async fn handle_slash_command(&mut self, input: &str) -> Result<ControlFlow> {
        match SlashCommand::parse(input) {
            SlashCommand::Quit => return Ok(ControlFlow::Exit),
            SlashCommand::Help => self.print_help(),
            SlashCommand::Clear => self.term.clear_screen()?,
            SlashCommand::Status => self.print_status().await,
            SlashCommand::Tools => self.print_tools().await,
            SlashCommand::New => {
                self.scheduler.cancel_pending();
                self.conversation.clear();
                self.print_dim("Started new conversation");
            }
            SlashCommand::Key(Some(value)) => {
                self.runtime.settings.set_credential(&value);
                if self.runtime.settings.has_credential() {
                    let green = Style::new().green();
                    println!("{} API key set for this session", green.apply_to("✓"));
                } else {
                    self.print_dim("API key cleared");
                }
            }
            SlashCommand::Key(None) => match self.runtime.settings.credential_source() {
                Some(source) => println!("API key: set ({})", source),
                None => self.print_dim("No API key set. Use /key <value>"),
            },
            SlashCommand::Url(Some(value)) => {
                self.runtime.settings.set_mcp_url(value);
                let state = self.runtime.startup_check().await;
                println!(
                    "MCP: {} ({})",
                    self.runtime.session.url(),
                    state
                );
            }
            SlashCommand::Url(None) => println!("MCP: {}", self.runtime.session.url()),
            SlashCommand::Empty => self.print_dim("Type /help for available commands"),
            SlashCommand::Unknown(cmd) => {
                self.print_error(&format!("Unknown command: /{}", cmd));
                self.print_dim("Type /help for available commands");
            }
        }

        Ok(ControlFlow::Continue)
    }

    fn print_welcome(&self) {
        let dim = Style::new().dim();
        println!();
        println!("{}", style("Relay Chat").bold().cyan());
        println!("{}", dim.apply_to("─".repeat(40)));
        println!(
            "{}",
            dim.apply_to(format!(
                "MCP: {} ({})",
                self.runtime.session.url(),
                self.runtime.session.state()
            ))
        );
        println!(
            "{}",
            dim.apply_to(format!("Model: {}", self.runtime.config.llm().model()))
        );
        if !self.runtime.settings.has_credential() {
            println!(
                "{}",
                dim.apply_to("No API key found. Set one with /key <value>.")
            );
        }
        println!(
            "{}",
            dim.apply_to("Use /help for commands, Ctrl+D to exit.")
        );
        println!();
    }

    fn print_help(&self) {
        let dim = Style::new().dim();
        println!();
        println!("{}", style("Available Commands").bold());
        println!("{}", dim.apply_to("─".repeat(40)));
        println!("  {}  - Exit the REPL", style("/quit, /q").cyan());
        println!("  {}  - Show this help", style("/help, /h, /?").cyan());
        println!("  {}  - Clear the screen", style("/clear").cyan());
        println!("  {}  - Check the MCP server", style("/status").cyan());
        println!("  {}  - List MCP tools", style("/tools").cyan());
        println!("  {}  - Start a new conversation", style("/new").cyan());
        println!(
            "  {}  - Set the API key for this session",
            style("/key <value>").cyan()
        );
        println!(
            "  {}  - Switch the MCP endpoint",
            style("/url <value>").cyan()
        );
        println!();
        println!("{}", dim.apply_to("Keyboard shortcuts:"));
        println!("  {} - Cancel the pending reply", dim.apply_to("Ctrl+C"));
        println!("  {} - Exit the REPL", dim.apply_to("Ctrl+D"));
        println!();
    }

    async fn print_status(&self) {
        let dim = Style::new().dim();
        let result = self.runtime.session.health_check().await;

        let state = self.runtime.session.state();
        let indicator = match state {
            SessionState::Healthy => Style::new().green().apply_to("● connected"),
            SessionState::Unavailable => Style::new().red().apply_to("● unavailable"),
            _ => Style::new().yellow().apply_to("● checking"),
        };
        println!("MCP: {} {}", indicator, dim.apply_to(self.runtime.session.url()));

        if let Err(e) = result
            && self.verbose
        {
            println!("  {}", dim.apply_to(format!("Error: {}", e)));
        }

        let key = match self.runtime.settings.credential_source() {
            Some(source) => format!("set ({})", source),
            None => "not set".to_string(),
        };
        println!("API key: {}", key);
        println!("Messages: {}", self.conversation.len());
    }

    async fn print_tools(&self) {
        let dim = Style::new().dim();
        match self.runtime.services.mcp().refresh_tools().await {
            Ok(tools) if tools.is_empty() => self.print_dim("Server advertises no tools"),
            Ok(tools) => {
                for tool in &tools {
                    println!(
                        "  {}  {}",
                        style(&tool.name).cyan(),
                        dim.apply_to(tool.description.as_deref().unwrap_or(""))
                    );
                }
            }
            Err(e) => self.print_error(&format!("Could not list tools: {}", e)),
        }
    }

    fn format_prompt(&self) -> String {
        format!("{} ", style("relay>").cyan().bold())
    }

    fn print_dim(&self, msg: &str) {
        let dim = Style::new().dim();
        println!("{}", dim.apply_to(msg));
    }

    fn print_error(&self, msg: &str) {
        let red = Style::new().red();
        println!("{} {}", red.apply_to("Error:"), msg);
    }
}

/// Control flow for the REPL.
pub enum ControlFlow {
    Continue,
    Exit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(SlashCommand::parse("/q"), SlashCommand::Quit);
        assert_eq!(SlashCommand::parse("/exit"), SlashCommand::Quit);
        assert_eq!(SlashCommand::parse("/?"), SlashCommand::Help);
        assert_eq!(SlashCommand::parse("/cls"), SlashCommand::Clear);
        assert_eq!(SlashCommand::parse("/tools"), SlashCommand::Tools);
        assert_eq!(SlashCommand::parse("/"), SlashCommand::Empty);
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(
            SlashCommand::parse("/key   sk-abc  "),
            SlashCommand::Key(Some("sk-abc".to_string()))
        );
        assert_eq!(SlashCommand::parse("/key"), SlashCommand::Key(None));
    }

    #[test]
    fn test_parse_url() {
        assert_eq!(
            SlashCommand::parse("/url http://tools.internal:9000/mcp"),
            SlashCommand::Url(Some("http://tools.internal:9000/mcp".to_string()))
        );
        assert_eq!(SlashCommand::parse("/url  "), SlashCommand::Url(None));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            SlashCommand::parse("/frobnicate now"),
            SlashCommand::Unknown("frobnicate".to_string())
        );
    }
}
