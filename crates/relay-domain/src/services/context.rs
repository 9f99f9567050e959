//! Context composition for chat turns.
//!
//! [`ContextComposer::enrich`] never fails. It tries three tiers in order:
//!
//! 1. **Rich**: call the company tool, render the records into a system
//!    message alongside instructions naming the follow-up tools.
//! 2. **Degraded**: if that fails and the caller has a non-empty tool list,
//!    describe the tools instead.
//! 3. **Minimal**: no system message at all.
//!
//! Any system messages already in the conversation are dropped first, so the
//! output carries at most one, always at the front.

use relay_llm::{Conversation, Message};
use relay_mcp::ToolDescriptor;
use tracing::{debug, warn};

use crate::error::{DomainError, Result};
use crate::services::mcp::SharedToolSource;
use crate::services::records::{CompanyRecord, normalize, render_records};

/// Purpose line for the configured company tool in the rich-tier instructions.
pub const DOMAIN_TOOL_PURPOSE: &str = "list every company with its chatbots and LLM models";

/// Lookup tools named after the configured company tool in the rich-tier
/// instructions.
pub const FOLLOW_UP_TOOLS: &[(&str, &str)] = &[
    ("getCompanyByName", "look up a single company by its name"),
    (
        "getChatbotsByCompany",
        "list the chatbots a company operates",
    ),
    (
        "getLLMsByCompany",
        "list the LLM models a company uses and what each is specialized for",
    ),
];

/// Which tier produced the system message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentTier {
    Rich,
    Degraded,
    Minimal,
}

impl EnrichmentTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rich => "rich",
            Self::Degraded => "degraded",
            Self::Minimal => "minimal",
        }
    }
}

impl std::fmt::Display for EnrichmentTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A conversation ready to send, with the tier that shaped it.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedConversation {
    pub tier: EnrichmentTier,
    pub messages: Conversation,
}

/// Builds the system message for each turn.
#[derive(Clone)]
pub struct ContextComposer {
    tools: SharedToolSource,
    domain_tool: String,
}

impl ContextComposer {
    /// Create a composer that fetches records with `domain_tool`.
    pub fn new(tools: SharedToolSource, domain_tool: impl Into<String>) -> Self {
        Self {
            tools,
            domain_tool: domain_tool.into(),
        }
    }

    /// The tool called for rich context.
    pub fn domain_tool(&self) -> &str {
        &self.domain_tool
    }

    /// Enrich a conversation. `known_tools` is a previously fetched tool list
    /// used only by the degraded tier.
    pub async fn enrich(
        &self,
        conversation: &[Message],
        known_tools: Option<&[ToolDescriptor]>,
    ) -> EnrichedConversation {
        // The cached state is informational; the call is always attempted.
        debug!(state = %self.tools.state(), tool = %self.domain_tool, "Enriching conversation");

        let (tier, system) = match self.rich_context().await {
            Ok(context) => (EnrichmentTier::Rich, Some(rich_system_prompt(&context, &self.domain_tool))),
            Err(e) => {
                warn!(tool = %self.domain_tool, error = %e, "Rich context unavailable, falling back");
                match known_tools {
                    Some(tools) if !tools.is_empty() => {
                        (EnrichmentTier::Degraded, Some(degraded_system_prompt(tools)))
                    }
                    _ => {
                        debug!("No cached tool list, sending conversation without context");
                        (EnrichmentTier::Minimal, None)
                    }
                }
            }
        };

        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.extend(system.map(Message::system));
        messages.extend(conversation.iter().filter(|m| !m.is_system()).cloned());

        debug!(tier = %tier, messages = messages.len(), "Conversation enriched");
        EnrichedConversation { tier, messages }
    }

    /// Fetch, normalize and render the company records.
    async fn rich_context(&self) -> Result<String> {
        let payload = self.tools.call_tool(&self.domain_tool, None).await?;
        let raw = normalize(&payload).map_err(DomainError::from)?;
        let records: Vec<CompanyRecord> = raw.iter().map(CompanyRecord::from_value).collect();
        debug!(records = records.len(), "Fetched company records");
        Ok(render_records(&records))
    }
}

/// System message for the rich tier. `domain_tool` is listed first, followed
/// by the lookup tools it does not duplicate.
pub fn rich_system_prompt(context: &str, domain_tool: &str) -> String {
    let tools = std::iter::once((domain_tool, DOMAIN_TOOL_PURPOSE))
        .chain(
            FOLLOW_UP_TOOLS
                .iter()
                .copied()
                .filter(|(name, _)| *name != domain_tool),
        )
        .map(|(name, purpose)| format!("- {}: {}", name, purpose))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a helpful assistant with access to live company data from an MCP server.\n\n\
         Current company data:\n{context}\n\n\
         Available tools for follow-up questions:\n{tools}\n\n\
         Answer questions about these companies, their chatbots and the language models they use \
         from the data above. If the data does not cover a question, say so and suggest which tool \
         would answer it."
    )
}

/// System message for the degraded tier.
pub fn degraded_system_prompt(tools: &[ToolDescriptor]) -> String {
    let listing = tools
        .iter()
        .map(|t| {
            format!(
                "- {}: {}",
                t.name,
                t.description.as_deref().unwrap_or("No description available")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a helpful assistant. The following MCP tools are available:\n{listing}\n\n\
         Live data could not be loaded for this message. When a question relates to these tools, \
         mention that they are available."
    )
}
