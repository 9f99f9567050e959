//! Chat service for conversation orchestration.
//!
//! One turn is strictly sequential: enrichment settles (success or fallback)
//! before the completion call is issued.

use relay_llm::{Message, SharedBackend};
use tracing::debug;

use crate::error::Result;
use crate::services::context::{ContextComposer, EnrichmentTier};
use crate::services::mcp::McpService;

/// Response from a chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    /// The assistant's reply text.
    pub reply: String,
    /// The enrichment tier used for this turn.
    pub tier: EnrichmentTier,
}

/// Chat service for conversation orchestration.
#[derive(Clone)]
pub struct ChatService {
    composer: ContextComposer,
    backend: SharedBackend,
    mcp: McpService,
}

impl ChatService {
    /// Create a new chat service.
    pub fn new(composer: ContextComposer, backend: SharedBackend, mcp: McpService) -> Self {
        Self {
            composer,
            backend,
            mcp,
        }
    }

    /// Get the context composer.
    pub fn composer(&self) -> &ContextComposer {
        &self.composer
    }

    /// Get the completion backend.
    pub fn backend(&self) -> &SharedBackend {
        &self.backend
    }

    /// Execute a chat turn over the caller's conversation.
    ///
    /// The conversation is not modified; the caller appends the reply.
    /// Completion errors propagate uncaught.
    pub async fn turn(&self, conversation: &[Message]) -> Result<ChatResponse> {
        debug!(
            backend = self.backend.name(),
            messages = conversation.len(),
            "Executing chat turn"
        );

        let known_tools = self.mcp.cached_tools();
        let enriched = self.composer.enrich(conversation, Some(known_tools.as_slice())).await;

        let reply = self.backend.complete(&enriched.messages).await?;

        debug!(
            tier = %enriched.tier,
            response_len = reply.len(),
            "Chat turn completed"
        );

        Ok(ChatResponse {
            reply,
            tier: enriched.tier,
        })
    }
}
