//! Domain services.
//!
//! This module contains the services the CLI drives: chat turns, context
//! composition, company record handling, MCP access and turn scheduling.

pub mod chat;
pub mod context;
pub mod mcp;
pub mod records;
pub mod turn;

use relay_llm::SharedBackend;
use tracing::info;

pub use mcp::SharedToolSource;

/// Domain services facade.
///
/// The main entry point for the CLI to reach Relay's core functionality.
#[derive(Clone)]
pub struct DomainServices {
    /// Chat service for conversation orchestration.
    chat: chat::ChatService,
    /// MCP service for tool discovery and invocation.
    mcp: mcp::McpService,
}

impl DomainServices {
    /// Create new domain services.
    ///
    /// `domain_tool` is the MCP tool whose result enriches each turn.
    pub fn new(tools: SharedToolSource, backend: SharedBackend, domain_tool: &str) -> Self {
        info!(backend = backend.name(), domain_tool, "Initializing domain services");

        let mcp = mcp::McpService::new(tools.clone());
        let composer = context::ContextComposer::new(tools, domain_tool);
        let chat = chat::ChatService::new(composer, backend, mcp.clone());

        Self { chat, mcp }
    }

    /// Get the chat service.
    pub fn chat(&self) -> &chat::ChatService {
        &self.chat
    }

    /// Get the MCP service.
    pub fn mcp(&self) -> &mcp::McpService {
        &self.mcp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_llm::{Message, MockBackend};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_domain_services_share_tool_cache() {
        let source = Arc::new(mcp::testing::MockToolSource::with_tools(vec![
            relay_mcp::ToolDescriptor::new("getCompanies", Some("List companies")),
        ]));
        let services =
            DomainServices::new(source, Arc::new(MockBackend::with_text("hi")), "getCompanies");

        services.mcp().refresh_tools().await.unwrap();
        let response = services.chat().turn(&[Message::user("hello")]).await.unwrap();

        assert_eq!(response.reply, "hi");
        assert_eq!(response.tier, context::EnrichmentTier::Degraded);
        assert_eq!(services.chat().composer().domain_tool(), "getCompanies");
    }
}
