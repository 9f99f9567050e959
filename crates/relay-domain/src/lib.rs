//! Domain facade for Relay.
//!
//! Sits between the CLI and the protocol crates and provides:
//!
//! - **Context enrichment**: company data fetched through an MCP tool is
//!   turned into a system message, degrading to a tool listing and then to
//!   nothing when the tool layer fails
//! - **Chat turns**: enrichment followed by one completion call
//! - **Cancellable turns**: a scheduler that drops a pending turn when a
//!   newer one supersedes it
//!
//! # Example
//!
//! ```ignore
//! use relay_domain::DomainServices;
//!
//! let services = DomainServices::new(session, backend, "getCompanies");
//! let reply = services.chat().turn(&conversation).await?;
//! ```

mod error;
pub mod services;

pub use error::{DomainError, NormalizationError, Result};
pub use services::DomainServices;
pub use services::chat::{ChatResponse, ChatService};
pub use services::context::{
    ContextComposer, DOMAIN_TOOL_PURPOSE, EnrichedConversation, EnrichmentTier, FOLLOW_UP_TOOLS,
};
pub use services::mcp::{McpService, SharedToolSource, ToolSource};
pub use services::records::{
    CompanyRecord, NO_DATA_PLACEHOLDER, PARSE_ERROR_PLACEHOLDER, PayloadShape,
    format_company_data, normalize, render_records,
};
pub use services::turn::{TurnHandle, TurnScheduler};
