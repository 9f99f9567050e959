//! MCP service for tool discovery and invocation.
//!
//! The service keeps the most recent `tools/list` result so chat turns can
//! fall back to describing the tools when live data cannot be fetched.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use relay_mcp::{SessionManager, SessionState, ToolDescriptor};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;

/// Anything that can list and call MCP tools.
///
/// Implemented by [`SessionManager`]; tests substitute scripted sources.
#[async_trait]
pub trait ToolSource: Send + Sync {
    /// List the available tools.
    async fn list_tools(&self) -> relay_mcp::Result<Vec<ToolDescriptor>>;

    /// Call one tool and return its raw result payload.
    async fn call_tool(&self, name: &str, arguments: Option<Value>) -> relay_mcp::Result<Value>;

    /// Last known reachability of the tool layer.
    fn state(&self) -> SessionState;
}

/// Shared tool source type.
pub type SharedToolSource = Arc<dyn ToolSource>;

#[async_trait]
impl ToolSource for SessionManager {
    async fn list_tools(&self) -> relay_mcp::Result<Vec<ToolDescriptor>> {
        SessionManager::list_tools(self).await
    }

    async fn call_tool(&self, name: &str, arguments: Option<Value>) -> relay_mcp::Result<Value> {
        SessionManager::call_tool(self, name, arguments).await
    }

    fn state(&self) -> SessionState {
        SessionManager::state(self)
    }
}

/// MCP service for tool discovery and invocation.
#[derive(Clone)]
pub struct McpService {
    source: SharedToolSource,
    cached_tools: Arc<RwLock<Vec<ToolDescriptor>>>,
}

impl McpService {
    /// Create a new MCP service.
    pub fn new(source: SharedToolSource) -> Self {
        Self {
            source,
            cached_tools: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// The underlying tool source.
    pub fn source(&self) -> &SharedToolSource {
        &self.source
    }

    /// Last known reachability of the tool layer.
    pub fn state(&self) -> SessionState {
        self.source.state()
    }

    /// Fetch the tool list and remember it for later fallbacks.
    pub async fn refresh_tools(&self) -> Result<Vec<ToolDescriptor>> {
        let tools = self.source.list_tools().await?;
        *self.cached_tools.write() = tools.clone();
        debug!(tool_count = tools.len(), "Refreshed MCP tool cache");
        Ok(tools)
    }

    /// The tools from the last successful refresh.
    pub fn cached_tools(&self) -> Vec<ToolDescriptor> {
        self.cached_tools.read().clone()
    }

    /// Call a tool by name.
    pub async fn call_tool(&self, name: &str, arguments: Option<Value>) -> Result<Value> {
        Ok(self.source.call_tool(name, arguments).await?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test support
// ─────────────────────────────────────────────────────────────────────────────
