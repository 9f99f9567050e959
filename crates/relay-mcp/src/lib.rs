//! MCP (Model Context Protocol) session client for Relay.
//!
//! This crate speaks JSON-RPC 2.0 over HTTP to a remote MCP server, negotiates
//! the protocol handshake, and discovers/invokes the server's tools.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  SessionManager                                             │
//! │  - initialize, health probe, tools/list, tools/call         │
//! │  - owns the observable SessionState                         │
//! └─────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  RpcClient                                                  │
//! │  - request ids, JSON-RPC envelopes                          │
//! │  - frame decoding of the raw response body                  │
//! └─────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  HttpTransport                                              │
//! │  - POST <url> (text body), GET <url>/health                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use relay_mcp::{HttpTransportConfig, SessionManager};
//!
//! let session = SessionManager::connect(HttpTransportConfig::new("http://localhost:8080/mcp"))?;
//! session.initialize().await?;
//!
//! for tool in session.list_tools().await? {
//!     println!("Tool: {} - {:?}", tool.name, tool.description);
//! }
//!
//! let companies = session.call_tool("getCompanies", None).await?;
//! ```
//!
//! # Wire format
//!
//! Every response, even for plain request/response calls, arrives as a single
//! server-sent event:
//!
//! ```text
//! event: message
//! data: {"jsonrpc":"2.0","id":1,"result":{...}}
//! ```

pub mod client;
pub mod error;
pub mod frame;
pub mod protocol;
pub mod session;
pub mod transport;

pub use client::RpcClient;
pub use error::{FrameError, Result, RpcError};
pub use frame::decode_frame;
pub use protocol::{
    CallToolParams, ClientInfo, HealthResponse, InitializeParams, InitializeResult,
    JsonRpcError, JsonRpcRequest, ServerInfo, ToolDescriptor,
};
pub use session::{SessionManager, SessionState};
pub use transport::{HttpTransport, HttpTransportConfig};
