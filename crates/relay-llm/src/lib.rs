//! Completion gateway for Relay.
//!
//! Sends a conversation to an OpenAI-compatible chat completion endpoint and
//! returns the first choice's text.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  LlmBackend trait                       │
//! │  - complete(&[Message]) -> String       │
//! └─────────────────────────────────────────┘
//!                    │
//!           ┌────────┴────────┐
//!           ▼                 ▼
//!     ┌──────────┐      ┌────────────┐
//!     │  OpenAI  │      │    Mock    │
//!     └──────────┘      └────────────┘
//! ```
//!
//! The credential is read from a [`relay_config::SettingsSource`] on every
//! call; a missing credential fails before any request is sent.

pub mod backend;
pub mod error;
pub mod openai;
pub mod types;

pub use backend::{LlmBackend, SharedBackend};
#[cfg(any(test, feature = "testing"))]
pub use backend::{MockBackend, MockResponse};
pub use error::{CompletionError, Result};
pub use openai::{OpenAiBackend, OpenAiConfig};
pub use types::{Conversation, Message, Role};
