//! LLM backend trait and a mock implementation for tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Message;

/// A chat completion provider.
///
/// Implementations send the messages as given, in order, and return the text
/// of the reply. Errors propagate to the caller; there is no fallback here.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Complete a conversation.
    async fn complete(&self, messages: &[Message]) -> Result<String>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

/// A backend that can be shared across threads.
pub type SharedBackend = Arc<dyn LlmBackend>;

// ─────────────────────────────────────────────────────────────────────────────
// Mock Backend
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(any(test, feature = "testing"))]
pub use mock::{MockBackend, MockResponse};

#[cfg(any(test, feature = "testing"))]
mod mock {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use relay_config::ConfigError;

    use super::LlmBackend;
    use crate::error::{CompletionError, Result};
    use crate::types::Message;

    /// A canned reply for [`MockBackend`].
    #[derive(Debug, Clone)]
    pub enum MockResponse {
        /// Reply with this text.
        Text(String),
        /// Fail as if the endpoint returned this HTTP status.
        Status(u16),
        /// Fail with an empty choice list.
        Empty,
        /// Fail as if no credential were configured.
        MissingCredential,
    }

    impl MockResponse {
        fn into_result(self) -> Result<String> {
            match self {
                MockResponse::Text(text) => Ok(text),
                MockResponse::Status(status) => Err(CompletionError::Transport {
                    status,
                    status_text: String::new(),
                }),
                MockResponse::Empty => Err(CompletionError::EmptyResponse),
                MockResponse::MissingCredential => {
                    Err(ConfigError::missing_credential().into())
                }
            }
        }
    }

    /// A mock backend for testing purposes.
    ///
    /// Returns pre-configured responses in order and records every
    /// conversation it was asked to complete.
    #[derive(Debug)]
    pub struct MockBackend {
        name: String,
        delay: Option<Duration>,
        responses: Mutex<Vec<MockResponse>>,
        request_log: Mutex<Vec<Vec<Message>>>,
    }

    impl MockBackend {
        /// Create a new mock backend with the given responses.
        ///
        /// If more requests are made than responses available, an error is returned.
        pub fn new(responses: Vec<MockResponse>) -> Self {
            Self {
                name: "mock".to_string(),
                delay: None,
                responses: Mutex::new(responses),
                request_log: Mutex::new(Vec::new()),
            }
        }

        /// Create a mock backend with a single text response.
        pub fn with_text(text: impl Into<String>) -> Self {
            Self::new(vec![MockResponse::Text(text.into())])
        }

        /// Sleep before answering each request.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Get all conversations that were sent to this backend.
        pub fn requests(&self) -> Vec<Vec<Message>> {
            self.request_log
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
        }

        /// Get the number of requests made.
        pub fn request_count(&self) -> usize {
            self.request_log
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .len()
        }
    }

    #[async_trait]
    impl LlmBackend for MockBackend {
        async fn complete(&self, messages: &[Message]) -> Result<String> {
            self.request_log
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(messages.to_vec());

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let next = {
                let mut responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
                (!responses.is_empty()).then(|| responses.remove(0))
            };
            match next {
                Some(response) => response.into_result(),
                None => Err(CompletionError::Internal(
                    "MockBackend: no more responses available".to_string(),
                )),
            }
        }

        fn name(&self) -> &str {
            &self.name
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
