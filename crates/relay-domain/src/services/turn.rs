//! Cancellable turn scheduling.
//!
//! Each scheduled turn runs as its own task guarded by a
//! [`CancellationToken`]. Scheduling a new turn cancels the one still
//! pending, which then resolves to [`DomainError::Cancelled`] instead of
//! delivering a stale reply.

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{DomainError, Result};

/// Runs at most one live turn at a time.
#[derive(Debug, Default)]
pub struct TurnScheduler {
    delay: Option<Duration>,
    current: Mutex<Option<CancellationToken>>,
}

impl TurnScheduler {
    /// Create a scheduler that starts turns immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait `delay` before starting each turn's work.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Schedule `work` as the current turn, cancelling any pending one.
    pub fn schedule<F, T>(&self, work: F) -> TurnHandle<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let token = CancellationToken::new();
        if let Some(previous) = self.current.lock().replace(token.clone()) {
            if !previous.is_cancelled() {
                debug!("Superseding pending turn");
            }
            previous.cancel();
        }

        let delay = self.delay;
        let guard = token.clone();
        let join = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = guard.cancelled() => Err(DomainError::Cancelled),
                result = async move {
                    if let Some(delay) = delay {
                        tokio::time::sleep(delay).await;
                    }
                    work.await
                } => result,
            }
        });

        TurnHandle { token, join }
    }

    /// Cancel the pending turn, if any. Returns true if one was cancelled.
    pub fn cancel_pending(&self) -> bool {
        match self.current.lock().take() {
            Some(token) if !token.is_cancelled() => {
                token.cancel();
                true
            }
            _ => false,
        }
    }
}

/// Handle to a scheduled turn.
#[derive(Debug)]
pub struct TurnHandle<T> {
    token: CancellationToken,
    join: JoinHandle<Result<T>>,
}

impl<T> TurnHandle<T> {
    /// Cancel this turn.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A token that fires when this turn is cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Wait for the turn to finish.
    pub async fn wait(self) -> Result<T> {
        match self.join.await {
            Ok(result) => result,
            Err(e) => Err(DomainError::Internal(format!("turn task failed: {}", e))),
        }
    }
}
