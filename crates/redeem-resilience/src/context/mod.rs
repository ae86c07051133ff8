//! Per-call deadline and cancellation.
//!
//! A [`CallContext`] is created once per inbound request and threaded through
//! every external call the request makes, so a single deadline and a single
//! cancellation signal bound the whole unit of work.

use redeem_core::{RedeemError, RedeemResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Deadline and cancellation signal shared by all calls of one request.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancellation: CancellationToken,
}

impl CallContext {
    /// Context with no deadline that is only stopped by cancellation.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Context whose deadline is `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Context that expires at `deadline`.
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancellation: CancellationToken::new(),
        }
    }

    /// Ties this context to an externally owned cancellation token.
    ///
    /// The context observes a child token, so cancelling the context does not
    /// cancel the parent.
    #[must_use]
    pub fn cancelled_by(mut self, parent: &CancellationToken) -> Self {
        self.cancellation = parent.child_token();
        self
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` when there is no deadline.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Cancels every call running under this context.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Runs `future` under this context.
    ///
    /// Returns `Cancelled(operation)` if the context is or becomes cancelled,
    /// and `Timeout(operation)` if the deadline passes first.
    pub async fn run<F, T>(&self, operation: &str, future: F) -> RedeemResult<T>
    where
        F: Future<Output = RedeemResult<T>>,
    {
        if self.cancellation.is_cancelled() {
            return Err(RedeemError::Cancelled(operation.to_string()));
        }

        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    () = self.cancellation.cancelled() => {
                        Err(RedeemError::Cancelled(operation.to_string()))
                    }
                    result = tokio::time::timeout_at(deadline, future) => {
                        result.unwrap_or_else(|_| Err(RedeemError::Timeout(operation.to_string())))
                    }
                }
            }
            None => {
                tokio::select! {
                    biased;
                    () = self.cancellation.cancelled() => {
                        Err(RedeemError::Cancelled(operation.to_string()))
                    }
                    result = future => result,
                }
            }
        }
    }
}
