//! Caller-supplied deadline and cancellation for one logical call.

use std::time::Duration;
use tokio::time::Instant;

use crate::lifecycle::cancel::CancelToken;

/// Per-call limits. The default has no deadline and cannot be cancelled.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    pub deadline: Option<Instant>,
    pub cancel: Option<CancelToken>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `budget` from now.
    pub fn with_budget(self, budget: Duration) -> Self {
        self.with_deadline(Instant::now() + budget)
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }

    /// Time budget for one attempt: `timeout` clipped to the deadline.
    ///
    /// `None` once the deadline has passed.
    pub fn attempt_budget(&self, timeout: Duration) -> Option<Duration> {
        match self.deadline {
            None => Some(timeout),
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                (!remaining.is_zero()).then(|| timeout.min(remaining))
            }
        }
    }

    /// Resolves when the call is cancelled. Pending forever without a token.
    pub async fn cancelled(&self) {
        match &self.cancel {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    }

    /// Wait out a backoff delay.
    ///
    /// Returns false without completing the wait if the call is cancelled, or
    /// if the deadline would pass before the delay ends.
    pub async fn sleep(&self, delay: Duration) -> bool {
        if self.is_cancelled() {
            return false;
        }
        let wake = Instant::now() + delay;
        if self.deadline.is_some_and(|deadline| wake >= deadline) {
            return false;
        }
        tokio::select! {
            _ = tokio::time::sleep_until(wake) => true,
            _ = self.cancelled() => false,
        }
    }
}
