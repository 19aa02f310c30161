//! Error taxonomy for the request layer.
//!
//! # Layers
//! ```text
//! TransportError   one request against one candidate
//!     → AttemptFailure   (+ address, candidate index, pass number)
//!     → AggregatedFailure (ordered trail of every failed attempt)
//!     → ClientError      (what a facade call returns)
//! ```
//!
//! # Design Decisions
//! - Non-2xx statuses are failures like any other and trigger failover
//! - Lower layers never swallow a failure; everything ends up in the trail
//! - `Cancelled` and `DeadlineExceeded` are terminal: no further candidate is tried

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single transport call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No response within the candidate's time budget.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// DNS, connection refused, connection reset.
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// Backend answered with a non-2xx status.
    #[error("HTTP {status}")]
    HttpStatus { status: u16, body: String },

    /// 2xx response whose body is not JSON.
    #[error("invalid response body: {0}")]
    InvalidBody(String),

    /// The request could not be built (bad URL or header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The caller's cancellation signal fired.
    #[error("cancelled")]
    Cancelled,

    /// The caller's deadline passed before this candidate could be tried.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl TransportError {
    /// HTTP status, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short label used in logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Timeout(_) => "timeout",
            TransportError::Unreachable(_) => "unreachable",
            TransportError::HttpStatus { .. } => "http_status",
            TransportError::InvalidBody(_) => "invalid_body",
            TransportError::InvalidRequest(_) => "invalid_request",
            TransportError::Cancelled => "cancelled",
            TransportError::DeadlineExceeded => "deadline_exceeded",
        }
    }

    /// Terminal errors end the current pass and suppress further passes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransportError::Cancelled | TransportError::DeadlineExceeded)
    }
}

/// One failed attempt against one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    /// 1-indexed pass number.
    pub pass: u32,
    /// Candidate position in registry order (0 = gateway).
    pub candidate: usize,
    /// Full URL that was requested.
    pub address: String,
    pub error: TransportError,
}

impl AttemptFailure {
    pub fn status(&self) -> Option<u16> {
        self.error.status()
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[pass {}] {}: {}", self.pass, self.address, self.error)
    }
}

/// Every failure of a logical call that never succeeded.
///
/// Entries are in the order they happened: pass by pass, and within a pass
/// in registry order. The list is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedFailure {
    service: String,
    operation: String,
    attempts: Vec<AttemptFailure>,
    interrupted: bool,
}

impl AggregatedFailure {
    pub(crate) fn new(
        service: impl Into<String>,
        operation: impl Into<String>,
        attempts: Vec<AttemptFailure>,
    ) -> Self {
        debug_assert!(!attempts.is_empty(), "aggregated failure without attempts");
        Self {
            service: service.into(),
            operation: operation.into(),
            attempts,
            interrupted: false,
        }
    }

    /// Mark that a backoff wait was aborted by cancellation or deadline.
    pub(crate) fn interrupted(mut self) -> Self {
        self.interrupted = true;
        self
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// All failed attempts across every pass.
    pub fn attempts(&self) -> &[AttemptFailure] {
        &self.attempts
    }

    /// Number of passes that contributed entries.
    pub fn passes(&self) -> u32 {
        self.attempts.iter().map(|a| a.pass).max().unwrap_or(0)
    }

    /// Entries of the final pass only.
    pub fn last_pass(&self) -> impl Iterator<Item = &AttemptFailure> {
        let last = self.passes();
        self.attempts.iter().filter(move |a| a.pass == last)
    }

    /// True if the call stopped because of cancellation or an expired deadline.
    pub fn is_interrupted(&self) -> bool {
        self.interrupted || self.attempts.iter().any(|a| a.error.is_terminal())
    }
}

impl fmt::Display for AggregatedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: all candidates failed ({} attempt(s) over {} pass(es))",
            self.service,
            self.operation,
            self.attempts.len(),
            self.passes()
        )?;
        for attempt in &self.attempts {
            write!(f, "; {}", attempt)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregatedFailure {}

/// Errors returned by service facades.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Service name not present in the registry.
    #[error("unknown service '{0}'")]
    UnknownService(String),

    /// Every candidate failed.
    #[error(transparent)]
    Aggregated(#[from] AggregatedFailure),

    /// Path template and arguments do not match.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Request entity could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Successful payload does not match the requested type.
    #[error("failed to decode response payload: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ClientError {
    /// The per-candidate trail, if this is an aggregated failure.
    pub fn aggregated(&self) -> Option<&AggregatedFailure> {
        match self {
            ClientError::Aggregated(failure) => Some(failure),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
