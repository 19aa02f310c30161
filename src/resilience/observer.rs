//! Attempt observers.
//!
//! The executor reports every attempt and every scheduled backoff here
//! instead of logging inline, so the reporting can be swapped or silenced.

use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::AttemptFailure;
use crate::observability::metrics;

/// Result of one transport attempt.
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    Success {
        pass: u32,
        candidate: usize,
        address: String,
        elapsed: Duration,
        payload: Value,
    },
    Failure {
        failure: AttemptFailure,
        elapsed: Duration,
    },
}

impl AttemptOutcome {
    pub fn address(&self) -> &str {
        match self {
            AttemptOutcome::Success { address, .. } => address,
            AttemptOutcome::Failure { failure, .. } => &failure.address,
        }
    }

    /// "success" or the failure kind.
    pub fn label(&self) -> &'static str {
        match self {
            AttemptOutcome::Success { .. } => "success",
            AttemptOutcome::Failure { failure, .. } => failure.error.kind(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            AttemptOutcome::Success { elapsed, .. } | AttemptOutcome::Failure { elapsed, .. } => *elapsed,
        }
    }
}

pub trait AttemptObserver: Send + Sync {
    fn on_attempt(&self, service: &str, operation: &str, outcome: &AttemptOutcome);

    /// Called before waiting `delay` after failed pass `pass`.
    fn on_backoff(&self, _service: &str, _operation: &str, _pass: u32, _delay: Duration) {}
}

/// Logs through `tracing` and records attempt metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl AttemptObserver for TracingObserver {
    fn on_attempt(&self, service: &str, operation: &str, outcome: &AttemptOutcome) {
        metrics::record_attempt(service, outcome.label(), outcome.elapsed());
        match outcome {
            AttemptOutcome::Success { pass, candidate, address, elapsed, .. } => {
                tracing::debug!(
                    service = %service,
                    operation = %operation,
                    pass,
                    candidate,
                    address = %address,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Attempt succeeded"
                );
            }
            AttemptOutcome::Failure { failure, elapsed } => {
                tracing::warn!(
                    service = %service,
                    operation = %operation,
                    pass = failure.pass,
                    candidate = failure.candidate,
                    address = %failure.address,
                    status = ?failure.status(),
                    error = %failure.error,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Attempt failed"
                );
            }
        }
    }

    fn on_backoff(&self, service: &str, operation: &str, pass: u32, delay: Duration) {
        metrics::record_backoff(service);
        tracing::info!(
            service = %service,
            operation = %operation,
            pass,
            delay = ?delay,
            "All candidates failed, retrying after backoff"
        );
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AttemptObserver for NoopObserver {
    fn on_attempt(&self, _service: &str, _operation: &str, _outcome: &AttemptOutcome) {}
}

/// One entry of an [`AttemptLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub service: String,
    pub pass: u32,
    pub address: String,
    /// "success" or the failure kind.
    pub outcome: &'static str,
}

/// Records every attempt and backoff in memory.
#[derive(Debug, Default)]
pub struct AttemptLog {
    attempts: Mutex<Vec<AttemptRecord>>,
    backoffs: Mutex<Vec<Duration>>,
}

impl AttemptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> Vec<AttemptRecord> {
        self.attempts.lock().map(|a| a.clone()).unwrap_or_default()
    }

    /// `(address, outcome)` pairs, in order.
    pub fn summary(&self) -> Vec<(String, &'static str)> {
        self.attempts()
            .into_iter()
            .map(|r| (r.address, r.outcome))
            .collect()
    }

    pub fn backoffs(&self) -> Vec<Duration> {
        self.backoffs.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

impl AttemptObserver for AttemptLog {
    fn on_attempt(&self, service: &str, _operation: &str, outcome: &AttemptOutcome) {
        let pass = match outcome {
            AttemptOutcome::Success { pass, .. } => *pass,
            AttemptOutcome::Failure { failure, .. } => failure.pass,
        };
        if let Ok(mut attempts) = self.attempts.lock() {
            attempts.push(AttemptRecord {
                service: service.to_string(),
                pass,
                address: outcome.address().to_string(),
                outcome: outcome.label(),
            });
        }
    }

    fn on_backoff(&self, _service: &str, _operation: &str, _pass: u32, delay: Duration) {
        if let Ok(mut backoffs) = self.backoffs.lock() {
            backoffs.push(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use std::io::Write;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failure_log_does_not_promise_another_candidate() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();

        let outcome = AttemptOutcome::Failure {
            failure: AttemptFailure {
                pass: 1,
                candidate: 1,
                address: "http://localhost:9090/books/1".into(),
                error: TransportError::Unreachable("connection refused".into()),
            },
            elapsed: Duration::from_millis(3),
        };
        tracing::subscriber::with_default(subscriber, || {
            TracingObserver.on_attempt("books", "get_by_isbn", &outcome);
        });

        let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Attempt failed"));
        assert!(output.contains("http://localhost:9090/books/1"));
        assert!(!output.contains("next candidate"));
    }
}
