//! Failover executor.
//!
//! # Responsibilities
//! - Try the gateway, then each direct instance, in registry order
//! - Stop at the first success; later candidates are never contacted
//! - Collect one failure entry per contacted candidate
//! - Honour the caller's deadline and cancellation signal
//!
//! # Design Decisions
//! - One pass is strictly sequential; concurrency is between calls, not within one
//! - Any failure (including non-2xx) moves on to the next candidate
//! - Cancellation or an exhausted deadline ends the pass immediately

use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::client::operation::OperationSpec;
use crate::error::{AggregatedFailure, AttemptFailure, TransportError};
use crate::registry::service::{Candidate, ServiceConfig};
use crate::resilience::context::CallContext;
use crate::resilience::observer::{AttemptObserver, AttemptOutcome};
use crate::transport::{Transport, TransportRequest};

/// Decoded JSON body of a successful response.
pub type Payload = Value;

/// Runs operations against a service's candidate list.
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
    observer: Arc<dyn AttemptObserver>,
}

impl Executor {
    pub fn new(transport: Arc<dyn Transport>, observer: Arc<dyn AttemptObserver>) -> Self {
        Self { transport, observer }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn observer(&self) -> &Arc<dyn AttemptObserver> {
        &self.observer
    }

    /// Retry wrapper for eligible operations, a single pass otherwise.
    pub async fn run(
        &self,
        config: &ServiceConfig,
        operation: &OperationSpec,
        ctx: &CallContext,
    ) -> Result<Payload, AggregatedFailure> {
        if operation.retry_eligible {
            self.execute_with_retry(config, operation, config.retry.max_attempts, ctx)
                .await
        } else {
            self.execute(config, operation, ctx).await
        }
    }

    /// One pass over every candidate.
    pub async fn execute(
        &self,
        config: &ServiceConfig,
        operation: &OperationSpec,
        ctx: &CallContext,
    ) -> Result<Payload, AggregatedFailure> {
        self.pass(config, operation, ctx, 1)
            .await
            .map_err(|failures| AggregatedFailure::new(&config.name, &operation.name, failures))
    }

    pub(crate) async fn pass(
        &self,
        config: &ServiceConfig,
        operation: &OperationSpec,
        ctx: &CallContext,
        pass: u32,
    ) -> Result<Payload, Vec<AttemptFailure>> {
        let mut failures = Vec::with_capacity(config.candidate_count());

        for (candidate_index, candidate) in config.candidates().enumerate() {
            let started = Instant::now();
            let result = self.attempt(config, candidate, operation, ctx).await;
            let address = candidate.address(&operation.path);

            let outcome = match result {
                Ok(payload) => AttemptOutcome::Success {
                    pass,
                    candidate: candidate_index,
                    address,
                    elapsed: started.elapsed(),
                    payload,
                },
                Err(error) => AttemptOutcome::Failure {
                    failure: AttemptFailure {
                        pass,
                        candidate: candidate_index,
                        address,
                        error,
                    },
                    elapsed: started.elapsed(),
                },
            };
            self.observer.on_attempt(&config.name, &operation.name, &outcome);

            match outcome {
                AttemptOutcome::Success { payload, .. } => return Ok(payload),
                AttemptOutcome::Failure { failure, .. } => {
                    let terminal = failure.error.is_terminal();
                    failures.push(failure);
                    if terminal {
                        break;
                    }
                }
            }
        }

        Err(failures)
    }

    async fn attempt(
        &self,
        config: &ServiceConfig,
        candidate: &Candidate,
        operation: &OperationSpec,
        ctx: &CallContext,
    ) -> Result<Payload, TransportError> {
        if ctx.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        let budget = ctx
            .attempt_budget(config.timeout)
            .ok_or(TransportError::DeadlineExceeded)?;

        let path = candidate.full_path(&operation.path);
        let request = TransportRequest {
            base_url: &candidate.base_url,
            path: &path,
            method: &operation.method,
            body: operation.body.as_ref(),
            headers: &config.headers,
            timeout: budget,
            request_id: &operation.request_id,
        };

        let response = tokio::select! {
            result = self.transport.send(request) => result?,
            _ = ctx.cancelled() => return Err(TransportError::Cancelled),
        };
        decode_payload(&response.body)
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

/// Empty bodies decode to `null`.
fn decode_payload(body: &[u8]) -> Result<Payload, TransportError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| TransportError::InvalidBody(e.to_string()))
}
