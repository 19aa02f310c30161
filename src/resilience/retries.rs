//! Retry logic.
//!
//! # Responsibilities
//! - Repeat the full gateway-then-fallback pass for retry-eligible operations
//! - Wait `pass * base_delay` between passes (linear backoff)
//! - Stop on success, after `max_attempts` passes, or when the call is interrupted
//!
//! # Design Decisions
//! - Only operations flagged as intermittently failing are retried
//! - No wait after the final pass
//! - The failure trail keeps every pass; `AggregatedFailure::last_pass` gives the last one

use crate::client::operation::OperationSpec;
use crate::error::AggregatedFailure;
use crate::registry::service::ServiceConfig;
use crate::resilience::context::CallContext;
use crate::resilience::executor::{Executor, Payload};

impl Executor {
    /// Up to `max_attempts` full passes. `0` is treated as `1`.
    pub async fn execute_with_retry(
        &self,
        config: &ServiceConfig,
        operation: &OperationSpec,
        max_attempts: u32,
        ctx: &CallContext,
    ) -> Result<Payload, AggregatedFailure> {
        let passes = max_attempts.max(1);
        let mut trail = Vec::new();

        for pass in 1..=passes {
            let failures = match self.pass(config, operation, ctx, pass).await {
                Ok(payload) => {
                    if pass > 1 {
                        tracing::info!(
                            service = %config.name,
                            operation = %operation.name,
                            pass,
                            "Succeeded after retry"
                        );
                    }
                    return Ok(payload);
                }
                Err(failures) => failures,
            };

            let terminal = failures.last().is_some_and(|f| f.error.is_terminal());
            trail.extend(failures);
            if terminal || pass == passes {
                break;
            }

            let delay = config.retry.delay_after(pass);
            self.observer().on_backoff(&config.name, &operation.name, pass, delay);
            if !ctx.sleep(delay).await {
                return Err(AggregatedFailure::new(&config.name, &operation.name, trail).interrupted());
            }
        }

        Err(AggregatedFailure::new(&config.name, &operation.name, trail))
    }
}
