//! OS signal handling.
//!
//! # Responsibilities
//! - Translate Ctrl-C into cancellation of in-flight calls
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - A second Ctrl-C is left to the default handler once the task has exited

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::lifecycle::cancel::Cancellation;

/// Spawn a task that triggers `cancellation` on Ctrl-C.
pub fn cancel_on_ctrl_c(cancellation: Arc<Cancellation>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupt received, cancelling in-flight calls");
                cancellation.trigger();
            }
            Err(e) => tracing::error!(error = %e, "Failed to install Ctrl-C handler"),
        }
    })
}
