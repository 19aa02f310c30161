//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Facade call → OperationSpec
//!     → retries.rs (only if retry-eligible: repeat passes with linear backoff)
//!     → executor.rs (one pass: gateway, then fallbacks, first success wins)
//!     → transport (one request, bounded by the attempt budget)
//!     → observer.rs (notified of every attempt and backoff)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every attempt has a deadline
//! - Failures are collected, never swallowed
//! - Waits are async and abort on cancellation

pub mod backoff;
pub mod context;
pub mod executor;
pub mod observer;
pub mod retries;

pub use context::CallContext;
pub use executor::{Executor, Payload};
pub use observer::{AttemptLog, AttemptObserver, AttemptOutcome, AttemptRecord, NoopObserver, TracingObserver};
