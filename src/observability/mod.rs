//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Executor / health checker
//!     → TracingObserver (resilience::observer)
//!         → logging.rs (structured log events, per-call span)
//!         → metrics.rs (counters, histograms)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID flows through every attempt of a call
//! - Metrics are cheap (facade calls, no-op without a recorder)

pub mod logging;
pub mod metrics;
