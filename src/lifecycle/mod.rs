//! Lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! Ctrl-C (signals.rs)
//!     → Cancellation::trigger (cancel.rs)
//!     → every CancelToken observes it
//!     → in-flight transport calls and backoff waits abort
//! ```

pub mod cancel;
pub mod signals;

pub use cancel::{CancelToken, Cancellation};
