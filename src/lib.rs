//! Resilient client for the bookstore backend services.
//!
//! # Architecture Overview
//!
//! ```text
//!   facade call (books.get_by_isbn("123"))
//!        │
//!        ▼
//!   ┌──────────────┐   snapshot   ┌────────────────────┐
//!   │ ServiceClient│◀─────────────│ EndpointRegistry   │  ArcSwap per service
//!   └──────┬───────┘              └────────────────────┘
//!          │ OperationSpec
//!          ▼
//!   ┌──────────────┐  retry-eligible: repeat passes, linear backoff
//!   │  Executor    │  one pass: gateway → fallback 1 → … first success wins
//!   └──────┬───────┘──────────▶ AttemptObserver (logs, metrics)
//!          ▼
//!   ┌──────────────┐
//!   │  Transport   │  one HTTP request, hard timeout
//!   └──────────────┘
//! ```
//!
//! Every failure ends up in an `AggregatedFailure` that lists each attempt.

pub mod client;
pub mod config;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod resilience;
pub mod services;
pub mod transport;

pub use client::{Bookstore, OperationSpec, ServiceClient};
pub use config::ClientConfig;
pub use error::{AggregatedFailure, AttemptFailure, ClientError, TransportError};
pub use registry::{EndpointRegistry, ServiceConfig};
pub use resilience::{CallContext, Executor, Payload};
