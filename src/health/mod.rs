//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! check_all():
//!     one probe per service, concurrently
//!     → executor pass with the health timeout (no retry)
//!     → joined into a HealthReport
//!
//! check_instances(service):
//!     one probe per candidate, concurrently
//!     → Vec<InstanceHealth>
//! ```
//!
//! # Design Decisions
//! - Probes use their own short timeout, not the operation timeout
//! - A hung probe is cut off at its deadline; siblings are unaffected
//! - Health is reported, not cached; nothing is excluded from failover

pub mod active;
pub mod state;

pub use active::HealthChecker;
pub use state::{HealthReport, HealthState, InstanceHealth, ServiceHealth};
