//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or built-in defaults
//!     → loader.rs (parse, resolve environment once)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → registry builds one ServiceConfig per service
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{default_config, load_config, ConfigError};
pub use schema::{
    ClientConfig, Environment, FallbackSettings, HealthCheckConfig, ObservabilityConfig,
    RetryConfig, ServiceSettings,
};
