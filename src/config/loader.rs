//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{ClientConfig, Environment};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides the configured environment.
pub const ENVIRONMENT_VAR: &str = "BOOKSTORE_ENV";

/// Error type for configuration loading and registry construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("Invalid environment: {0}")]
    Environment(String),

    #[error("Service '{service}': {reason}")]
    InvalidService { service: String, reason: String },

    #[error("HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Global registry is already initialized")]
    AlreadyInitialized,
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// The environment is resolved here, once: `BOOKSTORE_ENV` wins over the file.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ClientConfig = toml::from_str(&content)?;
    finalize(config, std::env::var(ENVIRONMENT_VAR).ok())
}

/// Built-in defaults, with the same environment resolution as [`load_config`].
pub fn default_config() -> Result<ClientConfig, ConfigError> {
    finalize(ClientConfig::default(), std::env::var(ENVIRONMENT_VAR).ok())
}

/// Apply an environment override and validate.
pub fn finalize(
    mut config: ClientConfig,
    environment_override: Option<String>,
) -> Result<ClientConfig, ConfigError> {
    if let Some(raw) = environment_override.filter(|v| !v.trim().is_empty()) {
        config.environment = raw.parse::<Environment>().map_err(ConfigError::Environment)?;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
