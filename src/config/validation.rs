//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs, prefixes, health paths and value ranges (timeouts > 0, attempts >= 1)
//! - Detect duplicate service names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the registry

use std::collections::HashSet;
use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("service name must not be empty")]
    EmptyServiceName,

    #[error("service '{0}' is defined more than once")]
    DuplicateService(String),

    #[error("{context}: invalid URL '{url}': {reason}")]
    InvalidUrl {
        context: String,
        url: String,
        reason: String,
    },

    #[error("{context}: path prefix '{prefix}' must be empty or start with '/'")]
    InvalidPrefix { context: String, prefix: String },

    #[error("{0}: timeout must be greater than zero")]
    ZeroTimeout(String),

    #[error("{0}: max_attempts must be at least 1")]
    ZeroAttempts(String),

    #[error("retry: max_delay_ms must be greater than zero")]
    ZeroMaxDelay,

    #[error("{context}: health path '{path}' must be empty or start with '/'")]
    InvalidHealthPath { context: String, path: String },

    #[error("{context}: invalid header '{name}'")]
    InvalidHeader { context: String, name: String },
}

pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url("gateway.development_url", &config.gateway.development_url, &mut errors);
    check_url("gateway.production_url", &config.gateway.production_url, &mut errors);

    if config.defaults.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("defaults".into()));
    }
    if config.health_check.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("health_check".into()));
    }
    if config.retry.max_attempts == 0 {
        errors.push(ValidationError::ZeroAttempts("retry".into()));
    }
    if config.retry.max_delay_ms == 0 {
        errors.push(ValidationError::ZeroMaxDelay);
    }
    check_health_path("health_check", &config.health_check.path, &mut errors);
    check_headers("defaults", config.defaults.headers.iter(), &mut errors);

    let mut seen = HashSet::new();
    for service in &config.services {
        let name = service.name.as_str();
        if name.trim().is_empty() {
            errors.push(ValidationError::EmptyServiceName);
        } else if !seen.insert(name) {
            errors.push(ValidationError::DuplicateService(name.to_string()));
        }

        check_prefix(name, &service.gateway_prefix, &mut errors);
        for (i, fallback) in service.fallbacks.iter().enumerate() {
            let context = format!("{}.fallbacks[{}]", name, i);
            check_url(&context, &fallback.url, &mut errors);
            check_prefix(&context, &fallback.path_prefix, &mut errors);
        }

        if service.timeout_ms == Some(0) {
            errors.push(ValidationError::ZeroTimeout(name.to_string()));
        }
        if service.max_attempts == Some(0) {
            errors.push(ValidationError::ZeroAttempts(name.to_string()));
        }
        if let Some(path) = &service.health_path {
            check_health_path(name, path, &mut errors);
        }
        check_headers(name, service.headers.iter(), &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(context: &str, raw: &str, errors: &mut Vec<ValidationError>) {
    let reason = match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => return,
        Ok(url) => format!("unsupported scheme '{}'", url.scheme()),
        Err(e) => e.to_string(),
    };
    errors.push(ValidationError::InvalidUrl {
        context: context.to_string(),
        url: raw.to_string(),
        reason,
    });
}

fn check_prefix(context: &str, prefix: &str, errors: &mut Vec<ValidationError>) {
    if !prefix.is_empty() && !prefix.starts_with('/') {
        errors.push(ValidationError::InvalidPrefix {
            context: context.to_string(),
            prefix: prefix.to_string(),
        });
    }
}

fn check_health_path(context: &str, path: &str, errors: &mut Vec<ValidationError>) {
    if !path.is_empty() && !path.starts_with('/') {
        errors.push(ValidationError::InvalidHealthPath {
            context: context.to_string(),
            path: path.to_string(),
        });
    }
}

fn check_headers<'a>(
    context: &str,
    headers: impl Iterator<Item = (&'a String, &'a String)>,
    errors: &mut Vec<ValidationError>,
) {
    for (name, value) in headers {
        let valid = reqwest::header::HeaderName::from_bytes(name.as_bytes()).is_ok()
            && reqwest::header::HeaderValue::from_str(value).is_ok();
        if !valid {
            errors.push(ValidationError::InvalidHeader {
                context: context.to_string(),
                name: name.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ServiceSettings;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ClientConfig::default()), Ok(()));
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = ClientConfig::default();
        config.retry.max_attempts = 0;
        config.services.push(
            ServiceSettings::new("books", "app-books")
                .with_fallback("ftp://localhost:21", "/books")
                .with_timeout_ms(0),
        );

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::ZeroAttempts("retry".into())));
        assert!(errors.contains(&ValidationError::DuplicateService("books".into())));
        assert!(errors.contains(&ValidationError::ZeroTimeout("books".into())));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidPrefix { prefix, .. } if prefix == "app-books")));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidUrl { url, .. } if url == "ftp://localhost:21")));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_rejects_health_paths_and_zero_max_delay() {
        let mut config = ClientConfig::default();
        config.retry.max_delay_ms = 0;
        config.health_check.path = "health".into();
        config.services[0].health_path = Some("ping".into());
        config.services[1].health_path = Some(String::new());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroMaxDelay,
                ValidationError::InvalidHealthPath {
                    context: "health_check".into(),
                    path: "health".into()
                },
                ValidationError::InvalidHealthPath {
                    context: "authors".into(),
                    path: "ping".into()
                },
            ]
        );
    }

    #[test]
    fn test_rejects_bad_header() {
        let mut config = ClientConfig::default();
        config.defaults.headers.insert("bad header".into(), "x".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidHeader {
                context: "defaults".into(),
                name: "bad header".into()
            }]
        );
    }
}
