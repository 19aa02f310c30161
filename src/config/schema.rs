//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Root configuration for the bookstore client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Which gateway address to use.
    pub environment: Environment,

    /// Gateway (primary) addresses.
    pub gateway: GatewayConfig,

    /// Values every service inherits unless it overrides them.
    pub defaults: DefaultsConfig,

    /// Retry configuration for retry-eligible operations.
    pub retry: RetryConfig,

    /// Health probe settings.
    pub health_check: HealthCheckConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Per-service endpoint tables.
    pub services: Vec<ServiceSettings>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            gateway: GatewayConfig::default(),
            defaults: DefaultsConfig::default(),
            retry: RetryConfig::default(),
            health_check: HealthCheckConfig::default(),
            observability: ObservabilityConfig::default(),
            services: default_services(),
        }
    }
}

impl ClientConfig {
    /// Gateway base URL for the configured environment.
    pub fn gateway_url(&self) -> &str {
        match self.environment {
            Environment::Development => &self.gateway.development_url,
            Environment::Production => &self.gateway.production_url,
        }
    }

    pub fn service(&self, name: &str) -> Option<&ServiceSettings> {
        self.services.iter().find(|s| s.name == name)
    }
}

/// Deployment environment, selects the gateway address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

/// Gateway addresses per environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub development_url: String,
    pub production_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            development_url: "http://localhost:80".to_string(),
            production_url: "https://your-production-domain.com".to_string(),
        }
    }
}

/// Shared per-service defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,

    /// Headers sent with every request.
    pub headers: BTreeMap<String, String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());
        Self {
            timeout_ms: 5_000,
            headers,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of full passes for a retry-eligible operation.
    pub max_attempts: u32,

    /// Linear backoff unit: the wait after pass `n` is `n * base_delay_ms`.
    pub base_delay_ms: u64,

    /// Upper bound for a single backoff wait in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Probe timeout in milliseconds (distinct from operation timeouts).
    pub timeout_ms: u64,

    /// Probe path appended to each candidate's prefix.
    pub path: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2_000,
            path: "/health".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human format.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

/// Endpoint table for one backend service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceSettings {
    /// Registry key ("authors", "books", ...).
    pub name: String,

    /// Path prefix on the gateway (e.g. "/app-books/books").
    #[serde(default)]
    pub gateway_prefix: String,

    /// Direct instances, tried in order after the gateway.
    #[serde(default)]
    pub fallbacks: Vec<FallbackSettings>,

    /// Overrides `defaults.timeout_ms`.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Overrides `retry.max_attempts`.
    #[serde(default)]
    pub max_attempts: Option<u32>,

    /// Overrides `retry.base_delay_ms`.
    #[serde(default)]
    pub base_delay_ms: Option<u64>,

    /// Overrides `health_check.path`.
    #[serde(default)]
    pub health_path: Option<String>,

    /// Merged over `defaults.headers`.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Operations known to fail intermittently.
    #[serde(default)]
    pub retry_operations: Vec<String>,
}

impl ServiceSettings {
    pub fn new(name: &str, gateway_prefix: &str) -> Self {
        Self {
            name: name.to_string(),
            gateway_prefix: gateway_prefix.to_string(),
            fallbacks: Vec::new(),
            timeout_ms: None,
            max_attempts: None,
            base_delay_ms: None,
            health_path: None,
            headers: BTreeMap::new(),
            retry_operations: Vec::new(),
        }
    }

    pub fn with_fallback(mut self, url: &str, path_prefix: &str) -> Self {
        self.fallbacks.push(FallbackSettings {
            url: url.to_string(),
            path_prefix: path_prefix.to_string(),
        });
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_retry_operation(mut self, operation: &str) -> Self {
        self.retry_operations.push(operation.to_string());
        self
    }
}

/// One direct instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FallbackSettings {
    /// Base URL (may carry a path, e.g. "http://localhost:8083/API/v1.0").
    pub url: String,

    /// Native path prefix of the service (e.g. "/customers").
    #[serde(default)]
    pub path_prefix: String,
}

fn default_services() -> Vec<ServiceSettings> {
    vec![
        ServiceSettings::new("authors", "/app-authors/authors")
            .with_fallback("http://localhost:8081", "/authors")
            .with_fallback("http://localhost:8082", "/authors")
            .with_fallback("http://localhost:8083", "/authors")
            .with_timeout_ms(5_000)
            .with_retry_operation("find_by_book_isbn"),
        ServiceSettings::new("books", "/app-books/books")
            .with_fallback("http://localhost:9090", "/books")
            .with_fallback("http://localhost:8084", "/books")
            .with_fallback("http://localhost:8085", "/books")
            .with_fallback("http://localhost:8086", "/books")
            .with_timeout_ms(30_000)
            .with_retry_operation("get_by_isbn_with_retry"),
        ServiceSettings::new("customers", "/api/customers")
            .with_fallback("http://localhost:8083/API/v1.0", "/customers")
            .with_fallback("http://localhost:8087", "/customers")
            .with_fallback("http://localhost:8088", "/customers")
            .with_fallback("http://localhost:8089", "/customers")
            .with_timeout_ms(5_000),
        ServiceSettings::new("orders", "/app-customers/orders")
            .with_fallback("http://localhost:7070", "/orders")
            .with_timeout_ms(10_000),
        ServiceSettings::new("inventory", "/app-inventory/inventory")
            .with_fallback("http://localhost:8090", "/inventory")
            .with_timeout_ms(5_000),
    ]
}
