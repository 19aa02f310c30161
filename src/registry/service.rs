//! Per-service endpoint table.
//!
//! # Responsibilities
//! - Hold the ordered candidate list (gateway first, then direct instances)
//! - Record each candidate's own path prefix
//! - Carry timeout, headers, retry policy and retry-eligible operations

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeSet;
use std::time::Duration;
use url::Url;

use crate::config::loader::ConfigError;
use crate::config::schema::{ClientConfig, ServiceSettings};
use crate::resilience::backoff::linear_backoff;

/// Role of a candidate in the failover order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateRole {
    Gateway,
    Direct,
}

/// One address a request can be sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub role: CandidateRole,
    pub base_url: Url,
    pub path_prefix: String,
}

impl Candidate {
    pub fn new(role: CandidateRole, base_url: Url, path_prefix: impl Into<String>) -> Self {
        Self {
            role,
            base_url,
            path_prefix: path_prefix.into(),
        }
    }

    /// Request path for an operation path on this candidate.
    pub fn full_path(&self, path: &str) -> String {
        let prefix = self.path_prefix.trim_end_matches('/');
        match (prefix.is_empty(), path.is_empty()) {
            (true, true) => "/".to_string(),
            (true, false) => path.to_string(),
            (false, _) => format!("{}{}", prefix, path),
        }
    }

    /// Absolute URL string for an operation path on this candidate.
    pub fn address(&self, path: &str) -> String {
        join_url(&self.base_url, &self.full_path(path))
    }
}

/// Concatenate a base URL (which may carry its own path) and a request path.
pub(crate) fn join_url(base: &Url, path: &str) -> String {
    format!("{}{}", base.as_str().trim_end_matches('/'), path)
}

/// Retry policy for retry-eligible operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Full passes, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Wait after failed pass `pass` (1-indexed).
    pub fn delay_after(&self, pass: u32) -> Duration {
        linear_backoff(pass, self.base_delay, self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Immutable configuration of one service.
///
/// Replaced wholesale, never mutated in place.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub name: String,
    pub primary: Candidate,
    pub fallbacks: Vec<Candidate>,
    pub timeout: Duration,
    pub headers: HeaderMap,
    pub retry: RetryPolicy,
    pub health_path: String,
    retry_operations: BTreeSet<String>,
}

impl ServiceConfig {
    pub fn new(name: impl Into<String>, primary: Candidate, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            primary,
            fallbacks: Vec::new(),
            timeout,
            headers: HeaderMap::new(),
            retry: RetryPolicy::default(),
            health_path: "/health".to_string(),
            retry_operations: BTreeSet::new(),
        }
    }

    pub fn with_fallback(mut self, candidate: Candidate) -> Self {
        self.fallbacks.push(candidate);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_retry_operation(mut self, operation: impl Into<String>) -> Self {
        self.retry_operations.insert(operation.into());
        self
    }

    pub fn with_health_path(mut self, path: impl Into<String>) -> Self {
        self.health_path = path.into();
        self
    }

    /// Build from settings, applying the shared defaults.
    pub fn from_settings(config: &ClientConfig, settings: &ServiceSettings) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidService {
            service: settings.name.clone(),
            reason,
        };

        let gateway = Url::parse(config.gateway_url())
            .map_err(|e| invalid(format!("gateway URL: {}", e)))?;
        let primary = Candidate::new(CandidateRole::Gateway, gateway, settings.gateway_prefix.clone());

        let mut fallbacks = Vec::with_capacity(settings.fallbacks.len());
        for fallback in &settings.fallbacks {
            let url = Url::parse(&fallback.url)
                .map_err(|e| invalid(format!("fallback URL '{}': {}", fallback.url, e)))?;
            fallbacks.push(Candidate::new(CandidateRole::Direct, url, fallback.path_prefix.clone()));
        }

        // Service headers are inserted last; `HeaderName` compares case-insensitively.
        let mut headers = HeaderMap::new();
        for (name, value) in config.defaults.headers.iter().chain(settings.headers.iter()) {
            let header = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| invalid(format!("header '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| invalid(format!("header '{}': {}", name, e)))?;
            headers.insert(header, value);
        }

        let retry = RetryPolicy {
            max_attempts: settings.max_attempts.unwrap_or(config.retry.max_attempts),
            base_delay: Duration::from_millis(settings.base_delay_ms.unwrap_or(config.retry.base_delay_ms)),
            max_delay: Duration::from_millis(config.retry.max_delay_ms),
        };

        Ok(Self {
            name: settings.name.clone(),
            primary,
            fallbacks,
            timeout: Duration::from_millis(settings.timeout_ms.unwrap_or(config.defaults.timeout_ms)),
            headers,
            retry,
            health_path: settings
                .health_path
                .clone()
                .unwrap_or_else(|| config.health_check.path.clone()),
            retry_operations: settings.retry_operations.iter().cloned().collect(),
        })
    }

    /// Candidates in failover order: gateway, then fallbacks.
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        std::iter::once(&self.primary).chain(self.fallbacks.iter())
    }

    pub fn candidate_count(&self) -> usize {
        1 + self.fallbacks.len()
    }

    pub fn is_retry_eligible(&self, operation: &str) -> bool {
        self.retry_operations.contains(operation)
    }

    /// Copy with a different gateway base address.
    pub fn with_primary_base(&self, base_url: Url) -> Self {
        let mut next = self.clone();
        next.primary.base_url = base_url;
        next
    }

    /// Copy with a different per-candidate timeout.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut next = self.clone();
        next.timeout = timeout;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_path_per_candidate() {
        let gateway = Candidate::new(
            CandidateRole::Gateway,
            Url::parse("http://localhost:80").unwrap(),
            "/app-books/books",
        );
        let direct = Candidate::new(
            CandidateRole::Direct,
            Url::parse("http://localhost:8083/API/v1.0").unwrap(),
            "/customers",
        );
        let bare = Candidate::new(CandidateRole::Direct, Url::parse("http://h:1").unwrap(), "");

        assert_eq!(gateway.full_path("/123"), "/app-books/books/123");
        assert_eq!(gateway.full_path(""), "/app-books/books");
        assert_eq!(gateway.address("/123"), "http://localhost/app-books/books/123");
        assert_eq!(direct.address("/by-email/x"), "http://localhost:8083/API/v1.0/customers/by-email/x");
        assert_eq!(bare.full_path(""), "/");
    }

    #[test]
    fn test_from_default_settings() {
        let config = ClientConfig::default();
        let customers = ServiceConfig::from_settings(&config, config.service("customers").unwrap()).unwrap();

        assert_eq!(customers.candidate_count(), 5);
        assert_eq!(customers.primary.role, CandidateRole::Gateway);
        assert_eq!(customers.primary.path_prefix, "/api/customers");
        assert_eq!(customers.fallbacks[0].path_prefix, "/customers");
        assert_eq!(customers.timeout, Duration::from_secs(5));
        assert_eq!(customers.headers["content-type"], "application/json");
        assert_eq!(customers.health_path, "/health");

        let authors = ServiceConfig::from_settings(&config, config.service("authors").unwrap()).unwrap();
        assert!(authors.is_retry_eligible("find_by_book_isbn"));
        assert!(!authors.is_retry_eligible("get_all"));
        assert_eq!(authors.retry.delay_after(2), Duration::from_secs(2));
    }

    #[test]
    fn test_service_headers_override_defaults() {
        let config = ClientConfig::default();
        let mut settings = ServiceSettings::new("books", "/b");
        settings.headers.insert("Accept".into(), "application/hal+json".into());
        settings.headers.insert("X-Client".into(), "bookstore".into());

        let books = ServiceConfig::from_settings(&config, &settings).unwrap();
        assert_eq!(books.headers["accept"], "application/hal+json");
        assert_eq!(books.headers["x-client"], "bookstore");
        assert_eq!(books.headers.len(), 3);
    }

    #[test]
    fn test_service_header_override_ignores_case() {
        let config = ClientConfig::default();
        let mut settings = ServiceSettings::new("books", "/b");
        settings.headers.insert("ACCEPT".into(), "application/hal+json".into());
        settings.headers.insert("content-TYPE".into(), "text/plain".into());

        let books = ServiceConfig::from_settings(&config, &settings).unwrap();
        assert_eq!(books.headers["accept"], "application/hal+json");
        assert_eq!(books.headers["content-type"], "text/plain");
        assert_eq!(books.headers.get_all("accept").iter().count(), 1);
        assert_eq!(books.headers.len(), 2);
    }

    #[test]
    fn test_primary_swap_leaves_original_untouched() {
        let config = ClientConfig::default();
        let books = ServiceConfig::from_settings(&config, config.service("books").unwrap()).unwrap();
        let moved = books.with_primary_base(Url::parse("http://gw2:8080").unwrap());

        assert_eq!(books.primary.base_url.as_str(), "http://localhost/");
        assert_eq!(moved.primary.base_url.as_str(), "http://gw2:8080/");
        assert_eq!(moved.primary.path_prefix, books.primary.path_prefix);
        assert_eq!(moved.fallbacks, books.fallbacks);
    }
}
