//! Endpoint registry.
//!
//! # Data Flow
//! ```text
//! ClientConfig (validated)
//!     → one ServiceConfig per service
//!     → stored behind ArcSwap, keyed by service name
//!
//! Per call:
//!     resolve(name) → Arc<ServiceConfig> snapshot, held for the whole call
//!
//! On override:
//!     override_primary(name, url) → new ServiceConfig → atomic swap
//!     (in-flight calls keep the snapshot they already hold)
//! ```
//!
//! # Design Decisions
//! - The set of services is fixed at construction
//! - No locks on the read path; readers never see a half-updated config
//! - One optional process-wide instance, installed explicitly

pub mod service;

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use url::Url;

use crate::config::loader::ConfigError;
use crate::config::schema::ClientConfig;
use crate::error::ClientError;

pub use service::{Candidate, CandidateRole, RetryPolicy, ServiceConfig};

/// Read-mostly table of service configurations.
#[derive(Debug)]
pub struct EndpointRegistry {
    services: HashMap<String, ArcSwap<ServiceConfig>>,
}

impl EndpointRegistry {
    /// Build from already-constructed service configs.
    pub fn new(configs: impl IntoIterator<Item = ServiceConfig>) -> Self {
        let services = configs
            .into_iter()
            .map(|config| (config.name.clone(), ArcSwap::from_pointee(config)))
            .collect();
        Self { services }
    }

    /// Build one `ServiceConfig` per configured service.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let configs = config
            .services
            .iter()
            .map(|settings| ServiceConfig::from_settings(config, settings))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            environment = %config.environment,
            gateway = %config.gateway_url(),
            services = configs.len(),
            "Endpoint registry initialized"
        );
        Ok(Self::new(configs))
    }

    /// Current configuration snapshot for a service.
    pub fn resolve(&self, service: &str) -> Result<Arc<ServiceConfig>, ClientError> {
        self.services
            .get(service)
            .map(|slot| slot.load_full())
            .ok_or_else(|| ClientError::UnknownService(service.to_string()))
    }

    /// Replace a service's gateway base address.
    pub fn override_primary(&self, service: &str, base_url: Url) -> Result<(), ClientError> {
        let slot = self
            .services
            .get(service)
            .ok_or_else(|| ClientError::UnknownService(service.to_string()))?;

        slot.rcu(|current| Arc::new(current.with_primary_base(base_url.clone())));
        tracing::info!(service = %service, primary = %base_url, "Primary base address overridden");
        Ok(())
    }

    /// Registered service names, sorted.
    pub fn service_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

static GLOBAL: OnceLock<Arc<EndpointRegistry>> = OnceLock::new();

/// Install the process-wide registry. Can only succeed once.
pub fn install_global(registry: Arc<EndpointRegistry>) -> Result<Arc<EndpointRegistry>, ConfigError> {
    GLOBAL
        .set(registry.clone())
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    Ok(registry)
}

/// The process-wide registry, if installed.
pub fn global() -> Option<Arc<EndpointRegistry>> {
    GLOBAL.get().cloned()
}
