//! Health probe results.

use serde::Serialize;
use std::time::Duration;

use crate::registry::service::CandidateRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

/// Result of probing one service (gateway first, then fallbacks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceHealth {
    pub service: String,
    pub state: HealthState,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    pub(crate) fn new(service: &str, latency: Duration, error: Option<String>) -> Self {
        Self {
            service: service.to_string(),
            state: if error.is_none() {
                HealthState::Healthy
            } else {
                HealthState::Unhealthy
            },
            latency_ms: latency.as_millis() as u64,
            error,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.state == HealthState::Healthy
    }
}

/// Result of probing a single candidate of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceHealth {
    pub address: String,
    pub role: &'static str,
    pub state: HealthState,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InstanceHealth {
    pub(crate) fn new(address: String, role: CandidateRole, latency: Duration, error: Option<String>) -> Self {
        Self {
            address,
            role: match role {
                CandidateRole::Gateway => "gateway",
                CandidateRole::Direct => "direct",
            },
            state: if error.is_none() {
                HealthState::Healthy
            } else {
                HealthState::Unhealthy
            },
            latency_ms: latency.as_millis() as u64,
            error,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.state == HealthState::Healthy
    }
}

/// Joined results of a health sweep, in service-name order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub services: Vec<ServiceHealth>,
}

impl HealthReport {
    pub fn healthy_count(&self) -> usize {
        self.services.iter().filter(|s| s.is_healthy()).count()
    }

    pub fn all_healthy(&self) -> bool {
        self.healthy_count() == self.services.len()
    }

    pub fn get(&self, service: &str) -> Option<&ServiceHealth> {
        self.services.iter().find(|s| s.service == service)
    }
}
