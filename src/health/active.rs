//! Active health checking.
//!
//! # Responsibilities
//! - Probe every service concurrently and join the results
//! - Probe every candidate of one service concurrently
//! - Bound each probe by the health timeout, independent of operation timeouts

use futures_util::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::client::operation::OperationSpec;
use crate::error::ClientError;
use crate::health::state::{HealthReport, InstanceHealth, ServiceHealth};
use crate::observability::metrics;
use crate::registry::service::ServiceConfig;
use crate::registry::EndpointRegistry;
use crate::resilience::{CallContext, Executor};

const PROBE_OPERATION: &str = "health";

#[derive(Debug, Clone)]
pub struct HealthChecker {
    registry: Arc<EndpointRegistry>,
    executor: Executor,
    timeout: Duration,
}

impl HealthChecker {
    pub fn new(registry: Arc<EndpointRegistry>, executor: Executor, timeout: Duration) -> Self {
        Self {
            registry,
            executor,
            timeout,
        }
    }

    /// One probe per registered service, all at once.
    ///
    /// A failed or hung probe does not affect its siblings; each is cut off
    /// at its own deadline.
    pub async fn check_all(&self) -> HealthReport {
        let names = self.registry.service_names();
        let services = join_all(names.iter().map(|name| self.check_service(name))).await;
        let report = HealthReport { services };

        tracing::info!(
            healthy = report.healthy_count(),
            total = report.services.len(),
            "Health check complete"
        );
        report
    }

    /// Single pass over the service's candidates, no retry.
    ///
    /// Bounded by the health timeout per candidate.
    pub async fn check_service(&self, service: &str) -> ServiceHealth {
        let started = Instant::now();
        let config = match self.registry.resolve(service) {
            Ok(config) => config.with_timeout(self.timeout),
            Err(e) => return ServiceHealth::new(service, started.elapsed(), Some(e.to_string())),
        };

        // Each candidate gets the full health timeout, so a hung gateway
        // still leaves time to reach the fallbacks.
        let budget = self.timeout.saturating_mul(config.candidate_count() as u32);
        let op = OperationSpec::get(PROBE_OPERATION, config.health_path.clone());
        let ctx = CallContext::new().with_budget(budget);
        let error = self
            .executor
            .execute(&config, &op, &ctx)
            .await
            .err()
            .map(|failure| failure.to_string());

        let health = ServiceHealth::new(service, started.elapsed(), error);
        metrics::record_health_probe(service, health.is_healthy());
        if let Some(error) = &health.error {
            tracing::warn!(service = %service, error = %error, "Service unhealthy");
        }
        health
    }

    /// Probe every candidate of a service individually.
    pub async fn check_instances(&self, service: &str) -> Result<Vec<InstanceHealth>, ClientError> {
        let config = self.registry.resolve(service)?;

        let probes = config.candidates().map(|candidate| {
            let mut single = ServiceConfig::new(&config.name, candidate.clone(), self.timeout)
                .with_health_path(config.health_path.clone());
            single.headers = config.headers.clone();
            async move {
                let started = Instant::now();
                let op = OperationSpec::get(PROBE_OPERATION, single.health_path.clone());
                let ctx = CallContext::new().with_budget(self.timeout);
                let error = self
                    .executor
                    .execute(&single, &op, &ctx)
                    .await
                    .err()
                    .and_then(|failure| failure.attempts().first().map(|a| a.error.to_string()));
                InstanceHealth::new(
                    single.primary.address(&single.health_path),
                    single.primary.role,
                    started.elapsed(),
                    error,
                )
            }
        });
        let results = join_all(probes).await;

        tracing::info!(
            service = %service,
            healthy = results.iter().filter(|r| r.is_healthy()).count(),
            total = results.len(),
            "Instance health check complete"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::state::HealthState;
    use crate::registry::service::{Candidate, CandidateRole};
    use crate::resilience::NoopObserver;
    use crate::transport::mock::{Reply, ScriptedTransport};
    use serde_json::json;
    use url::Url;

    fn service(name: &str, hosts: &[&str]) -> ServiceConfig {
        let mut candidates = hosts.iter().enumerate().map(|(i, host)| {
            let role = if i == 0 { CandidateRole::Gateway } else { CandidateRole::Direct };
            Candidate::new(role, Url::parse(&format!("http://{}", host)).unwrap(), format!("/{}", name))
        });
        let mut config = ServiceConfig::new(name, candidates.next().unwrap(), Duration::from_secs(30))
            .with_health_path("/ping");
        for candidate in candidates {
            config = config.with_fallback(candidate);
        }
        config
    }

    fn checker(transport: Arc<ScriptedTransport>, services: Vec<ServiceConfig>) -> HealthChecker {
        HealthChecker::new(
            Arc::new(EndpointRegistry::new(services)),
            Executor::new(transport, Arc::new(NoopObserver)),
            Duration::from_secs(2),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_probe_does_not_hold_up_siblings() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .script("authors.test", [Reply::Json(json!("pong"))])
                .script("books.test", [Reply::Hang])
                .script("orders.test", [Reply::Json(json!("pong"))]),
        );
        let checker = checker(
            transport,
            vec![
                service("authors", &["authors.test"]),
                service("books", &["books.test"]),
                service("orders", &["orders.test"]),
            ],
        );

        let start = tokio::time::Instant::now();
        let report = checker.check_all().await;

        assert_eq!(start.elapsed(), Duration::from_secs(2));
        assert_eq!(report.services.len(), 3);
        assert_eq!(report.healthy_count(), 2);
        assert!(report.get("authors").unwrap().is_healthy());
        assert!(report.get("orders").unwrap().is_healthy());
        let books = report.get("books").unwrap();
        assert_eq!(books.state, HealthState::Unhealthy);
        assert!(books.error.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_gateway_still_reaches_fallback() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .script("gw.test", [Reply::Hang])
                .script("direct.test", [Reply::Json(json!("pong"))]),
        );
        let checker = checker(transport.clone(), vec![service("books", &["gw.test", "direct.test"])]);

        let start = tokio::time::Instant::now();
        let health = checker.check_service("books").await;

        assert!(health.is_healthy());
        assert_eq!(start.elapsed(), Duration::from_secs(2));
        assert_eq!(transport.call_count("direct.test"), 1);
    }

    #[tokio::test]
    async fn test_probe_uses_fallback_and_health_path() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .script("gw.test", [Reply::Status(502)])
                .script("direct.test", [Reply::Raw("")]),
        );
        let checker = checker(transport.clone(), vec![service("inventory", &["gw.test", "direct.test"])]);

        let health = checker.check_service("inventory").await;
        assert!(health.is_healthy());
        assert_eq!(
            transport.calls(),
            vec![
                ("gw.test".to_string(), "/inventory/ping".to_string()),
                ("direct.test".to_string(), "/inventory/ping".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_check_instances_reports_each_candidate() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .script("gw.test", [Reply::Refused])
                .script("d1.test", [Reply::Json(json!({"status": "UP"}))])
                .script("d2.test", [Reply::Status(503)]),
        );
        let checker = checker(transport.clone(), vec![service("books", &["gw.test", "d1.test", "d2.test"])]);

        let instances = checker.check_instances("books").await.unwrap();
        let states: Vec<_> = instances.iter().map(|i| (i.role, i.state)).collect();
        assert_eq!(
            states,
            vec![
                ("gateway", HealthState::Unhealthy),
                ("direct", HealthState::Healthy),
                ("direct", HealthState::Unhealthy),
            ]
        );
        assert_eq!(instances[1].address, "http://d1.test/books/ping");
        assert_eq!(instances[2].error.as_deref(), Some("HTTP 503"));
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_service() {
        let checker = checker(Arc::new(ScriptedTransport::new()), vec![]);
        assert!(checker.check_instances("nope").await.is_err());
        assert!(!checker.check_service("nope").await.is_healthy());
    }
}
