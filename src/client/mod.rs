//! Table-driven service client.
//!
//! # Data Flow
//! ```text
//! facade method (authors.get_by_id(7))
//!     → operation.rs (name, method, rendered path, body)
//!     → ServiceClient::call
//!         → registry.resolve(service)   snapshot held for the whole call
//!         → retry flag from facade or registry
//!         → Executor::run
//!     → Payload, or ClientError::Aggregated with the full trail
//! ```
//!
//! # Design Decisions
//! - One generic client parameterized by service name; facades only map arguments
//! - Unknown services fail at call time with `UnknownService`, never retried

pub mod operation;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

use crate::config::loader::ConfigError;
use crate::config::schema::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::health::HealthChecker;
use crate::observability::metrics;
use crate::registry::EndpointRegistry;
use crate::resilience::{AttemptObserver, CallContext, Executor, Payload, TracingObserver};
use crate::services::{AuthorsClient, BooksClient, CustomersClient, InventoryClient, OrdersClient};
use crate::transport::{HttpTransport, Transport};

pub use operation::{render_path, OperationSpec};

/// Client for one registered service.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    service: String,
    registry: Arc<EndpointRegistry>,
    executor: Executor,
    ctx: CallContext,
}

impl ServiceClient {
    pub fn new(service: impl Into<String>, registry: Arc<EndpointRegistry>, executor: Executor) -> Self {
        Self {
            service: service.into(),
            registry,
            executor,
            ctx: CallContext::default(),
        }
    }

    /// Same client, with a deadline and/or cancellation applied to every call.
    pub fn with_context(&self, ctx: CallContext) -> Self {
        Self {
            ctx,
            ..self.clone()
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Run an operation and return the decoded JSON payload.
    pub async fn call(&self, mut operation: OperationSpec) -> ClientResult<Payload> {
        let config = self.registry.resolve(&self.service)?;
        if config.is_retry_eligible(&operation.name) {
            operation.retry_eligible = true;
        }

        let span = tracing::info_span!(
            "service_call",
            service = %self.service,
            operation = %operation.name,
            method = %operation.method,
            request_id = %operation.request_id,
        );
        let started = Instant::now();
        let result = self
            .executor
            .run(&config, &operation, &self.ctx)
            .instrument(span)
            .await;
        metrics::record_call(&self.service, result.is_ok(), started.elapsed());

        result.map_err(ClientError::from)
    }

    /// Run an operation and deserialize the payload into `T`.
    pub async fn call_as<T: DeserializeOwned>(&self, operation: OperationSpec) -> ClientResult<T> {
        let payload = self.call(operation).await?;
        serde_json::from_value(payload).map_err(ClientError::Decode)
    }

    /// Build an operation from a path template and its arguments.
    pub fn operation(&self, name: &str, method: Method, template: &str, args: &[&str]) -> ClientResult<OperationSpec> {
        Ok(OperationSpec::new(name, method, render_path(template, args)?))
    }

    pub(crate) async fn fetch(&self, name: &str, template: &str, args: &[&str]) -> ClientResult<Payload> {
        self.call(self.operation(name, Method::GET, template, args)?).await
    }

    pub(crate) async fn send<B: Serialize + ?Sized>(
        &self,
        name: &str,
        method: Method,
        template: &str,
        args: &[&str],
        body: &B,
    ) -> ClientResult<Payload> {
        let body = serde_json::to_value(body).map_err(ClientError::Serialize)?;
        self.call(self.operation(name, method, template, args)?.with_body(body))
            .await
    }

    pub(crate) async fn remove(&self, name: &str, template: &str, args: &[&str]) -> ClientResult<Payload> {
        self.call(self.operation(name, Method::DELETE, template, args)?).await
    }
}

/// Entry point: owns the registry and executor, hands out facades.
#[derive(Debug, Clone)]
pub struct Bookstore {
    registry: Arc<EndpointRegistry>,
    executor: Executor,
    ctx: CallContext,
    health_timeout: Duration,
}

impl Bookstore {
    /// HTTP transport, tracing observer, registry built from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let registry = Arc::new(EndpointRegistry::from_config(config)?);
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new()?);
        let observer: Arc<dyn AttemptObserver> = Arc::new(TracingObserver);
        Ok(Self::new(registry, Executor::new(transport, observer))
            .with_health_timeout(Duration::from_millis(config.health_check.timeout_ms)))
    }

    pub fn new(registry: Arc<EndpointRegistry>, executor: Executor) -> Self {
        Self {
            registry,
            executor,
            ctx: CallContext::default(),
            health_timeout: Duration::from_secs(2),
        }
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// Same handle; every facade it hands out applies `ctx`.
    pub fn with_context(&self, ctx: CallContext) -> Self {
        Self {
            ctx,
            ..self.clone()
        }
    }

    pub fn registry(&self) -> &Arc<EndpointRegistry> {
        &self.registry
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Generic client for any registered service.
    pub fn service(&self, name: &str) -> ClientResult<ServiceClient> {
        self.registry.resolve(name)?;
        Ok(self.client(name))
    }

    fn client(&self, name: &str) -> ServiceClient {
        ServiceClient::new(name, self.registry.clone(), self.executor.clone()).with_context(self.ctx.clone())
    }

    pub fn authors(&self) -> AuthorsClient {
        AuthorsClient::new(self.client(AuthorsClient::SERVICE))
    }

    pub fn books(&self) -> BooksClient {
        BooksClient::new(self.client(BooksClient::SERVICE))
    }

    pub fn customers(&self) -> CustomersClient {
        CustomersClient::new(self.client(CustomersClient::SERVICE))
    }

    pub fn orders(&self) -> OrdersClient {
        OrdersClient::new(self.client(OrdersClient::SERVICE))
    }

    pub fn inventory(&self) -> InventoryClient {
        InventoryClient::new(self.client(InventoryClient::SERVICE))
    }

    pub fn health(&self) -> HealthChecker {
        HealthChecker::new(self.registry.clone(), self.executor.clone(), self.health_timeout)
    }
}
