//! reqwest-backed transport.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;

use crate::error::TransportError;
use crate::registry::service::join_url;
use crate::transport::{RawResponse, Transport, TransportRequest};

/// Upper bound on how much of an error body is kept for diagnostics.
const MAX_ERROR_BODY: usize = 4 * 1024;

/// HTTP transport over a shared connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bookstore-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send_inner(&self, request: TransportRequest<'_>, budget: Duration) -> Result<RawResponse, TransportError> {
        let url = join_url(request.base_url, request.path);
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(request.headers.clone())
            .header("x-request-id", request.request_id);
        if let Some(body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| classify(e, budget))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| classify(e, budget))?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body[..body.len().min(MAX_ERROR_BODY)]).into_owned();
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(RawResponse {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest<'_>) -> Result<RawResponse, TransportError> {
        let budget = request.timeout;
        match timeout(budget, self.send_inner(request, budget)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(budget)),
        }
    }
}

fn classify(error: reqwest::Error, budget: Duration) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(budget)
    } else if error.is_builder() {
        TransportError::InvalidRequest(error.to_string())
    } else {
        TransportError::Unreachable(error.to_string())
    }
}
