//! Transport subsystem.
//!
//! # Responsibilities
//! - Execute exactly one HTTP request against one base address
//! - Enforce the time budget as a hard deadline (connect + response + body)
//! - Classify failures: timeout, unreachable, non-2xx status
//!
//! # Design Decisions
//! - No retries here; failover and retry live in `resilience`
//! - Non-2xx bodies are kept for diagnostics but never decoded as payloads
//! - `Transport` is a trait so the executor can run against a scripted double

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::error::TransportError;

pub use http::HttpTransport;

/// Everything needed to send one request to one candidate.
#[derive(Debug, Clone, Copy)]
pub struct TransportRequest<'a> {
    pub base_url: &'a Url,
    /// Full request path, candidate prefix included.
    pub path: &'a str,
    pub method: &'a Method,
    pub body: Option<&'a Value>,
    pub headers: &'a HeaderMap,
    pub timeout: Duration,
    pub request_id: &'a str,
}

/// A 2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn send(&self, request: TransportRequest<'_>) -> Result<RawResponse, TransportError>;
}
