//! Scripted transport for unit tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::error::TransportError;
use crate::transport::{RawResponse, Transport, TransportRequest};

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Json(Value),
    Raw(&'static str),
    Status(u16),
    Refused,
    /// Never answers; times out at the request's budget.
    Hang,
}

/// Replies are scripted per host. The last reply of a script repeats.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn script(self, host: &str, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(host.to_string(), replies.into_iter().collect());
        self
    }

    /// (host, path) of every request, in order.
    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self, host: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(h, _)| h == host).count()
    }

    fn next_reply(&self, host: &str) -> Reply {
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(host) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Reply::Refused),
            Some(queue) => queue.front().cloned().unwrap_or(Reply::Refused),
            None => Reply::Refused,
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest<'_>) -> Result<RawResponse, TransportError> {
        let host = request.base_url.host_str().unwrap_or_default().to_string();
        self.calls
            .lock()
            .unwrap()
            .push((host.clone(), request.path.to_string()));

        match self.next_reply(&host) {
            Reply::Json(value) => Ok(RawResponse {
                status: 200,
                body: serde_json::to_vec(&value).unwrap(),
            }),
            Reply::Raw(text) => Ok(RawResponse {
                status: 200,
                body: text.as_bytes().to_vec(),
            }),
            Reply::Status(status) => Err(TransportError::HttpStatus {
                status,
                body: String::new(),
            }),
            Reply::Refused => Err(TransportError::Unreachable("connection refused".into())),
            Reply::Hang => {
                tokio::time::sleep(request.timeout).await;
                Err(TransportError::Timeout(request.timeout))
            }
        }
    }
}
