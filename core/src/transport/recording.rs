//! Deterministic in-memory transport for tests.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use url::Url;

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::http::HttpRequest;

use super::{build_url, Query, Transport};

/// Records every call and answers from a queue of scripted replies.
///
/// Replies are consumed in FIFO order regardless of verb. When the queue is
/// empty the call succeeds with an empty body. URLs are built exactly like
/// the HTTP transport builds them, so recorded URLs are realistic.
#[derive(Debug)]
pub struct RecordingTransport {
    endpoint: Url,
    calls: Mutex<Vec<HttpRequest>>,
    replies: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
}

impl RecordingTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::from_config(&TransportConfig::new(base_url))
    }

    pub fn from_config(config: &TransportConfig) -> Result<Self, TransportError> {
        Ok(Self {
            endpoint: config.endpoint()?,
            calls: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
        })
    }

    /// Queue a successful reply carrying `body`.
    pub fn push_body(&self, body: impl Into<Vec<u8>>) {
        lock(&self.replies).push_back(Ok(body.into()));
    }

    /// Queue a successful reply with an empty body.
    pub fn push_ok(&self) {
        self.push_body(Vec::new());
    }

    pub fn push_error(&self, error: TransportError) {
        lock(&self.replies).push_back(Err(error));
    }

    /// Every request issued so far, oldest first.
    pub fn calls(&self) -> Vec<HttpRequest> {
        lock(&self.calls).clone()
    }

    pub fn last_call(&self) -> Option<HttpRequest> {
        lock(&self.calls).last().cloned()
    }

    fn record(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError> {
        tracing::trace!(method = %request.method, url = %request.url, "recorded request");
        lock(&self.calls).push(request);
        lock(&self.replies).pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Transport for RecordingTransport {
    fn url(&self, resource_path: &str, query: &Query) -> Result<String, TransportError> {
        build_url(&self.endpoint, resource_path, query)
    }

    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.record(HttpRequest::get(url))
    }

    fn post(&self, url: &str, body: Vec<u8>) -> Result<(), TransportError> {
        self.record(HttpRequest::post(url, body)).map(drop)
    }

    fn put(&self, url: &str, body: Vec<u8>) -> Result<(), TransportError> {
        self.record(HttpRequest::put(url, body)).map(drop)
    }

    fn delete(&self, url: &str) -> Result<(), TransportError> {
        self.record(HttpRequest::delete(url)).map(drop)
    }
}
