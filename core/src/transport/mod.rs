//! The transport contract between the catalog client and the network.
//!
//! # Design
//! `Transport` owns the wire mechanics: turning a resource path into a fully
//! qualified URL and issuing the four verbs. It knows nothing about products.
//! The catalog client is generic over it, so a real HTTP implementation, the
//! recording fake, or any caller-provided stub can sit underneath.
//!
//! `build_url` and `check_status` are shared by every implementation in this
//! crate so they agree on URL shape and on which statuses count as failure.

mod recording;
mod ureq_transport;

use std::collections::BTreeMap;
use std::sync::Arc;

use url::Url;

use crate::error::TransportError;
use crate::http::HttpResponse;

pub use recording::RecordingTransport;
pub use ureq_transport::UreqTransport;

/// Query parameters for a request. Ordered, so the encoded query string is
/// the same for the same mapping.
pub type Query = BTreeMap<String, String>;

/// Performs network I/O on behalf of the catalog client.
///
/// Implementations must be safe to share between threads; the client itself
/// adds no locking. Timeouts and cancellation belong to the implementation.
/// GET, PUT and DELETE are conventionally idempotent and POST is not, but
/// nothing here enforces that.
pub trait Transport: Send + Sync {
    /// Resolve `resource_path` against the configured base endpoint and
    /// append `query` URL-encoded.
    ///
    /// # Errors
    /// [`TransportError::InvalidConfiguration`] when the pieces do not form a
    /// URL beneath the base endpoint.
    fn url(&self, resource_path: &str, query: &Query) -> Result<String, TransportError>;

    /// Issue a GET and return the raw response body.
    ///
    /// # Errors
    /// [`TransportError::Network`] / [`TransportError::Timeout`] when no
    /// response arrived, [`TransportError::Remote`] for non-2xx statuses.
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;

    /// Issue a POST carrying `body`.
    fn post(&self, url: &str, body: Vec<u8>) -> Result<(), TransportError>;

    /// Issue a PUT carrying `body`.
    fn put(&self, url: &str, body: Vec<u8>) -> Result<(), TransportError>;

    /// Issue a DELETE.
    fn delete(&self, url: &str) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn url(&self, resource_path: &str, query: &Query) -> Result<String, TransportError> {
        (**self).url(resource_path, query)
    }

    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        (**self).get(url)
    }

    fn post(&self, url: &str, body: Vec<u8>) -> Result<(), TransportError> {
        (**self).post(url, body)
    }

    fn put(&self, url: &str, body: Vec<u8>) -> Result<(), TransportError> {
        (**self).put(url, body)
    }

    fn delete(&self, url: &str) -> Result<(), TransportError> {
        (**self).delete(url)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn url(&self, resource_path: &str, query: &Query) -> Result<String, TransportError> {
        (**self).url(resource_path, query)
    }

    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        (**self).get(url)
    }

    fn post(&self, url: &str, body: Vec<u8>) -> Result<(), TransportError> {
        (**self).post(url, body)
    }

    fn put(&self, url: &str, body: Vec<u8>) -> Result<(), TransportError> {
        (**self).put(url, body)
    }

    fn delete(&self, url: &str) -> Result<(), TransportError> {
        (**self).delete(url)
    }
}

/// Join `base` and `resource_path`, then append `query`.
///
/// The result always lies beneath `base`: absolute URLs, `..` segments that
/// climb above it, and paths carrying their own `?`/`#` are rejected, as are
/// empty query keys.
pub fn build_url(base: &Url, resource_path: &str, query: &Query) -> Result<String, TransportError> {
    if resource_path.contains(['?', '#']) {
        return Err(TransportError::InvalidConfiguration(format!(
            "resource path {resource_path:?} must not contain '?' or '#'"
        )));
    }
    if query.keys().any(String::is_empty) {
        return Err(TransportError::InvalidConfiguration(
            "query parameter names must not be empty".to_string(),
        ));
    }

    let mut url = base
        .join(resource_path.trim_start_matches('/'))
        .map_err(|e| TransportError::InvalidConfiguration(format!("resource path {resource_path:?}: {e}")))?;
    if !url.as_str().starts_with(base.as_str()) {
        return Err(TransportError::InvalidConfiguration(format!(
            "resource path {resource_path:?} escapes base endpoint {base}"
        )));
    }

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url.into())
}

/// Map a non-2xx response to [`TransportError::Remote`]; pass the body of a
/// successful one through.
pub fn check_status(response: HttpResponse) -> Result<Vec<u8>, TransportError> {
    if response.is_success() {
        return Ok(response.body);
    }
    Err(TransportError::Remote {
        status: response.status,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    })
}
