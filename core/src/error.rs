//! Error types for the catalog client.
//!
//! # Design
//! Two layers. `TransportError` describes what went wrong on the wire and
//! keeps network failures apart from remote (non-2xx) failures so callers can
//! tell "could not reach the service" from "the service said no".
//! `ApiError` adds the JSON encode/decode failures of the client layer and
//! otherwise carries the transport error through untouched.

use thiserror::Error;

/// Errors produced by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The base endpoint, resource path or query could not form a valid URL.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Connection, DNS or I/O failure before a response was received.
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// A response arrived but its body exceeded the read limit.
    #[error("response body exceeds {limit} bytes")]
    ResponseTooLarge { limit: u64 },

    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Remote { status: u16, body: String },
}

impl TransportError {
    /// True for failures where no response was received.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }

    /// Status code of a remote failure.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Errors returned by [`CatalogClient`](crate::client::CatalogClient) operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failure reported by the transport, passed through unmodified.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// The underlying transport error, if this failure came from the wire.
    #[must_use]
    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_reports_status() {
        let err = TransportError::Remote {
            status: 404,
            body: "gone".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert!(!err.is_network());
        assert_eq!(err.to_string(), "HTTP 404: gone");
    }

    #[test]
    fn timeout_counts_as_network_failure() {
        assert!(TransportError::Timeout.is_network());
        assert_eq!(TransportError::Timeout.status(), None);
    }

    #[test]
    fn oversized_response_is_not_a_network_failure() {
        let err = TransportError::ResponseTooLarge { limit: 1024 };
        assert!(!err.is_network());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "response body exceeds 1024 bytes");
    }

    #[test]
    fn network_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::Network(Box::new(io));
        assert!(err.is_network());
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "network error: refused");
    }

    #[test]
    fn api_error_displays_transport_error_transparently() {
        let err = ApiError::from(TransportError::InvalidConfiguration("bad".to_string()));
        assert_eq!(err.to_string(), "invalid configuration: bad");
        assert!(matches!(
            err.transport(),
            Some(TransportError::InvalidConfiguration(msg)) if msg == "bad"
        ));
    }

    #[test]
    fn decode_error_has_no_transport_error() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ApiError::Decode(source);
        assert!(err.transport().is_none());
        assert!(err.to_string().starts_with("deserialization failed"));
    }
}
