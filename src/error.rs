//! Error types for the REST pipeline.
//!
//! Errors are internal to the pipeline: every public operation on
//! [`RestClient`](crate::RestClient) collapses them to `None` or `false`
//! at its boundary. They exist so that the pipeline can classify a failure
//! (transient or not) and log it before doing so.

use thiserror::Error;

/// Result type used throughout the pipeline.
pub type Result<T> = std::result::Result<T, RestError>;

/// Classification of a transport failure.
///
/// Every kind except [`TransportErrorKind::Other`] describes a connectivity
/// condition and is treated as transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The host refused or could not be reached
    HostUnreachable,
    /// The host name did not resolve to any address
    HostNotFound,
    /// The DNS lookup itself failed
    DnsLookupFailed,
    /// The machine has no network route at all
    NotConnected,
    /// The request did not complete within its timeout
    TimedOut,
    /// An established connection was reset or aborted
    ConnectionLost,
    /// The response body could not be read from the network
    CannotLoadFromNetwork,
    /// The underlying session went away while the request was in flight
    SessionDisconnected,
    /// Anything else: builder errors, protocol errors, redirects, ...
    Other,
}

impl TransportErrorKind {
    /// Whether this kind describes a connectivity condition.
    pub fn is_transient(self) -> bool {
        !matches!(self, TransportErrorKind::Other)
    }
}

/// Errors raised while building or dispatching a request.
#[derive(Debug, Error)]
pub enum RestError {
    /// The transport failed to produce a response
    #[error("Transport error ({kind:?}): {message}")]
    Transport {
        /// Failure classification
        kind: TransportErrorKind,
        /// Underlying error message
        message: String,
    },

    /// The URL resolver could not turn the target into a URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The authenticator declined to produce a request
    #[error("Request rejected by authenticator")]
    AuthenticationRejected,

    /// Local I/O failed (download destination)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RestError {
    /// Build a transport error of the given kind.
    pub fn transport(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        RestError::Transport {
            kind,
            message: message.into(),
        }
    }

    /// Whether this error is a connectivity-related transport failure.
    pub fn is_transient(&self) -> bool {
        match self {
            RestError::Transport { kind, .. } => kind.is_transient(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_kinds() {
        assert!(TransportErrorKind::NotConnected.is_transient());
        assert!(TransportErrorKind::TimedOut.is_transient());
        assert!(TransportErrorKind::DnsLookupFailed.is_transient());
        assert!(!TransportErrorKind::Other.is_transient());
    }

    #[test]
    fn test_only_transport_errors_are_transient() {
        let err = RestError::transport(TransportErrorKind::ConnectionLost, "reset");
        assert!(err.is_transient());
        assert!(!RestError::InvalidUrl("nope".into()).is_transient());
        assert!(!RestError::AuthenticationRejected.is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = RestError::transport(TransportErrorKind::TimedOut, "deadline elapsed");
        assert_eq!(err.to_string(), "Transport error (TimedOut): deadline elapsed");
    }
}
