//! Request and response types passed between the pipeline, its hooks and
//! the transport.

use crate::json::JsonDict;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Method;
use std::time::Duration;
use url::Url;

/// Parameters of a single request.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    /// Key/value pairs, sent as a query string or as a JSON object body
    Map(JsonDict),
    /// Raw payload, sent verbatim as the body
    Bytes(Bytes),
}

impl From<JsonDict> for Params {
    fn from(map: JsonDict) -> Self {
        Params::Map(map)
    }
}

impl From<Bytes> for Params {
    fn from(data: Bytes) -> Self {
        Params::Bytes(data)
    }
}

/// Body handed to the [`Transport`](super::Transport).
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body
    Empty,
    /// Object to encode as JSON
    Json(JsonDict),
    /// Bytes to send as-is
    Raw(Bytes),
}

/// An outgoing request before its body is attached.
///
/// This is what the [`Authenticator`](super::Authenticator) hook and the
/// per-call modifier see and may rewrite.
#[derive(Debug, Clone)]
pub struct RestRequest {
    /// HTTP method
    pub method: Method,
    /// Resolved target
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Time allowed for the whole round trip
    pub timeout: Duration,
}

impl RestRequest {
    /// Create a request with no headers.
    pub fn new(method: Method, url: Url, timeout: Duration) -> Self {
        RestRequest {
            method,
            url,
            headers: HeaderMap::new(),
            timeout,
        }
    }

    /// Set a header, replacing any previous value.
    ///
    /// Values that are not valid header text are dropped.
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.insert(name, value);
            }
            Err(_) => {
                tracing::debug!("Dropping invalid value for header {}: {:?}", name, value);
            }
        }
        self
    }

    /// Read a header as text.
    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// What the transport returns on a completed round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Bytes,
}
