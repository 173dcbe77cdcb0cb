//! HTTP transport abstraction and its reqwest implementation.
//!
//! The pipeline only needs one primitive: send a [`RestRequest`] with a
//! [`RequestBody`] and get back the status and body bytes, or a classified
//! [`RestError`]. Tests substitute their own [`Transport`] to script
//! responses and failures without a network.

use super::config::ClientConfig;
use super::types::{RawResponse, RequestBody, RestRequest};
use crate::error::{RestError, Result, TransportErrorKind};
use crate::json::Json;
use async_trait::async_trait;
use std::error::Error as StdError;
use std::io;

/// Sends a request and returns the raw response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one round trip.
    async fn send(&self, request: RestRequest, body: RequestBody) -> Result<RawResponse>;
}

/// [`Transport`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&ClientConfig::default())
    }

    /// Transport honoring `config.proxy_url`.
    pub fn with_config(config: &ClientConfig) -> Self {
        let mut builder = reqwest::Client::builder();

        if !config.proxy_url.is_empty() {
            match reqwest::Proxy::all(&config.proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => tracing::warn!("Ignoring invalid proxy {}: {}", config.proxy_url, e),
            }
        }

        let client = builder.build().unwrap_or_default();
        ReqwestTransport { client }
    }

    /// Wrap an already-configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        ReqwestTransport { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: RestRequest, body: RequestBody) -> Result<RawResponse> {
        let mut req_builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers)
            .timeout(request.timeout);

        req_builder = match body {
            RequestBody::Empty => req_builder,
            RequestBody::Raw(data) => req_builder.body(data),
            RequestBody::Json(params) => match Json::from(params).to_serde_value() {
                Some(payload) => req_builder.json(&payload),
                None => req_builder.body(Vec::new()),
            },
        };

        let response = req_builder.send().await.map_err(into_rest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(into_rest_error)?;

        Ok(RawResponse { status, body })
    }
}

fn into_rest_error(err: reqwest::Error) -> RestError {
    RestError::transport(classify_reqwest_error(&err), error_chain_text(&err))
}

/// Map a reqwest failure onto a [`TransportErrorKind`].
pub fn classify_reqwest_error(err: &reqwest::Error) -> TransportErrorKind {
    if err.is_timeout() {
        return TransportErrorKind::TimedOut;
    }

    if let Some(kind) = io_error_kind(err) {
        match kind {
            io::ErrorKind::TimedOut => return TransportErrorKind::TimedOut,
            io::ErrorKind::NotConnected => return TransportErrorKind::NotConnected,
            io::ErrorKind::ConnectionRefused | io::ErrorKind::AddrNotAvailable => {
                return TransportErrorKind::HostUnreachable
            }
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof => return TransportErrorKind::ConnectionLost,
            _ => {}
        }
    }

    if err.is_connect() {
        let chain = error_chain_text(err);
        if chain.contains("failed to lookup address") {
            return TransportErrorKind::HostNotFound;
        }
        if chain.contains("dns error") {
            return TransportErrorKind::DnsLookupFailed;
        }
        return TransportErrorKind::HostUnreachable;
    }

    if err.is_body() || err.is_decode() {
        return TransportErrorKind::CannotLoadFromNetwork;
    }

    if err.is_request() {
        return TransportErrorKind::SessionDisconnected;
    }

    TransportErrorKind::Other
}

fn io_error_kind(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut source = Some(err);
    while let Some(current) = source {
        if let Some(io_err) = current.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = current.source();
    }
    None
}

fn error_chain_text(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(current) = source {
        parts.push(current.to_string());
        source = current.source();
    }
    parts.join(": ")
}
