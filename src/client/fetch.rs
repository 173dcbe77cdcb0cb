//! The REST client and its request pipeline.
//!
//! Every high-level call funnels into [`RestClient::json_request`], which
//! issues the request through [`RestClient::request`] and parses the body as
//! a [`Json`] tagged with the HTTP status.
//!
//! # Pipeline
//!
//! 1. Body-less requests get the parameters appended as a query string
//! 2. The [`UrlResolver`] hook resolves the target
//! 3. The request is built with the configured timeout
//! 4. The [`Authenticator`] hook may rewrite or reject it
//! 5. Body-carrying requests get a `Content-Type`
//! 6. An optional per-call modifier runs last
//! 7. The [`Transport`] sends it with an empty, JSON or raw body
//!
//! # Failures
//!
//! Nothing here returns an error. A failed request yields `None`. If the
//! transport classified the failure as a connectivity problem, the client
//! also marks its [`Connectivity`] flag offline and pauses for
//! [`ClientConfig::transient_pause_ms`] before returning, so that callers
//! retrying in a tight loop do not spin. Any completed round trip marks the
//! flag online again.
//!
//! # Examples
//!
//! ```ignore
//! use rest_json::{JsonDict, JsonValue, RestClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = RestClient::new();
//!
//!     let mut params = JsonDict::new();
//!     params.insert("q".into(), JsonValue::from("rust"));
//!
//!     if let Some(body) = client.get("https://api.example.com/search", params).await {
//!         println!("status {:?}: {}", body.tag(), body.get("total").int().unwrap_or(0));
//!     } else if client.connectivity().no_internet() {
//!         println!("offline");
//!     }
//! }
//! ```

use super::config::ClientConfig;
use super::connectivity::Connectivity;
use super::hooks::{Authenticator, NoAuth, ParseUrl, UrlResolver};
use super::multipart;
use super::query::encode_query;
use super::transport::{ReqwestTransport, Transport};
use super::types::{Params, RequestBody, RestRequest};
use crate::error::{RestError, Result};
use crate::json::{Json, JsonDict};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::Method;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::time::sleep;

/// Per-call hook applied to the request after authentication.
pub type RequestModifier<'a> = &'a (dyn Fn(RestRequest) -> RestRequest + Send + Sync);

/// REST client exchanging loosely-typed JSON.
///
/// Cheap to clone. Clones share the transport, hooks, connectivity flag and
/// multipart boundary.
#[derive(Clone)]
pub struct RestClient {
    transport: Arc<dyn Transport>,
    url_resolver: Arc<dyn UrlResolver>,
    authenticator: Arc<dyn Authenticator>,
    connectivity: Connectivity,
    config: Arc<ClientConfig>,
    boundary: Arc<str>,
}

impl RestClient {
    /// Client with default configuration, a reqwest transport and the
    /// process-wide connectivity flag.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring a client.
    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::default()
    }

    /// The process-wide default client.
    pub fn shared() -> &'static RestClient {
        static SHARED: OnceLock<RestClient> = OnceLock::new();
        SHARED.get_or_init(RestClient::new)
    }

    /// GET with `params` as the query string.
    pub async fn get(&self, target: &str, params: JsonDict) -> Option<Json> {
        self.json_request(Method::GET, target, Params::Map(params), false, None, None)
            .await
    }

    /// DELETE with `params` as the query string.
    pub async fn delete(&self, target: &str, params: JsonDict) -> Option<Json> {
        self.json_request(Method::DELETE, target, Params::Map(params), false, None, None)
            .await
    }

    /// POST with `params` as a JSON body.
    pub async fn post(&self, target: &str, params: JsonDict) -> Option<Json> {
        self.json_request(Method::POST, target, Params::Map(params), true, None, None)
            .await
    }

    /// PUT with `params` as a JSON body.
    pub async fn put(&self, target: &str, params: JsonDict) -> Option<Json> {
        self.json_request(Method::PUT, target, Params::Map(params), true, None, None)
            .await
    }

    /// POST an arbitrary payload with an explicit content type.
    pub async fn post_data(
        &self,
        target: &str,
        data: impl Into<Bytes>,
        content_type: &str,
    ) -> Option<Json> {
        self.json_request(
            Method::POST,
            target,
            Params::Bytes(data.into()),
            true,
            Some(content_type),
            None,
        )
        .await
    }

    /// POST `data` as a single-file `multipart/form-data` form.
    ///
    /// `field_name` names both the form field and the file.
    pub async fn upload_file(
        &self,
        target: &str,
        data: impl Into<Bytes>,
        field_name: &str,
    ) -> Option<Json> {
        let data: Bytes = data.into();
        let body = multipart::wrap(&self.boundary, field_name, &data);
        let form_type = multipart::content_type(&self.boundary);
        let use_form_type = move |request: RestRequest| request.with_header(CONTENT_TYPE, &form_type);

        self.json_request(
            Method::POST,
            target,
            Params::Bytes(body),
            true,
            Some(multipart::PART_CONTENT_TYPE),
            Some(&use_form_type),
        )
        .await
    }

    /// GET `target` and write the response body to `destination` verbatim.
    ///
    /// Returns whether both the request and the write succeeded. The status
    /// code is not inspected.
    pub async fn download(&self, target: &str, destination: impl AsRef<Path>) -> bool {
        let Some((body, _status)) = self
            .request(Method::GET, target, Params::Map(JsonDict::new()), false, None, None)
            .await
        else {
            return false;
        };

        match tokio::fs::write(destination.as_ref(), &body).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(
                    "Download of {} could not be written to {}: {}",
                    target,
                    destination.as_ref().display(),
                    RestError::from(e)
                );
                false
            }
        }
    }

    /// Issue a request and parse the response as a [`Json`] tagged with
    /// the status code.
    ///
    /// Returns `None` only if no response arrived. A body that is neither
    /// JSON nor UTF-8 text comes back as the "no value" sentinel, still
    /// tagged with the status.
    pub async fn json_request(
        &self,
        method: Method,
        target: &str,
        params: Params,
        has_body: bool,
        content_type: Option<&str>,
        modify: Option<RequestModifier<'_>>,
    ) -> Option<Json> {
        let (body, status) = self
            .request(method, target, params, has_body, content_type, modify)
            .await?;
        let json = Json::from_bytes(&body).unwrap_or_else(Json::null);
        Some(json.tagged(i32::from(status)))
    }

    /// Issue a request and return the raw body and status code.
    ///
    /// `content_type` defaults to [`ClientConfig::default_content_type`] and
    /// only applies when `has_body` is set.
    pub async fn request(
        &self,
        method: Method,
        target: &str,
        params: Params,
        has_body: bool,
        content_type: Option<&str>,
        modify: Option<RequestModifier<'_>>,
    ) -> Option<(Bytes, u16)> {
        let (request, body) = match self
            .build_request(method, target, params, has_body, content_type, modify)
            .await
        {
            Ok(built) => built,
            Err(e) => {
                tracing::debug!("Request to {} aborted: {}", target, e);
                return None;
            }
        };

        let method = request.method.clone();
        match self.transport.send(request, body).await {
            Ok(response) => {
                self.connectivity.mark_online();
                tracing::debug!("{} {} -> {}", method, target, response.status);
                Some((response.body, response.status))
            }
            Err(e) if e.is_transient() => {
                self.connectivity.mark_offline();
                let pause = Duration::from_millis(self.config.transient_pause_ms);
                if self.config.enable_logging {
                    tracing::warn!(
                        "{} {} failed with a connectivity error, pausing {:?}: {}",
                        method,
                        target,
                        pause,
                        e
                    );
                }
                sleep(pause).await;
                None
            }
            Err(e) => {
                tracing::debug!("{} {} failed: {}", method, target, e);
                None
            }
        }
    }

    async fn build_request(
        &self,
        method: Method,
        target: &str,
        params: Params,
        has_body: bool,
        content_type: Option<&str>,
        modify: Option<RequestModifier<'_>>,
    ) -> Result<(RestRequest, RequestBody)> {
        let mut path = target.to_string();
        if !has_body {
            if let Params::Map(map) = &params {
                let query = encode_query(map);
                if !query.is_empty() {
                    path.push('?');
                    path.push_str(&query);
                }
            }
        }

        let url = self
            .url_resolver
            .resolve(&path)
            .await
            .ok_or_else(|| RestError::InvalidUrl(path.clone()))?;

        let request = RestRequest::new(
            method,
            url,
            Duration::from_millis(self.config.request_timeout_ms),
        );
        let mut request = self
            .authenticator
            .authenticate(request)
            .await
            .ok_or(RestError::AuthenticationRejected)?;

        if has_body {
            let content_type = content_type.unwrap_or(&self.config.default_content_type);
            request = request.with_header(CONTENT_TYPE, content_type);
        }

        if let Some(modify) = modify {
            request = modify(request);
        }

        let body = match (has_body, params) {
            (true, Params::Map(map)) => RequestBody::Json(map),
            (true, Params::Bytes(data)) => RequestBody::Raw(data),
            (false, _) => RequestBody::Empty,
        };

        Ok((request, body))
    }

    /// The connectivity flag this client writes to.
    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Whether the last classified failure was a connectivity error.
    pub fn no_internet(&self) -> bool {
        self.connectivity.no_internet()
    }

    /// The multipart boundary used by [`RestClient::upload_file`].
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Default for RestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`RestClient`].
///
/// # Examples
///
/// ```
/// use rest_json::client::{BaseUrl, ClientConfig, Connectivity, RestClient};
/// use url::Url;
///
/// let flag = Connectivity::new();
/// let client = RestClient::builder()
///     .config(ClientConfig {
///         request_timeout_ms: 10_000,
///         ..Default::default()
///     })
///     .url_resolver(BaseUrl::new(Url::parse("https://api.example.com/v1/").unwrap()))
///     .connectivity(flag.clone())
///     .build();
///
/// assert_eq!(client.config().request_timeout_ms, 10_000);
/// assert!(!flag.no_internet());
/// ```
#[derive(Default)]
pub struct RestClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    url_resolver: Option<Arc<dyn UrlResolver>>,
    authenticator: Option<Arc<dyn Authenticator>>,
    connectivity: Option<Connectivity>,
}

impl RestClientBuilder {
    /// Use `config`.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Send requests through `transport` instead of reqwest.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Resolve targets with `resolver` instead of [`ParseUrl`].
    pub fn url_resolver(mut self, resolver: impl UrlResolver + 'static) -> Self {
        self.url_resolver = Some(Arc::new(resolver));
        self
    }

    /// Authenticate requests with `authenticator` instead of [`NoAuth`].
    pub fn authenticator(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.authenticator = Some(Arc::new(authenticator));
        self
    }

    /// Report connectivity to `connectivity` instead of the shared flag.
    pub fn connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = Some(connectivity);
        self
    }

    /// Build the client.
    pub fn build(self) -> RestClient {
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::with_config(&self.config)));

        RestClient {
            transport,
            url_resolver: self.url_resolver.unwrap_or_else(|| Arc::new(ParseUrl)),
            authenticator: self.authenticator.unwrap_or_else(|| Arc::new(NoAuth)),
            connectivity: self.connectivity.unwrap_or_else(Connectivity::shared),
            config: Arc::new(self.config),
            boundary: Arc::from(multipart::generate_boundary()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RestClient::new();
        assert_eq!(client.config().request_timeout_ms, 60_000);
        assert_eq!(client.config().transient_pause_ms, 1_000);
    }

    #[test]
    fn test_boundary_is_fixed_per_instance() {
        let client = RestClient::builder().connectivity(Connectivity::new()).build();
        let clone = client.clone();
        assert_eq!(client.boundary(), clone.boundary());
        assert_eq!(client.boundary().len(), 32);

        let other = RestClient::builder().connectivity(Connectivity::new()).build();
        assert_ne!(client.boundary(), other.boundary());
    }

    #[test]
    fn test_shared_client_uses_shared_flag() {
        let shared = RestClient::shared();
        assert!(std::ptr::eq(shared, RestClient::shared()));
        assert_eq!(shared.no_internet(), Connectivity::shared().no_internet());
    }
}
