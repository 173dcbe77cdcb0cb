//! Pluggable request hooks.
//!
//! A [`RestClient`](super::RestClient) runs two hooks on every request:
//!
//! 1. [`UrlResolver`] turns the target string (query already appended) into
//!    a [`Url`]. Returning `None` aborts the request.
//! 2. [`Authenticator`] sees the built request and may attach credentials or
//!    other headers. Returning `None` aborts the request.
//!
//! Both are async and may suspend.
//!
//! # Examples
//!
//! ```ignore
//! use async_trait::async_trait;
//! use http::header::AUTHORIZATION;
//! use rest_json::client::{Authenticator, RestRequest};
//!
//! struct Bearer(String);
//!
//! #[async_trait]
//! impl Authenticator for Bearer {
//!     async fn authenticate(&self, request: RestRequest) -> Option<RestRequest> {
//!         Some(request.with_header(AUTHORIZATION, &format!("Bearer {}", self.0)))
//!     }
//! }
//! ```

use super::types::RestRequest;
use async_trait::async_trait;
use url::Url;

/// Resolves a request target to a URL.
#[async_trait]
pub trait UrlResolver: Send + Sync {
    /// Resolve `target`, or return `None` to abort the request.
    async fn resolve(&self, target: &str) -> Option<Url>;
}

/// Authenticates an outgoing request.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Return the request to send, or `None` to abort it.
    async fn authenticate(&self, request: RestRequest) -> Option<RestRequest>;
}

/// Default resolver: parses the target as an absolute URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseUrl;

#[async_trait]
impl UrlResolver for ParseUrl {
    async fn resolve(&self, target: &str) -> Option<Url> {
        Url::parse(target).ok()
    }
}

/// Resolver that joins targets onto a base URL.
///
/// Absolute targets replace the base entirely; relative ones follow the
/// usual reference-resolution rules, so the base should end in `/`.
#[derive(Debug, Clone)]
pub struct BaseUrl {
    base: Url,
}

impl BaseUrl {
    /// Resolve targets relative to `base`.
    pub fn new(base: Url) -> Self {
        BaseUrl { base }
    }
}

#[async_trait]
impl UrlResolver for BaseUrl {
    async fn resolve(&self, target: &str) -> Option<Url> {
        self.base.join(target).ok()
    }
}

/// Default authenticator: passes the request through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

#[async_trait]
impl Authenticator for NoAuth {
    async fn authenticate(&self, request: RestRequest) -> Option<RestRequest> {
        Some(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use std::time::Duration;
    use tokio_test::block_on;

    #[test]
    fn test_parse_url() {
        assert_eq!(
            block_on(ParseUrl.resolve("http://example.com/a?b=1")),
            Some(Url::parse("http://example.com/a?b=1").unwrap())
        );
        assert_eq!(block_on(ParseUrl.resolve("not a url")), None);
        assert_eq!(block_on(ParseUrl.resolve("/relative")), None);
    }

    #[test]
    fn test_base_url_joins_relative_targets() {
        let resolver = BaseUrl::new(Url::parse("https://api.example.com/v1/").unwrap());
        assert_eq!(
            block_on(resolver.resolve("users?id=3")).map(String::from),
            Some("https://api.example.com/v1/users?id=3".to_string())
        );
        assert_eq!(
            block_on(resolver.resolve("http://other.test/x")).map(String::from),
            Some("http://other.test/x".to_string())
        );
    }

    #[test]
    fn test_no_auth_is_identity() {
        let request = RestRequest::new(
            Method::DELETE,
            Url::parse("http://localhost/items/1").unwrap(),
            Duration::from_secs(60),
        );
        let passed = block_on(NoAuth.authenticate(request)).unwrap();
        assert_eq!(passed.method, Method::DELETE);
        assert!(passed.headers.is_empty());
    }
}
