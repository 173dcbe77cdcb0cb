//! Pipeline tests against a scripted in-memory transport.

use crate::client::{
    Authenticator, ClientConfig, Connectivity, Params, RawResponse, RequestBody, RestClient,
    RestRequest, Transport, UrlResolver,
};
use crate::error::{RestError, Result, TransportErrorKind};
use crate::json::{JsonDict, JsonValue};
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

#[derive(Clone, Default)]
struct ScriptedTransport {
    outcomes: Arc<Mutex<VecDeque<Result<RawResponse>>>>,
    seen: Arc<Mutex<Vec<(RestRequest, RequestBody)>>>,
}

impl ScriptedTransport {
    fn respond(self, status: u16, body: &'static [u8]) -> Self {
        self.outcomes.lock().unwrap().push_back(Ok(RawResponse {
            status,
            body: Bytes::from_static(body),
        }));
        self
    }

    fn fail(self, kind: TransportErrorKind) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Err(RestError::transport(kind, "scripted failure")));
        self
    }

    fn seen(&self) -> Vec<(RestRequest, RequestBody)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: RestRequest, body: RequestBody) -> Result<RawResponse> {
        self.seen.lock().unwrap().push((request, body));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RestError::transport(TransportErrorKind::Other, "script exhausted")))
    }
}

fn client_with(transport: ScriptedTransport, flag: Connectivity) -> RestClient {
    RestClient::builder()
        .transport(transport)
        .connectivity(flag)
        .build()
}

fn params(pairs: &[(&str, JsonValue)]) -> JsonDict {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[tokio::test]
async fn test_response_is_tagged_with_status() {
    let transport = ScriptedTransport::default().respond(201, br#"{"x":1}"#);
    let client = client_with(transport, Connectivity::new());

    let body = client.post("http://api.test/items", JsonDict::new()).await.unwrap();
    assert_eq!(body.get("x").int(), Some(1));
    assert_eq!(body.tag(), Some(201));
}

#[tokio::test]
async fn test_unparseable_body_is_still_tagged() {
    let transport = ScriptedTransport::default().respond(502, b"Bad Gateway");
    let client = client_with(transport, Connectivity::new());

    let body = client.get("http://api.test/", JsonDict::new()).await.unwrap();
    assert_eq!(body.string(), Some("Bad Gateway"));
    assert_eq!(body.tag(), Some(502));
}

#[tokio::test]
async fn test_undecodable_body_is_tagged_sentinel() {
    let transport = ScriptedTransport::default().respond(200, &[0xff, 0xfe, 0xfd]);
    let client = client_with(transport.clone(), Connectivity::new());

    let body = client.get("http://api.test/", JsonDict::new()).await.unwrap();
    assert!(body.is_null());
    assert_eq!(body.tag(), Some(200));

    assert_eq!(
        client
            .request(Method::GET, "http://api.test/", Params::Map(JsonDict::new()), false, None, None)
            .await,
        None,
        "script is exhausted after the first call"
    );
    assert_eq!(transport.seen().len(), 2);
}

#[tokio::test]
async fn test_get_appends_query_and_sends_no_body() {
    let transport = ScriptedTransport::default().respond(200, b"{}");
    let client = client_with(transport.clone(), Connectivity::new());

    let query = params(&[("a", JsonValue::from("b c")), ("q", JsonValue::from("1;2"))]);
    client.get("http://api.test/search", query).await.unwrap();

    let (request, body) = transport.seen().remove(0);
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.url.as_str(), "http://api.test/search?a=b%20c&q=1%3B2");
    assert_eq!(request.timeout, Duration::from_secs(60));
    assert_eq!(request.header(&CONTENT_TYPE), None);
    assert_eq!(body, RequestBody::Empty);
}

#[tokio::test]
async fn test_empty_params_add_no_query() {
    let transport = ScriptedTransport::default().respond(204, b"");
    let client = client_with(transport.clone(), Connectivity::new());

    client.delete("http://api.test/items/3", JsonDict::new()).await.unwrap();

    let (request, _) = transport.seen().remove(0);
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.url.as_str(), "http://api.test/items/3");
}

#[tokio::test]
async fn test_put_sends_json_body_with_content_type() {
    let transport = ScriptedTransport::default().respond(200, b"{}");
    let client = client_with(transport.clone(), Connectivity::new());

    let fields = params(&[("name", JsonValue::from("widget"))]);
    client.put("http://api.test/items/3", fields.clone()).await.unwrap();

    let (request, body) = transport.seen().remove(0);
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.url.query(), None);
    assert_eq!(request.header(&CONTENT_TYPE), Some("application/json"));
    assert_eq!(body, RequestBody::Json(fields));
}

#[tokio::test]
async fn test_post_data_uses_given_content_type() {
    let transport = ScriptedTransport::default().respond(200, b"{}");
    let client = client_with(transport.clone(), Connectivity::new());

    client
        .post_data("http://api.test/raw", &b"<xml/>"[..], "application/xml")
        .await
        .unwrap();

    let (request, body) = transport.seen().remove(0);
    assert_eq!(request.header(&CONTENT_TYPE), Some("application/xml"));
    assert_eq!(body, RequestBody::Raw(Bytes::from_static(b"<xml/>")));
}

#[tokio::test]
async fn test_upload_file_wraps_multipart() {
    let transport = ScriptedTransport::default().respond(200, br#"{"ok":true}"#);
    let client = client_with(transport.clone(), Connectivity::new());

    let body = client
        .upload_file("http://api.test/upload", &b"abc"[..], "notes.txt")
        .await
        .unwrap();
    assert_eq!(body.get("ok").bool(), Some(true));

    let (request, sent) = transport.seen().remove(0);
    let expected_type = format!("multipart/form-data; boundary={}", client.boundary());
    assert_eq!(request.header(&CONTENT_TYPE), Some(expected_type.as_str()));

    let expected_body = crate::client::multipart::wrap(client.boundary(), "notes.txt", b"abc");
    assert_eq!(sent, RequestBody::Raw(expected_body));
}

#[tokio::test(start_paused = true)]
async fn test_transient_failure_sets_flag_and_pauses() {
    let transport = ScriptedTransport::default()
        .fail(TransportErrorKind::NotConnected)
        .respond(200, b"{}");
    let flag = Connectivity::new();
    let client = client_with(transport, flag.clone());

    let started = tokio::time::Instant::now();
    assert!(client.get("http://api.test/", JsonDict::new()).await.is_none());
    assert!(started.elapsed() >= Duration::from_secs(1));
    assert!(flag.no_internet());
    assert!(client.no_internet());

    assert!(client.get("http://api.test/", JsonDict::new()).await.is_some());
    assert!(!flag.no_internet());
}

#[tokio::test(start_paused = true)]
async fn test_other_failure_returns_immediately_and_keeps_flag() {
    let transport = ScriptedTransport::default()
        .fail(TransportErrorKind::TimedOut)
        .fail(TransportErrorKind::Other);
    let flag = Connectivity::new();
    let client = client_with(transport, flag.clone());

    assert!(client.get("http://api.test/", JsonDict::new()).await.is_none());
    assert!(flag.no_internet());

    let started = tokio::time::Instant::now();
    assert!(client.get("http://api.test/", JsonDict::new()).await.is_none());
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert!(flag.no_internet(), "non-transient failures leave the flag alone");
}

#[tokio::test(start_paused = true)]
async fn test_pause_follows_config() {
    let transport = ScriptedTransport::default().fail(TransportErrorKind::ConnectionLost);
    let client = RestClient::builder()
        .transport(transport)
        .connectivity(Connectivity::new())
        .config(ClientConfig {
            transient_pause_ms: 250,
            request_timeout_ms: 5_000,
            ..Default::default()
        })
        .build();

    let started = tokio::time::Instant::now();
    assert!(client.get("http://api.test/", JsonDict::new()).await.is_none());
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(250) && elapsed < Duration::from_secs(1));
}

struct Rejecting;

#[async_trait]
impl UrlResolver for Rejecting {
    async fn resolve(&self, _target: &str) -> Option<Url> {
        None
    }
}

#[tokio::test]
async fn test_unresolvable_target_never_reaches_transport() {
    let transport = ScriptedTransport::default().respond(200, b"{}");
    let flag = Connectivity::new();
    flag.mark_offline();

    let client = RestClient::builder()
        .transport(transport.clone())
        .url_resolver(Rejecting)
        .connectivity(flag.clone())
        .build();

    assert!(client.get("http://api.test/", JsonDict::new()).await.is_none());
    assert!(transport.seen().is_empty());
    assert!(flag.no_internet());

    let default_client = client_with(transport.clone(), Connectivity::new());
    assert!(default_client.get("not a url", JsonDict::new()).await.is_none());
    assert!(transport.seen().is_empty());
}

struct StaticToken;

#[async_trait]
impl Authenticator for StaticToken {
    async fn authenticate(&self, request: RestRequest) -> Option<RestRequest> {
        if request.url.path().starts_with("/private") {
            return None;
        }
        Some(request.with_header(AUTHORIZATION, "Bearer token-123"))
    }
}

#[tokio::test]
async fn test_authenticator_decorates_or_aborts() {
    let transport = ScriptedTransport::default().respond(200, b"{}");
    let client = RestClient::builder()
        .transport(transport.clone())
        .authenticator(StaticToken)
        .connectivity(Connectivity::new())
        .build();

    assert!(client.get("http://api.test/private/x", JsonDict::new()).await.is_none());
    assert!(transport.seen().is_empty());

    client.get("http://api.test/public", JsonDict::new()).await.unwrap();
    let (request, _) = transport.seen().remove(0);
    assert_eq!(
        request.headers.get(AUTHORIZATION),
        Some(&HeaderValue::from_static("Bearer token-123"))
    );
}

#[tokio::test]
async fn test_modifier_runs_after_content_type() {
    let transport = ScriptedTransport::default().respond(200, b"{}");
    let client = client_with(transport.clone(), Connectivity::new());

    let modify = |request: RestRequest| request.with_header(CONTENT_TYPE, "text/csv");
    client
        .json_request(
            Method::PATCH,
            "http://api.test/rows",
            Params::Bytes(Bytes::from_static(b"a,b")),
            true,
            None,
            Some(&modify),
        )
        .await
        .unwrap();

    let (request, body) = transport.seen().remove(0);
    assert_eq!(request.method, Method::PATCH);
    assert_eq!(request.header(&CONTENT_TYPE), Some("text/csv"));
    assert_eq!(body, RequestBody::Raw(Bytes::from_static(b"a,b")));
}

#[tokio::test]
async fn test_download_writes_body_verbatim() {
    let transport = ScriptedTransport::default().respond(200, b"\x00binary\xff");
    let client = client_with(transport.clone(), Connectivity::new());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blob.bin");
    assert!(client.download("http://api.test/blob", &path).await);
    assert_eq!(std::fs::read(&path).unwrap(), b"\x00binary\xff".to_vec());

    let (request, body) = transport.seen().remove(0);
    assert_eq!(request.method, Method::GET);
    assert_eq!(body, RequestBody::Empty);
}

#[tokio::test]
async fn test_download_failures_return_false() {
    let transport = ScriptedTransport::default().respond(200, b"data");
    let client = client_with(transport, Connectivity::new());

    let dir = tempfile::tempdir().unwrap();
    let missing_parent = dir.path().join("no/such/dir/file");
    assert!(!client.download("http://api.test/blob", &missing_parent).await);

    // Script exhausted: the transport fails.
    assert!(!client.download("http://api.test/blob", dir.path().join("x")).await);
}
