//! Minimal REST client exchanging loosely-typed JSON.
//!
//! Requests are built from a [`JsonDict`](crate::JsonDict) of parameters
//! (or raw bytes) and responses come back as a [`Json`](crate::Json) tagged
//! with the HTTP status code.
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── fetch        - RestClient, its builder and the request pipeline
//! ├── transport    - Transport trait and the reqwest implementation
//! ├── hooks        - URL resolution and authentication hooks
//! ├── types        - RestRequest, Params, RequestBody, RawResponse
//! ├── query        - Query-string percent-encoding
//! ├── multipart    - Single-file multipart/form-data bodies
//! ├── connectivity - Shared "no internet" flag
//! └── config       - Client configuration
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RestClient`] | Issues requests and parses tagged JSON responses |
//! | [`Transport`] | Sends one request; swap it out in tests |
//! | [`UrlResolver`] | Turns a target string into a URL |
//! | [`Authenticator`] | Attaches credentials to outgoing requests |
//! | [`Connectivity`] | Flag set by connectivity failures |
//! | [`ClientConfig`] | Timeouts, pause length, default content type |
//!
//! # Examples
//!
//! ## Creating a Client
//!
//! ```
//! use rest_json::client::{ClientConfig, Connectivity, RestClient};
//!
//! // Default configuration, shared connectivity flag
//! let client = RestClient::new();
//!
//! // Custom configuration with a private flag
//! let client = RestClient::builder()
//!     .config(ClientConfig {
//!         transient_pause_ms: 200,
//!         ..Default::default()
//!     })
//!     .connectivity(Connectivity::new())
//!     .build();
//! ```
//!
//! ## Encoding Parameters
//!
//! ```
//! use rest_json::client::encode_query;
//! use rest_json::{JsonDict, JsonValue};
//!
//! let mut params = JsonDict::new();
//! params.insert("page".into(), JsonValue::Int32(2));
//! params.insert("tag".into(), JsonValue::from("a&b"));
//! assert_eq!(encode_query(&params), "page=2&tag=a%26b");
//! ```

mod config;
mod connectivity;
mod fetch;
mod hooks;
pub mod multipart;
mod query;
mod transport;
mod types;

pub use config::ClientConfig;
pub use connectivity::Connectivity;
pub use fetch::{RequestModifier, RestClient, RestClientBuilder};
pub use hooks::{Authenticator, BaseUrl, NoAuth, ParseUrl, UrlResolver};
pub use query::{encode_query, query_value_text, QUERY_ENCODE_SET};
pub use transport::{classify_reqwest_error, ReqwestTransport, Transport};
pub use types::{Params, RawResponse, RequestBody, RestRequest};
