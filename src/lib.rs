#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # rest_json: loosely-typed JSON over HTTP
//!
//! This crate pairs a dynamically-typed JSON value with a minimal REST
//! client, so application code can talk to HTTP endpoints without declaring
//! a schema for every payload.
//!
//! ## Overview
//!
//! - **[`Json`]** holds any JSON-compatible shape as a [`JsonValue`]
//!   variant. Typed accessors (`int()`, `string()`, `date()`, ...) return
//!   `None` on a shape mismatch instead of failing, and path reads on missing
//!   keys return a "no value" sentinel.
//! - **[`RestClient`]** turns a method, a target and a parameter map into a
//!   request, sends it, and parses the body into a [`Json`] tagged with the
//!   HTTP status code.
//!
//! ## Key Features
//!
//! - **Fail-soft accessors**: no panics, no errors, just `None`
//! - **Status tagging**: `response.tag()` carries the HTTP status
//! - **Decode fallback**: non-JSON text bodies become string values
//! - **Microsecond dates**: ISO-8601 text in and out
//! - **Pluggable hooks**: URL resolution, authentication and transport
//! - **Connectivity flag**: set on network failures, cleared on success
//!
//! ## Usage
//!
//! ```ignore
//! use rest_json::{JsonDict, RestClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = RestClient::new();
//!
//!     let mut params = JsonDict::new();
//!     params.insert("name".into(), "widget".into());
//!
//!     match client.post("https://api.example.com/items", params).await {
//!         Some(body) if body.tag() == Some(201) => {
//!             println!("created {}", body.get("id").int64().unwrap_or_default());
//!         }
//!         Some(body) => println!("unexpected {:?}: {}", body.tag(), body),
//!         None if client.no_internet() => println!("offline"),
//!         None => println!("request failed"),
//!     }
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[json]** - The dynamic JSON value, its variants and the date codec
//! - **[client]** - REST client, request pipeline, hooks and transport
//! - **[error]** - Error types used inside the pipeline

pub mod client;
pub mod error;
pub mod json;

pub use client::{ClientConfig, Connectivity, RestClient};
pub use error::{RestError, Result, TransportErrorKind};
pub use json::{Json, JsonDict, JsonValue};

#[cfg(test)]
mod tests;
