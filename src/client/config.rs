//! Client configuration.

/// Configuration for [`RestClient`](super::RestClient).
///
/// # Examples
///
/// ```
/// use rest_json::client::ClientConfig;
///
/// let config = ClientConfig {
///     transient_pause_ms: 250,
///     ..Default::default()
/// };
/// assert_eq!(config.request_timeout_ms, 60_000);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Timeout applied to every request
    pub request_timeout_ms: u64,
    /// Pause before returning after a connectivity failure
    pub transient_pause_ms: u64,
    /// `Content-Type` for body-carrying requests that do not name one
    pub default_content_type: String,
    /// Proxy for the reqwest transport; empty for none
    pub proxy_url: String,
    /// Emit warnings for connectivity failures
    pub enable_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            request_timeout_ms: 60_000,
            transient_pause_ms: 1_000,
            default_content_type: "application/json".to_string(),
            proxy_url: String::new(),
            enable_logging: true,
        }
    }
}
