//! Client configuration.
//!
//! [`ClientConfig`] is shared by the REST facade and the streaming endpoint so
//! both build URLs and authentication headers the same way.

use std::time::Duration;

/// Versioned base for conventional request/response endpoints.
pub const DEFAULT_API_BASE_URL: &str = "https://api.gitter.im/v1/";

/// Versioned base for the streaming endpoint.
pub const DEFAULT_STREAM_BASE_URL: &str = "https://stream.gitter.im/v1/";

/// Default timeout for discrete requests. Streams never time out.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of decoded events buffered between a reader task and its consumer.
pub const DEFAULT_EVENT_BUFFER: usize = 64;

pub const TOKEN_ENV: &str = "GITTER_TOKEN";
pub const API_URL_ENV: &str = "GITTER_API_URL";
pub const STREAM_URL_ENV: &str = "GITTER_STREAM_URL";

/// What a subscription does with a non-blank frame that is not valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedFramePolicy {
    /// Deliver the decode error and end the subscription.
    #[default]
    Abort,
    /// Log the frame and carry on with the next one.
    Skip,
}

/// Configuration for a [`GitterClient`](crate::api::GitterClient).
///
/// # Example
///
/// ```ignore
/// use gitter_stream::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_token("abc")
///     .with_event_buffer(16);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL for REST calls, always ending in `/`
    pub api_base_url: String,
    /// Base URL for the streaming endpoint, always ending in `/`
    pub stream_base_url: String,
    /// Bearer token; `None` or blank sends requests unauthenticated
    pub token: Option<String>,
    /// Timeout for discrete calls (default: 30s)
    pub request_timeout: Option<Duration>,
    /// Channel capacity between a subscription's reader task and its consumer (default: 64)
    pub event_buffer: usize,
    /// Handling of malformed stream frames (default: abort)
    pub malformed_frames: MalformedFramePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            stream_base_url: DEFAULT_STREAM_BASE_URL.to_string(),
            token: None,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            event_buffer: DEFAULT_EVENT_BUFFER,
            malformed_frames: MalformedFramePolicy::Abort,
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from `GITTER_TOKEN`, `GITTER_API_URL` and
    /// `GITTER_STREAM_URL`. Unset or empty variables keep their defaults.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(token) = var(TOKEN_ENV) {
            config = config.with_token(token);
        }
        if let Some(url) = var(API_URL_ENV) {
            config = config.with_api_base_url(url);
        }
        if let Some(url) = var(STREAM_URL_ENV) {
            config = config.with_stream_base_url(url);
        }
        config
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = normalize_base(url.into());
        self
    }

    pub fn with_stream_base_url(mut self, url: impl Into<String>) -> Self {
        self.stream_base_url = normalize_base(url.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the event channel capacity. Zero is raised to one.
    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity.max(1);
        self
    }

    pub fn with_malformed_frames(mut self, policy: MalformedFramePolicy) -> Self {
        self.malformed_frames = policy;
        self
    }

    /// The token to send, if any. Blank tokens count as absent.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

fn normalize_base(mut url: String) -> String {
    let trimmed_len = url.trim_end().len();
    url.truncate(trimmed_len);
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.stream_base_url, DEFAULT_STREAM_BASE_URL);
        assert_eq!(config.token, None);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.event_buffer, 64);
        assert_eq!(config.malformed_frames, MalformedFramePolicy::Abort);
    }

    #[test]
    fn test_base_urls_get_trailing_slash() {
        let config = ClientConfig::new()
            .with_api_base_url("http://localhost:8080/v1")
            .with_stream_base_url("http://localhost:8081/v1/");
        assert_eq!(config.api_base_url, "http://localhost:8080/v1/");
        assert_eq!(config.stream_base_url, "http://localhost:8081/v1/");
    }

    #[test]
    fn test_blank_token_is_absent() {
        assert_eq!(ClientConfig::new().with_token("   ").bearer_token(), None);
        assert_eq!(ClientConfig::new().with_token("").bearer_token(), None);
        assert_eq!(ClientConfig::new().with_token("abc").bearer_token(), Some("abc"));
    }

    #[test]
    fn test_event_buffer_never_zero() {
        assert_eq!(ClientConfig::new().with_event_buffer(0).event_buffer, 1);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var(TOKEN_ENV, "env-token");
        std::env::set_var(API_URL_ENV, "http://api.local/v1");
        std::env::remove_var(STREAM_URL_ENV);

        let config = ClientConfig::from_env();
        assert_eq!(config.bearer_token(), Some("env-token"));
        assert_eq!(config.api_base_url, "http://api.local/v1/");
        assert_eq!(config.stream_base_url, DEFAULT_STREAM_BASE_URL);

        std::env::remove_var(TOKEN_ENV);
        std::env::remove_var(API_URL_ENV);
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_empty_values() {
        std::env::set_var(TOKEN_ENV, "");
        let config = ClientConfig::from_env();
        assert_eq!(config.token, None);
        std::env::remove_var(TOKEN_ENV);
    }
}
