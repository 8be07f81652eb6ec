//! Mock implementations for test fixtures.
//!
//! Re-exports the mock HTTP client from `gitter_stream::adapters::mock` and
//! adds a builder for common response setups.

#![allow(dead_code)]

pub use gitter_stream::adapters::mock::{MockHttpClient, MockResponse};
pub use gitter_stream::traits::{HttpError, Response};

use bytes::Bytes;
use gitter_stream::{ClientConfig, GitterClient};
use std::sync::Arc;

/// Configuration for setting up mock HTTP responses.
pub struct MockHttpConfig {
    client: MockHttpClient,
}

impl MockHttpConfig {
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Configures a buffered JSON response.
    pub fn with_json_response(self, url: &str, status: u16, json: &str) -> Self {
        self.client.set_response(
            url,
            MockResponse::Success(Response::new(status, Bytes::from(json.to_string()))),
        );
        self
    }

    /// Configures a stream that delivers `chunks` and then ends.
    pub fn with_stream(self, url: &str, chunks: &[&str]) -> Self {
        self.client.set_response(
            url,
            MockResponse::Stream(chunks.iter().map(|c| Bytes::from(c.to_string())).collect()),
        );
        self
    }

    /// Configures a stream that delivers `chunks` and then stays open.
    pub fn with_open_stream(self, url: &str, chunks: &[&str]) -> Self {
        self.client.set_response(
            url,
            MockResponse::OpenStream(chunks.iter().map(|c| Bytes::from(c.to_string())).collect()),
        );
        self
    }

    /// Configures a transport failure.
    pub fn with_error(self, url: &str, error: HttpError) -> Self {
        self.client.set_response(url, MockResponse::Error(error));
        self
    }

    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockHttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub const MOCK_API: &str = "https://api.test/v1/";
pub const MOCK_STREAM: &str = "https://stream.test/v1/";

/// A client over `mock` with fixed test base URLs and token `abc`.
pub fn client_with_mock(mock: &MockHttpClient) -> GitterClient {
    let config = ClientConfig::new()
        .with_api_base_url(MOCK_API)
        .with_stream_base_url(MOCK_STREAM)
        .with_token("abc");
    GitterClient::with_http_client(config, Arc::new(mock.clone()))
}
