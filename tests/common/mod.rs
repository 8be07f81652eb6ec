//! Common test utilities for integration tests.
//!
//! # Example
//!
//! ```ignore
//! let server = MockServer::start().await;
//! let client = client_for(&server, Some("abc"));
//! ```

#![allow(dead_code)]

pub mod mocks;

#[allow(unused_imports)]
pub use mocks::*;

use gitter_stream::{ClientConfig, GitterClient};
use std::time::Duration;
use wiremock::MockServer;

pub const ROOM_ID: &str = "53307860c3599d1de448e19d";

/// Configuration pointing both REST and streaming bases at a wiremock server.
///
/// REST calls land under `/v1/`, streaming calls under `/stream/v1/`.
pub fn config_for(server: &MockServer, token: Option<&str>) -> ClientConfig {
    let mut config = ClientConfig::new()
        .with_api_base_url(format!("{}/v1/", server.uri()))
        .with_stream_base_url(format!("{}/stream/v1/", server.uri()))
        .with_request_timeout(Some(Duration::from_secs(5)));
    if let Some(token) = token {
        config = config.with_token(token);
    }
    config
}

/// A reqwest-backed client talking to a wiremock server.
pub fn client_for(server: &MockServer, token: Option<&str>) -> GitterClient {
    GitterClient::new(config_for(server, token))
}

/// One NDJSON line for a minimal message.
pub fn message_line(id: &str, text: &str) -> String {
    format!("{{\"id\":\"{}\",\"text\":\"{}\"}}\n", id, text)
}
