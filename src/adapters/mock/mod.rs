//! Mock implementations for testing.
//!
//! Enables unit testing of the executor, decoder and subscriptions without
//! network access.

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
