//! Trait abstractions for dependency injection and testability.
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, PUT, streaming GET)

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Method, RequestBody, Response};
