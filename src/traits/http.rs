//! HTTP client trait abstraction.
//!
//! Provides a trait-based abstraction for HTTP operations, enabling
//! dependency injection and mocking in tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Body of a streaming response, delivered in arbitrarily sized chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body sent with POST and PUT calls.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` key/value pairs
    Form(Vec<(String, String)>),
    /// Raw JSON document
    Json(serde_json::Value),
}

impl RequestBody {
    /// Build a form body from key/value pairs.
    pub fn form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        RequestBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            RequestBody::Form(_) => "application/x-www-form-urlencoded",
            RequestBody::Json(_) => "application/json",
        }
    }

    /// Value of a form field, if this is a form body.
    pub fn form_value(&self, key: &str) -> Option<&str> {
        match self {
            RequestBody::Form(pairs) => pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            RequestBody::Json(_) => None,
        }
    }
}

/// HTTP response wrapper.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, body: Bytes) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// Create a new response with headers.
    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text, replacing invalid UTF-8.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// HTTP client errors.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// Connection failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// Server returned an error status
    ServerError { status: u16, message: String },
    /// Request was cancelled
    Cancelled,
    /// IO error while reading the body
    Io(String),
    /// Invalid URL
    InvalidUrl(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::ServerError { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            HttpError::Cancelled => write!(f, "Request cancelled"),
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for HTTP client operations.
///
/// Discrete calls return the response whatever its status; the caller decides
/// what a failure status means. `get_stream` is different: it only hands back a
/// body once the server has answered 2xx, and reports any other status as
/// [`HttpError::ServerError`].
///
/// Implementations must not pool or share the streaming connection: each
/// `get_stream` call opens its own, and dropping the returned stream closes it.
///
/// # Example
///
/// ```ignore
/// use gitter_stream::traits::{HttpClient, Headers, HttpError};
///
/// async fn fetch_rooms<C: HttpClient>(client: &C) -> Result<String, HttpError> {
///     let response = client.get("https://api.gitter.im/v1/rooms", &Headers::new()).await?;
///     Ok(response.text_lossy())
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request.
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// Perform a POST request with the given body.
    async fn post(
        &self,
        url: &str,
        body: &RequestBody,
        headers: &Headers,
    ) -> Result<Response, HttpError>;

    /// Perform a PUT request with the given body.
    async fn put(
        &self,
        url: &str,
        body: &RequestBody,
        headers: &Headers,
    ) -> Result<Response, HttpError>;

    /// Perform a GET request and return the body as it arrives.
    ///
    /// Used for the long-lived streaming endpoint, so no timeout applies.
    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<ByteStream, HttpError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_is_success() {
        assert!(Response::new(200, Bytes::new()).is_success());
        assert!(Response::new(204, Bytes::new()).is_success());
        assert!(!Response::new(301, Bytes::new()).is_success());
        assert!(!Response::new(401, Bytes::new()).is_success());
        assert!(!Response::new(500, Bytes::new()).is_success());
    }

    #[test]
    fn test_response_json() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct Room {
            id: String,
        }

        let response = Response::new(200, Bytes::from(r#"{"id":"abc"}"#));
        let room: Room = response.json().unwrap();
        assert_eq!(
            room,
            Room {
                id: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_response_text_lossy() {
        let response = Response::new(500, Bytes::from_static(b"oops \xff"));
        assert!(response.text_lossy().starts_with("oops "));
    }

    #[test]
    fn test_form_body() {
        let body = RequestBody::form([("text", "hello")]);
        assert_eq!(body.form_value("text"), Some("hello"));
        assert_eq!(body.form_value("uri"), None);
        assert_eq!(body.content_type(), "application/x-www-form-urlencoded");
    }

    #[test]
    fn test_json_body() {
        let body = RequestBody::Json(serde_json::json!({ "chat": ["1"] }));
        assert_eq!(body.form_value("chat"), None);
        assert_eq!(body.content_type(), "application/json");
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
        assert_eq!(Method::Put.to_string(), "PUT");
    }

    #[test]
    fn test_http_error_display() {
        assert_eq!(
            HttpError::ConnectionFailed("refused".to_string()).to_string(),
            "Connection failed: refused"
        );
        assert_eq!(
            HttpError::ServerError {
                status: 403,
                message: "Forbidden".to_string()
            }
            .to_string(),
            "Server error (403): Forbidden"
        );
        assert_eq!(HttpError::Cancelled.to_string(), "Request cancelled");
    }
}
