//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that can return predefined
//! responses, chunked bodies or errors, and that keeps count of the streaming
//! connections it opened and saw closed.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Method, RequestBody, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    /// Request body (for POST and PUT requests)
    pub body: Option<RequestBody>,
    /// True for `get_stream` calls
    pub streaming: bool,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a buffered response with any status
    Success(Response),
    /// Fail the request before any response
    Error(HttpError),
    /// Stream these chunks, then end cleanly
    Stream(Vec<Bytes>),
    /// Stream these chunks, then stay open without sending anything else
    OpenStream(Vec<Bytes>),
    /// Stream these chunks, then fail mid-body
    BrokenStream(Vec<Bytes>, HttpError),
    /// Fail to open the stream
    StreamError(HttpError),
}

/// Mock HTTP client for testing.
///
/// URLs are matched exactly first, then by prefix, then fall back to the
/// default response. Clones share configuration, recorded requests and the
/// connection counters.
///
/// # Example
///
/// ```ignore
/// use gitter_stream::adapters::mock::{MockHttpClient, MockResponse};
/// use bytes::Bytes;
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "https://stream.gitter.im/v1/rooms/abc/chatMessages",
///     MockResponse::Stream(vec![Bytes::from("{\"id\":\"1\",\"text\":\"hi\"}\n")]),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    opened_streams: Arc<AtomicUsize>,
    closed_streams: Arc<AtomicUsize>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
            opened_streams: Arc::new(AtomicUsize::new(0)),
            closed_streams: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set a response for a specific URL.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Number of streaming connections handed out so far.
    pub fn opened_streams(&self) -> usize {
        self.opened_streams.load(Ordering::SeqCst)
    }

    /// Number of streaming connections that have been dropped.
    pub fn closed_streams(&self) -> usize {
        self.closed_streams.load(Ordering::SeqCst)
    }

    /// Streaming connections currently open.
    pub fn active_streams(&self) -> usize {
        self.opened_streams() - self.closed_streams()
    }

    fn record_request(
        &self,
        method: Method,
        url: &str,
        headers: &Headers,
        body: Option<RequestBody>,
        streaming: bool,
    ) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method,
            url: url.to_string(),
            headers: headers.clone(),
            body,
            streaming,
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }

        let default = self.default_response.lock().unwrap();
        default.clone()
    }

    fn buffered(&self, url: &str) -> Result<Response, HttpError> {
        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) | Some(MockResponse::StreamError(err)) => Err(err),
            Some(_) => Err(HttpError::Other(
                "Stream response on non-stream request".to_string(),
            )),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }

    fn track(&self, inner: ByteStream) -> ByteStream {
        self.opened_streams.fetch_add(1, Ordering::SeqCst);
        Box::pin(TrackedStream {
            inner,
            closed: self.closed_streams.clone(),
        })
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte stream that counts itself closed when dropped.
struct TrackedStream {
    inner: ByteStream,
    closed: Arc<AtomicUsize>,
}

impl Stream for TrackedStream {
    type Item = Result<Bytes, HttpError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

fn chunks(chunks: Vec<Bytes>) -> impl Stream<Item = Result<Bytes, HttpError>> + Send {
    futures::stream::iter(chunks.into_iter().map(Ok))
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request(Method::Get, url, headers, None, false);
        self.buffered(url)
    }

    async fn post(
        &self,
        url: &str,
        body: &RequestBody,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        self.record_request(Method::Post, url, headers, Some(body.clone()), false);
        self.buffered(url)
    }

    async fn put(
        &self,
        url: &str,
        body: &RequestBody,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        self.record_request(Method::Put, url, headers, Some(body.clone()), false);
        self.buffered(url)
    }

    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<ByteStream, HttpError> {
        use futures::StreamExt;

        self.record_request(Method::Get, url, headers, None, true);

        match self.get_response(url) {
            Some(MockResponse::Stream(body)) => Ok(self.track(Box::pin(chunks(body)))),
            Some(MockResponse::OpenStream(body)) => {
                let stream = chunks(body).chain(futures::stream::pending());
                Ok(self.track(Box::pin(stream)))
            }
            Some(MockResponse::BrokenStream(body, err)) => {
                let stream = chunks(body).chain(futures::stream::once(async move { Err(err) }));
                Ok(self.track(Box::pin(stream)))
            }
            Some(MockResponse::StreamError(err)) | Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Success(response)) if !response.is_success() => {
                Err(HttpError::ServerError {
                    status: response.status,
                    message: response.text_lossy(),
                })
            }
            Some(MockResponse::Success(_)) => Err(HttpError::Other(
                "Non-stream response on stream request".to_string(),
            )),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_get_with_response() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/test",
            MockResponse::Success(Response::new(200, Bytes::from("Hello"))),
        );

        let response = client
            .get("https://example.com/test", &Headers::new())
            .await
            .unwrap();
        assert_eq!(response.body, Bytes::from("Hello"));

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Get);
        assert!(!requests[0].streaming);
    }

    #[tokio::test]
    async fn test_put_records_body() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::Success(Response::new(200, Bytes::from("{}"))));

        let body = RequestBody::form([("text", "edited")]);
        client
            .put("https://example.com/msg", &body, &Headers::new())
            .await
            .unwrap();

        let requests = client.get_requests();
        assert_eq!(requests[0].method, Method::Put);
        assert_eq!(requests[0].body, Some(body));
    }

    #[tokio::test]
    async fn test_no_response_configured() {
        let client = MockHttpClient::new();
        let result = client.get("https://example.com/missing", &Headers::new()).await;
        assert!(matches!(result, Err(HttpError::Other(_))));
    }

    #[tokio::test]
    async fn test_prefix_match() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/api",
            MockResponse::Success(Response::new(200, Bytes::from("API response"))),
        );

        let response = client
            .get("https://example.com/api/v1/users", &Headers::new())
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_stream_counts_open_and_close() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/stream",
            MockResponse::Stream(vec![Bytes::from("a"), Bytes::from("b")]),
        );

        let mut stream = client
            .get_stream("https://example.com/stream", &Headers::new())
            .await
            .unwrap();
        assert_eq!(client.opened_streams(), 1);
        assert_eq!(client.active_streams(), 1);

        let mut chunks = Vec::new();
        while let Some(chunk) = stream.next().await {
            chunks.push(chunk.unwrap());
        }
        assert_eq!(chunks, vec![Bytes::from("a"), Bytes::from("b")]);

        drop(stream);
        assert_eq!(client.closed_streams(), 1);
        assert_eq!(client.active_streams(), 0);
        assert!(client.get_requests()[0].streaming);
    }

    #[tokio::test]
    async fn test_broken_stream_yields_error_after_chunks() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::BrokenStream(
            vec![Bytes::from("a")],
            HttpError::Io("reset".to_string()),
        ));

        let mut stream = client.get_stream("https://x", &Headers::new()).await.unwrap();
        assert!(stream.next().await.unwrap().is_ok());
        assert_eq!(
            stream.next().await.unwrap(),
            Err(HttpError::Io("reset".to_string()))
        );
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_on_error_status() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::Success(Response::new(
            401,
            Bytes::from("Unauthorized"),
        )));

        let result = client.get_stream("https://x", &Headers::new()).await;
        assert!(matches!(
            result,
            Err(HttpError::ServerError { status: 401, .. })
        ));
        assert_eq!(client.opened_streams(), 0);
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::Stream(vec![]));
        let cloned = client.clone();

        let stream = cloned.get_stream("https://x", &Headers::new()).await.unwrap();
        drop(stream);

        assert_eq!(client.get_requests().len(), 1);
        assert_eq!(client.closed_streams(), 1);
    }
}
