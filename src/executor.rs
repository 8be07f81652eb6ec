//! Typed request execution.
//!
//! [`RequestExecutor`] pairs an [`HttpClient`] with a shared [`ClientConfig`]
//! and is the single place where authentication headers are attached, status
//! codes are checked and JSON bodies are decoded. The REST facade and the
//! streaming endpoint both go through it.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::traits::{ByteStream, Headers, HttpClient, Method, RequestBody, Response};

pub const ACCEPT_JSON: &str = "application/json";

/// Executes requests against the API with the configured credentials.
///
/// Cloning is cheap: the HTTP client and configuration are shared. A clone
/// keeps the configuration it was made with even if the original is later
/// changed through [`config_mut`](Self::config_mut).
#[derive(Clone)]
pub struct RequestExecutor {
    http: Arc<dyn HttpClient>,
    config: Arc<ClientConfig>,
}

impl RequestExecutor {
    /// Create an executor backed by reqwest.
    pub fn new(config: ClientConfig) -> Self {
        let http = ReqwestHttpClient::new().with_timeout(config.request_timeout);
        Self::with_http_client(config, Arc::new(http))
    }

    /// Create an executor over any [`HttpClient`] implementation.
    pub fn with_http_client(config: ClientConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Mutable access to this executor's configuration. Clones made earlier
    /// are unaffected.
    pub fn config_mut(&mut self) -> &mut ClientConfig {
        Arc::make_mut(&mut self.config)
    }

    /// Headers attached to every request, streaming or not.
    pub fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), ACCEPT_JSON.to_string());
        if let Some(token) = self.config.bearer_token() {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }

    /// Issue a request and decode a successful JSON body into `T`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&RequestBody>,
    ) -> ApiResult<T> {
        let response = self.send(method, url, body).await?;
        response
            .json()
            .map_err(|e| ApiError::decode(&response.body, e))
    }

    /// Issue a request whose response body is not needed.
    pub async fn execute_unit(
        &self,
        method: Method,
        url: &str,
        body: Option<&RequestBody>,
    ) -> ApiResult<()> {
        self.send(method, url, body).await.map(|_| ())
    }

    /// Open the streaming endpoint at `url`.
    ///
    /// Every call opens a fresh connection; dropping the returned stream
    /// closes it.
    pub async fn open_stream(&self, url: &str) -> ApiResult<ByteStream> {
        debug!(%url, "opening stream");
        self.http
            .get_stream(url, &self.headers())
            .await
            .map_err(|e| ApiError::from_http(url, e))
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&RequestBody>,
    ) -> ApiResult<Response> {
        let headers = self.headers();
        debug!(%method, %url, "sending request");

        let result = match (method, body) {
            (Method::Get, None) => self.http.get(url, &headers).await,
            (Method::Get, Some(_)) => {
                warn!(%url, "refusing GET request with a body");
                return Err(ApiError::InvalidUrl {
                    url: url.to_string(),
                    message: "GET requests cannot carry a body".to_string(),
                });
            }
            (Method::Post, Some(body)) => self.http.post(url, body, &headers).await,
            (Method::Put, Some(body)) => self.http.put(url, body, &headers).await,
            (Method::Post, None) => self.http.post(url, &RequestBody::Form(Vec::new()), &headers).await,
            (Method::Put, None) => self.http.put(url, &RequestBody::Form(Vec::new()), &headers).await,
        };
        let response = result.map_err(|e| ApiError::from_http(url, e))?;

        if !response.is_success() {
            warn!(%method, %url, status = response.status, "request failed");
            return Err(ApiError::HttpStatus {
                url: url.to_string(),
                status: response.status,
                body: response.text_lossy(),
            });
        }

        Ok(response)
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("api_base_url", &self.config.api_base_url)
            .field("stream_base_url", &self.config.stream_base_url)
            .field("authenticated", &self.config.bearer_token().is_some())
            .finish()
    }
}
