//! The error type surfaced by every request and subscription.

use thiserror::Error;

use super::ErrorCategory;
use crate::traits::HttpError;

/// Maximum number of characters of an offending frame kept in a decode error.
const PREVIEW_CHARS: usize = 120;

/// Errors returned by the request executor, the stream decoder and the
/// subscription adapter.
///
/// None of these are retried internally. A caller that wants a resilient
/// stream re-subscribes after receiving one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The connection could not be established or broke mid-stream.
    #[error("connection to {url} failed: {message}")]
    Connection { url: String, message: String },

    /// A discrete request exceeded the configured timeout.
    #[error("request to {url} timed out: {message}")]
    Timeout { url: String, message: String },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus { url: String, status: u16, body: String },

    /// A response body or stream frame was not the expected JSON.
    #[error("could not decode {preview:?}: {message}")]
    Decode { preview: String, message: String },

    /// A URL could not be built from the configured base and path.
    #[error("invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

impl ApiError {
    /// Build a decode error, keeping a bounded preview of the input.
    pub fn decode(input: &[u8], message: impl std::fmt::Display) -> Self {
        let text = String::from_utf8_lossy(input);
        let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
        if text.chars().count() > PREVIEW_CHARS {
            preview.push('…');
        }
        ApiError::Decode {
            preview,
            message: message.to_string(),
        }
    }

    /// Convert a transport error raised while talking to `url`.
    pub fn from_http(url: &str, err: HttpError) -> Self {
        let url = url.to_string();
        match err {
            HttpError::ServerError { status, message } => ApiError::HttpStatus {
                url,
                status,
                body: message,
            },
            HttpError::Timeout(message) => ApiError::Timeout { url, message },
            HttpError::InvalidUrl(message) => ApiError::InvalidUrl { url, message },
            HttpError::ConnectionFailed(message)
            | HttpError::Io(message)
            | HttpError::Other(message) => ApiError::Connection { url, message },
            HttpError::Cancelled => ApiError::Connection {
                url,
                message: "request cancelled".to_string(),
            },
        }
    }

    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 401 and 403 responses.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    pub fn is_decode_error(&self) -> bool {
        matches!(self, ApiError::Decode { .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Connection { .. } | ApiError::Timeout { .. } => ErrorCategory::Network,
            ApiError::HttpStatus { status, .. } => match *status {
                401 | 403 => ErrorCategory::Auth,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Client,
            },
            ApiError::Decode { .. } => ErrorCategory::Protocol,
            ApiError::InvalidUrl { .. } => ErrorCategory::Client,
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Connection { .. } => "E_API_CONN",
            ApiError::Timeout { .. } => "E_API_TIMEOUT",
            ApiError::HttpStatus { .. } => "E_API_HTTP",
            ApiError::Decode { .. } => "E_API_DECODE",
            ApiError::InvalidUrl { .. } => "E_API_URL",
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Connection { .. } => {
                "Unable to reach Gitter. Please check your internet connection.".to_string()
            }
            ApiError::Timeout { .. } => "Gitter did not answer in time.".to_string(),
            ApiError::HttpStatus { status, .. } => match *status {
                401 => "Authentication required. Please provide a valid token.".to_string(),
                403 => "Access denied. Your token cannot access this resource.".to_string(),
                404 => "The requested room or message was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => "Gitter is experiencing issues. Please try again later.".to_string(),
                _ => format!("Gitter returned an error (HTTP {}).", status),
            },
            ApiError::Decode { .. } => "Received data that could not be understood.".to_string(),
            ApiError::InvalidUrl { url, .. } => format!("Could not build a request URL from '{}'.", url),
        }
    }
}
