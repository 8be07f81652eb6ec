//! Error category classification.
//!
//! Groups [`ApiError`](super::ApiError) variants so callers layering their own
//! reconnect logic on top of a subscription can decide what to do next.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, TLS or timeout failures.
    /// Generally transient and worth re-subscribing after.
    Network,

    /// HTTP 401/403. The token is missing or rejected.
    Auth,

    /// Backend errors (HTTP 5xx).
    Server,

    /// Request the server refused for other reasons (4xx), or a URL that
    /// could not be built.
    Client,

    /// A response or frame that did not match the expected JSON shape.
    Protocol,
}

impl ErrorCategory {
    /// Returns true if a fresh attempt has a reasonable chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::Protocol => "protocol",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and subscribe again",
            ErrorCategory::Auth => "Check that GITTER_TOKEN holds a valid personal access token",
            ErrorCategory::Server => "Gitter may be experiencing issues. Please try again later",
            ErrorCategory::Client => "Check the room or message id and try again",
            ErrorCategory::Protocol => "The server sent data this client does not understand",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
