//! Error types for the Notion client.

use std::time::Duration;

/// Error from Notion API operations.
#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// Notion returned a structured error object.
    #[error("Notion API error: {status} {code} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Notion error code (e.g. `object_not_found`).
        code: String,
        /// Human readable message.
        message: String,
    },

    /// HTTP response error with a body that is not a Notion error object.
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// HTTP 429.
    #[error("rate limited by Notion API")]
    RateLimited {
        /// Delay requested by the `Retry-After` header.
        retry_after: Option<Duration>,
    },
}

impl NotionError {
    /// HTTP status of the failed response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::HttpResponse { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::HttpRequest(_) => None,
        }
    }

    /// Whether repeating the request may succeed.
    ///
    /// Transport failures, rate limiting and server errors are transient;
    /// other client errors (bad token, missing block) are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpRequest(_) | Self::RateLimited { .. } => true,
            Self::Api { status, .. } | Self::HttpResponse { status, .. } => *status >= 500,
        }
    }
}
