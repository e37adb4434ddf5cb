//! Client error types.

use std::time::Duration;

use thiserror::Error;

/// Maximum number of response body characters kept in [`Error::Api`].
pub const ERROR_BODY_MAX_CHARS: usize = 200;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The request did not complete within the client timeout.
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The service could not be reached.
    #[error("cannot connect to resume service at {base_url}")]
    Connect {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Resource not found (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Server returned a non-success response.
    #[error("HTTP {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// Any other HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build an [`Error::Api`], clipping the body.
    pub fn api(status: u16, body: &str) -> Self {
        Error::Api {
            status,
            body: body.chars().take(ERROR_BODY_MAX_CHARS).collect(),
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_)) || matches!(self, Error::Api { status: 404, .. })
    }

    /// Check if this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }

    /// Check if the service could not be reached.
    pub fn is_connect(&self) -> bool {
        matches!(self, Error::Connect { .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
