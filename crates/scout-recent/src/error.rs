//! Error types for recent resume cache operations.

use std::time::Duration;

/// Error type for recent resume cache operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key-value backend could not be reached.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// A backend call did not complete within the configured timeout.
    #[error("Backend call timed out after {0:?}")]
    Timeout(Duration),

    /// The store was constructed with an invalid configuration.
    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),

    /// The backend rejected a command (wrong key type, protocol error, ...).
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Whether the backend is unreachable or too slow to answer.
    ///
    /// Prompt assembly treats these as "no recent resume context" instead of
    /// failing the whole prompt.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }

    /// Whether this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Result type for recent resume cache operations.
pub type Result<T> = std::result::Result<T, StoreError>;
