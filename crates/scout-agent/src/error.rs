//! Error types for the agent crate.

use thiserror::Error;

/// Result type alias using the agent error type.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Error type for agent operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Recent resume store error.
    #[error("Store error: {0}")]
    Store(#[from] scout_recent::StoreError),

    /// Resume service error.
    #[error("Resume service error: {0}")]
    Client(#[from] scout_client::Error),

    /// Tool execution error.
    #[error("Tool error: {0}")]
    Tool(String),

    /// Tool not found in registry.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Context building error.
    #[error("Context error: {0}")]
    Context(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AgentError {
    /// Create a tool error.
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::Tool(msg.into())
    }

    /// Create a context error.
    pub fn context(msg: impl Into<String>) -> Self {
        Self::Context(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AgentError::context("recent resumes unreadable");
        assert!(err.to_string().contains("Context error"));
        assert!(err.to_string().contains("recent resumes unreadable"));
    }

    #[test]
    fn test_store_error_converts() {
        let err: AgentError = scout_recent::StoreError::unavailable("down").into();
        assert!(matches!(err, AgentError::Store(_)));
        assert!(err.to_string().contains("down"));
    }

    #[test]
    fn test_tool_not_found() {
        let err = AgentError::ToolNotFound("unknown_tool".to_string());
        assert!(err.to_string().contains("Tool not found"));
    }
}
