//! Configuration for the recent resume store.

use std::time::Duration;

use crate::error::{Result, StoreError};

/// Default number of candidate ids kept per session.
pub const DEFAULT_MAX_SIZE: usize = 50;

/// Default TTL for session lists and summary records (7 days).
pub const DEFAULT_TTL: Option<Duration> = Some(Duration::from_secs(7 * 24 * 3600));

/// Default timeout applied to every backend call.
pub const DEFAULT_OP_TIMEOUT: Option<Duration> = Some(Duration::from_secs(5));

/// Default key prefix for session lists.
pub const DEFAULT_KEY_PREFIX: &str = "session";

/// Default list name for session lists.
pub const DEFAULT_LIST_NAME: &str = "recent_resumes";

/// Configuration for [`ResumeStore`](crate::ResumeStore).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Prefix of the session list key (`{prefix}:{session_id}:{list_name}`).
    pub key_prefix: String,

    /// Suffix of the session list key.
    pub list_name: String,

    /// Maximum number of candidate ids kept per session.
    pub max_size: usize,

    /// TTL refreshed on every write. `None` disables expiry.
    pub ttl: Option<Duration>,

    /// Timeout applied to each backend call. `None` waits indefinitely.
    pub op_timeout: Option<Duration>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            list_name: DEFAULT_LIST_NAME.to_string(),
            max_size: DEFAULT_MAX_SIZE,
            ttl: DEFAULT_TTL,
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session list key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the session list name.
    pub fn with_list_name(mut self, name: impl Into<String>) -> Self {
        self.list_name = name.into();
        self
    }

    /// Set the maximum list size.
    pub fn with_max_size(mut self, max: usize) -> Self {
        self.max_size = max;
        self
    }

    /// Set the TTL for written keys.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Disable TTL (keys never expire).
    pub fn without_ttl(mut self) -> Self {
        self.ttl = None;
        self
    }

    /// Set the per-call backend timeout.
    pub fn with_op_timeout(mut self, timeout: Duration) -> Self {
        self.op_timeout = Some(timeout);
        self
    }

    /// Disable the per-call backend timeout.
    pub fn without_op_timeout(mut self) -> Self {
        self.op_timeout = None;
        self
    }

    /// Check the configuration, failing on values the store cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(StoreError::invalid_config("max_size must be greater than 0"));
        }
        if self.key_prefix.trim().is_empty() {
            return Err(StoreError::invalid_config("key_prefix cannot be empty"));
        }
        if self.list_name.trim().is_empty() {
            return Err(StoreError::invalid_config("list_name cannot be empty"));
        }
        if self.ttl.is_some_and(|ttl| ttl.is_zero()) {
            return Err(StoreError::invalid_config(
                "ttl must be positive; use without_ttl() to disable expiry",
            ));
        }
        if self.op_timeout.is_some_and(|t| t.is_zero()) {
            return Err(StoreError::invalid_config("op_timeout must be positive"));
        }
        Ok(())
    }
}
