//! Backend used when the key-value store is switched off.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::{KvBackend, KvOp};
use crate::error::{Result, StoreError};

/// Backend that fails every call with [`StoreError::Unavailable`].
///
/// Selected when no key-value store is configured, so callers see the same
/// "backend unavailable" condition they would see for a dead Redis and fall
/// back the same way.
#[derive(Debug, Clone)]
pub struct UnavailableBackend {
    reason: String,
}

impl UnavailableBackend {
    /// Create a backend that reports `reason` on every call.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn fail<T>(&self) -> Result<T> {
        Err(StoreError::unavailable(self.reason.clone()))
    }
}

impl Default for UnavailableBackend {
    fn default() -> Self {
        Self::new("key-value backend disabled")
    }
}

#[async_trait]
impl KvBackend for UnavailableBackend {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn list_remove_value(&self, _key: &str, _value: &str) -> Result<u64> {
        self.fail()
    }

    async fn list_push_front(&self, _key: &str, _value: &str) -> Result<u64> {
        self.fail()
    }

    async fn list_trim(&self, _key: &str, _start: isize, _stop: isize) -> Result<()> {
        self.fail()
    }

    async fn key_expire(&self, _key: &str, _ttl: Duration) -> Result<bool> {
        self.fail()
    }

    async fn execute_atomically(&self, _ops: Vec<KvOp>) -> Result<()> {
        self.fail()
    }

    async fn list_range(&self, _key: &str, _start: isize, _stop: isize) -> Result<Vec<String>> {
        self.fail()
    }

    async fn key_delete(&self, _key: &str) -> Result<u64> {
        self.fail()
    }

    async fn hash_set_fields(&self, _key: &str, _fields: &[(String, String)]) -> Result<()> {
        self.fail()
    }

    async fn hash_get_all(&self, _key: &str) -> Result<HashMap<String, String>> {
        self.fail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_call_is_unavailable() {
        let backend = UnavailableBackend::new("redis not configured");
        let err = backend.list_range("k", 0, -1).await.unwrap_err();
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("redis not configured"));
        assert!(backend.execute_atomically(Vec::new()).await.is_err());
        assert!(backend.hash_get_all("k").await.is_err());
    }
}
