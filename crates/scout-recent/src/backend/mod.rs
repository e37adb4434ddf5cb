//! Key-value backend abstraction.
//!
//! [`ResumeStore`](crate::ResumeStore) only needs a narrow slice of a
//! Redis-like server: list edits, hash records, key expiry and a way to run
//! several of those as one atomic unit. The [`KvBackend`] trait captures that
//! slice so the store can run against Redis, an in-process map, or a backend
//! that is switched off.
//!
//! List indexes follow Redis conventions: 0-based, `stop` inclusive, negative
//! values count from the tail.

mod memory;
mod redis_backend;
mod unavailable;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

pub use self::memory::MemoryBackend;
pub use self::redis_backend::{DEFAULT_CONNECT_TIMEOUT, RedisBackend, RedisSettings};
pub use self::unavailable::UnavailableBackend;

/// A single mutating backend command, used in atomic batches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvOp {
    /// Remove every occurrence of `value` from the list at `key`.
    ListRemoveValue { key: String, value: String },
    /// Insert `value` at the head of the list at `key`.
    ListPushFront { key: String, value: String },
    /// Keep only list entries in `start..=stop`.
    ListTrim { key: String, start: isize, stop: isize },
    /// Set or refresh the expiry of `key`.
    KeyExpire { key: String, ttl: Duration },
    /// Delete `key` regardless of its type.
    KeyDelete { key: String },
    /// Upsert named fields on the hash at `key`.
    HashSetFields {
        key: String,
        fields: Vec<(String, String)>,
    },
}

impl KvOp {
    /// The key this command touches.
    pub fn key(&self) -> &str {
        match self {
            Self::ListRemoveValue { key, .. }
            | Self::ListPushFront { key, .. }
            | Self::ListTrim { key, .. }
            | Self::KeyExpire { key, .. }
            | Self::KeyDelete { key }
            | Self::HashSetFields { key, .. } => key,
        }
    }
}

/// Trait for key-value backends used by the resume store.
///
/// Implementations must be `Send + Sync`; one backend is shared by every
/// session in the process.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Remove all occurrences of `value` from a list. Returns the count removed.
    async fn list_remove_value(&self, key: &str, value: &str) -> Result<u64>;

    /// Insert `value` at the head of a list. Returns the new list length.
    async fn list_push_front(&self, key: &str, value: &str) -> Result<u64>;

    /// Keep only entries in `start..=stop`.
    async fn list_trim(&self, key: &str, start: isize, stop: isize) -> Result<()>;

    /// Set or refresh the expiry of a key. Returns `false` if the key is absent.
    async fn key_expire(&self, key: &str, ttl: Duration) -> Result<bool>;

    /// Run a batch of commands as one atomic unit.
    ///
    /// No other client may observe the state between two commands of the batch.
    async fn execute_atomically(&self, ops: Vec<KvOp>) -> Result<()>;

    /// Read list entries in `start..=stop`.
    async fn list_range(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>>;

    /// Delete a key. Returns the number of keys deleted (0 or 1).
    async fn key_delete(&self, key: &str) -> Result<u64>;

    /// Upsert named fields on a hash record.
    async fn hash_set_fields(&self, key: &str, fields: &[(String, String)]) -> Result<()>;

    /// Read every field of a hash record. Empty when the key is absent.
    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>>;
}
