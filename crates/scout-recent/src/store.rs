//! Two-layer recent resume store.
//!
//! Layer 1, the session recent list:
//! - key: `{prefix}:{session_id}:{list_name}`
//! - value: list of candidate ids, newest first, unique, at most `max_size`
//!
//! Layer 2, the candidate summary:
//! - key: `resume:summary:{candidate_id}`
//! - value: hash with exactly the fields `name` and `summary`

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::backend::{KvBackend, KvOp};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::types::{CandidateSummary, RecentResumeEntry};

/// Prefix of candidate summary keys.
const SUMMARY_KEY_PREFIX: &str = "resume:summary";

/// Recent resume store over a shared key-value backend.
///
/// The store keeps no state of its own between calls; all ordering and
/// atomicity guarantees come from the backend. Cloning is cheap and clones
/// share the backend.
#[derive(Clone)]
pub struct ResumeStore {
    backend: Arc<dyn KvBackend>,
    config: StoreConfig,
}

impl std::fmt::Debug for ResumeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResumeStore")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .finish()
    }
}

impl ResumeStore {
    /// Create a store, validating the configuration up front.
    pub fn new(backend: Arc<dyn KvBackend>, config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { backend, config })
    }

    /// Get the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Name of the backend in use.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Key of a session's recent list.
    pub fn recent_key(&self, session_id: &str) -> String {
        format!(
            "{}:{}:{}",
            self.config.key_prefix, session_id, self.config.list_name
        )
    }

    /// Key of a candidate's summary record.
    pub fn summary_key(candidate_id: &str) -> String {
        format!("{}:{}", SUMMARY_KEY_PREFIX, candidate_id)
    }

    /// Await a backend call, bounded by the configured timeout.
    async fn call<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match self.config.op_timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| StoreError::Timeout(limit))?,
            None => fut.await,
        }
    }

    fn trim_stop(&self) -> isize {
        last_index(self.config.max_size)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session recent list
    // ─────────────────────────────────────────────────────────────────────────

    /// Move `candidate_id` to the head of the session's recent list.
    ///
    /// Dedup, push, trim and TTL refresh run as one atomic backend batch, so
    /// readers never see a duplicate or an over-long list. Re-running with
    /// the same id yields the same final state.
    pub async fn add(&self, session_id: &str, candidate_id: &str) -> Result<()> {
        let key = self.recent_key(session_id);
        let mut ops = vec![
            KvOp::ListRemoveValue {
                key: key.clone(),
                value: candidate_id.to_string(),
            },
            KvOp::ListPushFront {
                key: key.clone(),
                value: candidate_id.to_string(),
            },
            KvOp::ListTrim {
                key: key.clone(),
                start: 0,
                stop: self.trim_stop(),
            },
        ];
        if let Some(ttl) = self.config.ttl {
            ops.push(KvOp::KeyExpire {
                key: key.clone(),
                ttl,
            });
        }

        self.call(self.backend.execute_atomically(ops)).await?;
        debug!(session_id = %session_id, candidate_id = %candidate_id, "Recent resume added");
        Ok(())
    }

    /// Get up to `limit` candidate ids, newest first.
    ///
    /// `None` and `Some(0)` both mean `max_size`. A session with no entries
    /// yields an empty vector.
    pub async fn get(&self, session_id: &str, limit: Option<usize>) -> Result<Vec<String>> {
        let limit = match limit {
            Some(n) if n > 0 => n,
            _ => self.config.max_size,
        };
        let key = self.recent_key(session_id);
        let ids = self
            .call(self.backend.list_range(&key, 0, last_index(limit)))
            .await?;
        trace!(session_id = %session_id, count = ids.len(), "Recent resumes read");
        Ok(ids)
    }

    /// Remove `candidate_id` from the session's recent list.
    ///
    /// Returns the number of entries removed (0 or 1).
    pub async fn remove(&self, session_id: &str, candidate_id: &str) -> Result<u64> {
        let key = self.recent_key(session_id);
        let removed = self
            .call(self.backend.list_remove_value(&key, candidate_id))
            .await?;
        debug!(session_id = %session_id, candidate_id = %candidate_id, removed, "Recent resume removed");
        Ok(removed)
    }

    /// Delete the session's recent list. Returns 1 if it existed, 0 otherwise.
    pub async fn clear(&self, session_id: &str) -> Result<u64> {
        let key = self.recent_key(session_id);
        let deleted = self.call(self.backend.key_delete(&key)).await?;
        debug!(session_id = %session_id, deleted, "Recent resumes cleared");
        Ok(deleted)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Candidate summaries
    // ─────────────────────────────────────────────────────────────────────────

    /// Overwrite a candidate's summary record with exactly `{name, summary}`.
    ///
    /// Any previous record is replaced wholesale, including fields a
    /// differently-shaped writer may have left behind.
    pub async fn set_summary(&self, candidate_id: &str, name: &str, summary: &str) -> Result<()> {
        let key = Self::summary_key(candidate_id);
        let record = CandidateSummary::new(name, summary);
        let mut ops = vec![
            KvOp::KeyDelete { key: key.clone() },
            KvOp::HashSetFields {
                key: key.clone(),
                fields: record.to_fields(),
            },
        ];
        if let Some(ttl) = self.config.ttl {
            ops.push(KvOp::KeyExpire {
                key: key.clone(),
                ttl,
            });
        }

        self.call(self.backend.execute_atomically(ops)).await?;
        debug!(candidate_id = %candidate_id, "Resume summary written");
        Ok(())
    }

    /// Get a candidate's summary. `None` when no record exists.
    pub async fn get_summary(&self, candidate_id: &str) -> Result<Option<CandidateSummary>> {
        let key = Self::summary_key(candidate_id);
        let fields = self.call(self.backend.hash_get_all(&key)).await?;
        Ok(CandidateSummary::from_fields(fields))
    }

    /// Delete a candidate's summary. Returns the number of records removed.
    pub async fn delete_summary(&self, candidate_id: &str) -> Result<u64> {
        let key = Self::summary_key(candidate_id);
        self.call(self.backend.key_delete(&key)).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Composite operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Write the summary, then move the id to the head of the recent list.
    ///
    /// The summary write completes before the list update is issued, so a
    /// reader that sees the id can resolve its summary. A failure between the
    /// two steps leaves an orphan summary, never a list entry without one.
    pub async fn add_with_summary(
        &self,
        session_id: &str,
        candidate_id: &str,
        name: &str,
        summary: &str,
    ) -> Result<()> {
        self.set_summary(candidate_id, name, summary).await?;
        self.add(session_id, candidate_id).await
    }

    /// Recent entries with their summaries, newest first.
    ///
    /// Ids whose summary is missing or expired are kept with empty
    /// `name`/`summary`.
    pub async fn get_recent_summaries(
        &self,
        session_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<RecentResumeEntry>> {
        let candidate_ids = self.get(session_id, limit).await?;
        let mut entries = Vec::with_capacity(candidate_ids.len());
        for candidate_id in candidate_ids {
            let summary = self.get_summary(&candidate_id).await?;
            entries.push(RecentResumeEntry::join(candidate_id, summary));
        }
        Ok(entries)
    }
}

/// Inclusive stop index covering `count` list entries. Saturates for counts
/// beyond what a list index can express.
fn last_index(count: usize) -> isize {
    isize::try_from(count).unwrap_or(isize::MAX).saturating_sub(1)
}
