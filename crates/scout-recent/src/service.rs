//! Thin facade used by prompt assembly and tools.

use std::sync::Arc;

use crate::error::Result;
use crate::store::ResumeStore;
use crate::types::RecentResumeEntry;

/// Default number of entries returned for prompt context.
pub const DEFAULT_CONTEXT_LIMIT: usize = 10;

/// Read/record recently viewed resumes on behalf of a conversation.
#[derive(Debug, Clone)]
pub struct ResumeContextService {
    store: Arc<ResumeStore>,
}

impl ResumeContextService {
    pub fn new(store: Arc<ResumeStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &ResumeStore {
        &self.store
    }

    /// Recent entries with summaries; `None` means [`DEFAULT_CONTEXT_LIMIT`].
    pub async fn get_recent_resume_summaries(
        &self,
        session_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<RecentResumeEntry>> {
        let limit = limit.unwrap_or(DEFAULT_CONTEXT_LIMIT);
        self.store.get_recent_summaries(session_id, Some(limit)).await
    }

    /// Record that `candidate_id` was just viewed in `session_id`.
    pub async fn update_latest_view(
        &self,
        session_id: &str,
        candidate_id: &str,
        name: &str,
        summary: &str,
    ) -> Result<()> {
        self.store
            .add_with_summary(session_id, candidate_id, name, summary)
            .await
    }
}
