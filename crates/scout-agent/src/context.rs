//! Per-turn context assembly.
//!
//! [`ContextManager`] builds the system prompt for a session from the base
//! document, the session's recently viewed resumes and runtime info, and
//! wraps it together with the host's messages and tool definitions.
//!
//! A recent resume store that is down or slow must not block a turn: those
//! failures drop the recent block and are logged. Every other store failure
//! is returned to the caller.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use scout_recent::{RecentResumeEntry, ResumeContextService};

use crate::error::{AgentError, Result};
use crate::prompt::{
    BlockLimits, ClockProvider, RuntimeInfo, SystemPromptBuilder, SystemPromptLoader,
};

/// Default number of recent resumes rendered into a system prompt.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Model request body produced by [`ContextManager::build_payload`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptPayload {
    pub system_prompt: String,
    pub messages: Vec<Value>,
    pub tools: Vec<Value>,
}

/// Assembles system prompts and model payloads for sessions.
pub struct ContextManager {
    loader: Option<Arc<SystemPromptLoader>>,
    resumes: Arc<ResumeContextService>,
    recent_limit: usize,
    limits: BlockLimits,
    clock: Option<Arc<dyn ClockProvider>>,
}

impl std::fmt::Debug for ContextManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextManager")
            .field("loader", &self.loader)
            .field("recent_limit", &self.recent_limit)
            .field("limits", &self.limits)
            .field("clock", &self.clock.is_some())
            .finish()
    }
}

impl ContextManager {
    /// Create a manager with no base document and no clock.
    pub fn new(resumes: Arc<ResumeContextService>) -> Self {
        Self {
            loader: None,
            resumes,
            recent_limit: DEFAULT_RECENT_LIMIT,
            limits: BlockLimits::default(),
            clock: None,
        }
    }

    /// Use `loader` for the base system document.
    pub fn with_system_prompt(mut self, loader: SystemPromptLoader) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Default number of recent resumes per prompt.
    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    pub fn with_block_limits(mut self, limits: BlockLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Render time, weekday and timezone into the runtime block.
    pub fn with_clock(mut self, clock: Arc<dyn ClockProvider>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    /// Build the system prompt for `session_id`.
    ///
    /// `recent_limit` overrides the configured default for this call.
    pub async fn build_system_prompt(
        &self,
        session_id: &str,
        runtime: Option<&RuntimeInfo>,
        recent_limit: Option<usize>,
    ) -> Result<String> {
        let base = self.base_prompt().await;
        let limit = recent_limit.unwrap_or(self.recent_limit);
        let entries = self.recent_entries(session_id, limit).await?;

        let prompt = SystemPromptBuilder::new()
            .with_base(base)
            .with_recent_resumes(&entries, &self.limits)
            .with_runtime(runtime, self.clock.as_deref())
            .build();

        debug!(
            session_id = %session_id,
            recent = entries.len(),
            chars = prompt.chars().count(),
            "System prompt built"
        );
        Ok(prompt)
    }

    /// Base document text, read off the async runtime.
    async fn base_prompt(&self) -> String {
        let Some(loader) = self.loader.clone() else {
            return String::new();
        };
        tokio::task::spawn_blocking(move || loader.read())
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "System prompt read task failed");
                String::new()
            })
    }

    /// Build the model payload. `messages` and `tools` pass through untouched.
    pub async fn build_payload(
        &self,
        session_id: &str,
        messages: Vec<Value>,
        tools: Option<Vec<Value>>,
        runtime: Option<&RuntimeInfo>,
    ) -> Result<PromptPayload> {
        let system_prompt = self.build_system_prompt(session_id, runtime, None).await?;
        Ok(PromptPayload {
            system_prompt,
            messages,
            tools: tools.unwrap_or_default(),
        })
    }

    /// Recent resumes with summaries; `None` uses the service default.
    pub async fn get_recent_resume_summaries(
        &self,
        session_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<RecentResumeEntry>> {
        Ok(self
            .resumes
            .get_recent_resume_summaries(session_id, limit)
            .await?)
    }

    /// Record that `candidate_id` was just viewed in `session_id`.
    pub async fn update_latest_resume_view(
        &self,
        session_id: &str,
        candidate_id: &str,
        name: &str,
        summary: &str,
    ) -> Result<()> {
        Ok(self
            .resumes
            .update_latest_view(session_id, candidate_id, name, summary)
            .await?)
    }

    pub fn set_system_prompt_hot_reload(&self, enabled: bool) {
        if let Some(loader) = &self.loader {
            loader.set_hot_reload(enabled);
        }
    }

    /// Force the base document to be re-read on next use.
    pub fn reload_system_prompt(&self) {
        if let Some(loader) = &self.loader {
            loader.invalidate();
        }
    }

    async fn recent_entries(&self, session_id: &str, limit: usize) -> Result<Vec<RecentResumeEntry>> {
        match self
            .resumes
            .get_recent_resume_summaries(session_id, Some(limit))
            .await
        {
            Ok(entries) => Ok(entries),
            Err(e) if e.is_unavailable() => {
                warn!(
                    session_id = %session_id,
                    error = %e,
                    "Recent resume store unavailable, omitting recent resumes"
                );
                Ok(Vec::new())
            }
            Err(e) => Err(AgentError::context(format!(
                "failed to read recent resumes for session '{}': {}",
                session_id, e
            ))),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use scout_recent::{KvBackend, MemoryBackend, ResumeStore, StoreConfig, UnavailableBackend};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    use crate::prompt::{BLOCK_LIMIT_MARKER, FixedClock};

    fn service_on(backend: Arc<dyn KvBackend>) -> Arc<ResumeContextService> {
        let store = ResumeStore::new(backend, StoreConfig::default()).unwrap();
        Arc::new(ResumeContextService::new(Arc::new(store)))
    }

    fn memory_manager() -> ContextManager {
        ContextManager::new(service_on(Arc::new(MemoryBackend::new())))
    }

    fn loader_with(dir: &TempDir, content: &str) -> SystemPromptLoader {
        let path = dir.path().join("system.md");
        fs::write(&path, content).unwrap();
        SystemPromptLoader::new(path, false)
    }

    #[tokio::test]
    async fn test_session_scenario() {
        let manager = memory_manager();
        manager
            .update_latest_resume_view("s1", "c1", "Alice", "5y PM")
            .await
            .unwrap();
        manager
            .update_latest_resume_view("s1", "c2", "Bob", "Backend engineer")
            .await
            .unwrap();

        let prompt = manager.build_system_prompt("s1", None, None).await.unwrap();
        assert_eq!(
            prompt,
            "## Recently Viewed Resumes\n\
             - candidate_id: c2\n\
             \x20 name: Bob\n\
             \x20 summary: Backend engineer\n\
             - candidate_id: c1\n\
             \x20 name: Alice\n\
             \x20 summary: 5y PM"
        );

        let other = manager.build_system_prompt("s2", None, None).await.unwrap();
        assert_eq!(other, "");
    }

    #[tokio::test]
    async fn test_full_prompt_composition() {
        let dir = TempDir::new().unwrap();
        let clock = FixedClock::parse("2025-03-03T09:30:00+08:00").unwrap();
        let manager = memory_manager()
            .with_system_prompt(loader_with(&dir, "# Scout\n\nHelp recruiters.\n"))
            .with_clock(Arc::new(clock));
        manager
            .update_latest_resume_view("s1", "c1", "Alice", "PM")
            .await
            .unwrap();

        let runtime = RuntimeInfo::new().with_model("gpt-4o");
        let prompt = manager
            .build_system_prompt("s1", Some(&runtime), None)
            .await
            .unwrap();

        assert!(prompt.starts_with("# Scout\n\nHelp recruiters.\n\n## Recently Viewed Resumes"));
        assert!(prompt.contains("summary: PM\n\n## Runtime Info\n- current_time: 2025-03-03 09:30:00"));
        assert!(prompt.ends_with("- model: gpt-4o"));
    }

    #[tokio::test]
    async fn test_recent_limit_default_and_override() {
        let manager = memory_manager().with_recent_limit(2);
        for id in ["c1", "c2", "c3"] {
            manager
                .update_latest_resume_view("s", id, id, "x")
                .await
                .unwrap();
        }

        let prompt = manager.build_system_prompt("s", None, None).await.unwrap();
        assert_eq!(prompt.matches("- candidate_id:").count(), 2);
        assert!(!prompt.contains("c1"));

        let prompt = manager.build_system_prompt("s", None, Some(3)).await.unwrap();
        assert_eq!(prompt.matches("- candidate_id:").count(), 3);
    }

    #[tokio::test]
    async fn test_block_limits_applied() {
        let manager = memory_manager().with_block_limits(BlockLimits {
            item_max_chars: 10,
            block_max_chars: 250,
        });
        for i in 0..5 {
            manager
                .update_latest_resume_view("s", &format!("c{i}"), "N", &"z".repeat(50))
                .await
                .unwrap();
        }

        let prompt = manager.build_system_prompt("s", None, None).await.unwrap();
        assert!(prompt.contains("original length 50 chars"));
        assert!(prompt.ends_with(BLOCK_LIMIT_MARKER));
    }

    #[tokio::test]
    async fn test_unavailable_store_omits_block() {
        let dir = TempDir::new().unwrap();
        let manager = ContextManager::new(service_on(Arc::new(UnavailableBackend::default())))
            .with_system_prompt(loader_with(&dir, "BASE"));

        let runtime = RuntimeInfo::new().with_channel("cli");
        let prompt = manager
            .build_system_prompt("s1", Some(&runtime), None)
            .await
            .unwrap();
        assert_eq!(prompt, "BASE\n\n## Runtime Info\n- channel: cli");

        // Direct reads still surface the failure.
        let err = manager
            .get_recent_resume_summaries("s1", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Store(_)));
    }

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let backend = Arc::new(MemoryBackend::new());
        // A hash where the session list should be makes list reads fail.
        backend
            .hash_set_fields(
                "session:s1:recent_resumes",
                &[("oops".to_string(), "1".to_string())],
            )
            .await
            .unwrap();
        let manager = ContextManager::new(service_on(backend));

        let err = manager.build_system_prompt("s1", None, None).await.unwrap_err();
        assert!(matches!(err, AgentError::Context(_)));
        assert!(err.to_string().contains("s1"));
    }

    #[tokio::test]
    async fn test_build_payload_passthrough() {
        let manager = memory_manager();
        let messages = vec![
            json!({"role": "user", "content": "find PMs"}),
            json!({"role": "assistant", "content": "On it"}),
        ];
        let tools = vec![json!({"name": "resume_search"})];

        let payload = manager
            .build_payload("s1", messages.clone(), Some(tools.clone()), None)
            .await
            .unwrap();
        assert_eq!(payload.system_prompt, "");
        assert_eq!(payload.messages, messages);
        assert_eq!(payload.tools, tools);

        let payload = manager.build_payload("s1", Vec::new(), None, None).await.unwrap();
        assert!(payload.tools.is_empty());
    }

    #[tokio::test]
    async fn test_reload_system_prompt() {
        let dir = TempDir::new().unwrap();
        let loader = loader_with(&dir, "v1");
        let path = loader.path().to_path_buf();
        let manager = memory_manager().with_system_prompt(loader);

        assert_eq!(manager.build_system_prompt("s", None, None).await.unwrap(), "v1");
        fs::write(&path, "v2").unwrap();
        assert_eq!(manager.build_system_prompt("s", None, None).await.unwrap(), "v1");

        manager.reload_system_prompt();
        assert_eq!(manager.build_system_prompt("s", None, None).await.unwrap(), "v2");

        manager.set_system_prompt_hot_reload(true);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_builds_share_base_document() {
        let dir = TempDir::new().unwrap();
        let manager = Arc::new(memory_manager().with_system_prompt(loader_with(&dir, "BASE")));
        manager.set_system_prompt_hot_reload(true);

        let mut handles = Vec::new();
        for i in 0..8 {
            let manager = manager.clone();
            handles.push(tokio::spawn(async move {
                manager
                    .build_system_prompt(&format!("s{}", i), None, None)
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), "BASE");
        }
    }
}
