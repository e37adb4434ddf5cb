//! Recent resume cache for conversation sessions.
//!
//! This crate tracks which candidate resumes were recently viewed in each
//! session, together with a short per-candidate summary:
//! - a per-session list of candidate ids, newest first, deduplicated and capped
//! - a per-candidate summary record holding only `name` and `summary`
//! - TTL refresh on every write so idle sessions expire on their own
//!
//! Storage goes through the [`KvBackend`] trait. [`RedisBackend`] is the
//! production backend, [`MemoryBackend`] keeps everything in-process and
//! [`UnavailableBackend`] rejects every call.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scout_recent::{MemoryBackend, ResumeContextService, ResumeStore, StoreConfig};
//!
//! let store = ResumeStore::new(Arc::new(MemoryBackend::new()), StoreConfig::default())?;
//! let service = ResumeContextService::new(Arc::new(store));
//!
//! service.update_latest_view("s1", "c1", "Alice", "5y PM").await?;
//! let recent = service.get_recent_resume_summaries("s1", None).await?;
//! ```

pub mod backend;
mod config;
mod error;
mod service;
mod store;
mod types;

pub use backend::{
    DEFAULT_CONNECT_TIMEOUT, KvBackend, KvOp, MemoryBackend, RedisBackend, RedisSettings,
    UnavailableBackend,
};
pub use config::{
    DEFAULT_KEY_PREFIX, DEFAULT_LIST_NAME, DEFAULT_MAX_SIZE, DEFAULT_OP_TIMEOUT, DEFAULT_TTL,
    StoreConfig,
};
pub use error::{Result, StoreError};
pub use service::{DEFAULT_CONTEXT_LIMIT, ResumeContextService};
pub use store::ResumeStore;
pub use types::{CandidateSummary, RecentResumeEntry};
