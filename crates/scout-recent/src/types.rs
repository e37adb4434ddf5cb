//! Value types stored in and read from the cache.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Hash field holding the candidate name.
pub(crate) const FIELD_NAME: &str = "name";

/// Hash field holding the candidate summary.
pub(crate) const FIELD_SUMMARY: &str = "summary";

/// Minimal cached view of a candidate.
///
/// These two fields are the whole record. Richer resume detail stays in the
/// external resume service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSummary {
    /// Candidate display name.
    pub name: String,
    /// Short resume summary.
    pub summary: String,
}

impl CandidateSummary {
    /// Create a new summary.
    pub fn new(name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
        }
    }

    /// Field pairs written to the backend hash.
    pub(crate) fn to_fields(&self) -> Vec<(String, String)> {
        vec![
            (FIELD_NAME.to_string(), self.name.clone()),
            (FIELD_SUMMARY.to_string(), self.summary.clone()),
        ]
    }

    /// Build from a backend hash. An empty hash means the record is absent.
    pub(crate) fn from_fields(mut fields: HashMap<String, String>) -> Option<Self> {
        if fields.is_empty() {
            return None;
        }
        Some(Self {
            name: fields.remove(FIELD_NAME).unwrap_or_default(),
            summary: fields.remove(FIELD_SUMMARY).unwrap_or_default(),
        })
    }
}

/// One row of a session's recent resume history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentResumeEntry {
    /// Candidate identifier.
    pub candidate_id: String,
    /// Candidate name, empty when the summary record is missing.
    pub name: String,
    /// Candidate summary, empty when the summary record is missing.
    pub summary: String,
}

impl RecentResumeEntry {
    /// Create a new entry.
    pub fn new(
        candidate_id: impl Into<String>,
        name: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            name: name.into(),
            summary: summary.into(),
        }
    }

    /// Join a candidate id with its (possibly missing) summary.
    pub(crate) fn join(candidate_id: String, summary: Option<CandidateSummary>) -> Self {
        let summary = summary.unwrap_or_default();
        Self {
            candidate_id,
            name: summary.name,
            summary: summary.summary,
        }
    }
}
