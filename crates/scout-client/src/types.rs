//! Request types for the resume search service.
//!
//! Responses are passed through as raw [`serde_json::Value`]; the service
//! schema is open-ended and callers only pick a few well-known fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields returned by a search when the caller does not ask for specific ones.
pub const DEFAULT_INCLUDE_FIELDS: &[&str] =
    &["candidate_id", "name_full", "core_summary", "extracted_tags"];

/// Largest page size the service accepts.
pub const MAX_SEARCH_SIZE: u32 = 200;

/// Body of `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(rename = "from_", skip_serializing_if = "Option::is_none")]
    pub from: Option<u32>,
    pub include_fields: Vec<String>,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: None,
            filters: None,
            size: None,
            from: None,
            include_fields: DEFAULT_INCLUDE_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn filters(mut self, filters: Value) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Set the page size. Values outside `1..=200` are ignored.
    pub fn size(mut self, size: i64) -> Self {
        if (1..=i64::from(MAX_SEARCH_SIZE)).contains(&size) {
            self.size = Some(size as u32);
        }
        self
    }

    /// Set the page offset. Negative values are ignored.
    pub fn offset(mut self, offset: i64) -> Self {
        if let Ok(offset) = u32::try_from(offset) {
            self.from = Some(offset);
        }
        self
    }

    /// Restrict returned fields. An empty list keeps the defaults.
    pub fn include_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if !fields.is_empty() {
            self.include_fields = fields;
        }
        self
    }
}

/// Body of `POST /update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub candidate_id: String,
    pub fields: Map<String, Value>,
    /// Create the resume when it does not exist yet.
    #[serde(default)]
    pub upsert: bool,
}

impl UpdateRequest {
    pub fn new(candidate_id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            fields,
            upsert: false,
        }
    }

    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_search_defaults() {
        let body = serde_json::to_value(SearchRequest::new()).unwrap();
        assert_eq!(
            body,
            json!({"include_fields": ["candidate_id", "name_full", "core_summary", "extracted_tags"]})
        );
    }

    #[test]
    fn test_search_drops_out_of_range_paging() {
        let req = SearchRequest::new().size(0).offset(-1);
        assert_eq!(req.size, None);
        assert_eq!(req.from, None);

        let req = SearchRequest::new().size(201);
        assert_eq!(req.size, None);

        let req = SearchRequest::new().size(200).offset(40);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["size"], 200);
        assert_eq!(body["from_"], 40);
    }

    #[test]
    fn test_include_fields_override() {
        let req = SearchRequest::new().include_fields(["candidate_id"]);
        assert_eq!(req.include_fields, vec!["candidate_id"]);

        let req = SearchRequest::new().include_fields(Vec::<String>::new());
        assert_eq!(req.include_fields.len(), DEFAULT_INCLUDE_FIELDS.len());
    }
}
