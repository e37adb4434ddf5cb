//! Resume service tool.
//!
//! Lets the agent search, fetch and update candidate resumes through the
//! resume service HTTP API. Successful `get` and `update` calls are recorded
//! as the session's latest viewed resume when a context service is attached.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use scout_client::{ResumeClient, SearchRequest, UpdateRequest};
use scout_recent::ResumeContextService;

use crate::error::Result;
use crate::tool::{ResumeSearchParams, Tool, ToolContext, ToolResult};

/// Default cap on serialized JSON results.
pub const DEFAULT_RESULT_MAX_CHARS: usize = 50_000;

// ─────────────────────────────────────────────────────────────────────────────
// Resume Search Tool
// ─────────────────────────────────────────────────────────────────────────────

/// Tool for querying and editing resumes in the resume service.
#[derive(Debug, Clone)]
pub struct ResumeSearchTool {
    client: ResumeClient,
    views: Option<Arc<ResumeContextService>>,
    result_max_chars: usize,
}

impl ResumeSearchTool {
    /// Create a tool that talks to the given client.
    pub fn new(client: ResumeClient) -> Self {
        Self {
            client,
            views: None,
            result_max_chars: DEFAULT_RESULT_MAX_CHARS,
        }
    }

    /// Record successful `get` and `update` calls in the recent resume cache.
    pub fn with_context_service(mut self, service: Arc<ResumeContextService>) -> Self {
        self.views = Some(service);
        self
    }

    /// Override the JSON result cap.
    pub fn with_result_max_chars(mut self, max_chars: usize) -> Self {
        self.result_max_chars = max_chars;
        self
    }

    async fn search(&self, request: SearchRequest) -> ToolResult {
        debug!(query = ?request.query, size = ?request.size, "Searching resumes");
        match self.client.search(&request).await {
            Ok(response) => ToolResult::json(response),
            Err(e) => self.client_error("search", None, &e),
        }
    }

    async fn get(&self, candidate_id: &str, ctx: &ToolContext) -> ToolResult {
        match self.client.get(candidate_id).await {
            Ok(resume) => {
                self.record_view(ctx, candidate_id, &[&resume]).await;
                ToolResult::json(resume)
            }
            Err(e) if e.is_not_found() => {
                ToolResult::error(format!("Resume not found for candidate_id={}", candidate_id))
            }
            Err(e) => self.client_error("get", Some(candidate_id), &e),
        }
    }

    async fn update(
        &self,
        candidate_id: &str,
        fields: Map<String, Value>,
        upsert: bool,
        ctx: &ToolContext,
    ) -> ToolResult {
        let request = UpdateRequest::new(candidate_id, fields.clone()).upsert(upsert);
        match self.client.update(&request).await {
            Ok(result) => {
                let fields = Value::Object(fields);
                self.record_view(ctx, candidate_id, &[&fields, &result]).await;
                let name = first_str(&[&fields, &result], &["name_full"])
                    .unwrap_or(candidate_id)
                    .to_string();
                ToolResult::json(update_card(&name, &fields, result))
            }
            Err(e) if e.is_not_found() => ToolResult::error(format!(
                "Resume not found for candidate_id={} (set upsert=true to create it)",
                candidate_id
            )),
            Err(e) => self.client_error("update", Some(candidate_id), &e),
        }
    }

    fn client_error(
        &self,
        action: &str,
        candidate_id: Option<&str>,
        err: &scout_client::Error,
    ) -> ToolResult {
        warn!(action, candidate_id, error = %err, "Resume service call failed");
        let message = match err {
            scout_client::Error::Timeout(after) => {
                format!("Request timed out after {}s", after.as_secs())
            }
            scout_client::Error::Connect { base_url, .. } => {
                format!("Cannot connect to resume service at {}", base_url)
            }
            scout_client::Error::Api { status, body } => {
                format!("Resume {} failed with HTTP {}: {}", action, status, body)
            }
            other => format!("Resume {} failed: {}", action, other),
        };
        ToolResult::error(message)
    }

    async fn record_view(&self, ctx: &ToolContext, candidate_id: &str, sources: &[&Value]) {
        let Some(views) = &self.views else {
            return;
        };
        let name = first_str(sources, &["name_full"]).unwrap_or(candidate_id);
        let summary = first_str(sources, &["core_summary", "summary"]).unwrap_or("");

        if let Err(e) = views
            .update_latest_view(&ctx.session_id, candidate_id, name, summary)
            .await
        {
            warn!(
                session_id = %ctx.session_id,
                candidate_id,
                error = %e,
                "Failed to record resume view"
            );
        }
    }
}

#[async_trait]
impl Tool for ResumeSearchTool {
    fn name(&self) -> &str {
        "resume_search"
    }

    fn description(&self) -> &str {
        "Search, fetch or update candidate resumes. Use action=search with a free-text query and optional filters to find candidates, action=get with a candidate_id to read one resume in full, and action=update with a candidate_id and fields to change it."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["search", "get", "update"],
                    "description": "Operation to perform"
                },
                "query": {
                    "type": "string",
                    "description": "Free-text query (search)"
                },
                "filters": {
                    "type": "object",
                    "description": "Structured filters passed to the service (search)"
                },
                "size": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 200,
                    "default": 10,
                    "description": "Page size (search)"
                },
                "from_": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Result offset (search)"
                },
                "include_fields": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Fields to return (search). Defaults to candidate_id, name_full, core_summary, extracted_tags"
                },
                "candidate_id": {
                    "type": "string",
                    "description": "Candidate id (get, update)"
                },
                "fields": {
                    "type": "object",
                    "description": "Fields to write (update)"
                },
                "upsert": {
                    "type": "boolean",
                    "default": false,
                    "description": "Create the resume if it does not exist (update)"
                }
            },
            "required": ["action"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolResult> {
        let params = match ResumeSearchParams::try_from(params) {
            Ok(p) => p,
            Err(e) => return Ok(ToolResult::error(e.to_string())),
        };

        let result = match params {
            ResumeSearchParams::Search {
                query,
                filters,
                size,
                from,
                include_fields,
            } => {
                let mut request = SearchRequest::new();
                if let Some(query) = query {
                    request = request.query(query);
                }
                if let Some(filters) = filters {
                    request = request.filters(filters);
                }
                if let Some(size) = size {
                    request = request.size(size);
                }
                if let Some(from) = from {
                    request = request.offset(from);
                }
                if let Some(fields) = include_fields {
                    request = request.include_fields(fields);
                }
                self.search(request).await
            }
            ResumeSearchParams::Get { candidate_id } => self.get(&candidate_id, ctx).await,
            ResumeSearchParams::Update {
                candidate_id,
                fields,
                upsert,
            } => self.update(&candidate_id, fields, upsert, ctx).await,
        };

        Ok(result.limit_json(self.result_max_chars))
    }
}

/// First non-blank string found under any of `keys`, checking sources in order.
fn first_str<'a>(sources: &[&'a Value], keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| {
        sources.iter().copied().find_map(|source| {
            source
                .get(*key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
    })
}

/// Interactive card summarizing the written fields.
fn update_card(name: &str, fields: &Value, update_result: Value) -> Value {
    let title = format!("Resume updated - {}", name);
    let elements: Vec<Value> = fields
        .as_object()
        .into_iter()
        .flatten()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            json!({
                "tag": "div",
                "text": {
                    "tag": "lark_md",
                    "content": format!("**{}**: {}", key, rendered)
                }
            })
        })
        .collect();

    json!({
        "type": "feishu_card",
        "title": title,
        "card": {
            "header": {
                "title": { "tag": "plain_text", "content": title },
                "template": "blue"
            },
            "elements": elements
        },
        "update_result": update_result
    })
}
