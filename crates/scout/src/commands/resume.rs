//! Resume command - query the resume service through the `resume_search` tool.

use anyhow::{Context as _, Result, bail};
use clap::{Args, Subcommand};
use serde_json::{Map, Value, json};

use scout_agent::{ResumeSearchTool, Tool, ToolContext, ToolResult};

use super::Context;

/// Arguments for the resume command.
#[derive(Args, Debug)]
pub struct ResumeArgs {
    /// Session that get/update views are recorded in
    #[arg(short, long, default_value = "cli")]
    pub session: String,

    #[command(subcommand)]
    pub command: ResumeCommand,
}

#[derive(Subcommand, Debug)]
pub enum ResumeCommand {
    /// Search resumes
    Search {
        /// Free-text query
        query: Option<String>,

        /// Structured filters as a JSON object
        #[arg(long, value_name = "JSON")]
        filters: Option<String>,

        /// Page size (1-200)
        #[arg(long)]
        size: Option<i64>,

        /// Result offset
        #[arg(long)]
        from: Option<i64>,

        /// Field to return (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },

    /// Fetch one resume
    Get {
        /// Candidate id
        candidate_id: String,
    },

    /// Update resume fields
    Update {
        /// Candidate id
        candidate_id: String,

        /// Fields to write as a JSON object
        #[arg(long, value_name = "JSON")]
        fields: String,

        /// Create the resume if it does not exist
        #[arg(long)]
        upsert: bool,
    },
}

/// Run the resume command.
pub async fn run(args: ResumeArgs, ctx: &Context) -> Result<()> {
    let params = tool_params(args.command)?;

    let tool = ResumeSearchTool::new(ctx.resume_client()?)
        .with_context_service(ctx.context_service().await?)
        .with_result_max_chars(ctx.loaded.config.tools().result_max_chars);
    let tool_ctx = ToolContext::new(args.session);

    match tool.execute(params, &tool_ctx).await? {
        ToolResult::Json { content } => {
            println!("{}", serde_json::to_string_pretty(&content)?);
        }
        ToolResult::Text { content } => println!("{}", content),
        ToolResult::Error { message, .. } => bail!(message),
    }
    Ok(())
}

/// Translate subcommand arguments into `resume_search` tool parameters.
fn tool_params(command: ResumeCommand) -> Result<Value> {
    let params = match command {
        ResumeCommand::Search {
            query,
            filters,
            size,
            from,
            fields,
        } => {
            let mut params = Map::new();
            params.insert("action".into(), json!("search"));
            if let Some(query) = query {
                params.insert("query".into(), json!(query));
            }
            if let Some(filters) = filters {
                params.insert("filters".into(), parse_object("--filters", &filters)?);
            }
            if let Some(size) = size {
                params.insert("size".into(), json!(size));
            }
            if let Some(from) = from {
                params.insert("from_".into(), json!(from));
            }
            if !fields.is_empty() {
                params.insert("include_fields".into(), json!(fields));
            }
            Value::Object(params)
        }
        ResumeCommand::Get { candidate_id } => json!({
            "action": "get",
            "candidate_id": candidate_id,
        }),
        ResumeCommand::Update {
            candidate_id,
            fields,
            upsert,
        } => json!({
            "action": "update",
            "candidate_id": candidate_id,
            "fields": parse_object("--fields", &fields)?,
            "upsert": upsert,
        }),
    };
    Ok(params)
}

fn parse_object(flag: &str, raw: &str) -> Result<Value> {
    let value: Value =
        serde_json::from_str(raw).with_context(|| format!("{} is not valid JSON", flag))?;
    if !value.is_object() {
        bail!("{} must be a JSON object", flag);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_skip_unset_options() {
        let params = tool_params(ResumeCommand::Search {
            query: Some("rust".to_string()),
            filters: None,
            size: Some(20),
            from: None,
            fields: vec![],
        })
        .unwrap();
        assert_eq!(params, json!({"action": "search", "query": "rust", "size": 20}));
    }

    #[test]
    fn test_update_params_require_object() {
        let err = tool_params(ResumeCommand::Update {
            candidate_id: "c1".to_string(),
            fields: "[1, 2]".to_string(),
            upsert: false,
        })
        .unwrap_err();
        assert!(err.to_string().contains("--fields must be a JSON object"));

        let params = tool_params(ResumeCommand::Update {
            candidate_id: "c1".to_string(),
            fields: r#"{"name_full": "Alice"}"#.to_string(),
            upsert: true,
        })
        .unwrap();
        assert_eq!(params["fields"]["name_full"], "Alice");
        assert_eq!(params["upsert"], true);
    }
}
