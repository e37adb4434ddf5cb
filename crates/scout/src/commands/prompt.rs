//! Prompt command - render the per-turn system prompt.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use scout_agent::{
    BlockLimits, ContextManager, ResumeSearchTool, RuntimeInfo, SystemClock, SystemPromptLoader,
    ToolRegistry,
};

use super::{Context, print_json};

/// Arguments for the prompt command.
#[derive(Args, Debug)]
pub struct PromptArgs {
    /// Conversation session id
    #[arg(short, long)]
    pub session: String,

    /// Number of recent resumes to include (default from config)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Model name for the runtime block
    #[arg(long)]
    pub model: Option<String>,

    /// Channel name for the runtime block
    #[arg(long)]
    pub channel: Option<String>,

    /// Workspace for the runtime block
    #[arg(long)]
    pub workspace: Option<String>,

    /// Base system prompt file (overrides context.system_prompt_path)
    #[arg(long, value_name = "FILE")]
    pub system_prompt: Option<PathBuf>,
}

/// Run the prompt command.
pub async fn run(args: PromptArgs, ctx: &Context) -> Result<()> {
    let section = ctx.loaded.config.context();
    let service = ctx.context_service().await?;

    let mut manager = ContextManager::new(service.clone())
        .with_recent_limit(args.limit.unwrap_or(section.recent_limit))
        .with_block_limits(BlockLimits {
            item_max_chars: section.item_max_chars,
            block_max_chars: section.block_max_chars,
        })
        .with_clock(Arc::new(SystemClock));
    if let Some(path) = args.system_prompt.or(section.system_prompt_path) {
        manager = manager.with_system_prompt(SystemPromptLoader::new(path, section.hot_reload));
    }

    let mut runtime = RuntimeInfo::new();
    if let Some(model) = args.model {
        runtime = runtime.with_model(model);
    }
    if let Some(workspace) = args.workspace {
        runtime = runtime.with_workspace(workspace);
    }
    if let Some(channel) = args.channel {
        runtime = runtime.with_channel(channel);
    }

    if ctx.json_output {
        let mut tools = ToolRegistry::new();
        tools.register(
            ResumeSearchTool::new(ctx.resume_client()?)
                .with_context_service(service)
                .with_result_max_chars(ctx.loaded.config.tools().result_max_chars),
        );
        let payload = manager
            .build_payload(&args.session, Vec::new(), Some(tools.definitions()), Some(&runtime))
            .await?;
        return print_json(&payload);
    }

    let prompt = manager
        .build_system_prompt(&args.session, Some(&runtime), None)
        .await?;
    println!("{}", prompt);
    Ok(())
}
