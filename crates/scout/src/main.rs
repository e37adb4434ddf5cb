//! Scout - recruiting assistant context tools
//!
//! Main entry point for the Scout CLI.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};

mod commands;

use commands::{config, prompt, recent, resume, summary};
use scout_config::StoreBackendKind;

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Scout - context assembly for the recruiting assistant
#[derive(Parser)]
#[command(name = "scout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// User config directory (default: $SCOUT_CONFIG_DIR or ~/.config/scout)
    #[arg(long, global = true, value_name = "DIR")]
    pub config: Option<PathBuf>,

    /// Recent resume store backend: redis, memory or disabled
    #[arg(long, global = true, value_name = "BACKEND")]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the system prompt assembled for a session
    Prompt(prompt::PromptArgs),

    /// Inspect and edit a session's recently viewed resumes
    Recent(recent::RecentArgs),

    /// Inspect cached candidate summaries
    Summary(summary::SummaryArgs),

    /// Query the resume service
    Resume(resume::ResumeArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "scout=debug,scout_agent=debug,scout_recent=debug,scout_client=debug,scout_config=debug,info"
    } else {
        "scout=info,scout_agent=info,scout_recent=info,scout_client=info,warn"
    };

    let log_dir = cli
        .config
        .clone()
        .or_else(scout_config::user_config_dir)
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "scout.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "scout=trace,scout_agent=trace,scout_recent=trace,scout_client=trace,scout_config=trace,info",
                )),
        )
        .init();

    let loaded = scout_config::load_config_with_options(None, cli.config.as_deref())?;
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }

    let backend = match cli.backend.as_deref() {
        Some(name) => name.parse::<StoreBackendKind>().map_err(|e| anyhow!(e))?,
        None => loaded.config.store().backend,
    };

    let ctx = commands::Context {
        loaded,
        backend,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Prompt(args) => prompt::run(args, &ctx).await,
        Commands::Recent(args) => recent::run(args, &ctx).await,
        Commands::Summary(args) => summary::run(args, &ctx).await,
        Commands::Resume(args) => resume::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
