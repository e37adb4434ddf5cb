//! Summary command - cached candidate summaries.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use serde_json::json;

use scout_recent::ResumeStore;

use super::{Context, print_json};

/// Arguments for the summary command.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(subcommand)]
    pub command: SummaryCommand,
}

#[derive(Subcommand, Debug)]
pub enum SummaryCommand {
    /// Show the cached summary of a candidate
    Get {
        /// Candidate id
        candidate_id: String,
    },

    /// Delete the cached summary of a candidate
    Delete {
        /// Candidate id
        candidate_id: String,
    },
}

/// Run the summary command.
pub async fn run(args: SummaryArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store().await?;
    let dim = Style::new().dim();

    match args.command {
        SummaryCommand::Get { candidate_id } => {
            let summary = store.get_summary(&candidate_id).await?;
            if ctx.json_output {
                return print_json(&summary);
            }
            match summary {
                Some(summary) => {
                    println!("{}", style(&summary.name).bold());
                    if ctx.verbose {
                        println!("{}", dim.apply_to(ResumeStore::summary_key(&candidate_id)));
                    }
                    println!("{}", summary.summary);
                }
                None => println!("{}", dim.apply_to(format!("No summary for {}", candidate_id))),
            }
        }
        SummaryCommand::Delete { candidate_id } => {
            let deleted = store.delete_summary(&candidate_id).await?;
            if ctx.json_output {
                return print_json(&json!({"deleted": deleted > 0}));
            }
            if deleted > 0 {
                println!("{} Deleted summary of {}", Style::new().green().apply_to("✓"), candidate_id);
            } else {
                println!("{}", dim.apply_to(format!("No summary for {}", candidate_id)));
            }
        }
    }

    Ok(())
}
