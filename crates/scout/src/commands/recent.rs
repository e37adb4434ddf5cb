//! Recent command - a session's recently viewed resumes.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use serde_json::json;

use super::{Context, print_json, truncate};

/// Arguments for the recent command.
#[derive(Args, Debug)]
pub struct RecentArgs {
    #[command(subcommand)]
    pub command: RecentCommand,
}

#[derive(Subcommand, Debug)]
pub enum RecentCommand {
    /// List recently viewed resumes, newest first
    List {
        /// Conversation session id
        #[arg(short, long)]
        session: String,

        /// Maximum entries to show (0 shows the whole list)
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Record a resume view and its summary
    View {
        /// Conversation session id
        #[arg(short, long)]
        session: String,

        /// Candidate id
        candidate_id: String,

        /// Candidate display name
        #[arg(long, default_value = "")]
        name: String,

        /// Short candidate summary
        #[arg(long, default_value = "")]
        summary: String,
    },

    /// Remove one candidate from the session list
    Remove {
        /// Conversation session id
        #[arg(short, long)]
        session: String,

        /// Candidate id
        candidate_id: String,
    },

    /// Drop the whole session list
    Clear {
        /// Conversation session id
        #[arg(short, long)]
        session: String,
    },
}

/// Run the recent command.
pub async fn run(args: RecentArgs, ctx: &Context) -> Result<()> {
    let service = ctx.context_service().await?;
    let dim = Style::new().dim();
    let green = Style::new().green();

    match args.command {
        RecentCommand::List { session, limit } => {
            let entries = service
                .get_recent_resume_summaries(&session, Some(limit))
                .await?;
            if ctx.json_output {
                return print_json(&entries);
            }

            println!("{}", style(format!("Recent resumes ({})", session)).bold());
            println!("{}", dim.apply_to("─".repeat(50)));
            if entries.is_empty() {
                println!("{}", dim.apply_to("No recently viewed resumes"));
            }
            for entry in &entries {
                let name = if entry.name.is_empty() { "-" } else { entry.name.as_str() };
                println!("{} {}", dim.apply_to(format!("[{}]", entry.candidate_id)), name);
                if ctx.verbose {
                    println!("    {}", entry.summary);
                } else if !entry.summary.is_empty() {
                    println!("    {}", dim.apply_to(truncate(&entry.summary, 70)));
                }
            }
        }
        RecentCommand::View {
            session,
            candidate_id,
            name,
            summary,
        } => {
            service
                .update_latest_view(&session, &candidate_id, &name, &summary)
                .await?;
            if ctx.json_output {
                return print_json(&json!({"session": session, "candidate_id": candidate_id}));
            }
            println!(
                "{} Recorded view of {}",
                green.apply_to("✓"),
                dim.apply_to(&candidate_id)
            );
        }
        RecentCommand::Remove {
            session,
            candidate_id,
        } => {
            let removed = service.store().remove(&session, &candidate_id).await?;
            if ctx.json_output {
                return print_json(&json!({"removed": removed}));
            }
            if removed == 0 {
                println!("{}", dim.apply_to(format!("{} was not in the list", candidate_id)));
            } else {
                println!("{} Removed {}", green.apply_to("✓"), dim.apply_to(&candidate_id));
            }
        }
        RecentCommand::Clear { session } => {
            let deleted = service.store().clear(&session).await?;
            if ctx.json_output {
                return print_json(&json!({"cleared": deleted > 0}));
            }
            println!("{} Cleared recent resumes for {}", green.apply_to("✓"), session);
        }
    }

    Ok(())
}
