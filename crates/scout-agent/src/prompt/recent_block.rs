//! Bounded "recently viewed resumes" prompt block.
//!
//! The block is a sub-budget of the per-turn prompt: each summary is capped
//! on its own, and the whole block stops growing once it reaches its cap.
//! Character counts are Unicode scalar values, never bytes.

use scout_recent::RecentResumeEntry;

/// Header line of the recent resume block.
pub const RECENT_BLOCK_HEADER: &str = "## Recently Viewed Resumes";

/// Line appended when entries were dropped to respect the block cap.
pub const BLOCK_LIMIT_MARKER: &str = "...[recent resumes truncated: block limit reached]";

/// Default per-summary character cap.
pub const DEFAULT_ITEM_MAX_CHARS: usize = 2000;

/// Default character cap for the whole block.
pub const DEFAULT_BLOCK_MAX_CHARS: usize = 15000;

/// Size limits for [`render_recent_resume_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLimits {
    pub item_max_chars: usize,
    pub block_max_chars: usize,
}

impl Default for BlockLimits {
    fn default() -> Self {
        Self {
            item_max_chars: DEFAULT_ITEM_MAX_CHARS,
            block_max_chars: DEFAULT_BLOCK_MAX_CHARS,
        }
    }
}

/// Render recent entries as a markdown block.
///
/// Returns `""` for no entries. Otherwise emits the header followed by
/// three lines per entry, in the given order. An entry that would push the
/// running total (each line's characters plus its newline) past
/// `block_max_chars` is replaced by a single [`BLOCK_LIMIT_MARKER`] line and
/// everything after it is dropped.
pub fn render_recent_resume_block(entries: &[RecentResumeEntry], limits: &BlockLimits) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut lines = vec![RECENT_BLOCK_HEADER.to_string()];
    let mut total = line_cost(RECENT_BLOCK_HEADER);

    for entry in entries {
        let summary = truncate_summary(entry.summary.trim(), limits.item_max_chars);
        let entry_lines = [
            format!("- candidate_id: {}", entry.candidate_id.trim()),
            format!("  name: {}", entry.name.trim()),
            format!("  summary: {}", summary),
        ];
        let cost: usize = entry_lines.iter().map(|l| line_cost(l)).sum();

        if total + cost > limits.block_max_chars {
            lines.push(BLOCK_LIMIT_MARKER.to_string());
            break;
        }
        total += cost;
        lines.extend(entry_lines);
    }

    lines.join("\n").trim_end().to_string()
}

fn line_cost(line: &str) -> usize {
    line.chars().count() + 1
}

fn truncate_summary(summary: &str, max_chars: usize) -> String {
    let length = summary.chars().count();
    if length <= max_chars {
        return summary.to_string();
    }
    let head: String = summary.chars().take(max_chars).collect();
    format!("{} ...[truncated, original length {} chars]", head, length)
}
