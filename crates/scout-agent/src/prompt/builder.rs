//! System prompt builder implementation.
//!
//! Provides a fluent builder for assembling system prompts from sections.

use scout_recent::RecentResumeEntry;

use super::clock::ClockProvider;
use super::recent_block::{BlockLimits, render_recent_resume_block};
use super::runtime::{RuntimeInfo, render_runtime_block};

/// Builder for generating system prompts.
///
/// Sections are trimmed, empty ones are dropped, and the rest are joined with
/// a blank line in this order: base document, recent resumes, runtime info,
/// then any extra sections.
///
/// # Example
///
/// ```rust,ignore
/// let prompt = SystemPromptBuilder::new()
///     .with_base(loader.read())
///     .with_recent_resumes(&entries, &BlockLimits::default())
///     .with_runtime(Some(&runtime), Some(&SystemClock))
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct SystemPromptBuilder {
    base: Option<String>,
    recent: Option<String>,
    runtime: Option<String>,
    extra: Vec<String>,
}

impl SystemPromptBuilder {
    /// Create a new builder with no sections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base system document.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Render and set the recent resume block.
    pub fn with_recent_resumes(mut self, entries: &[RecentResumeEntry], limits: &BlockLimits) -> Self {
        self.recent = Some(render_recent_resume_block(entries, limits));
        self
    }

    /// Render and set the runtime block.
    pub fn with_runtime(
        mut self,
        runtime: Option<&RuntimeInfo>,
        clock: Option<&dyn ClockProvider>,
    ) -> Self {
        self.runtime = Some(render_runtime_block(runtime, clock));
        self
    }

    /// Append a pre-rendered section after the built-in ones.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.extra.push(section.into());
        self
    }

    /// Build the final system prompt string.
    pub fn build(self) -> String {
        let sections: Vec<String> = [self.base, self.recent, self.runtime]
            .into_iter()
            .flatten()
            .chain(self.extra)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        sections.join("\n\n").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::clock::FixedClock;

    #[test]
    fn test_builder_default_empty() {
        assert!(SystemPromptBuilder::new().build().is_empty());
    }

    #[test]
    fn test_base_only_is_trimmed() {
        let prompt = SystemPromptBuilder::new()
            .with_base("\n# Scout\n\nYou help recruiters.\n\n")
            .with_recent_resumes(&[], &BlockLimits::default())
            .with_runtime(None, None)
            .build();
        assert_eq!(prompt, "# Scout\n\nYou help recruiters.");
    }

    #[test]
    fn test_sections_in_order() {
        let clock = FixedClock::parse("2025-03-03T09:30:00+08:00").unwrap();
        let prompt = SystemPromptBuilder::new()
            .with_base("BASE")
            .with_recent_resumes(
                &[RecentResumeEntry::new("c1", "Alice", "PM")],
                &BlockLimits::default(),
            )
            .with_runtime(None, Some(&clock))
            .with_section("## Notes\n- be brief")
            .build();

        let base = prompt.find("BASE").unwrap();
        let recent = prompt.find("## Recently Viewed Resumes").unwrap();
        let runtime = prompt.find("## Runtime Info").unwrap();
        let notes = prompt.find("## Notes").unwrap();
        assert!(base < recent && recent < runtime && runtime < notes);
        assert!(prompt.contains("PM\n\n## Runtime Info"));
    }

    #[test]
    fn test_empty_sections_leave_no_blank_lines() {
        let prompt = SystemPromptBuilder::new()
            .with_base("   ")
            .with_recent_resumes(
                &[RecentResumeEntry::new("c1", "Alice", "PM")],
                &BlockLimits::default(),
            )
            .with_section("")
            .build();
        assert!(prompt.starts_with("## Recently Viewed Resumes"));
        assert!(!prompt.contains("\n\n\n"));
        assert!(!prompt.ends_with('\n'));
    }
}
