//! Runtime information block.

use serde::{Deserialize, Serialize};

use super::clock::ClockProvider;

/// Header line of the runtime block.
pub const RUNTIME_BLOCK_HEADER: &str = "## Runtime Info";

/// Facts about the current turn that the model should know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    pub model: Option<String>,
    pub workspace: Option<String>,
    pub channel: Option<String>,
    /// Additional `key: value` lines, rendered in order. Keys starting with
    /// `_` are private to the host and never rendered.
    #[serde(default)]
    pub extra: Vec<(String, String)>,
}

impl RuntimeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }
}

/// Render the runtime block, or `""` when there is nothing to say.
pub fn render_runtime_block(
    runtime: Option<&RuntimeInfo>,
    clock: Option<&dyn ClockProvider>,
) -> String {
    let mut lines = Vec::new();

    if let Some(clock) = clock {
        let reading = clock.now();
        lines.push(format!("- current_time: {}", reading.time));
        lines.push(format!("- weekday: {}", reading.weekday));
        lines.push(format!("- timezone: {}", reading.timezone));
    }

    if let Some(runtime) = runtime {
        let named = [
            ("model", &runtime.model),
            ("workspace", &runtime.workspace),
            ("channel", &runtime.channel),
        ];
        for (key, value) in named {
            if let Some(value) = value {
                lines.push(format!("- {}: {}", key, value));
            }
        }
        for (key, value) in &runtime.extra {
            if !key.starts_with('_') {
                lines.push(format!("- {}: {}", key, value));
            }
        }
    }

    if lines.is_empty() {
        return String::new();
    }
    format!("{}\n{}", RUNTIME_BLOCK_HEADER, lines.join("\n"))
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::clock::FixedClock;

    #[test]
    fn test_nothing_to_render() {
        assert_eq!(render_runtime_block(None, None), "");
        assert_eq!(render_runtime_block(Some(&RuntimeInfo::new()), None), "");
        let private = RuntimeInfo::new().with_extra("_trace", "x");
        assert_eq!(render_runtime_block(Some(&private), None), "");
    }

    #[test]
    fn test_full_block() {
        let clock = FixedClock::parse("2025-03-03T09:30:00+08:00").unwrap();
        let runtime = RuntimeInfo::new()
            .with_model("gpt-4o")
            .with_channel("feishu")
            .with_extra("user", "recruiter-7")
            .with_extra("_internal", "hidden");

        let block = render_runtime_block(Some(&runtime), Some(&clock));
        assert_eq!(
            block,
            "## Runtime Info\n\
             - current_time: 2025-03-03 09:30:00\n\
             - weekday: Monday\n\
             - timezone: +08:00\n\
             - model: gpt-4o\n\
             - channel: feishu\n\
             - user: recruiter-7"
        );
    }

    #[test]
    fn test_clock_only() {
        let clock = FixedClock::parse("2025-03-04T00:00:00Z").unwrap();
        let block = render_runtime_block(None, Some(&clock));
        assert!(block.starts_with(RUNTIME_BLOCK_HEADER));
        assert!(block.contains("- weekday: Tuesday"));
        assert!(block.contains("- timezone: +00:00"));
    }
}
