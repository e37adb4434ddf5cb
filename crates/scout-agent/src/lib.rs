//! Context assembly for the Scout recruiting assistant.
//!
//! This crate turns per-session state into what the language model sees on
//! each turn: the system prompt (base document, recently viewed resumes and
//! runtime info) and the tool definitions, plus the `resume_search` tool that
//! talks to the resume service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ContextManager                                             │
//! │  - Loads the base system prompt                             │
//! │  - Renders the recent resume block                          │
//! │  - Appends runtime info                                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              ▼               ▼               ▼
//!      ┌──────────────┐ ┌──────────────┐ ┌──────────────┐
//!      │ PromptLoader │ │ ResumeStore  │ │ ToolRegistry │
//!      │  (markdown)  │ │(scout-recent)│ │resume_search │
//!      └──────────────┘ └──────────────┘ └──────────────┘
//! ```
//!
//! # Core Components
//!
//! - [`ContextManager`]: per-turn prompt and payload assembly
//! - [`SystemPromptBuilder`]: section layout of the system prompt
//! - [`ToolRegistry`]: tools exposed to the model
//! - [`ResumeSearchTool`]: resume service access

pub mod context;
pub mod error;
pub mod prompt;
pub mod tool;
pub mod tools;

// Re-export core types
pub use error::{AgentError, Result};

// Re-export context types
pub use context::{ContextManager, DEFAULT_RECENT_LIMIT, PromptPayload};

// Re-export prompt types
pub use prompt::{
    BlockLimits, ClockProvider, ClockReading, FixedClock, RuntimeInfo, SystemClock,
    SystemPromptBuilder, SystemPromptLoader, render_recent_resume_block, render_runtime_block,
};

// Re-export tool types
pub use tool::{
    ParamExt, ParamResult, ParameterValidationError, ResumeSearchParams, Tool, ToolContext,
    ToolRegistry, ToolResult,
};

// Re-export built-in tools
pub use tools::{DEFAULT_RESULT_MAX_CHARS, ResumeSearchTool};
