//! System prompt generation module.
//!
//! Prompts are assembled from a base markdown document, the bounded block of
//! recently viewed resumes and a runtime info block.
//!
//! # Example
//!
//! ```rust,ignore
//! use scout_agent::prompt::{BlockLimits, SystemClock, SystemPromptBuilder};
//!
//! let prompt = SystemPromptBuilder::new()
//!     .with_base("# Scout\nYou help recruiters.")
//!     .with_recent_resumes(&entries, &BlockLimits::default())
//!     .with_runtime(Some(&runtime), Some(&SystemClock))
//!     .build();
//! ```

mod builder;
mod clock;
mod loader;
mod recent_block;
mod runtime;

pub use builder::SystemPromptBuilder;
pub use clock::{ClockProvider, ClockReading, FixedClock, SystemClock};
pub use loader::SystemPromptLoader;
pub use recent_block::{
    BLOCK_LIMIT_MARKER, BlockLimits, DEFAULT_BLOCK_MAX_CHARS, DEFAULT_ITEM_MAX_CHARS,
    RECENT_BLOCK_HEADER, render_recent_resume_block,
};
pub use runtime::{RUNTIME_BLOCK_HEADER, RuntimeInfo, render_runtime_block};
