//! Built-in tools for the agent.
//!
//! - [`ResumeSearchTool`]: search, fetch and update resumes in the resume service

mod resume_search;

pub use resume_search::{DEFAULT_RESULT_MAX_CHARS, ResumeSearchTool};
