//! Configuration system for the Scout recruiting assistant.
//!
//! Provides TOML-based configuration with:
//! - Redis connection settings (`[redis]`)
//! - Recent resume store settings and backend selection (`[store]`)
//! - Prompt assembly limits and the system prompt file (`[context]`)
//! - Resume service endpoint (`[resume_service]`) and tool limits (`[tools]`)
//! - Config file layering (user config dir + project-local overrides)
//! - Environment variable overrides applied on top of the files

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, load_config, load_config_file, load_config_with_options,
    user_config_dir, user_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
