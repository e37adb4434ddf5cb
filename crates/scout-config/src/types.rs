//! Configuration types mapping to the TOML schema.
//!
//! Top-level config:
//! ```toml
//! [redis]            # key-value server connection
//! [store]            # recent resume store
//! [context]          # prompt assembly
//! [resume_service]   # resume search HTTP service
//! [tools]            # tool output limits
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g. project-local
/// overrides) can be loaded and merged. Use the accessor methods to read a
/// section with defaults filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub redis: Option<RedisConfig>,
    pub store: Option<StoreSection>,
    pub context: Option<ContextSection>,
    pub resume_service: Option<ResumeServiceConfig>,
    pub tools: Option<ToolsConfig>,
}

impl ScoutConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    ///
    /// Sections are replaced whole, not field by field.
    pub fn merge(&mut self, other: ScoutConfig) {
        if other.redis.is_some() {
            self.redis = other.redis;
        }
        if other.store.is_some() {
            self.store = other.store;
        }
        if other.context.is_some() {
            self.context = other.context;
        }
        if other.resume_service.is_some() {
            self.resume_service = other.resume_service;
        }
        if other.tools.is_some() {
            self.tools = other.tools;
        }
    }

    pub fn redis(&self) -> RedisConfig {
        self.redis.clone().unwrap_or_default()
    }

    pub fn store(&self) -> StoreSection {
        self.store.clone().unwrap_or_default()
    }

    pub fn context(&self) -> ContextSection {
        self.context.clone().unwrap_or_default()
    }

    pub fn resume_service(&self) -> ResumeServiceConfig {
        self.resume_service.clone().unwrap_or_default()
    }

    pub fn tools(&self) -> ToolsConfig {
        self.tools.clone().unwrap_or_default()
    }

    /// Apply environment variable overrides from the process environment.
    ///
    /// Returns warnings for variables that were set but could not be parsed.
    pub fn apply_env_overrides(&mut self) -> Vec<String> {
        self.apply_env_overrides_with(|name| std::env::var(name).ok())
    }

    /// Apply environment variable overrides using a custom lookup.
    ///
    /// Recognised variables: `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`,
    /// `REDIS_DB` and `RESUME_SEARCH_BASE_URL`. Empty values are ignored.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut redis = self.redis();
        let mut redis_changed = false;
        if let Some(host) = get("REDIS_HOST") {
            redis.host = host;
            redis_changed = true;
        }
        if let Some(port) = get("REDIS_PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => {
                    redis.port = port;
                    redis_changed = true;
                }
                Err(_) => warnings.push(format!("Ignoring REDIS_PORT={port}: not a port number")),
            }
        }
        if let Some(password) = get("REDIS_PASSWORD") {
            redis.password = Some(password);
            redis_changed = true;
        }
        if let Some(db) = get("REDIS_DB") {
            match db.trim().parse::<i64>() {
                Ok(db) => {
                    redis.db = db;
                    redis_changed = true;
                }
                Err(_) => warnings.push(format!("Ignoring REDIS_DB={db}: not an integer")),
            }
        }
        if redis_changed {
            self.redis = Some(redis);
        }

        if let Some(base_url) = get("RESUME_SEARCH_BASE_URL") {
            let mut service = self.resume_service();
            service.base_url = base_url;
            self.resume_service = Some(service);
        }

        warnings
    }

    /// Check that every value is one the application can run with.
    pub fn validate(&self) -> Result<()> {
        let store = self.store();
        if store.max_size == 0 {
            return Err(ConfigError::invalid("store.max_size", "must be at least 1"));
        }
        if store.key_prefix.trim().is_empty() {
            return Err(ConfigError::invalid("store.key_prefix", "must not be empty"));
        }
        if store.list_name.trim().is_empty() {
            return Err(ConfigError::invalid("store.list_name", "must not be empty"));
        }

        let context = self.context();
        if context.item_max_chars == 0 {
            return Err(ConfigError::invalid(
                "context.item_max_chars",
                "must be at least 1",
            ));
        }
        if context.block_max_chars == 0 {
            return Err(ConfigError::invalid(
                "context.block_max_chars",
                "must be at least 1",
            ));
        }

        let service = self.resume_service();
        if service.base_url.trim().is_empty() {
            return Err(ConfigError::invalid(
                "resume_service.base_url",
                "must not be empty",
            ));
        }
        if service.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "resume_service.timeout_secs",
                "must be at least 1",
            ));
        }

        if self.tools().result_max_chars == 0 {
            return Err(ConfigError::invalid(
                "tools.result_max_chars",
                "must be at least 1",
            ));
        }

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Redis
// ─────────────────────────────────────────────────────────────────────────────

/// Redis connection configuration.
///
/// ```toml
/// [redis]
/// host = "127.0.0.1"
/// port = 6379
/// password = "secret"
/// db = 0
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: i64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            db: 0,
        }
    }
}

impl std::fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("db", &self.db)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

/// Which key-value backend the recent resume store runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    /// Redis server from `[redis]`.
    #[default]
    Redis,
    /// In-process map; state is lost when the process exits.
    Memory,
    /// No store. Every call fails as unavailable and prompts omit the
    /// recent resume block.
    Disabled,
}

impl std::fmt::Display for StoreBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redis => write!(f, "redis"),
            Self::Memory => write!(f, "memory"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

impl std::str::FromStr for StoreBackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            "disabled" | "none" => Ok(Self::Disabled),
            other => Err(format!(
                "unknown store backend '{other}' (expected redis, memory or disabled)"
            )),
        }
    }
}

/// Recent resume store configuration.
///
/// ```toml
/// [store]
/// backend = "redis"
/// max_size = 50
/// ttl_seconds = 604800   # 0 disables expiry
/// key_prefix = "session"
/// list_name = "recent_resumes"
/// op_timeout_ms = 5000   # 0 disables the per-call timeout
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub backend: StoreBackendKind,
    pub max_size: usize,
    pub ttl_seconds: u64,
    pub key_prefix: String,
    pub list_name: String,
    pub op_timeout_ms: u64,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackendKind::Redis,
            max_size: 50,
            ttl_seconds: 7 * 24 * 60 * 60,
            key_prefix: "session".to_string(),
            list_name: "recent_resumes".to_string(),
            op_timeout_ms: 5000,
        }
    }
}

impl StoreSection {
    /// Key expiry, `None` when disabled.
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_seconds > 0).then(|| Duration::from_secs(self.ttl_seconds))
    }

    /// Per-call backend timeout, `None` when disabled.
    pub fn op_timeout(&self) -> Option<Duration> {
        (self.op_timeout_ms > 0).then(|| Duration::from_millis(self.op_timeout_ms))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────────────────────────────────────

/// Prompt assembly configuration.
///
/// ```toml
/// [context]
/// recent_limit = 10
/// item_max_chars = 2000
/// block_max_chars = 15000
/// system_prompt_path = "prompts/system.md"
/// hot_reload = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSection {
    /// How many recent resumes go into a system prompt.
    pub recent_limit: usize,
    /// Per-summary character cap.
    pub item_max_chars: usize,
    /// Character cap for the whole recent resume block.
    pub block_max_chars: usize,
    /// Base system prompt markdown file. No base document when unset.
    pub system_prompt_path: Option<PathBuf>,
    /// Re-read the system prompt file when it changes on disk.
    pub hot_reload: bool,
}

impl Default for ContextSection {
    fn default() -> Self {
        Self {
            recent_limit: 10,
            item_max_chars: 2000,
            block_max_chars: 15000,
            system_prompt_path: None,
            hot_reload: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resume service
// ─────────────────────────────────────────────────────────────────────────────

/// Resume search service endpoint.
///
/// ```toml
/// [resume_service]
/// base_url = "http://127.0.0.1:8000"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ResumeServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ResumeServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tools
// ─────────────────────────────────────────────────────────────────────────────

/// Tool output configuration.
///
/// ```toml
/// [tools]
/// result_max_chars = 50000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// JSON results longer than this are returned as truncated text.
    pub result_max_chars: usize,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            result_max_chars: 50_000,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ScoutConfig::from_toml("").unwrap();
        assert_eq!(config, ScoutConfig::new());
        assert_eq!(config.store().max_size, 50);
        assert_eq!(config.store().backend, StoreBackendKind::Redis);
        assert_eq!(config.context().recent_limit, 10);
        assert_eq!(config.tools().result_max_chars, 50_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = ScoutConfig::from_toml(
            r#"
[redis]
host = "redis.internal"
port = 6380
db = 2

[store]
backend = "memory"
max_size = 20
ttl_seconds = 0

[context]
recent_limit = 5
system_prompt_path = "prompts/system.md"
hot_reload = true

[resume_service]
base_url = "http://resumes:9000"
"#,
        )
        .unwrap();

        assert_eq!(config.redis().host, "redis.internal");
        assert_eq!(config.redis().port, 6380);
        assert_eq!(config.redis().db, 2);
        assert_eq!(config.store().backend, StoreBackendKind::Memory);
        assert_eq!(config.store().max_size, 20);
        assert_eq!(config.store().ttl(), None);
        // Unset fields within a present section keep their defaults.
        assert_eq!(config.store().key_prefix, "session");
        assert_eq!(config.context().recent_limit, 5);
        assert!(config.context().hot_reload);
        assert_eq!(
            config.context().system_prompt_path,
            Some(PathBuf::from("prompts/system.md"))
        );
        assert_eq!(config.resume_service().base_url, "http://resumes:9000");
        assert_eq!(config.resume_service().timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = ScoutConfig::from_toml("[store]\nbackend = \"sqlite\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!(
            "Redis".parse::<StoreBackendKind>(),
            Ok(StoreBackendKind::Redis)
        );
        assert_eq!(
            "none".parse::<StoreBackendKind>(),
            Ok(StoreBackendKind::Disabled)
        );
        assert!("sqlite".parse::<StoreBackendKind>().is_err());
    }

    #[test]
    fn test_merge_replaces_sections() {
        let mut base = ScoutConfig::from_toml("[store]\nmax_size = 10\n[tools]\nresult_max_chars = 10").unwrap();
        let overlay = ScoutConfig::from_toml("[store]\nbackend = \"disabled\"").unwrap();
        base.merge(overlay);

        assert_eq!(base.store().backend, StoreBackendKind::Disabled);
        assert_eq!(base.store().max_size, 50);
        assert_eq!(base.tools().result_max_chars, 10);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ScoutConfig::new();
        let warnings = config.apply_env_overrides_with(env(&[
            ("REDIS_HOST", "10.0.0.5"),
            ("REDIS_PORT", "6390"),
            ("REDIS_PASSWORD", "pw"),
            ("REDIS_DB", "4"),
            ("RESUME_SEARCH_BASE_URL", "http://search:8000"),
        ]));

        assert!(warnings.is_empty());
        let redis = config.redis();
        assert_eq!(redis.host, "10.0.0.5");
        assert_eq!(redis.port, 6390);
        assert_eq!(redis.password.as_deref(), Some("pw"));
        assert_eq!(redis.db, 4);
        assert_eq!(config.resume_service().base_url, "http://search:8000");
    }

    #[test]
    fn test_env_overrides_bad_values_warn() {
        let mut config = ScoutConfig::new();
        let warnings =
            config.apply_env_overrides_with(env(&[("REDIS_PORT", "abc"), ("REDIS_HOST", "")]));

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("REDIS_PORT"));
        assert!(config.redis.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ScoutConfig::from_toml("[store]\nmax_size = 0").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("store.max_size"));

        let config = ScoutConfig::from_toml("[store]\nkey_prefix = \"\"").unwrap();
        assert!(config.validate().is_err());

        let config = ScoutConfig::from_toml("[store]\nkey_prefix = \"  \"").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("store.key_prefix"));

        let config = ScoutConfig::from_toml("[store]\nlist_name = \"\\t\"").unwrap();
        assert!(config.validate().is_err());

        let config = ScoutConfig::from_toml("[context]\nblock_max_chars = 0").unwrap();
        assert!(config.validate().is_err());

        let config = ScoutConfig::from_toml("[tools]\nresult_max_chars = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_store_durations() {
        let store = StoreSection::default();
        assert_eq!(store.ttl(), Some(Duration::from_secs(604_800)));
        assert_eq!(store.op_timeout(), Some(Duration::from_millis(5000)));

        let store = StoreSection {
            op_timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(store.op_timeout(), None);
    }

    #[test]
    fn test_password_hidden_in_debug() {
        let redis = RedisConfig {
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", redis);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn test_to_toml_roundtrip_preserves_sections() {
        let config = ScoutConfig::from_toml("[context]\nrecent_limit = 3").unwrap();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[context]"));
        assert_eq!(ScoutConfig::from_toml(&text).unwrap(), config);
    }
}
