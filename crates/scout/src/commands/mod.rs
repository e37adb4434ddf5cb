//! CLI command handlers.

pub mod config;
pub mod prompt;
pub mod recent;
pub mod resume;
pub mod summary;

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use scout_client::ResumeClient;
use scout_config::{LoadedConfig, StoreBackendKind};
use scout_recent::{
    DEFAULT_CONNECT_TIMEOUT, KvBackend, MemoryBackend, RedisBackend, RedisSettings,
    ResumeContextService, ResumeStore, StoreConfig, UnavailableBackend,
};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Merged configuration and where it came from.
    pub loaded: LoadedConfig,
    /// Backend selected by config or `--backend`.
    pub backend: StoreBackendKind,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Open the recent resume store on the selected backend.
    ///
    /// A Redis server that cannot be reached is replaced by an unavailable
    /// backend, so prompt assembly still works without the recent block.
    pub async fn open_store(&self) -> Result<Arc<ResumeStore>> {
        let config = &self.loaded.config;
        let backend: Arc<dyn KvBackend> = match self.backend {
            StoreBackendKind::Redis => {
                let redis = config.redis();
                let settings = RedisSettings {
                    host: redis.host,
                    port: redis.port,
                    password: redis.password,
                    db: redis.db,
                    connect_timeout: config
                        .store()
                        .op_timeout()
                        .unwrap_or(DEFAULT_CONNECT_TIMEOUT),
                };
                match RedisBackend::connect(&settings).await {
                    Ok(backend) => Arc::new(backend),
                    Err(e) => {
                        warn!(error = %e, "Redis unreachable, recent resume store disabled");
                        Arc::new(UnavailableBackend::new(e.to_string()))
                    }
                }
            }
            StoreBackendKind::Memory => Arc::new(MemoryBackend::new()),
            StoreBackendKind::Disabled => Arc::new(UnavailableBackend::default()),
        };

        let store = ResumeStore::new(backend, store_config(config))?;
        info!(backend = store.backend_name(), "Recent resume store ready");
        Ok(Arc::new(store))
    }

    /// Recent resume service on top of [`open_store`](Self::open_store).
    pub async fn context_service(&self) -> Result<Arc<ResumeContextService>> {
        Ok(Arc::new(ResumeContextService::new(self.open_store().await?)))
    }

    /// HTTP client for the configured resume service.
    pub fn resume_client(&self) -> Result<ResumeClient> {
        let service = self.loaded.config.resume_service();
        let timeout = service.timeout();
        Ok(ResumeClient::builder()
            .base_url(service.base_url)
            .timeout(timeout)
            .build()?)
    }
}

fn store_config(config: &scout_config::ScoutConfig) -> StoreConfig {
    let section = config.store();
    let mut store = StoreConfig::new()
        .with_key_prefix(section.key_prefix.clone())
        .with_list_name(section.list_name.clone())
        .with_max_size(section.max_size);
    store = match section.ttl() {
        Some(ttl) => store.with_ttl(ttl),
        None => store.without_ttl(),
    };
    match section.op_timeout() {
        Some(timeout) => store.with_op_timeout(timeout),
        None => store.without_op_timeout(),
    }
}

/// Print a value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Single-line preview of at most `max_chars` characters.
pub fn truncate(s: &str, max_chars: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max_chars {
        s
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_config::{ScoutConfig, StoreSection};
    use std::time::Duration;

    #[test]
    fn test_store_config_from_section() {
        let config = ScoutConfig {
            store: Some(StoreSection {
                max_size: 5,
                ttl_seconds: 0,
                key_prefix: "chat".to_string(),
                op_timeout_ms: 250,
                ..Default::default()
            }),
            ..Default::default()
        };

        let store = store_config(&config);
        assert_eq!(store.max_size, 5);
        assert_eq!(store.key_prefix, "chat");
        assert_eq!(store.list_name, "recent_resumes");
        assert_eq!(store.ttl, None);
        assert_eq!(store.op_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("line one\nline two", 100), "line one line two");
        assert_eq!(truncate("简历简历简历", 5), "简历...");
    }
}
