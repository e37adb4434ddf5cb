//! Redis key-value backend.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, ConnectionAddr, ConnectionInfo, RedisConnectionInfo, RedisError};
use tracing::{debug, info, warn};

use super::{KvBackend, KvOp};
use crate::error::{Result, StoreError};

/// Default bound on establishing the initial connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Reconnect attempts made by the connection manager before giving up.
const CONNECT_RETRIES: usize = 1;

/// Connection settings for [`RedisBackend`].
#[derive(Debug, Clone)]
pub struct RedisSettings {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Optional password (AUTH).
    pub password: Option<String>,
    /// Logical database index.
    pub db: i64,
    /// Bound on opening the connection, retries included.
    pub connect_timeout: Duration,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            db: 0,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl RedisSettings {
    fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo {
                db: self.db,
                password: self.password.clone(),
                ..Default::default()
            },
        }
    }
}

/// Key-value backend backed by a Redis server.
///
/// Holds one multiplexed, auto-reconnecting connection. Clones share it, so
/// build one backend at startup and pass it around behind an `Arc`.
#[derive(Clone)]
pub struct RedisBackend {
    conn: ConnectionManager,
    endpoint: String,
}

impl std::fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBackend")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl RedisBackend {
    /// Connect to the server described by `settings`.
    ///
    /// Fails with [`StoreError::Timeout`] when the server does not accept the
    /// connection within `connect_timeout`.
    pub async fn connect(settings: &RedisSettings) -> Result<Self> {
        let endpoint = format!("{}:{}/{}", settings.host, settings.port, settings.db);
        let client = redis::Client::open(settings.connection_info()).map_err(map_redis_error)?;
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(CONNECT_RETRIES)
            .set_connection_timeout(settings.connect_timeout);

        let conn = tokio::time::timeout(
            settings.connect_timeout,
            ConnectionManager::new_with_config(client, config),
        )
        .await
        .map_err(|_| {
            warn!(endpoint = %endpoint, "Redis connect timed out");
            StoreError::Timeout(settings.connect_timeout)
        })?
        .map_err(map_redis_error)?;

        info!(endpoint = %endpoint, "Connected to Redis");
        Ok(Self { conn, endpoint })
    }

    /// The `host:port/db` this backend talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

#[async_trait]
impl KvBackend for RedisBackend {
    fn name(&self) -> &str {
        "redis"
    }

    async fn list_remove_value(&self, key: &str, value: &str) -> Result<u64> {
        self.conn()
            .lrem(key, 0, value)
            .await
            .map_err(map_redis_error)
    }

    async fn list_push_front(&self, key: &str, value: &str) -> Result<u64> {
        self.conn().lpush(key, value).await.map_err(map_redis_error)
    }

    async fn list_trim(&self, key: &str, start: isize, stop: isize) -> Result<()> {
        self.conn()
            .ltrim(key, start, stop)
            .await
            .map_err(map_redis_error)
    }

    async fn key_expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        self.conn()
            .expire(key, ttl_seconds(ttl))
            .await
            .map_err(map_redis_error)
    }

    async fn execute_atomically(&self, ops: Vec<KvOp>) -> Result<()> {
        let mut pipe = redis::pipe();
        pipe.atomic();
        for op in &ops {
            match op {
                KvOp::ListRemoveValue { key, value } => {
                    pipe.lrem(key, 0, value).ignore();
                }
                KvOp::ListPushFront { key, value } => {
                    pipe.lpush(key, value).ignore();
                }
                KvOp::ListTrim { key, start, stop } => {
                    pipe.ltrim(key, *start, *stop).ignore();
                }
                KvOp::KeyExpire { key, ttl } => {
                    pipe.expire(key, ttl_seconds(*ttl)).ignore();
                }
                KvOp::KeyDelete { key } => {
                    pipe.del(key).ignore();
                }
                KvOp::HashSetFields { key, fields } => {
                    if !fields.is_empty() {
                        pipe.hset_multiple(key, fields).ignore();
                    }
                }
            }
        }

        debug!(commands = ops.len(), "Executing MULTI/EXEC batch");
        let mut conn = self.conn();
        pipe.query_async::<()>(&mut conn)
            .await
            .map_err(map_redis_error)
    }

    async fn list_range(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        self.conn()
            .lrange(key, start, stop)
            .await
            .map_err(map_redis_error)
    }

    async fn key_delete(&self, key: &str) -> Result<u64> {
        self.conn().del(key).await.map_err(map_redis_error)
    }

    async fn hash_set_fields(&self, key: &str, fields: &[(String, String)]) -> Result<()> {
        if fields.is_empty() {
            return Ok(());
        }
        self.conn()
            .hset_multiple(key, fields)
            .await
            .map_err(map_redis_error)
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>> {
        self.conn().hgetall(key).await.map_err(map_redis_error)
    }
}

/// Redis expiry has one-second resolution; round up so short TTLs never become 0.
fn ttl_seconds(ttl: Duration) -> i64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(1) as i64
}

fn map_redis_error(err: RedisError) -> StoreError {
    if err.is_timeout() {
        // Client-side timeouts carry no duration; the store reports its own.
        StoreError::unavailable(format!("redis timed out: {}", err))
    } else if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
        StoreError::unavailable(err.to_string())
    } else {
        StoreError::backend(err.to_string())
    }
}
