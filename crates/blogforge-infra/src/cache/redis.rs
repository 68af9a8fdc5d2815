//! Redis cache implementation over a lazily opened, shared connection.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tokio::sync::OnceCell;

use blogforge_core::ports::{Cache, CacheError};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// How long a failed connect suppresses further attempts
    pub retry_backoff: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            retry_backoff: Duration::from_secs(10),
        }
    }
}

impl RedisConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            retry_backoff: Duration::from_secs(
                std::env::var("REDIS_RETRY_BACKOFF_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }
}

/// Owns the single process-wide Redis connection.
///
/// Nothing connects until the first [`acquire`](Self::acquire). After a
/// failed attempt, calls fail immediately until `retry_backoff` has passed,
/// so an unreachable server costs at most one `connect_timeout` per window.
/// Once open, the `ConnectionManager` reconnects on its own and clones share
/// one socket.
pub struct RedisConnector {
    client: Client,
    connect_timeout: Duration,
    retry_backoff: Duration,
    last_failure: Mutex<Option<Instant>>,
    conn: OnceCell<ConnectionManager>,
}

impl RedisConnector {
    pub fn new(config: &RedisConfig) -> Result<Self, CacheError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| CacheError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            connect_timeout: config.connect_timeout,
            retry_backoff: config.retry_backoff,
            last_failure: Mutex::new(None),
            conn: OnceCell::new(),
        })
    }

    /// Handle to the shared connection, opening it on first use.
    pub async fn acquire(&self) -> Result<ConnectionManager, CacheError> {
        if let Some(conn) = self.conn.get() {
            return Ok(conn.clone());
        }
        self.check_backoff()?;

        let conn = self
            .conn
            .get_or_try_init(|| async {
                // Callers queued behind a failed attempt land here too.
                self.check_backoff()?;

                let result = tokio::time::timeout(
                    self.connect_timeout,
                    ConnectionManager::new(self.client.clone()),
                )
                .await
                .map_err(|_| CacheError::Connection("Connection timed out".to_string()))
                .and_then(|r| r.map_err(|e| CacheError::Connection(e.to_string())));

                match result {
                    Ok(conn) => {
                        self.set_last_failure(None);
                        tracing::info!("Connected to Redis cache");
                        Ok(conn)
                    }
                    Err(e) => {
                        self.set_last_failure(Some(Instant::now()));
                        tracing::warn!(
                            error = %e,
                            retry_in_secs = self.retry_backoff.as_secs(),
                            "Redis connect failed"
                        );
                        Err(e)
                    }
                }
            })
            .await?;

        Ok(conn.clone())
    }

    fn check_backoff(&self) -> Result<(), CacheError> {
        let last = *self
            .last_failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match last {
            Some(at) if at.elapsed() < self.retry_backoff => Err(CacheError::Connection(
                "Redis unavailable, in retry backoff".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn set_last_failure(&self, at: Option<Instant>) {
        *self
            .last_failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = at;
    }
}

/// Redis-backed cache implementation.
pub struct RedisCache {
    connector: RedisConnector,
}

impl RedisCache {
    pub fn new(config: RedisConfig) -> Result<Self, CacheError> {
        let connector = RedisConnector::new(&config)?;
        tracing::info!(url = %config.url, "Redis cache configured");
        Ok(Self { connector })
    }

    /// Create from environment configuration.
    pub fn from_env() -> Result<Self, CacheError> {
        Self::new(RedisConfig::from_env())
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connector.acquire().await?;
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut conn = self.connector.acquire().await?;

        match ttl {
            Some(duration) => {
                conn.set_ex::<_, _, ()>(key, value, duration.as_secs().max(1))
                    .await
                    .map_err(|e| CacheError::Operation(e.to_string()))?;
            }
            None => {
                conn.set::<_, _, ()>(key, value)
                    .await
                    .map_err(|e| CacheError::Operation(e.to_string()))?;
            }
        }

        Ok(())
    }
}
