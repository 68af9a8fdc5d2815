//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use blogforge_infra::JwtConfig;

/// Connection settings for the posts database.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Connection settings for the Redis post cache.
#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub url: String,
    pub connect_timeout: Duration,
    pub retry_backoff: Duration,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs on the in-memory store.
    pub database: Option<DatabaseSettings>,
    /// `None` runs on the in-memory cache.
    pub redis: Option<RedisSettings>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseSettings {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        let redis = env::var("REDIS_URL").ok().map(|url| RedisSettings {
            url,
            connect_timeout: Duration::from_secs(
                parse_var("REDIS_CONNECT_TIMEOUT_SECS").unwrap_or(5),
            ),
            retry_backoff: Duration::from_secs(parse_var("REDIS_RETRY_BACKOFF_SECS").unwrap_or(10)),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            redis,
            jwt: JwtConfig::from_env(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
