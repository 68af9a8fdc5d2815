//! Application state - shared across all handlers.

use std::sync::Arc;

use blogforge_core::ports::{Cache, PostRepository, UserRepository};
use blogforge_core::{ExploreService, PostService};
use blogforge_infra::{InMemoryCache, InMemoryStore};

use crate::config::{AppConfig, DatabaseSettings, RedisSettings};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub explore: Arc<ExploreService>,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (users, posts) = match &config.database {
            Some(settings) => connect_database(settings).await,
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                in_memory_store()
            }
        };

        let cache = match &config.redis {
            Some(settings) => connect_cache(settings),
            None => {
                tracing::info!("REDIS_URL not set. Caching posts in process memory.");
                Arc::new(InMemoryCache::new()) as Arc<dyn Cache>
            }
        };

        tracing::info!("Application state initialized");
        Self::from_parts(users, posts, cache)
    }

    /// Wire the services over already-built adapters.
    pub fn from_parts(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            posts: Arc::new(PostService::new(posts.clone(), cache)),
            explore: Arc::new(ExploreService::new(posts)),
            users,
        }
    }
}

type Repositories = (Arc<dyn UserRepository>, Arc<dyn PostRepository>);

fn in_memory_store() -> Repositories {
    let store = InMemoryStore::new();
    (Arc::new(store.users()), Arc::new(store.posts()))
}

#[cfg(feature = "postgres")]
async fn connect_database(settings: &DatabaseSettings) -> Repositories {
    use blogforge_infra::database::{
        DatabaseConfig, DatabaseConnections, PostgresPostRepository, PostgresUserRepository,
    };

    let config = DatabaseConfig {
        url: settings.url.clone(),
        max_connections: settings.max_connections,
        min_connections: settings.min_connections,
    };

    match DatabaseConnections::init(&config).await {
        Ok(connections) => (
            Arc::new(PostgresUserRepository::new(connections.main.clone())),
            Arc::new(PostgresPostRepository::new(connections.main)),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
            in_memory_store()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn connect_database(_settings: &DatabaseSettings) -> Repositories {
    tracing::warn!("DATABASE_URL is set but the postgres feature is disabled - using in-memory store");
    in_memory_store()
}

#[cfg(feature = "redis")]
fn connect_cache(settings: &RedisSettings) -> Arc<dyn Cache> {
    use blogforge_infra::{RedisCache, RedisConfig};

    let config = RedisConfig {
        url: settings.url.clone(),
        connect_timeout: settings.connect_timeout,
        retry_backoff: settings.retry_backoff,
    };

    // The connection itself opens lazily on the first cache call.
    match RedisCache::new(config) {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            tracing::error!(error = %e, "Invalid REDIS_URL. Caching posts in process memory.");
            Arc::new(InMemoryCache::new())
        }
    }
}

#[cfg(not(feature = "redis"))]
fn connect_cache(_settings: &RedisSettings) -> Arc<dyn Cache> {
    tracing::warn!("REDIS_URL is set but the redis feature is disabled - using in-memory cache");
    Arc::new(InMemoryCache::new())
}
