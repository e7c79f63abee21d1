//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use inkpost_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server on in-memory stores.
    pub database: Option<DatabaseConfig>,
    pub key_cache: KeyCacheConfig,
    /// Key rate limits on forwarded client addresses. Only safe behind a
    /// proxy that overwrites those headers.
    pub trust_proxy_headers: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            key_cache: KeyCacheConfig::from_env(),
            trust_proxy_headers: env::var("TRUST_PROXY_HEADERS")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

/// API key resolution cache.
#[derive(Debug, Clone, Default)]
pub struct KeyCacheConfig {
    /// `None` disables the cache; every public request hits the key store.
    pub ttl: Option<Duration>,
    /// Use Redis instead of a process-local map when set.
    pub redis_url: Option<String>,
}

impl KeyCacheConfig {
    pub fn from_env() -> Self {
        Self {
            ttl: env::var("API_KEY_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            redis_url: env::var("REDIS_URL").ok(),
        }
    }
}
