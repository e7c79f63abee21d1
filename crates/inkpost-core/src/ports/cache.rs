//! Cache port - used to memoize API key resolution.

use async_trait::async_trait;
use std::time::Duration;

/// String key/value cache with optional expiry (Redis, in-memory).
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get a live value. Expired entries read as absent.
    async fn get(&self, key: &str) -> Option<String>;

    /// Set a value with optional TTL.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Cache operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}
