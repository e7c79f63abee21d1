//! Rate limiting port.

use async_trait::async_trait;
use std::time::Duration;

/// Per-key rate limiter (typically keyed by client address).
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Consume one unit of `key`'s quota.
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError>;
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Time until the next request for this key would be admitted.
    pub reset_after: Duration,
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}
