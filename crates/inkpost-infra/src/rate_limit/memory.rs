//! Per-key in-memory rate limiter using the governor crate.

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter as GovernorRateLimiter};

use inkpost_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

type KeyedRateLimiter = GovernorRateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// In-memory rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window and key.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
    /// Forget replenished clients every this many checks.
    pub sweep_every: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
            sweep_every: 1024,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_requests),
            window: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.window),
            sweep_every: std::env::var("RATE_LIMIT_SWEEP_EVERY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.sweep_every),
        }
    }

    /// GCRA quota: a full burst of `max_requests`, replenished evenly over
    /// the window.
    fn quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.max_requests).unwrap_or(NonZeroU32::MIN);
        Quota::with_period(self.window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst)
    }
}

/// Keyed GCRA limiter. Limits are per process, not shared across instances.
pub struct InMemoryRateLimiter {
    limiter: KeyedRateLimiter,
    clock: DefaultClock,
    checks: AtomicU64,
    sweep_every: u64,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let clock = DefaultClock::default();
        let limiter =
            GovernorRateLimiter::new(config.quota(), DefaultKeyedStateStore::default(), clock.clone());

        Self {
            limiter,
            clock,
            checks: AtomicU64::new(0),
            sweep_every: config.sweep_every.max(1),
        }
    }

    pub fn from_env() -> Self {
        Self::new(RateLimitConfig::from_env())
    }

    /// Forget keys whose quota has fully replenished.
    pub fn shrink(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    fn maybe_sweep(&self) {
        let checks = self.checks.fetch_add(1, Ordering::Relaxed) + 1;
        if checks % self.sweep_every == 0 {
            self.shrink();
            tracing::debug!(clients = self.tracked_clients(), "Rate limiter swept");
        }
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        let result = match self.limiter.check_key(&key.to_string()) {
            Ok(()) => RateLimitResult {
                allowed: true,
                reset_after: Duration::ZERO,
            },
            Err(not_until) => RateLimitResult {
                allowed: false,
                reset_after: not_until.wait_time_from(self.clock.now()),
            },
        };

        self.maybe_sweep();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32) -> InMemoryRateLimiter {
        InMemoryRateLimiter::new(RateLimitConfig {
            max_requests,
            window: Duration::from_secs(60),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_burst_then_reject() {
        let limiter = limiter(2);

        assert!(limiter.check("10.0.0.1").await.unwrap().allowed);
        assert!(limiter.check("10.0.0.1").await.unwrap().allowed);

        let rejected = limiter.check("10.0.0.1").await.unwrap();
        assert!(!rejected.allowed);
        assert!(rejected.reset_after > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_keys_are_limited_independently() {
        let limiter = limiter(1);

        assert!(limiter.check("10.0.0.1").await.unwrap().allowed);
        assert!(!limiter.check("10.0.0.1").await.unwrap().allowed);
        assert!(limiter.check("10.0.0.2").await.unwrap().allowed);
    }

    #[test]
    fn test_zero_config_still_builds_a_quota() {
        let config = RateLimitConfig {
            max_requests: 0,
            window: Duration::ZERO,
            sweep_every: 0,
        };
        assert_eq!(config.quota().burst_size().get(), 1);
    }

    #[tokio::test]
    async fn test_replenished_clients_are_swept() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_millis(20),
            sweep_every: 3,
        });

        limiter.check("10.0.0.1").await.unwrap();
        limiter.check("10.0.0.2").await.unwrap();
        assert_eq!(limiter.tracked_clients(), 2);

        tokio::time::sleep(Duration::from_millis(60)).await;

        // Third check triggers a sweep; only the fresh client remains.
        assert!(limiter.check("10.0.0.3").await.unwrap().allowed);
        assert_eq!(limiter.tracked_clients(), 1);
    }
}
