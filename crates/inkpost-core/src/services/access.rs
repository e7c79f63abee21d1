use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::domain::redact_key;
use crate::error::{DomainError, DomainResult};
use crate::ports::{ApiKeyRepository, Cache};

/// Cache namespace for resolved API keys.
const KEY_CACHE_PREFIX: &str = "apikey";

/// Resolves API keys to accounts and checks resource ownership.
pub struct AccessControl {
    keys: Arc<dyn ApiKeyRepository>,
    cache: Option<(Arc<dyn Cache>, Duration)>,
}

impl AccessControl {
    pub fn new(keys: Arc<dyn ApiKeyRepository>) -> Self {
        Self { keys, cache: None }
    }

    /// Memoize successful resolutions for `ttl`. Unknown keys are never cached.
    pub fn with_cache(mut self, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        self.cache = Some((cache, ttl));
        self
    }

    fn cache_key(key: &str) -> String {
        format!("{}:{}", KEY_CACHE_PREFIX, key)
    }

    /// Map an API key to its owning account.
    ///
    /// Unknown keys yield `NotFound`; store failures yield `Upstream`.
    pub async fn resolve_account_for_key(&self, key: &str) -> DomainResult<Uuid> {
        if let Some((cache, _)) = &self.cache {
            if let Some(cached) = cache.get(&Self::cache_key(key)).await {
                match Uuid::parse_str(&cached) {
                    Ok(account_id) => return Ok(account_id),
                    Err(_) => {
                        tracing::warn!(key = %redact_key(key), "Discarding malformed cached key entry");
                    }
                }
            }
        }

        let record = self
            .keys
            .find_by_id(key.to_string())
            .await?
            .ok_or(DomainError::NotFound("API key"))?;

        if let Some((cache, ttl)) = &self.cache {
            let value = record.account_id.to_string();
            if let Err(e) = cache.set(&Self::cache_key(key), &value, Some(*ttl)).await {
                tracing::warn!(error = %e, "Failed to cache API key resolution");
            }
        }

        tracing::debug!(key = %redact_key(key), account_id = %record.account_id, "API key resolved");
        Ok(record.account_id)
    }

    /// Drop any memoized resolution of `key`.
    pub async fn forget(&self, key: &str) {
        if let Some((cache, _)) = &self.cache {
            if let Err(e) = cache.delete(&Self::cache_key(key)).await {
                tracing::error!(key = %redact_key(key), error = %e, "Failed to evict API key from cache");
            }
        }
    }

    /// Equality check between a resource owner and the caller. No overrides.
    pub fn assert_ownership(resource_owner: Uuid, caller: Uuid) -> DomainResult<()> {
        if resource_owner == caller {
            Ok(())
        } else {
            Err(DomainError::Unauthorized)
        }
    }
}
