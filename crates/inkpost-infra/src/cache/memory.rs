//! Process-local cache. Entries are lost on restart and are not shared
//! between server instances.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use inkpost_core::ports::{Cache, CacheError};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

/// HashMap-backed cache with lazy expiry.
#[derive(Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return None,
                Some(entry) if entry.is_live(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        // Expired: drop it so the map does not grow without bound.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        None
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();
        cache.set("apikey:abc", "owner-1", None).await.unwrap();
        assert_eq!(cache.get("apikey:abc").await, Some("owner-1".to_string()));
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_ok() {
        let cache = InMemoryCache::new();
        cache.set("apikey:abc", "owner-1", None).await.unwrap();
        cache.delete("apikey:abc").await.unwrap();
        cache.delete("apikey:abc").await.unwrap();
        assert_eq!(cache.get("apikey:abc").await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent() {
        let cache = InMemoryCache::new();
        cache
            .set("apikey:abc", "owner-1", Some(Duration::from_millis(10)))
            .await
            .unwrap();
        cache.set("apikey:def", "owner-2", None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(cache.get("apikey:abc").await, None);
        assert_eq!(cache.purge_expired().await, 0);
        assert_eq!(cache.get("apikey:def").await, Some("owner-2".to_string()));
    }
}
