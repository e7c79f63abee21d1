//! In-memory repositories and event log.
//!
//! Used by tests and by the server when no `DATABASE_URL` is configured.
//! Each call holds the lock for its whole read-modify-write, so single
//! record operations are atomic.

use std::collections::{HashMap, HashSet};
use std::cmp::Reverse;
use std::hash::Hash;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use inkpost_core::domain::{Account, ApiKey, EngagementEvent, Post, sort_newest_first};
use inkpost_core::error::RepoError;
use inkpost_core::ports::{
    AccountRepository, ApiKeyRepository, BaseRepository, EventLog, PostRepository,
};

/// A record addressable by a primary key.
pub trait Keyed: Clone + Send + Sync + 'static {
    type Id: Clone + Eq + Hash + Send + Sync + 'static;

    fn key(&self) -> Self::Id;
}

impl Keyed for Account {
    type Id = Uuid;

    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Post {
    type Id = Uuid;

    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for ApiKey {
    type Id = String;

    fn key(&self) -> String {
        self.key.clone()
    }
}

/// Generic map-backed repository.
pub struct InMemoryRepository<T: Keyed> {
    records: RwLock<HashMap<T::Id, T>>,
}

impl<T: Keyed> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    async fn collect_sorted<F, K>(&self, filter: F, sort_key: K) -> Vec<T>
    where
        F: Fn(&T) -> bool,
        K: Fn(&T) -> (Reverse<DateTime<Utc>>, String),
    {
        let records = self.records.read().await;
        let mut matching: Vec<T> = records.values().filter(|r| filter(r)).cloned().collect();
        matching.sort_by_key(|r| sort_key(r));
        matching
    }
}

impl<T: Keyed> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub type InMemoryAccountRepository = InMemoryRepository<Account>;
pub type InMemoryPostRepository = InMemoryRepository<Post>;
pub type InMemoryApiKeyRepository = InMemoryRepository<ApiKey>;

#[async_trait]
impl<T: Keyed> BaseRepository<T, T::Id> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: T::Id) -> Result<Option<T>, RepoError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: T) -> Result<T, RepoError> {
        self.records
            .write()
            .await
            .insert(entity.key(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: T::Id) -> Result<(), RepoError> {
        match self.records.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError> {
        let records = self.records.read().await;
        Ok(records.values().find(|a| a.email == email).cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, RepoError> {
        let mut records = self.records.write().await;
        if records.values().any(|a| a.email == account.email) {
            return Err(RepoError::Constraint("accounts.email".to_string()));
        }
        records.insert(account.id, account.clone());
        Ok(account)
    }
}

fn newest_post_first(post: &Post) -> (Reverse<DateTime<Utc>>, String) {
    (Reverse(post.created_at), post.id.to_string())
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .collect_sorted(|p| p.owner_id == owner_id, newest_post_first)
            .await)
    }

    async fn find_published_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .collect_sorted(
                |p| p.owner_id == owner_id && p.is_published(),
                newest_post_first,
            )
            .await)
    }

    async fn update_existing(&self, post: Post) -> Result<Post, RepoError> {
        let mut records = self.records.write().await;
        let stored = records.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        *stored = post.clone();
        Ok(post)
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn find_by_account(&self, account_id: Uuid) -> Result<Vec<ApiKey>, RepoError> {
        Ok(self
            .collect_sorted(
                |k| k.account_id == account_id,
                |k| (Reverse(k.created_at), k.key.clone()),
            )
            .await)
    }

    async fn delete_owned(&self, key: &str, account_id: Uuid) -> Result<bool, RepoError> {
        let mut records = self.records.write().await;
        match records.get(key) {
            Some(existing) if existing.account_id == account_id => {
                records.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Default)]
struct EventStore {
    events: Vec<EngagementEvent>,
    /// Positions in `events`, grouped by target post at append time.
    by_post: HashMap<String, Vec<usize>>,
}

/// Append-only in-memory event log with a target-post index.
#[derive(Default)]
pub struct InMemoryEventLog {
    store: RwLock<EventStore>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.events.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl EventLog for InMemoryEventLog {
    async fn append(&self, event: EngagementEvent) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let position = store.events.len();
        if let Some(post_id) = event.post_id.clone() {
            store.by_post.entry(post_id).or_default().push(position);
        }
        store.events.push(event);
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<EngagementEvent>, RepoError> {
        let store = self.store.read().await;
        // Reverse first so equal timestamps keep latest-appended first.
        let mut events: Vec<EngagementEvent> = store.events.iter().rev().cloned().collect();
        sort_newest_first(&mut events);
        Ok(events)
    }

    async fn scan_for_posts(
        &self,
        post_ids: &HashSet<String>,
    ) -> Result<Vec<EngagementEvent>, RepoError> {
        let store = self.store.read().await;
        let mut positions: Vec<usize> = post_ids
            .iter()
            .filter_map(|id| store.by_post.get(id))
            .flatten()
            .copied()
            .collect();
        positions.sort_unstable_by(|a, b| b.cmp(a));

        let mut events: Vec<EngagementEvent> =
            positions.into_iter().map(|i| store.events[i].clone()).collect();
        sort_newest_first(&mut events);
        Ok(events)
    }
}
