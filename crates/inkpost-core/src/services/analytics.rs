use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::domain::{AccountStats, EngagementEvent, PostStats};
use crate::error::{DomainError, DomainResult};
use crate::ports::EventLog;

use super::content::ContentStore;

/// Folds the event log into per-post and per-account counters on read.
///
/// Reads may miss events appended mid-scan; that is accepted.
pub struct Analytics {
    events: Arc<dyn EventLog>,
    content: Arc<ContentStore>,
}

impl Analytics {
    pub fn new(events: Arc<dyn EventLog>, content: Arc<ContentStore>) -> Self {
        Self { events, content }
    }

    /// Record an engagement event. Open to unauthenticated callers; the
    /// target post reference is not validated and repeats are not deduplicated.
    pub async fn track(&self, kind: &str, data: Option<Value>) -> DomainResult<EngagementEvent> {
        let event = EngagementEvent::from_submission(kind, data)?;
        self.events.append(event.clone()).await?;

        tracing::debug!(
            event_id = %event.id,
            kind = %event.kind,
            post_id = event.post_id.as_deref().unwrap_or("-"),
            "Event tracked"
        );
        Ok(event)
    }

    /// Post ids arrive in any form `Uuid` parses (uppercase, braced, URN);
    /// events and ownership are keyed by the hyphenated lowercase form.
    fn canonical_post_id(post_id: &str) -> String {
        Uuid::parse_str(post_id)
            .map(|id| id.to_string())
            .unwrap_or_else(|_| post_id.to_string())
    }

    async fn ensure_owned(&self, post_id: &str, caller: Uuid) -> DomainResult<()> {
        let owned = self.content.owned_post_ids(caller).await?;
        if owned.contains(post_id) {
            Ok(())
        } else {
            Err(DomainError::Unauthorized)
        }
    }

    async fn events_for_post(&self, post_id: &str) -> DomainResult<Vec<EngagementEvent>> {
        let ids = HashSet::from([post_id.to_string()]);
        Ok(self.events.scan_for_posts(&ids).await?)
    }

    pub async fn stats_for_account(&self, account_id: Uuid) -> DomainResult<AccountStats> {
        let post_ids = self.content.owned_post_ids(account_id).await?;
        let events = self.events.scan_for_posts(&post_ids).await?;
        Ok(AccountStats::from_events(events))
    }

    pub async fn stats_for_post(&self, post_id: &str, caller: Uuid) -> DomainResult<PostStats> {
        let post_id = Self::canonical_post_id(post_id);
        self.ensure_owned(&post_id, caller).await?;
        let events = self.events_for_post(&post_id).await?;
        Ok(PostStats::fold(&events))
    }

    /// Counters for every post the account owns. Posts without events map
    /// to all-zero stats.
    pub async fn stats_for_all_owned_posts(
        &self,
        account_id: Uuid,
    ) -> DomainResult<HashMap<String, PostStats>> {
        let post_ids = self.content.owned_post_ids(account_id).await?;
        let events = self.events.scan_for_posts(&post_ids).await?;

        let mut stats: HashMap<String, PostStats> = post_ids
            .into_iter()
            .map(|id| (id, PostStats::default()))
            .collect();

        for event in &events {
            if let Some(entry) = event.post_id.as_ref().and_then(|id| stats.get_mut(id)) {
                entry.record(&event.kind);
            }
        }

        Ok(stats)
    }

    pub async fn comments_for_post(
        &self,
        post_id: &str,
        caller: Uuid,
    ) -> DomainResult<Vec<EngagementEvent>> {
        let post_id = Self::canonical_post_id(post_id);
        self.ensure_owned(&post_id, caller).await?;
        let events = self.events_for_post(&post_id).await?;
        Ok(events.into_iter().filter(EngagementEvent::is_comment).collect())
    }
}
