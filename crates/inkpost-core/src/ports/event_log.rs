//! Event log port - append-only store of engagement events.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::EngagementEvent;
use crate::error::RepoError;

/// Append-only event log. Events are never updated or deleted.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Append one event.
    async fn append(&self, event: EngagementEvent) -> Result<(), RepoError>;

    /// Every event in the log, newest first. Full scan.
    async fn scan_all(&self) -> Result<Vec<EngagementEvent>, RepoError>;

    /// Events whose target post is in `post_ids`, newest first.
    ///
    /// The default filters a full scan. Backends that index events by
    /// target post at write time override it; the result must be identical.
    async fn scan_for_posts(
        &self,
        post_ids: &HashSet<String>,
    ) -> Result<Vec<EngagementEvent>, RepoError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let events = self.scan_all().await?;
        Ok(events
            .into_iter()
            .filter(|e| e.post_id.as_ref().is_some_and(|id| post_ids.contains(id)))
            .collect())
    }
}
