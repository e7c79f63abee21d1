//! Derived statistics. Nothing here is stored; every value is folded from
//! the event log on read.

use serde::{Deserialize, Serialize};

use super::event::{EngagementEvent, EventKind};
use super::post::Post;

/// Number of events surfaced as recent activity on the account dashboard.
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

/// Engagement counters for a single post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStats {
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
}

impl PostStats {
    /// Count one event. Unknown kinds are ignored.
    pub fn record(&mut self, kind: &EventKind) {
        match kind {
            EventKind::View => self.views += 1,
            EventKind::Like => self.likes += 1,
            EventKind::Share => self.shares += 1,
            EventKind::Comment => self.comments += 1,
            EventKind::Other(_) => {}
        }
    }

    pub fn fold<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a EngagementEvent>,
    {
        events.into_iter().fold(Self::default(), |mut stats, event| {
            stats.record(&event.kind);
            stats
        })
    }
}

/// Aggregate counters across all posts of one account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub total_views: u64,
    pub total_shares: u64,
    pub total_comments: u64,
    pub total_likes: u64,
    pub recent_activity: Vec<EngagementEvent>,
}

impl AccountStats {
    /// Fold events already restricted to the account's posts and ordered
    /// newest-first.
    pub fn from_events(events: Vec<EngagementEvent>) -> Self {
        let totals = PostStats::fold(&events);
        let recent_activity = events.into_iter().take(RECENT_ACTIVITY_LIMIT).collect();

        Self {
            total_views: totals.views,
            total_shares: totals.shares,
            total_comments: totals.comments,
            total_likes: totals.likes,
            recent_activity,
        }
    }
}

/// A post enriched with its engagement counters, as served publicly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostWithStats {
    #[serde(flatten)]
    pub post: Post,
    pub stats: PostStats,
}

impl PostWithStats {
    pub fn new(post: Post, stats: PostStats) -> Self {
        Self { post, stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(kind: &str, post_id: &str) -> EngagementEvent {
        EngagementEvent::from_submission(kind, Some(json!({ "postId": post_id }))).unwrap()
    }

    #[test]
    fn test_fold_counts_by_kind() {
        let events = vec![
            event("view", "p1"),
            event("view", "p1"),
            event("like", "p1"),
            event("comment", "p1"),
            event("click", "p1"),
        ];

        let stats = PostStats::fold(&events);
        assert_eq!(
            stats,
            PostStats {
                views: 2,
                likes: 1,
                shares: 0,
                comments: 1
            }
        );
    }

    #[test]
    fn test_account_stats_caps_recent_activity() {
        let events: Vec<_> = (0..15).map(|_| event("view", "p1")).collect();
        let stats = AccountStats::from_events(events.clone());

        assert_eq!(stats.total_views, 15);
        assert_eq!(stats.recent_activity.len(), RECENT_ACTIVITY_LIMIT);
        assert_eq!(stats.recent_activity[0], events[0]);
    }

    #[test]
    fn test_account_stats_serialized_names() {
        let json = serde_json::to_value(AccountStats::default()).unwrap();
        assert_eq!(json["totalViews"], 0);
        assert_eq!(json["recentActivity"], json!([]));
    }
}
