use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{PostStats, PostWithStats, redact_key};
use crate::error::{DomainError, DomainResult};

use super::access::AccessControl;
use super::analytics::Analytics;
use super::content::ContentStore;

/// Key-scoped, stats-enriched read path for external sites.
pub struct PublicGateway {
    access: Arc<AccessControl>,
    content: Arc<ContentStore>,
    analytics: Arc<Analytics>,
}

impl PublicGateway {
    pub fn new(
        access: Arc<AccessControl>,
        content: Arc<ContentStore>,
        analytics: Arc<Analytics>,
    ) -> Self {
        Self {
            access,
            content,
            analytics,
        }
    }

    /// Published posts of the key's owner with their stats.
    ///
    /// An unknown key is `Unauthorized`; a valid key with nothing published
    /// is an empty list.
    pub async fn list_public(&self, api_key: &str) -> DomainResult<Vec<PostWithStats>> {
        let account_id = match self.access.resolve_account_for_key(api_key).await {
            Ok(id) => id,
            Err(DomainError::NotFound(_)) => {
                tracing::debug!(key = %redact_key(api_key), "Public listing with unknown key");
                return Err(DomainError::Unauthorized);
            }
            Err(e) => return Err(e),
        };

        let posts = self.content.list_published_by_owner(account_id).await?;
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let stats = self.analytics.stats_for_all_owned_posts(account_id).await?;
        Ok(posts
            .into_iter()
            .map(|post| {
                let post_stats = stats.get(&post.id.to_string()).copied().unwrap_or_default();
                PostWithStats::new(post, post_stats)
            })
            .collect())
    }

    /// One published post of the key's owner.
    ///
    /// Unknown keys, unknown ids and foreign posts all collapse into
    /// `NotFound`. Stats are best-effort and fall back to zero.
    pub async fn get_public_post(&self, api_key: &str, post_id: &str) -> DomainResult<PostWithStats> {
        let account_id = match self.access.resolve_account_for_key(api_key).await {
            Ok(id) => id,
            Err(DomainError::NotFound(_)) => return Err(DomainError::NotFound("Post")),
            Err(e) => return Err(e),
        };

        let id = Uuid::parse_str(post_id).map_err(|_| DomainError::NotFound("Post"))?;
        let post = self
            .content
            .get_published_by_id_and_owner(id, account_id)
            .await?;

        let stats = match self.analytics.stats_for_post(&id.to_string(), account_id).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(post_id = %id, error = %e, "Stats unavailable, serving zeros");
                PostStats::default()
            }
        };

        Ok(PostWithStats::new(post, stats))
    }
}
