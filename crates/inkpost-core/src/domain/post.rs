use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Lifecycle state of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    #[default]
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(DomainError::Validation(format!(
                "Unknown post status '{}'",
                other
            ))),
        }
    }
}

/// Post entity - a content item owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "postId")]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    /// Opaque rich content; never inspected by the core.
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub status: Option<PostStatus>,
}

/// Field-level changes for an update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub status: Option<PostStatus>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.cover_image.is_none()
            && self.status.is_none()
    }
}

impl Post {
    /// Create a new post. Status defaults to published.
    pub fn new(owner_id: Uuid, new_post: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: new_post.title,
            content: new_post.content,
            cover_image: new_post.cover_image,
            status: new_post.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge `patch` into this post and refresh `updated_at`.
    pub fn apply(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(cover_image) = patch.cover_image {
            self.cover_image = Some(cover_image);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now().max(self.updated_at);
    }

    pub fn is_owned_by(&self, account_id: Uuid) -> bool {
        self.owner_id == account_id
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Whether the account resolved from an API key may read this post.
    pub fn is_publicly_visible_to(&self, account_id: Uuid) -> bool {
        self.is_published() && self.is_owned_by(account_id)
    }
}
