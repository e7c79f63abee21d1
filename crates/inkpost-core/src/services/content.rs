use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{NewPost, Post, PostPatch};
use crate::error::{DomainError, DomainResult, RepoError};
use crate::ports::PostRepository;

use super::access::AccessControl;

/// Owner-scoped post storage.
///
/// Mutations re-read the stored post and compare its owner with the caller
/// before writing. Two concurrent updates to one post are last-write-wins;
/// an update never resurrects a post deleted in between.
pub struct ContentStore {
    posts: Arc<dyn PostRepository>,
}

impl ContentStore {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    pub async fn create(&self, owner_id: Uuid, new_post: NewPost) -> DomainResult<Post> {
        let post = self.posts.save(Post::new(owner_id, new_post)).await?;
        tracing::info!(post_id = %post.id, owner_id = %owner_id, status = %post.status, "Post created");
        Ok(post)
    }

    /// Fetch a post for mutation by `caller`.
    ///
    /// Absent and foreign posts are indistinguishable to the caller.
    async fn find_for_mutation(&self, post_id: Uuid, caller: Uuid) -> DomainResult<Post> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::NotFoundOrUnauthorized)?;

        AccessControl::assert_ownership(post.owner_id, caller)
            .map_err(|_| DomainError::NotFoundOrUnauthorized)?;

        Ok(post)
    }

    pub async fn update(&self, post_id: Uuid, caller: Uuid, patch: PostPatch) -> DomainResult<Post> {
        let mut post = self.find_for_mutation(post_id, caller).await?;
        post.apply(patch);

        match self.posts.update_existing(post).await {
            Ok(post) => {
                tracing::info!(post_id = %post.id, status = %post.status, "Post updated");
                Ok(post)
            }
            // Deleted after the ownership read.
            Err(RepoError::NotFound) => Err(DomainError::NotFoundOrUnauthorized),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, post_id: Uuid, caller: Uuid) -> DomainResult<()> {
        self.find_for_mutation(post_id, caller).await?;

        match self.posts.delete(post_id).await {
            Ok(()) => {
                tracing::info!(post_id = %post_id, "Post deleted");
                Ok(())
            }
            // Lost a race with another delete.
            Err(RepoError::NotFound) => Err(DomainError::NotFoundOrUnauthorized),
            Err(e) => Err(e.into()),
        }
    }

    /// Every post of an account, drafts included, newest first.
    pub async fn list_by_owner(&self, owner_id: Uuid) -> DomainResult<Vec<Post>> {
        Ok(self.posts.find_by_owner(owner_id).await?)
    }

    /// Published posts of an account, newest first. Never returns drafts.
    pub async fn list_published_by_owner(&self, owner_id: Uuid) -> DomainResult<Vec<Post>> {
        let posts = self.posts.find_published_by_owner(owner_id).await?;
        Ok(posts.into_iter().filter(Post::is_published).collect())
    }

    pub async fn get_published_by_id_and_owner(
        &self,
        post_id: Uuid,
        account_id: Uuid,
    ) -> DomainResult<Post> {
        self.posts
            .find_by_id(post_id)
            .await?
            .filter(|post| post.is_publicly_visible_to(account_id))
            .ok_or(DomainError::NotFound("Post"))
    }

    /// Identifiers of every post the account owns, in event-reference form.
    pub async fn owned_post_ids(&self, owner_id: Uuid) -> DomainResult<HashSet<String>> {
        let posts = self.posts.find_by_owner(owner_id).await?;
        Ok(posts.into_iter().map(|p| p.id.to_string()).collect())
    }
}
