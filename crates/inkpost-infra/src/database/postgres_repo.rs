//! PostgreSQL repository implementations.

use std::collections::HashSet;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use inkpost_core::domain::{Account, ApiKey, EngagementEvent, Post, PostStatus};
use inkpost_core::error::RepoError;
use inkpost_core::ports::{AccountRepository, ApiKeyRepository, EventLog, PostRepository};

use super::entity::account::{self, Entity as AccountEntity};
use super::entity::api_key::{self, Entity as ApiKeyEntity};
use super::entity::event::{self, Entity as EventEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL account repository.
pub type PostgresAccountRepository = PostgresBaseRepository<AccountEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL API key repository.
pub type PostgresApiKeyRepository = PostgresBaseRepository<ApiKeyEntity>;

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError> {
        tracing::debug!(account_email = %Account::masked_email(email), "Finding account by email");

        let result = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, account: Account) -> Result<Account, RepoError> {
        let model: account::ActiveModel = account.into();
        let created = AccountEntity::insert(model)
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(created.into())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::OwnerId.eq(owner_id))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_published_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::OwnerId.eq(owner_id))
            .filter(post::Column::Status.eq(PostStatus::Published.as_str()))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update_existing(&self, post: Post) -> Result<Post, RepoError> {
        // UPDATE ... WHERE id = $1 RETURNING; no row means RecordNotUpdated.
        let model: post::ActiveModel = post.into();
        let updated = PostEntity::update(model)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(updated.into())
    }
}

#[async_trait]
impl ApiKeyRepository for PostgresApiKeyRepository {
    async fn find_by_account(&self, account_id: Uuid) -> Result<Vec<ApiKey>, RepoError> {
        let result = ApiKeyEntity::find()
            .filter(api_key::Column::AccountId.eq(account_id))
            .order_by_desc(api_key::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_owned(&self, key: &str, account_id: Uuid) -> Result<bool, RepoError> {
        // Single statement so ownership check and delete cannot interleave.
        let result = ApiKeyEntity::delete_many()
            .filter(api_key::Column::ApiKey.eq(key))
            .filter(api_key::Column::AccountId.eq(account_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}

/// Append-only event log over the `engagement_events` table.
pub struct PostgresEventLog {
    db: DbConn,
}

impl PostgresEventLog {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventLog for PostgresEventLog {
    async fn append(&self, event: EngagementEvent) -> Result<(), RepoError> {
        let model: event::ActiveModel = event.into();
        EventEntity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<EngagementEvent>, RepoError> {
        let result = EventEntity::find()
            .order_by_desc(event::Column::Timestamp)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn scan_for_posts(
        &self,
        post_ids: &HashSet<String>,
    ) -> Result<Vec<EngagementEvent>, RepoError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = EventEntity::find()
            .filter(event::Column::PostId.is_in(post_ids.iter().cloned()))
            .order_by_desc(event::Column::Timestamp)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
