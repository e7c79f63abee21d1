use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Account, ApiKey, Post};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
///
/// Implementations must make each call atomic for the single record it
/// touches; nothing above this trait spans records in a transaction.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Account directory.
#[async_trait]
pub trait AccountRepository: BaseRepository<Account, Uuid> {
    /// Find an account by its email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError>;

    /// Insert a new account.
    ///
    /// Fails with `Constraint` when the email is already taken, checked
    /// atomically with the insert.
    async fn create(&self, account: Account) -> Result<Account, RepoError>;
}

/// Content store.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts of an owner regardless of status, newest first.
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Published posts of an owner, newest first.
    async fn find_published_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Overwrite a stored post. Never inserts: fails with `NotFound` when
    /// the post is gone.
    async fn update_existing(&self, post: Post) -> Result<Post, RepoError>;
}

/// Key registry, keyed by the token and indexed by owning account.
#[async_trait]
pub trait ApiKeyRepository: BaseRepository<ApiKey, String> {
    /// Keys owned by `account_id`, newest first.
    async fn find_by_account(&self, account_id: Uuid) -> Result<Vec<ApiKey>, RepoError>;

    /// Delete `key` only when it belongs to `account_id`.
    ///
    /// Returns `false` when the key is absent or owned by someone else.
    async fn delete_owned(&self, key: &str, account_id: Uuid) -> Result<bool, RepoError>;
}
