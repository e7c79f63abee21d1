//! Services wired over the in-memory adapters.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use inkpost_core::domain::{ApiKey, EngagementEvent, NewPost, Post, PostPatch, PostStats, PostStatus};
use inkpost_core::error::RepoError;
use inkpost_core::ports::{
    ApiKeyRepository, AuthError, BaseRepository, EventLog, PasswordService, PostRepository,
    TokenClaims, TokenService,
};
use inkpost_core::services::{
    AccessControl, AccountDirectory, Analytics, ContentStore, KeyRegistry, NewAccount,
    PublicGateway,
};
use inkpost_core::DomainError;
use inkpost_infra::{
    InMemoryAccountRepository, InMemoryApiKeyRepository, InMemoryCache, InMemoryEventLog,
    InMemoryPostRepository,
};

struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("plain:{password}"))
    }
}

struct OpaqueTokens;

impl TokenService for OpaqueTokens {
    fn generate_token(&self, account_id: Uuid, _email: &str) -> Result<String, AuthError> {
        Ok(account_id.to_string())
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let account_id =
            Uuid::parse_str(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(TokenClaims {
            account_id,
            email: String::new(),
            exp: i64::MAX,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        3600
    }
}

struct App {
    accounts: AccountDirectory,
    keys: KeyRegistry,
    content: Arc<ContentStore>,
    analytics: Arc<Analytics>,
    gateway: PublicGateway,
}

fn app_with(access: AccessControl, keys_repo: Arc<dyn ApiKeyRepository>) -> App {
    assemble(
        access,
        keys_repo,
        Arc::new(InMemoryPostRepository::new()),
        Arc::new(InMemoryEventLog::new()),
    )
}

fn assemble(
    access: AccessControl,
    keys_repo: Arc<dyn ApiKeyRepository>,
    posts: Arc<dyn PostRepository>,
    events: Arc<dyn EventLog>,
) -> App {
    let access = Arc::new(access);
    let content = Arc::new(ContentStore::new(posts));
    let analytics = Arc::new(Analytics::new(events, content.clone()));

    App {
        accounts: AccountDirectory::new(
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(PlainPasswords),
            Arc::new(OpaqueTokens),
        ),
        keys: KeyRegistry::new(keys_repo, access.clone()),
        gateway: PublicGateway::new(access, content.clone(), analytics.clone()),
        content,
        analytics,
    }
}

fn app() -> App {
    let keys = Arc::new(InMemoryApiKeyRepository::new());
    app_with(AccessControl::new(keys.clone()), keys)
}

/// Event log whose backing store is down.
struct UnreachableEventLog;

#[async_trait]
impl EventLog for UnreachableEventLog {
    async fn append(&self, _event: EngagementEvent) -> Result<(), RepoError> {
        Err(RepoError::Connection("event store down".to_string()))
    }

    async fn scan_all(&self) -> Result<Vec<EngagementEvent>, RepoError> {
        Err(RepoError::Connection("event store down".to_string()))
    }
}

/// Key registry whose backing store is down.
struct UnreachableKeys;

#[async_trait]
impl BaseRepository<ApiKey, String> for UnreachableKeys {
    async fn find_by_id(&self, _id: String) -> Result<Option<ApiKey>, RepoError> {
        Err(RepoError::Connection("key store down".to_string()))
    }

    async fn save(&self, _entity: ApiKey) -> Result<ApiKey, RepoError> {
        Err(RepoError::Connection("key store down".to_string()))
    }

    async fn delete(&self, _id: String) -> Result<(), RepoError> {
        Err(RepoError::Connection("key store down".to_string()))
    }
}

#[async_trait]
impl ApiKeyRepository for UnreachableKeys {
    async fn find_by_account(&self, _account_id: Uuid) -> Result<Vec<ApiKey>, RepoError> {
        Err(RepoError::Connection("key store down".to_string()))
    }

    async fn delete_owned(&self, _key: &str, _account_id: Uuid) -> Result<bool, RepoError> {
        Err(RepoError::Connection("key store down".to_string()))
    }
}

/// Post store where another writer deletes a post right after it is read.
struct DeletedAfterRead {
    inner: InMemoryPostRepository,
    armed: AtomicBool,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for DeletedAfterRead {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let found = self.inner.find_by_id(id).await?;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.inner.delete(id).await?;
        }
        Ok(found)
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        self.inner.save(entity).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.inner.delete(id).await
    }
}

#[async_trait]
impl PostRepository for DeletedAfterRead {
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>, RepoError> {
        self.inner.find_by_owner(owner_id).await
    }

    async fn find_published_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>, RepoError> {
        self.inner.find_published_by_owner(owner_id).await
    }

    async fn update_existing(&self, post: Post) -> Result<Post, RepoError> {
        self.inner.update_existing(post).await
    }
}

fn draft(title: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        content: format!("{title} body"),
        cover_image: None,
        status: Some(PostStatus::Draft),
    }
}

fn published(title: &str) -> NewPost {
    NewPost {
        status: Some(PostStatus::Published),
        ..draft(title)
    }
}

async fn register(app: &App, email: &str) -> Uuid {
    app.accounts
        .register(NewAccount {
            email: email.to_string(),
            password: "long-enough-password".to_string(),
            display_name: "Writer".to_string(),
        })
        .await
        .unwrap()
        .account
        .id
}

async fn track(app: &App, kind: &str, post: &Post) {
    app.analytics
        .track(kind, Some(json!({ "postId": post.id.to_string() })))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_tenant_isolation() {
    let app = app();
    let alice = register(&app, "alice@example.com").await;
    let bob = register(&app, "bob@example.com").await;

    app.content.create(alice, published("alice one")).await.unwrap();
    app.content.create(alice, published("alice two")).await.unwrap();
    app.content.create(bob, published("bob one")).await.unwrap();

    let alice_key = app.keys.create_key(alice, None).await.unwrap();
    let bob_key = app.keys.create_key(bob, None).await.unwrap();

    let alice_posts = app.gateway.list_public(&alice_key.key).await.unwrap();
    assert_eq!(alice_posts.len(), 2);
    assert!(alice_posts.iter().all(|p| p.post.owner_id == alice));

    let bob_posts = app.gateway.list_public(&bob_key.key).await.unwrap();
    assert_eq!(bob_posts.len(), 1);
    assert!(bob_posts.iter().all(|p| p.post.owner_id == bob));

    // Alice's key cannot reach Bob's post by id either.
    let bob_post_id = bob_posts[0].post.id.to_string();
    let foreign = app.gateway.get_public_post(&alice_key.key, &bob_post_id).await;
    assert!(matches!(foreign, Err(DomainError::NotFound(_))));
}

#[tokio::test]
async fn test_draft_invisibility() {
    let app = app();
    let owner = register(&app, "owner@example.com").await;
    let key = app.keys.create_key(owner, None).await.unwrap();

    let hidden = app.content.create(owner, draft("hidden")).await.unwrap();
    app.content.create(owner, published("visible")).await.unwrap();

    let listed = app.gateway.list_public(&key.key).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].post.title, "visible");

    let direct = app
        .gateway
        .get_public_post(&key.key, &hidden.id.to_string())
        .await;
    assert!(matches!(direct, Err(DomainError::NotFound(_))));
}

#[tokio::test]
async fn test_key_ownership_enforcement() {
    let app = app();
    let owner = register(&app, "owner@example.com").await;
    let intruder = register(&app, "intruder@example.com").await;

    let key = app.keys.create_key(owner, Some("Site".to_string())).await.unwrap();

    assert!(!app.keys.delete_key(&key.key, intruder).await.unwrap());

    let still_listed = app.keys.list_keys(owner).await.unwrap();
    assert_eq!(still_listed.len(), 1);
    assert_eq!(still_listed[0].key, key.key);
    assert_eq!(still_listed[0].name, "Site");

    assert!(app.keys.delete_key(&key.key, owner).await.unwrap());
    assert!(app.keys.list_keys(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mutation_by_non_owner_leaves_post_unchanged() {
    let app = app();
    let owner = register(&app, "owner@example.com").await;
    let other = register(&app, "other@example.com").await;

    let post = app.content.create(owner, draft("original")).await.unwrap();

    let patch = PostPatch {
        title: Some("hijacked".to_string()),
        status: Some(PostStatus::Published),
        ..Default::default()
    };
    let update = app.content.update(post.id, other, patch).await;
    assert!(matches!(update, Err(DomainError::NotFoundOrUnauthorized)));

    let delete = app.content.delete(post.id, other).await;
    assert!(matches!(delete, Err(DomainError::NotFoundOrUnauthorized)));

    let missing = app.content.delete(Uuid::new_v4(), owner).await;
    assert!(matches!(missing, Err(DomainError::NotFoundOrUnauthorized)));

    let stored = app.content.list_by_owner(owner).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "original");
    assert_eq!(stored[0].status, PostStatus::Draft);
    assert_eq!(stored[0].updated_at, post.updated_at);
}

#[tokio::test]
async fn test_stats_fold_and_zero_default() {
    let app = app();
    let owner = register(&app, "owner@example.com").await;

    let p1 = app.content.create(owner, published("p1")).await.unwrap();
    let p2 = app.content.create(owner, published("p2")).await.unwrap();
    let quiet = app.content.create(owner, draft("quiet")).await.unwrap();

    track(&app, "view", &p1).await;
    track(&app, "view", &p1).await;
    track(&app, "like", &p1).await;
    track(&app, "share", &p2).await;

    let p1_stats = app
        .analytics
        .stats_for_post(&p1.id.to_string(), owner)
        .await
        .unwrap();
    assert_eq!(
        p1_stats,
        PostStats {
            views: 2,
            likes: 1,
            shares: 0,
            comments: 0
        }
    );

    let all = app.analytics.stats_for_all_owned_posts(owner).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[&p2.id.to_string()].shares, 1);
    assert_eq!(all[&quiet.id.to_string()], PostStats::default());

    let account = app.analytics.stats_for_account(owner).await.unwrap();
    assert_eq!(account.total_views, 2);
    assert_eq!(account.total_likes, 1);
    assert_eq!(account.total_shares, 1);
    assert_eq!(account.recent_activity.len(), 4);
}

#[tokio::test]
async fn test_stats_ignore_foreign_and_dangling_events() {
    let app = app();
    let owner = register(&app, "owner@example.com").await;
    let other = register(&app, "other@example.com").await;

    let mine = app.content.create(owner, published("mine")).await.unwrap();
    let theirs = app.content.create(other, published("theirs")).await.unwrap();

    track(&app, "view", &theirs).await;
    app.analytics
        .track("view", Some(json!({ "postId": "preview-post" })))
        .await
        .unwrap();
    app.analytics.track("bookmark", None).await.unwrap();

    let account = app.analytics.stats_for_account(owner).await.unwrap();
    assert_eq!(account.total_views, 0);
    assert!(account.recent_activity.is_empty());

    let stranger = app
        .analytics
        .stats_for_post(&theirs.id.to_string(), owner)
        .await;
    assert!(matches!(stranger, Err(DomainError::Unauthorized)));

    let comments = app
        .analytics
        .comments_for_post(&mine.id.to_string(), owner)
        .await
        .unwrap();
    assert!(comments.is_empty());
}

#[tokio::test]
async fn test_comments_are_returned_newest_first() {
    let app = app();
    let owner = register(&app, "owner@example.com").await;
    let post = app.content.create(owner, published("talked about")).await.unwrap();

    for text in ["first", "second"] {
        app.analytics
            .track(
                "comment",
                Some(json!({ "postId": post.id.to_string(), "comment": text })),
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    track(&app, "view", &post).await;

    let comments = app
        .analytics
        .comments_for_post(&post.id.to_string(), owner)
        .await
        .unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].payload["comment"], "second");
    assert_eq!(comments[1].payload["comment"], "first");
}

#[tokio::test]
async fn test_idempotent_public_read() {
    let app = app();
    let owner = register(&app, "owner@example.com").await;
    let key = app.keys.create_key(owner, None).await.unwrap();

    for title in ["a", "b", "c"] {
        app.content.create(owner, published(title)).await.unwrap();
    }

    let first = app.gateway.list_public(&key.key).await.unwrap();
    let second = app.gateway.list_public(&key.key).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unknown_key_versus_empty_account() {
    let app = app();
    let owner = register(&app, "owner@example.com").await;
    let key = app.keys.create_key(owner, None).await.unwrap();

    let garbage = app.gateway.list_public("garbage-key").await;
    assert!(matches!(garbage, Err(DomainError::Unauthorized)));

    let empty = app.gateway.list_public(&key.key).await.unwrap();
    assert!(empty.is_empty());

    let lookup = app.gateway.get_public_post("garbage-key", "not-a-uuid").await;
    assert!(matches!(lookup, Err(DomainError::NotFound(_))));
}

#[tokio::test]
async fn test_deleted_key_stops_resolving_with_cache() {
    let keys = Arc::new(InMemoryApiKeyRepository::new());
    let access = AccessControl::new(keys.clone())
        .with_cache(Arc::new(InMemoryCache::new()), Duration::from_secs(60));
    let app = app_with(access, keys);

    let owner = register(&app, "owner@example.com").await;
    let key = app.keys.create_key(owner, None).await.unwrap();

    // Warm the cache.
    assert!(app.gateway.list_public(&key.key).await.is_ok());

    assert!(app.keys.delete_key(&key.key, owner).await.unwrap());
    let revoked = app.gateway.list_public(&key.key).await;
    assert!(matches!(revoked, Err(DomainError::Unauthorized)));
}

#[tokio::test]
async fn test_register_and_login() {
    let app = app();
    register(&app, "Writer@Example.com").await;

    let duplicate = app
        .accounts
        .register(NewAccount {
            email: "writer@example.com".to_string(),
            password: "another-password".to_string(),
            display_name: "Copy".to_string(),
        })
        .await;
    assert!(matches!(duplicate, Err(DomainError::Duplicate(_))));

    let session = app
        .accounts
        .login("writer@example.com", "long-enough-password")
        .await
        .unwrap();
    assert_eq!(session.account.email, "writer@example.com");
    assert_eq!(session.expires_in, 3600);

    let wrong = app.accounts.login("writer@example.com", "nope-nope-nope").await;
    assert!(matches!(wrong, Err(DomainError::Unauthorized)));
    let unknown = app.accounts.login("ghost@example.com", "whatever123").await;
    assert!(matches!(unknown, Err(DomainError::Unauthorized)));
}

#[tokio::test]
async fn test_end_to_end_publish_and_view() {
    let app = app();

    let account = register(&app, "e2e@example.com").await;
    let key = app.keys.create_key(account, None).await.unwrap();
    let post = app.content.create(account, draft("launch")).await.unwrap();

    assert!(app.gateway.list_public(&key.key).await.unwrap().is_empty());

    let publish = PostPatch {
        status: Some(PostStatus::Published),
        ..Default::default()
    };
    let post = app.content.update(post.id, account, publish).await.unwrap();

    let listed = app.gateway.list_public(&key.key).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].post.id, post.id);
    assert_eq!(listed[0].stats, PostStats::default());

    track(&app, "view", &post).await;

    let fetched = app
        .gateway
        .get_public_post(&key.key, &post.id.to_string())
        .await
        .unwrap();
    assert_eq!(fetched.stats.views, 1);
}

#[tokio::test]
async fn test_non_canonical_post_id_keeps_stats() {
    let app = app();
    let owner = register(&app, "owner@example.com").await;
    let key = app.keys.create_key(owner, None).await.unwrap();
    let post = app.content.create(owner, published("shouty")).await.unwrap();
    track(&app, "view", &post).await;

    let upper = post.id.to_string().to_uppercase();
    let fetched = app.gateway.get_public_post(&key.key, &upper).await.unwrap();
    assert_eq!(fetched.post.id, post.id);
    assert_eq!(fetched.stats.views, 1);

    let stats = app.analytics.stats_for_post(&upper, owner).await.unwrap();
    assert_eq!(stats.views, 1);

    let braced = format!("{{{}}}", post.id);
    assert!(app.analytics.comments_for_post(&braced, owner).await.is_ok());
}

#[tokio::test]
async fn test_update_after_concurrent_delete_does_not_resurrect() {
    let posts = Arc::new(DeletedAfterRead {
        inner: InMemoryPostRepository::new(),
        armed: AtomicBool::new(false),
    });
    let keys = Arc::new(InMemoryApiKeyRepository::new());
    let app = assemble(
        AccessControl::new(keys.clone()),
        keys,
        posts.clone(),
        Arc::new(InMemoryEventLog::new()),
    );

    let owner = register(&app, "owner@example.com").await;
    let post = app.content.create(owner, published("doomed")).await.unwrap();

    posts.armed.store(true, Ordering::SeqCst);
    let patch = PostPatch {
        title: Some("edited".to_string()),
        ..Default::default()
    };
    let result = app.content.update(post.id, owner, patch).await;

    assert!(matches!(result, Err(DomainError::NotFoundOrUnauthorized)));
    assert!(posts.inner.find_by_id(post.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_stats_failure_serves_zero_stats_for_single_post() {
    let keys = Arc::new(InMemoryApiKeyRepository::new());
    let app = assemble(
        AccessControl::new(keys.clone()),
        keys,
        Arc::new(InMemoryPostRepository::new()),
        Arc::new(UnreachableEventLog),
    );

    let owner = register(&app, "owner@example.com").await;
    let key = app.keys.create_key(owner, None).await.unwrap();
    let post = app.content.create(owner, published("resilient")).await.unwrap();

    let fetched = app
        .gateway
        .get_public_post(&key.key, &post.id.to_string())
        .await
        .unwrap();
    assert_eq!(fetched.post.title, "resilient");
    assert_eq!(fetched.stats, PostStats::default());

    // The listing and ingestion paths do not degrade.
    let listed = app.gateway.list_public(&key.key).await;
    assert!(matches!(listed, Err(DomainError::Upstream(_))));
    let tracked = app
        .analytics
        .track("view", Some(json!({ "postId": post.id.to_string() })))
        .await;
    assert!(matches!(tracked, Err(DomainError::Upstream(_))));
}

#[tokio::test]
async fn test_unreachable_key_store_is_upstream() {
    let keys: Arc<dyn ApiKeyRepository> = Arc::new(UnreachableKeys);
    let app = app_with(AccessControl::new(keys.clone()), keys);

    let listed = app.gateway.list_public("any-key").await;
    assert!(matches!(listed, Err(DomainError::Upstream(_))));

    let single = app
        .gateway
        .get_public_post("any-key", &Uuid::new_v4().to_string())
        .await;
    assert!(matches!(single, Err(DomainError::Upstream(_))));
}
