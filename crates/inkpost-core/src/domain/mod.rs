//! Domain entities - the core business objects.

mod account;
mod api_key;
mod event;
mod post;
mod stats;

pub use account::Account;
pub use api_key::{ApiKey, DEFAULT_KEY_NAME, redact_key};
pub use event::{EngagementEvent, EventKind, sort_newest_first};
pub use post::{NewPost, Post, PostPatch, PostStatus};
pub use stats::{AccountStats, PostStats, PostWithStats, RECENT_ACTIVITY_LIMIT};
