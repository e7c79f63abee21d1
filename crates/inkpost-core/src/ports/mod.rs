//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod cache;
mod event_log;
mod rate_limit;
mod repository;
mod text_generation;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use cache::{Cache, CacheError};
pub use event_log::EventLog;
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{AccountRepository, ApiKeyRepository, BaseRepository, PostRepository};
pub use text_generation::{GenerationError, GeneratorInfo, TextGenerator};
