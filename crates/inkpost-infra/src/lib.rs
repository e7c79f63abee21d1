//! # Inkpost Infrastructure
//!
//! Concrete implementations of the ports defined in `inkpost-core`:
//! persistence, caching, authentication, rate limiting and text generation.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL persistence via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `rate-limit` - Rate limiting via governor
//! - `redis` - Redis-backed cache for API key resolution
//! - `ai` - OpenAI-compatible text generation client

pub mod ai;
pub mod cache;
pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - In-Memory
pub use ai::DisabledTextGenerator;
pub use cache::InMemoryCache;
pub use database::{
    DatabaseConfig, InMemoryAccountRepository, InMemoryApiKeyRepository, InMemoryEventLog,
    InMemoryPostRepository,
};

#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConnections, PostgresAccountRepository, PostgresApiKeyRepository, PostgresEventLog,
    PostgresPostRepository,
};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

#[cfg(feature = "redis")]
pub use cache::{RedisCache, RedisConfig};

#[cfg(feature = "ai")]
pub use ai::{OpenAiCompatibleGenerator, TextGeneratorConfig};
