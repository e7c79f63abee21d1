//! Persistence adapters: in-memory and PostgreSQL.

mod connections;
pub mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::DatabaseConfig;
#[cfg(feature = "postgres")]
pub use connections::DatabaseConnections;

pub use memory::{
    InMemoryAccountRepository, InMemoryApiKeyRepository, InMemoryEventLog, InMemoryPostRepository,
    InMemoryRepository,
};

#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresAccountRepository, PostgresApiKeyRepository, PostgresEventLog, PostgresPostRepository,
};
