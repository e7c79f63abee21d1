//! Services - the operations external collaborators call.
//!
//! Each service owns one component of the system and talks to storage only
//! through ports, so the same logic runs over in-memory and Postgres adapters.

mod access;
mod accounts;
mod analytics;
mod assistant;
mod content;
mod gateway;
mod keys;

pub use access::AccessControl;
pub use accounts::{AccountDirectory, NewAccount, Session};
pub use analytics::Analytics;
pub use assistant::{Assistant, AssistantError, ConnectionReport, GeneratedPost};
pub use content::ContentStore;
pub use gateway::PublicGateway;
pub use keys::KeyRegistry;
