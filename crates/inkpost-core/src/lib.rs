//! # Inkpost Core
//!
//! The domain layer of the Inkpost headless content API.
//! Entities, ports and the services that enforce tenant isolation and fold
//! engagement events into statistics. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, DomainResult, RepoError};
