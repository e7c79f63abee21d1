//! SeaORM entities for the four collections.

pub mod account;
pub mod api_key;
pub mod event;
pub mod post;
