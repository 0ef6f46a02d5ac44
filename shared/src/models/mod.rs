//! Data models
//!
//! Shared between roster-server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (snowflake, stored as SQLite INTEGER).

pub mod employee;
pub mod identity;
pub mod restaurant;
pub mod role;
pub mod shift;

// Re-exports
pub use employee::*;
pub use identity::*;
pub use restaurant::*;
pub use role::*;
pub use shift::*;
