//! Data models
//!
//! Shared between the finance services and their clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes.

pub mod broker;
pub mod broker_image;
pub mod broker_user;
pub mod permission;
pub mod role;
pub mod transaction;

// Re-exports
pub use broker::*;
pub use broker_image::*;
pub use broker_user::*;
pub use permission::*;
pub use role::*;
pub use transaction::*;
