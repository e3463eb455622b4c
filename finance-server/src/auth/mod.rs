//! Authorization layer
//!
//! - [`matcher`]: does one held permission cover an action
//! - [`roles`]: union of permissions across a caller's roles
//! - [`gate`]: fail-closed pre-check run before privileged mutations
//! - [`jwt`] / [`middleware`]: bearer token identity

pub mod gate;
pub mod jwt;
pub mod matcher;
pub mod middleware;
pub mod permissions;
pub mod roles;

pub use gate::{PermissionGate, ResolveError, RoleResolver};
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_permission};
