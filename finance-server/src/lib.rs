//! Finance Server - authorization and invariant layer of a personal-finance back office
//!
//! # Module structure
//!
//! ```text
//! finance-server/src/
//! ├── auth/          # permission matching, role aggregation, gate, JWT, middleware
//! ├── db/            # repositories (PostgreSQL + in-process store)
//! ├── services/      # entity invariant protocols
//! ├── api/           # HTTP routes and handlers
//! ├── config.rs      # environment configuration
//! ├── state.rs       # shared application state
//! ├── logger.rs      # tracing setup
//! └── validation.rs  # field validation helpers
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod logger;
pub mod services;
pub mod state;
pub mod validation;

pub use auth::{CurrentUser, JwtService, PermissionGate};
pub use config::{Config, ConfigError};
pub use state::AppState;

pub use shared::{ApiResponse, AppError, AppResult, ErrorCode, ErrorKind};

// Security logging macro
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
