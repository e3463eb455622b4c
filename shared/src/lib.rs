//! Shared types for the finance back-office
//!
//! Entity models, request payloads, the unified error system and small
//! utilities used by every service.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode, ErrorKind};
pub use serde::{Deserialize, Serialize};
