//! Unified error codes for the finance back-office
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Broker errors
//! - 4xxx: Broker image errors
//! - 5xxx: Broker user (link) errors
//! - 6xxx: Transaction errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Malformed identifier
    InvalidId = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Caller roles could not be resolved
    RoleResolutionFailed = 2002,
    /// Caller does not own the resource
    NotOwner = 2003,

    // ==================== 3xxx: Broker ====================
    /// Broker not found
    BrokerNotFound = 3001,
    /// Broker name already exists
    BrokerNameExists = 3002,
    /// Broker is disabled
    BrokerDisabled = 3003,

    // ==================== 4xxx: Broker Image ====================
    /// Broker image not found
    BrokerImageNotFound = 4001,
    /// Broker already has an image
    BrokerHasImage = 4002,

    // ==================== 5xxx: Broker User ====================
    /// User is not linked to the broker
    BrokerUserNotFound = 5001,
    /// User is already linked to the broker
    BrokerUserExists = 5002,

    // ==================== 6xxx: Transaction ====================
    /// Transaction not found
    TransactionNotFound = 6001,
    /// Transaction date is in the future
    TransactionDateInFuture = 6002,
    /// Transaction type is not BUY or SELL
    TransactionInvalidType = 6003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidId => "Invalid identifier",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleResolutionFailed => "Permission denied",
            ErrorCode::NotOwner => "Resource belongs to another user",

            // Broker
            ErrorCode::BrokerNotFound => "Broker not found",
            ErrorCode::BrokerNameExists => "Broker name already exists",
            ErrorCode::BrokerDisabled => "Broker is disabled",

            // Broker image
            ErrorCode::BrokerImageNotFound => "Broker image not found",
            ErrorCode::BrokerHasImage => "Broker already has an image",

            // Broker user
            ErrorCode::BrokerUserNotFound => "Broker is not linked to the user",
            ErrorCode::BrokerUserExists => "Broker is already linked to the user",

            // Transaction
            ErrorCode::TransactionNotFound => "Transaction not found",
            ErrorCode::TransactionDateInFuture => "Transaction date cannot be in the future",
            ErrorCode::TransactionInvalidType => "Transaction type must be BUY or SELL",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidId),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleResolutionFailed),
            2003 => Ok(ErrorCode::NotOwner),

            // Broker
            3001 => Ok(ErrorCode::BrokerNotFound),
            3002 => Ok(ErrorCode::BrokerNameExists),
            3003 => Ok(ErrorCode::BrokerDisabled),

            // Broker image
            4001 => Ok(ErrorCode::BrokerImageNotFound),
            4002 => Ok(ErrorCode::BrokerHasImage),

            // Broker user
            5001 => Ok(ErrorCode::BrokerUserNotFound),
            5002 => Ok(ErrorCode::BrokerUserExists),

            // Transaction
            6001 => Ok(ErrorCode::TransactionNotFound),
            6002 => Ok(ErrorCode::TransactionDateInFuture),
            6003 => Ok(ErrorCode::TransactionInvalidType),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
