//! Error kind taxonomy
//!
//! Every [`ErrorCode`] maps onto exactly one kind. None of the kinds is
//! transient: protocols never retry, and the kind tells the caller whether
//! the fault is theirs or the server's.

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed id or failed field validation
    InvalidArgument,
    /// No (valid) caller identity
    Unauthenticated,
    /// Target entity does not exist
    NotFound,
    /// Uniqueness or duplicate-link conflict
    AlreadyExists,
    /// Gate rejection or ownership mismatch
    PermissionDenied,
    /// Target is in the wrong state for the operation
    FailedPrecondition,
    /// A step that should always succeed did not
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::Unauthenticated => "unauthenticated",
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::PermissionDenied => "permission_denied",
            Self::FailedPrecondition => "failed_precondition",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorCode {
    /// Get the kind for this error code
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Success
            | Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError => ErrorKind::Internal,

            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidId
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::TransactionDateInFuture
            | Self::TransactionInvalidType => ErrorKind::InvalidArgument,

            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                ErrorKind::Unauthenticated
            }

            Self::NotFound
            | Self::BrokerNotFound
            | Self::BrokerImageNotFound
            | Self::BrokerUserNotFound
            | Self::TransactionNotFound => ErrorKind::NotFound,

            Self::AlreadyExists | Self::BrokerNameExists | Self::BrokerUserExists => {
                ErrorKind::AlreadyExists
            }

            Self::PermissionDenied | Self::RoleResolutionFailed | Self::NotOwner => {
                ErrorKind::PermissionDenied
            }

            Self::BrokerDisabled | Self::BrokerHasImage => ErrorKind::FailedPrecondition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(ErrorCode::InvalidId.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            ErrorCode::TransactionDateInFuture.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(ErrorCode::TokenExpired.kind(), ErrorKind::Unauthenticated);
        assert_eq!(ErrorCode::BrokerNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(ErrorCode::BrokerNameExists.kind(), ErrorKind::AlreadyExists);
        assert_eq!(ErrorCode::BrokerUserExists.kind(), ErrorKind::AlreadyExists);
        assert_eq!(ErrorCode::NotOwner.kind(), ErrorKind::PermissionDenied);
        assert_eq!(
            ErrorCode::RoleResolutionFailed.kind(),
            ErrorKind::PermissionDenied
        );
        assert_eq!(ErrorCode::BrokerDisabled.kind(), ErrorKind::FailedPrecondition);
        assert_eq!(ErrorCode::BrokerHasImage.kind(), ErrorKind::FailedPrecondition);
        assert_eq!(ErrorCode::DatabaseError.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_kind_serialize() {
        let json = serde_json::to_string(&ErrorKind::FailedPrecondition).unwrap();
        assert_eq!(json, "\"failed_precondition\"");
        assert_eq!(ErrorKind::AlreadyExists.to_string(), "already_exists");
    }
}
