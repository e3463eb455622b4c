//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Broker errors
/// - 4xxx: Broker image errors
/// - 5xxx: Broker user errors
/// - 6xxx: Transaction errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Broker errors (3xxx)
    Broker,
    /// Broker image errors (4xxx)
    BrokerImage,
    /// Broker user errors (5xxx)
    BrokerUser,
    /// Transaction errors (6xxx)
    Transaction,
    /// System errors (7xxx and up)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Broker,
            4000..5000 => Self::BrokerImage,
            5000..6000 => Self::BrokerUser,
            6000..7000 => Self::Transaction,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Broker => "broker",
            Self::BrokerImage => "broker_image",
            Self::BrokerUser => "broker_user",
            Self::Transaction => "transaction",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Broker);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::BrokerImage);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::BrokerUser);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Transaction);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TokenExpired.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::NotOwner.category(), ErrorCategory::Permission);
        assert_eq!(ErrorCode::BrokerDisabled.category(), ErrorCategory::Broker);
        assert_eq!(
            ErrorCode::BrokerHasImage.category(),
            ErrorCategory::BrokerImage
        );
        assert_eq!(
            ErrorCode::BrokerUserExists.category(),
            ErrorCategory::BrokerUser
        );
        assert_eq!(
            ErrorCode::TransactionNotFound.category(),
            ErrorCategory::Transaction
        );
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::BrokerImage).unwrap();
        assert_eq!(json, "\"broker_image\"");
        let category: ErrorCategory = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(category, ErrorCategory::System);
    }
}
