//! Input validation helpers
//!
//! Text limits for every user-supplied field live here.

use shared::{AppError, AppResult, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Broker names
pub const MAX_NAME_LEN: usize = 200;

/// Broker image names
pub const MIN_IMAGE_NAME_LEN: usize = 3;
pub const MAX_IMAGE_NAME_LEN: usize = 100;

/// Asset symbols and price units
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Helpers ─────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that a string length falls inside `[min_len, max_len]`.
pub fn validate_text_range(
    value: &str,
    field: &str,
    min_len: usize,
    max_len: usize,
) -> AppResult<()> {
    let len = value.trim().chars().count();
    if len < min_len || len > max_len {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be between {min_len} and {max_len} characters"),
        )
        .with_detail("field", field)
        .with_detail("length", len));
    }
    Ok(())
}

/// Validate that a binary payload is present.
pub fn validate_non_empty_bytes(value: &[u8], field: &str) -> AppResult<()> {
    if value.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate an id taken from a request body.
pub fn validate_id(value: i64, field: &str) -> AppResult<()> {
    if value <= 0 {
        return Err(AppError::invalid_id(field, &value.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorKind;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Acme", "name", MAX_NAME_LEN).is_ok());
        let err = validate_required_text("   ", "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_text_range() {
        assert!(validate_text_range("logo", "name", 3, 100).is_ok());
        assert!(validate_text_range("ab", "name", 3, 100).is_err());
        assert!(validate_text_range(&"a".repeat(101), "name", 3, 100).is_err());
        assert!(validate_text_range(&"a".repeat(100), "name", 3, 100).is_ok());
    }

    #[test]
    fn test_bytes_and_ids() {
        assert!(validate_non_empty_bytes(&[1], "data").is_ok());
        assert!(validate_non_empty_bytes(&[], "data").is_err());
        assert!(validate_id(1, "broker_id").is_ok());
        assert_eq!(
            validate_id(0, "broker_id").unwrap_err().code,
            ErrorCode::InvalidId
        );
    }
}
