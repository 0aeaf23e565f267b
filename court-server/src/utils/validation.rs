//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use crate::utils::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Day notice shown above the grid
pub const MAX_NOTICE_LEN: usize = 20_000;

/// Court display names
pub const MAX_COURT_NAME_LEN: usize = 40;

/// Blackout reasons
pub const MAX_REASON_LEN: usize = 200;

/// Idempotency tokens supplied by clients
pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 128;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a string is within the length limit (counted in chars).
pub fn validate_text_len(
    value: &str,
    field: &str,
    max_len: usize,
    code: ErrorCode,
) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::with_message(
            code,
            format!("{field} is too long ({len} chars, max {max_len})"),
        ));
    }
    Ok(())
}

/// Validate an optional string against the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
    code: ErrorCode,
) -> Result<(), AppError> {
    if let Some(v) = value {
        validate_text_len(v, field, max_len, code)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text_len_counts_chars() {
        // 3 chars, 9 bytes
        assert!(validate_text_len("テニス", "name", 3, ErrorCode::InvalidDayConfig).is_ok());
        let err = validate_text_len("テニス!", "name", 3, ErrorCode::InvalidDayConfig).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDayConfig);
        assert!(err.message.contains("max 3"));
    }

    #[test]
    fn test_validate_optional_text() {
        assert!(validate_optional_text(&None, "reason", 1, ErrorCode::InvalidDayConfig).is_ok());
        assert!(
            validate_optional_text(&Some("ab".into()), "reason", 1, ErrorCode::InvalidDayConfig)
                .is_err()
        );
    }
}
