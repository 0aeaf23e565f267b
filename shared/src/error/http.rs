//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound => StatusCode::NOT_FOUND,

            // 401 Unauthorized
            Self::AdminPinRequired | Self::AdminPinInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PinMismatch | Self::PinNotSupported => StatusCode::FORBIDDEN,

            // 422 Unprocessable Entity (day is not bookable right now)
            Self::DayPreparing | Self::SlotBlocked | Self::DayNotOpen => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            // 409 Conflict (slot state changed or is taken)
            Self::CapacityExceeded | Self::SlotConflict | Self::DuplicatePersonConflict => {
                StatusCode::CONFLICT
            }

            // 503 Service Unavailable (transient errors, client can retry)
            Self::TransientStoreError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_input_errors_are_bad_request() {
        for code in [
            ErrorCode::MissingFields,
            ErrorCode::PlayerCountMismatch,
            ErrorCode::InvalidName,
            ErrorCode::InvalidTimeRange,
            ErrorCode::InvalidPartySize,
            ErrorCode::InvalidPin,
            ErrorCode::ValidationFailed,
        ] {
            assert_eq!(code.http_status(), StatusCode::BAD_REQUEST, "{:?}", code);
        }
    }

    #[test]
    fn test_auth_and_permission_status() {
        assert_eq!(
            ErrorCode::AdminPinInvalid.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::PinMismatch.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_day_state_and_slot_status() {
        assert_eq!(
            ErrorCode::DayPreparing.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::SlotBlocked.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ErrorCode::CapacityExceeded.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::SlotConflict.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_system_status() {
        assert_eq!(
            ErrorCode::TransientStoreError.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
    }
}
