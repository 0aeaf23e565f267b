//! Error category classification and user guidance

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Input errors
/// - 4xxx: Day-state errors
/// - 5xxx: Slot errors
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
    /// Input errors (3xxx)
    Input,
    /// Day-state errors (4xxx)
    DayState,
    /// Slot errors (5xxx)
    Slot,
    /// System errors (6xxx and above)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Input,
            4000..5000 => Self::DayState,
            5000..6000 => Self::Slot,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Input => "input",
            Self::DayState => "day_state",
            Self::Slot => "slot",
            Self::System => "system",
        }
    }
}

/// What the user should do next
///
/// The rendering client maps each variant to visibly different copy, so
/// "fix your input", "try a different slot" and "try again later" never
/// collapse into one generic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Guidance {
    /// Correct the submitted form
    FixInput,
    /// The day or slot is closed for booking right now
    NotBookable,
    /// Refresh the grid and choose another slot
    TryAnotherSlot,
    /// Wait until the existing reservation ends
    WaitForExisting,
    /// Retry the same request shortly
    RetryLater,
    /// Provide valid credentials
    Authenticate,
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }

    /// Get the user guidance for this error code
    ///
    /// Returns `None` for success and for general errors that carry no
    /// booking-specific advice.
    pub fn guidance(&self) -> Option<Guidance> {
        match self {
            ErrorCode::DuplicatePersonConflict => Some(Guidance::WaitForExisting),
            _ => match self.category() {
                ErrorCategory::General => match self {
                    ErrorCode::ValidationFailed | ErrorCode::InvalidRequest => {
                        Some(Guidance::FixInput)
                    }
                    _ => None,
                },
                ErrorCategory::Auth | ErrorCategory::Permission => Some(Guidance::Authenticate),
                ErrorCategory::Input => Some(Guidance::FixInput),
                ErrorCategory::DayState => Some(Guidance::NotBookable),
                ErrorCategory::Slot => Some(Guidance::TryAnotherSlot),
                ErrorCategory::System => Some(Guidance::RetryLater),
            },
        }
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
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Input);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::DayState);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Slot);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::AdminPinInvalid.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::PinMismatch.category(), ErrorCategory::Permission);
        assert_eq!(ErrorCode::InvalidName.category(), ErrorCategory::Input);
        assert_eq!(ErrorCode::SlotBlocked.category(), ErrorCategory::DayState);
        assert_eq!(ErrorCode::CapacityExceeded.category(), ErrorCategory::Slot);
        assert_eq!(
            ErrorCode::TransientStoreError.category(),
            ErrorCategory::System
        );
    }

    #[test]
    fn test_guidance_separates_input_slot_and_retry() {
        let input = ErrorCode::InvalidTimeRange.guidance();
        let slot = ErrorCode::CapacityExceeded.guidance();
        let retry = ErrorCode::TransientStoreError.guidance();

        assert_eq!(input, Some(Guidance::FixInput));
        assert_eq!(slot, Some(Guidance::TryAnotherSlot));
        assert_eq!(retry, Some(Guidance::RetryLater));
        assert_ne!(input, slot);
        assert_ne!(slot, retry);
    }

    #[test]
    fn test_guidance_special_cases() {
        assert_eq!(
            ErrorCode::DuplicatePersonConflict.guidance(),
            Some(Guidance::WaitForExisting)
        );
        assert_eq!(ErrorCode::DayPreparing.guidance(), Some(Guidance::NotBookable));
        assert_eq!(ErrorCode::SlotConflict.guidance(), Some(Guidance::TryAnotherSlot));
        assert_eq!(ErrorCode::Success.guidance(), None);
        assert_eq!(ErrorCode::NotFound.guidance(), None);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::DayState).unwrap();
        assert_eq!(json, "\"day_state\"");
        let json = serde_json::to_string(&Guidance::TryAnotherSlot).unwrap();
        assert_eq!(json, "\"try_another_slot\"");
    }
}
