//! Unified error codes for the court reservation service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors (admin credential)
//! - 2xxx: Permission errors (reservation PIN)
//! - 3xxx: Input errors (user-correctable booking payloads)
//! - 4xxx: Day-state errors (preparing, blackout, closed day)
//! - 5xxx: Slot errors (capacity, storage conflicts, duplicate person)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so that the rendering
/// client can switch on them without parsing messages.
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
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// Admin credential header missing
    AdminPinRequired = 1001,
    /// Admin credential does not match
    AdminPinInvalid = 1002,

    // ==================== 2xxx: Permission ====================
    /// Cancellation PIN does not match the reservation
    PinMismatch = 2001,
    /// Reservation was created without a PIN
    PinNotSupported = 2002,

    // ==================== 3xxx: Input ====================
    /// Court or date missing from the booking
    MissingFields = 3001,
    /// Number of player names differs from party size
    PlayerCountMismatch = 3002,
    /// A player name violates the character policy
    InvalidName = 3003,
    /// Start/end minutes are misaligned, reversed or outside opening hours
    InvalidTimeRange = 3004,
    /// Party size outside 1..=4
    InvalidPartySize = 3005,
    /// Cancellation PIN is not four digits
    InvalidPin = 3006,
    /// Court id is not configured for the day
    UnknownCourt = 3007,
    /// Date is not YYYY-MM-DD
    InvalidDate = 3008,
    /// Admin day configuration rejected
    InvalidDayConfig = 3009,

    // ==================== 4xxx: Day state ====================
    /// Booking is suspended while the day is being prepared
    DayPreparing = 4001,
    /// Slot overlaps an admin blackout window
    SlotBlocked = 4002,
    /// No active day configuration for the requested date
    DayNotOpen = 4003,

    // ==================== 5xxx: Slot ====================
    /// Party does not fit into the remaining capacity
    CapacityExceeded = 5001,
    /// Storage-level conflict survived the retry
    SlotConflict = 5002,
    /// A player already holds a reservation that has not finished
    DuplicatePersonConflict = 5003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Storage temporarily unavailable
    TransientStoreError = 9003,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",

            // Auth
            ErrorCode::AdminPinRequired => "Admin PIN is required",
            ErrorCode::AdminPinInvalid => "Admin PIN is incorrect",

            // Permission
            ErrorCode::PinMismatch => "PIN does not match",
            ErrorCode::PinNotSupported => "This reservation cannot be cancelled with a PIN",

            // Input
            ErrorCode::MissingFields => "Missing fields",
            ErrorCode::PlayerCountMismatch => "Enter one name per player",
            ErrorCode::InvalidName => "Player name contains characters that are not allowed",
            ErrorCode::InvalidTimeRange => "Invalid time range",
            ErrorCode::InvalidPartySize => "Party size must be between 1 and 4",
            ErrorCode::InvalidPin => "PIN must be 4 digits",
            ErrorCode::UnknownCourt => "Court does not exist",
            ErrorCode::InvalidDate => "Date must be YYYY-MM-DD",
            ErrorCode::InvalidDayConfig => "Invalid day configuration",

            // Day state
            ErrorCode::DayPreparing => "Reservations are paused while the day is being prepared",
            ErrorCode::SlotBlocked => "This time slot is not available for booking",
            ErrorCode::DayNotOpen => "Reservations are not open for this date",

            // Slot
            ErrorCode::CapacityExceeded => "This time slot is full",
            ErrorCode::SlotConflict => "This slot was just taken, please pick another",
            ErrorCode::DuplicatePersonConflict => {
                "A player already has a reservation that has not finished yet"
            }

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TransientStoreError => "Service is busy, please retry shortly",
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
            5 => Ok(ErrorCode::InvalidRequest),

            // Auth
            1001 => Ok(ErrorCode::AdminPinRequired),
            1002 => Ok(ErrorCode::AdminPinInvalid),

            // Permission
            2001 => Ok(ErrorCode::PinMismatch),
            2002 => Ok(ErrorCode::PinNotSupported),

            // Input
            3001 => Ok(ErrorCode::MissingFields),
            3002 => Ok(ErrorCode::PlayerCountMismatch),
            3003 => Ok(ErrorCode::InvalidName),
            3004 => Ok(ErrorCode::InvalidTimeRange),
            3005 => Ok(ErrorCode::InvalidPartySize),
            3006 => Ok(ErrorCode::InvalidPin),
            3007 => Ok(ErrorCode::UnknownCourt),
            3008 => Ok(ErrorCode::InvalidDate),
            3009 => Ok(ErrorCode::InvalidDayConfig),

            // Day state
            4001 => Ok(ErrorCode::DayPreparing),
            4002 => Ok(ErrorCode::SlotBlocked),
            4003 => Ok(ErrorCode::DayNotOpen),

            // Slot
            5001 => Ok(ErrorCode::CapacityExceeded),
            5002 => Ok(ErrorCode::SlotConflict),
            5003 => Ok(ErrorCode::DuplicatePersonConflict),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::TransientStoreError),
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
