//! Booking error taxonomy
//!
//! Every rejection the engine can produce has its own variant, and every
//! variant converts into an [`AppError`] with a distinct [`ErrorCode`].

use chrono::NaiveDate;
use thiserror::Error;

use super::names::NameError;
use crate::db::{StoreError, StoreFailure};
use crate::utils::{AppError, ErrorCode};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("missing fields: {0}")]
    MissingFields(String),

    #[error("expected {expected} player names, got {actual}")]
    PlayerCountMismatch { expected: i64, actual: usize },

    #[error("player {index}: {reason}")]
    InvalidName { index: usize, reason: NameError },

    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("party size {0} is outside 1..=4")]
    InvalidPartySize(i64),

    #[error("PIN must be 4 digits")]
    InvalidPin,

    #[error("court {0} does not exist")]
    UnknownCourt(i64),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("reservations are not open for {0}")]
    DayNotOpen(NaiveDate),

    #[error("day is being prepared")]
    DayPreparing,

    #[error("court {court_id} is blocked from minute {start_min} to {end_min}")]
    SlotBlocked {
        court_id: u32,
        start_min: u32,
        end_min: u32,
        reason: Option<String>,
    },

    #[error("{name} already has a reservation ending at minute {ends_at}")]
    DuplicatePersonConflict {
        name: String,
        reservation_id: String,
        ends_at: u32,
    },

    #[error("capacity exceeded: {used} seats used, {requested} requested")]
    CapacityExceeded { used: u32, requested: u32 },

    #[error("slot conflict: {0}")]
    SlotConflict(String),

    #[error("store unavailable: {0}")]
    TransientStore(String),

    #[error("reservation {0} not found")]
    NotFound(String),

    #[error("reservation has no PIN")]
    PinNotSupported,

    #[error("PIN does not match")]
    PinMismatch,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BookingError {
    pub fn code(&self) -> ErrorCode {
        match self {
            BookingError::MissingFields(_) => ErrorCode::MissingFields,
            BookingError::PlayerCountMismatch { .. } => ErrorCode::PlayerCountMismatch,
            BookingError::InvalidName { .. } => ErrorCode::InvalidName,
            BookingError::InvalidTimeRange(_) => ErrorCode::InvalidTimeRange,
            BookingError::InvalidPartySize(_) => ErrorCode::InvalidPartySize,
            BookingError::InvalidPin => ErrorCode::InvalidPin,
            BookingError::UnknownCourt(_) => ErrorCode::UnknownCourt,
            BookingError::InvalidDate(_) => ErrorCode::InvalidDate,
            BookingError::DayNotOpen(_) => ErrorCode::DayNotOpen,
            BookingError::DayPreparing => ErrorCode::DayPreparing,
            BookingError::SlotBlocked { .. } => ErrorCode::SlotBlocked,
            BookingError::DuplicatePersonConflict { .. } => ErrorCode::DuplicatePersonConflict,
            BookingError::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            BookingError::SlotConflict(_) => ErrorCode::SlotConflict,
            BookingError::TransientStore(_) => ErrorCode::TransientStoreError,
            BookingError::NotFound(_) => ErrorCode::NotFound,
            BookingError::PinNotSupported => ErrorCode::PinNotSupported,
            BookingError::PinMismatch => ErrorCode::PinMismatch,
            BookingError::Store(e) => match e.failure() {
                StoreFailure::Fatal => ErrorCode::DatabaseError,
                _ => ErrorCode::TransientStoreError,
            },
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let code = err.code();
        match err {
            BookingError::PlayerCountMismatch { expected, actual } => AppError::new(code)
                .with_detail("expected", expected)
                .with_detail("actual", actual),
            BookingError::InvalidName { index, reason } => AppError::new(code)
                .with_detail("index", index)
                .with_detail("reason", reason.reason()),
            BookingError::InvalidTimeRange(msg) | BookingError::MissingFields(msg) => {
                AppError::new(code).with_detail("reason", msg)
            }
            BookingError::InvalidDate(value) => AppError::new(code).with_detail("value", value),
            BookingError::InvalidPartySize(size) => AppError::new(code).with_detail("partySize", size),
            BookingError::UnknownCourt(id) => AppError::new(code).with_detail("courtId", id),
            BookingError::DayNotOpen(date) => {
                AppError::new(code).with_detail("date", date.to_string())
            }
            BookingError::SlotBlocked {
                court_id,
                start_min,
                end_min,
                reason,
            } => {
                let err = AppError::new(code)
                    .with_detail("courtId", court_id)
                    .with_detail("startMin", start_min)
                    .with_detail("endMin", end_min);
                match reason {
                    Some(r) => err.with_detail("reason", r),
                    None => err,
                }
            }
            BookingError::DuplicatePersonConflict {
                name,
                reservation_id,
                ends_at,
            } => AppError::new(code)
                .with_detail("name", name)
                .with_detail("reservationId", reservation_id)
                .with_detail("endsAt", ends_at),
            BookingError::CapacityExceeded { used, requested } => AppError::new(code)
                .with_detail("remaining", shared::schedule::remaining_capacity(used))
                .with_detail("requested", requested),
            BookingError::NotFound(id) => {
                AppError::not_found("Reservation").with_detail("id", id)
            }
            BookingError::Store(e) => {
                tracing::error!(error = %e, "Reservation store failure");
                AppError::new(code)
            }
            BookingError::SlotConflict(msg) | BookingError::TransientStore(msg) => {
                tracing::warn!(code = %code, reason = %msg, "Commit failed after retry");
                AppError::new(code)
            }
            BookingError::InvalidPin
            | BookingError::DayPreparing
            | BookingError::PinNotSupported
            | BookingError::PinMismatch => AppError::new(code),
        }
    }
}
