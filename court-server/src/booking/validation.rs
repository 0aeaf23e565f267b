//! Booking request validation
//!
//! Turns a raw [`ReservationCreate`] payload into a [`ValidBooking`], and gates
//! it against the active [`DayConfig`]. Checks run in a fixed order so that the
//! first failing rule determines the error the user sees:
//!
//! 1. required fields, player count == party size
//! 2. name policy
//! 3. time range, party size, PIN
//! 4. day gate (open day, preparing, court, opening hours, blackout)

use chrono::NaiveDate;
use shared::models::{DayConfig, ReservationCreate};
use shared::schedule::{COURT_CAPACITY, GateDecision, evaluate, is_five_minute_aligned};
use shared::schedule::grid::MINUTES_PER_DAY;

use super::BookingError;
use super::names::{NamePolicy, canonical_party};

/// A request that passed steps 1-3
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBooking {
    pub court_id: u32,
    pub date: NaiveDate,
    pub start_min: u32,
    pub end_min: u32,
    pub party_size: u32,
    /// Canonical names, one per player
    pub player_names: Vec<String>,
    /// Four ASCII digits
    pub pin: Option<String>,
}

/// Fold full-width digits and strip everything else
pub fn normalize_pin(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            '0'..='9' => Some(c),
            '\u{FF10}'..='\u{FF19}' => char::from_u32(c as u32 - 0xFF10 + '0' as u32),
            _ => None,
        })
        .collect()
}

/// `Some(pin)` for a usable PIN, `None` when absent or blank
fn parse_pin(raw: Option<&str>) -> Result<Option<String>, BookingError> {
    let Some(raw) = raw.filter(|p| !p.trim().is_empty()) else {
        return Ok(None);
    };
    let pin = normalize_pin(raw);
    if pin.len() != 4 {
        return Err(BookingError::InvalidPin);
    }
    Ok(Some(pin))
}

/// Parse a cancellation PIN, which is mandatory
pub fn parse_cancel_pin(raw: Option<&str>) -> Result<String, BookingError> {
    parse_pin(raw)?.ok_or(BookingError::InvalidPin)
}

fn parse_date(raw: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| BookingError::InvalidDate(raw.to_string()))
}

/// Steps 1-3: everything that does not depend on stored state
pub fn validate_request(
    req: &ReservationCreate,
    policy: &NamePolicy,
) -> Result<ValidBooking, BookingError> {
    // 1. 必填字段
    let mut missing = Vec::new();
    if req.court_id.is_none() {
        missing.push("courtId");
    }
    if req.date.as_deref().is_none_or(|d| d.trim().is_empty()) {
        missing.push("date");
    }
    if req.player_names.is_none() {
        missing.push("playerNames");
    }
    let (Some(court_id), Some(date), Some(raw_names)) =
        (req.court_id, req.date.as_deref(), req.player_names.as_ref())
    else {
        return Err(BookingError::MissingFields(missing.join(",")));
    };
    if !missing.is_empty() {
        return Err(BookingError::MissingFields(missing.join(",")));
    }

    let party = canonical_party(raw_names);
    if party.len() as i64 != req.party_size {
        return Err(BookingError::PlayerCountMismatch {
            expected: req.party_size,
            actual: party.len(),
        });
    }

    // 2. 姓名规则
    for (index, name) in &party {
        policy
            .check(name)
            .map_err(|reason| BookingError::InvalidName {
                index: *index,
                reason,
            })?;
    }

    // 3. 时间、人数、PIN
    let (start_min, end_min) = validate_window(req.start_min, req.end_min)?;
    if req.party_size < 1 || req.party_size > COURT_CAPACITY as i64 {
        return Err(BookingError::InvalidPartySize(req.party_size));
    }
    let pin = parse_pin(req.pin.as_deref())?;
    let date = parse_date(date)?;
    if court_id < 1 || court_id > u32::MAX as i64 {
        return Err(BookingError::UnknownCourt(court_id));
    }

    Ok(ValidBooking {
        court_id: court_id as u32,
        date,
        start_min,
        end_min,
        party_size: req.party_size as u32,
        player_names: party.into_iter().map(|(_, n)| n).collect(),
        pin,
    })
}

fn validate_window(start: i64, end: i64) -> Result<(u32, u32), BookingError> {
    if start < 0 || end > MINUTES_PER_DAY as i64 {
        return Err(BookingError::InvalidTimeRange(format!(
            "{start}-{end} is outside the day"
        )));
    }
    if start >= end {
        return Err(BookingError::InvalidTimeRange(format!(
            "start {start} is not before end {end}"
        )));
    }
    let (start, end) = (start as u32, end as u32);
    if !is_five_minute_aligned(start) || !is_five_minute_aligned(end) {
        return Err(BookingError::InvalidTimeRange(format!(
            "{start}-{end} is not aligned to 5 minutes"
        )));
    }
    Ok((start, end))
}

/// Step 4: gate against the active day
///
/// Preparing is reported before court or hour problems so a suspended day
/// always explains itself the same way.
pub fn gate(booking: &ValidBooking, day: Option<&DayConfig>) -> Result<(), BookingError> {
    let day = match day {
        Some(day) if day.date == booking.date => day,
        _ => return Err(BookingError::DayNotOpen(booking.date)),
    };
    if day.preparing {
        return Err(BookingError::DayPreparing);
    }
    if !day.has_court(booking.court_id) {
        return Err(BookingError::UnknownCourt(booking.court_id as i64));
    }
    if booking.start_min < day.start_min || booking.end_min > day.end_min {
        return Err(BookingError::InvalidTimeRange(format!(
            "{}-{} is outside opening hours {}-{}",
            booking.start_min, booking.end_min, day.start_min, day.end_min
        )));
    }
    match evaluate(day, booking.court_id, booking.start_min, booking.end_min) {
        GateDecision::Open => Ok(()),
        GateDecision::Preparing => Err(BookingError::DayPreparing),
        GateDecision::Blocked(block) => Err(BookingError::SlotBlocked {
            court_id: block.court_id,
            start_min: block.start_min,
            end_min: block.end_min,
            reason: block.reason.clone(),
        }),
    }
}
