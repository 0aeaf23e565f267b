//! Capacity calculator
//!
//! A court admits at most [`COURT_CAPACITY`] players over any instant. Used
//! seats for a window are the sum of party sizes of every reservation on the
//! same court whose interval overlaps the window.

use super::grid::overlaps;
use crate::models::Reservation;

/// Maximum total party size overlapping one court/instant
pub const COURT_CAPACITY: u32 = 4;

/// Seats taken on `court_id` by reservations overlapping `[start, end)`.
///
/// `reservations` is the day's reservation set; other courts are ignored.
pub fn used_capacity(reservations: &[Reservation], court_id: u32, start: u32, end: u32) -> u32 {
    reservations
        .iter()
        .filter(|r| r.court_id == court_id && overlaps(r.start_min, r.end_min, start, end))
        .map(|r| r.party_size)
        .sum()
}

/// Seats still available, saturating at zero
#[inline]
pub fn remaining_capacity(used: u32) -> u32 {
    COURT_CAPACITY.saturating_sub(used)
}

#[inline]
pub fn is_full(used: u32) -> bool {
    used >= COURT_CAPACITY
}

/// Whether a party of `party_size` fits on top of `used`
#[inline]
pub fn fits(used: u32, party_size: u32) -> bool {
    used + party_size <= COURT_CAPACITY
}
