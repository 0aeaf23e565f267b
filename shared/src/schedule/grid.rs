//! Time-grid model
//!
//! Pure functions over minutes-since-midnight. The server validates bookings
//! with these and the client renders cells with these, so both sides must see
//! byte-identical output for identical input.

use serde::{Deserialize, Serialize};

pub const MINUTES_PER_DAY: u32 = 24 * 60;
pub const DEFAULT_START_MIN: u32 = 9 * 60;
pub const DEFAULT_END_MIN: u32 = 21 * 60;
pub const DEFAULT_SLOT_MINUTES: u32 = 30;

/// Smallest bookable granularity in minutes
pub const ALIGNMENT_MINUTES: u32 = 5;

/// One `[start, end)` window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub start: u32,
    pub end: u32,
}

#[inline]
pub fn is_five_minute_aligned(min: u32) -> bool {
    min % ALIGNMENT_MINUTES == 0
}

#[inline]
pub fn minutes(hour: u32, minute: u32) -> u32 {
    hour * 60 + minute
}

/// Half-open interval overlap; touching intervals do not overlap.
#[inline]
pub fn overlaps(a_start: u32, a_end: u32, b_start: u32, b_end: u32) -> bool {
    a_start.max(b_start) < a_end.min(b_end)
}

/// Consecutive `slot_minutes`-wide windows starting at `start_min`.
///
/// A trailing partial slot is never emitted. A zero width yields no slots,
/// and a window that would overflow `u32` ends the sequence.
pub fn make_slots(start_min: u32, end_min: u32, slot_minutes: u32) -> Vec<Slot> {
    if slot_minutes == 0 {
        return Vec::new();
    }
    let mut slots = Vec::new();
    let mut start = start_min;
    while let Some(end) = start.checked_add(slot_minutes) {
        if end > end_min {
            break;
        }
        slots.push(Slot { start, end });
        start = end;
    }
    slots
}

/// "HH:MM" label for a minute offset
pub fn format_minutes(min: u32) -> String {
    format!("{:02}:{:02}", min / 60, min % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_boundaries() {
        assert!(!overlaps(0, 60, 60, 120));
        assert!(overlaps(0, 60, 59, 120));
        assert!(overlaps(30, 90, 0, 40));
        assert!(overlaps(0, 120, 30, 60));
        assert!(!overlaps(60, 120, 0, 60));
    }

    #[test]
    fn test_make_slots_covers_range_without_gaps() {
        for (start, end, width) in [(540, 1260, 30), (0, 1440, 60), (600, 615, 5), (480, 720, 240)] {
            let slots = make_slots(start, end, width);
            assert_eq!(slots.len() as u32, (end - start) / width);
            assert_eq!(slots.first().unwrap().start, start);
            assert_eq!(slots.last().unwrap().end, end);
            for pair in slots.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
                assert!(!overlaps(pair[0].start, pair[0].end, pair[1].start, pair[1].end));
            }
            assert!(slots.iter().all(|s| s.end - s.start == width));
        }
    }

    #[test]
    fn test_make_slots_drops_trailing_partial() {
        let slots = make_slots(540, 610, 30);
        assert_eq!(
            slots,
            vec![Slot { start: 540, end: 570 }, Slot { start: 570, end: 600 }]
        );
    }

    #[test]
    fn test_make_slots_degenerate() {
        assert!(make_slots(600, 600, 30).is_empty());
        assert!(make_slots(600, 540, 30).is_empty());
        assert!(make_slots(540, 600, 0).is_empty());
    }

    #[test]
    fn test_make_slots_near_u32_max_terminates() {
        assert!(make_slots(u32::MAX - 10, u32::MAX, 30).is_empty());
        assert_eq!(
            make_slots(u32::MAX - 60, u32::MAX, 30),
            vec![
                Slot { start: u32::MAX - 60, end: u32::MAX - 30 },
                Slot { start: u32::MAX - 30, end: u32::MAX },
            ]
        );
        assert_eq!(make_slots(0, u32::MAX, u32::MAX).len(), 1);
    }

    #[test]
    fn test_make_slots_is_deterministic() {
        let a = serde_json::to_string(&make_slots(545, 1255, 15)).unwrap();
        let b = serde_json::to_string(&make_slots(545, 1255, 15)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_alignment_and_format() {
        assert!(is_five_minute_aligned(0));
        assert!(is_five_minute_aligned(545));
        assert!(!is_five_minute_aligned(6));
        assert_eq!(minutes(9, 30), 570);
        assert_eq!(format_minutes(570), "09:30");
        assert_eq!(format_minutes(1260), "21:00");
    }
}
