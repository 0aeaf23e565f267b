//! Single-active-reservation guard
//!
//! 同一个人在当天只能持有一个尚未结束的预约。只在业务时区的"今天"生效；
//! 提前预约其他日期不受限制。

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use shared::models::Reservation;
use shared::schedule::overlaps;
use std::collections::HashSet;

use super::names::identity_key;

/// A player that is already booked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardViolation {
    pub name: String,
    pub reservation_id: String,
    pub ends_at: u32,
}

/// Candidate booking as seen by the guard
#[derive(Debug, Clone, Copy)]
pub struct GuardCandidate<'a> {
    pub names: &'a [String],
    pub date: NaiveDate,
    pub start_min: u32,
    pub end_min: u32,
}

/// Check `candidate` against every reservation of its date
///
/// A candidate name blocks when a stored reservation carries the same identity
/// and either overlaps the candidate window or has not finished yet at `now`.
pub fn check(
    existing: &[Reservation],
    candidate: GuardCandidate<'_>,
    now: NaiveDateTime,
) -> Result<(), GuardViolation> {
    if candidate.date != now.date() {
        return Ok(());
    }

    let keys: HashSet<String> = candidate
        .names
        .iter()
        .filter_map(|n| identity_key(n))
        .collect();
    if keys.is_empty() {
        return Ok(());
    }

    let now_min = now.hour() * 60 + now.minute();

    for r in existing.iter().filter(|r| r.date == candidate.date) {
        let active = r.end_min > now_min
            || overlaps(r.start_min, r.end_min, candidate.start_min, candidate.end_min);
        if !active {
            continue;
        }
        if let Some(name) = r
            .player_names
            .iter()
            .find(|n| identity_key(n).is_some_and(|k| keys.contains(&k)))
        {
            return Err(GuardViolation {
                name: name.clone(),
                reservation_id: r.id.clone(),
                ends_at: r.end_min,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    fn at(min: u32) -> NaiveDateTime {
        today().and_hms_opt(min / 60, min % 60, 0).unwrap()
    }

    fn existing(names: &[&str], start: u32, end: u32) -> Reservation {
        Reservation {
            id: "r1".into(),
            court_id: 1,
            date: today(),
            start_min: start,
            end_min: end,
            party_size: names.len() as u32,
            player_names: names.iter().map(|s| s.to_string()).collect(),
            pin: None,
            owner_id: "guest".into(),
            created_at: 0,
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unfinished_reservation_blocks_later_slot() {
        // booked 10:00-11:00, now 10:15, tries 13:00-14:00
        let stored = vec![existing(&["山田"], 600, 660)];
        let party = names(&["山田"]);
        let candidate = GuardCandidate {
            names: &party,
            date: today(),
            start_min: 780,
            end_min: 840,
        };
        let err = check(&stored, candidate, at(615)).unwrap_err();
        assert_eq!(err.name, "山田");
        assert_eq!(err.ends_at, 660);
    }

    #[test]
    fn test_finished_reservation_does_not_block() {
        let stored = vec![existing(&["山田"], 600, 660)];
        let party = names(&["山田"]);
        let candidate = GuardCandidate {
            names: &party,
            date: today(),
            start_min: 780,
            end_min: 840,
        };
        assert!(check(&stored, candidate, at(661)).is_ok());
        // ends exactly now: finished
        assert!(check(&stored, candidate, at(660)).is_ok());
    }

    #[test]
    fn test_overlap_blocks_even_after_existing_ended() {
        // booked 10:00-11:00, now 11:40, tries 10:30-11:30
        let stored = vec![existing(&["山田"], 600, 660)];
        let party = names(&["山田"]);
        let candidate = GuardCandidate {
            names: &party,
            date: today(),
            start_min: 630,
            end_min: 690,
        };
        let err = check(&stored, candidate, at(700)).unwrap_err();
        assert_eq!(err.reservation_id, "r1");
        assert_eq!(err.ends_at, 660);

        // touching windows do not overlap
        let adjacent = GuardCandidate {
            start_min: 660,
            end_min: 720,
            ..candidate
        };
        assert!(check(&stored, adjacent, at(700)).is_ok());
    }

    #[test]
    fn test_equivalent_spellings_collide() {
        let stored = vec![existing(&["ヤマダ"], 600, 660)];
        let party = names(&["ﾔﾏﾀﾞ"]);
        let candidate = GuardCandidate {
            names: &party,
            date: today(),
            start_min: 780,
            end_min: 840,
        };
        assert!(check(&stored, candidate, at(540)).is_err());
    }

    #[test]
    fn test_placeholder_never_collides() {
        let stored = vec![existing(&["looking", "佐藤"], 600, 660)];
        let party = names(&["looking"]);
        let candidate = GuardCandidate {
            names: &party,
            date: today(),
            start_min: 600,
            end_min: 660,
        };
        assert!(check(&stored, candidate, at(540)).is_ok());
    }

    #[test]
    fn test_other_dates_are_not_guarded() {
        let stored = vec![existing(&["山田"], 600, 660)];
        let party = names(&["山田"]);
        let tomorrow = today().succ_opt().unwrap();
        let candidate = GuardCandidate {
            names: &party,
            date: tomorrow,
            start_min: 600,
            end_min: 660,
        };
        assert!(check(&stored, candidate, at(540)).is_ok());
    }

    #[test]
    fn test_different_people_do_not_collide() {
        let stored = vec![existing(&["山田"], 600, 660)];
        let party = names(&["田中"]);
        let candidate = GuardCandidate {
            names: &party,
            date: today(),
            start_min: 600,
            end_min: 660,
        };
        assert!(check(&stored, candidate, at(540)).is_ok());
    }
}
