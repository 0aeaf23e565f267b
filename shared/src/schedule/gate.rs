//! Blackout / preparing gate
//!
//! Write-time rejection and read-time "is this cell clickable" both call
//! [`evaluate`] on the same [`DayConfig`] snapshot.

use super::grid::overlaps;
use crate::models::{BlackoutBlock, DayConfig};

/// Outcome of gating one court/window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision<'a> {
    Open,
    /// Day-wide suspension
    Preparing,
    /// First blackout block that overlaps the window
    Blocked(&'a BlackoutBlock),
}

impl GateDecision<'_> {
    pub fn is_open(&self) -> bool {
        matches!(self, GateDecision::Open)
    }
}

/// First block on `court_id` that overlaps `[start, end)`
pub fn blocking_block(
    blocks: &[BlackoutBlock],
    court_id: u32,
    start: u32,
    end: u32,
) -> Option<&BlackoutBlock> {
    blocks
        .iter()
        .find(|b| b.court_id == court_id && overlaps(b.start_min, b.end_min, start, end))
}

/// Preparing wins over blackout so the UI explains the broader reason.
pub fn evaluate(config: &DayConfig, court_id: u32, start: u32, end: u32) -> GateDecision<'_> {
    if config.preparing {
        return GateDecision::Preparing;
    }
    match blocking_block(&config.blocks, court_id, start, end) {
        Some(block) => GateDecision::Blocked(block),
        None => GateDecision::Open,
    }
}

/// `!preparing && no overlapping block on this court`
pub fn bookable(config: &DayConfig, court_id: u32, start: u32, end: u32) -> bool {
    evaluate(config, court_id, start, end).is_open()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn config(preparing: bool, blocks: Vec<BlackoutBlock>) -> DayConfig {
        DayConfig {
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            court_count: 4,
            court_names: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            start_min: 540,
            end_min: 1260,
            slot_minutes: 30,
            preparing,
            notice: String::new(),
            blocks,
            updated_at: 0,
        }
    }

    fn block(court_id: u32, start: u32, end: u32) -> BlackoutBlock {
        BlackoutBlock {
            court_id,
            start_min: start,
            end_min: end,
            reason: Some("lesson".into()),
        }
    }

    #[test]
    fn test_block_only_affects_its_court_and_window() {
        let cfg = config(false, vec![block(1, 540, 600)]);
        assert!(!bookable(&cfg, 1, 540, 570));
        assert!(!bookable(&cfg, 1, 570, 600));
        assert!(bookable(&cfg, 1, 600, 630));
        assert!(bookable(&cfg, 2, 540, 570));
    }

    #[test]
    fn test_preparing_closes_everything() {
        let cfg = config(true, vec![block(1, 540, 600)]);
        assert_eq!(evaluate(&cfg, 1, 540, 570), GateDecision::Preparing);
        assert_eq!(evaluate(&cfg, 3, 900, 930), GateDecision::Preparing);
    }

    #[test]
    fn test_evaluate_reports_block() {
        let cfg = config(false, vec![block(2, 600, 660), block(1, 540, 600)]);
        match evaluate(&cfg, 1, 560, 590) {
            GateDecision::Blocked(b) => assert_eq!(b.court_id, 1),
            other => panic!("expected block, got {:?}", other),
        }
        assert_eq!(evaluate(&cfg, 1, 600, 630), GateDecision::Open);
    }
}
