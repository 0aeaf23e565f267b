//! Court × slot grid projection
//!
//! Combines the time grid, capacity and gate for one snapshot of the day.

use serde::{Deserialize, Serialize};

use super::capacity::{is_full, remaining_capacity, used_capacity};
use super::gate::{GateDecision, evaluate};
use super::grid::make_slots;
use crate::models::{DayConfig, Reservation};

/// One court/slot cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub start: u32,
    pub end: u32,
    pub used: u32,
    pub remaining: u32,
    pub full: bool,
    pub blocked: bool,
    /// `!full && !blocked && !preparing`
    pub available: bool,
}

/// One court's column of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtColumn {
    pub court_id: u32,
    pub name: String,
    pub cells: Vec<GridCell>,
}

/// The whole day as the grid renders it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayGrid {
    pub date: chrono::NaiveDate,
    pub preparing: bool,
    pub slot_minutes: u32,
    pub courts: Vec<CourtColumn>,
}

/// Project `reservations` (the day's set) onto the configured grid.
pub fn project(config: &DayConfig, reservations: &[Reservation]) -> DayGrid {
    let slots = make_slots(config.start_min, config.end_min, config.slot_minutes);
    let courts = (1..=config.court_count)
        .map(|court_id| {
            let cells = slots
                .iter()
                .map(|slot| {
                    let used = used_capacity(reservations, court_id, slot.start, slot.end);
                    let gate = evaluate(config, court_id, slot.start, slot.end);
                    let blocked = matches!(gate, GateDecision::Blocked(_));
                    GridCell {
                        start: slot.start,
                        end: slot.end,
                        used,
                        remaining: remaining_capacity(used),
                        full: is_full(used),
                        blocked,
                        available: gate.is_open() && !is_full(used),
                    }
                })
                .collect();
            CourtColumn {
                court_id,
                name: config
                    .court_name(court_id)
                    .map(str::to_string)
                    .unwrap_or_else(|| crate::models::letter_label(court_id)),
                cells,
            }
        })
        .collect();

    DayGrid {
        date: config.date,
        preparing: config.preparing,
        slot_minutes: config.slot_minutes,
        courts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlackoutBlock;
    use chrono::NaiveDate;

    fn config() -> DayConfig {
        DayConfig {
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            court_count: 2,
            court_names: vec!["East".into(), "West".into()],
            start_min: 540,
            end_min: 660,
            slot_minutes: 30,
            preparing: false,
            notice: String::new(),
            blocks: vec![BlackoutBlock {
                court_id: 2,
                start_min: 600,
                end_min: 660,
                reason: None,
            }],
            updated_at: 0,
        }
    }

    fn reservation(court_id: u32, start: u32, end: u32, party: u32) -> Reservation {
        Reservation {
            id: format!("{court_id}-{start}"),
            court_id,
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            start_min: start,
            end_min: end,
            party_size: party,
            player_names: vec!["x".into(); party as usize],
            pin: None,
            owner_id: "guest".into(),
            created_at: 0,
        }
    }

    #[test]
    fn test_projection_shape_and_cells() {
        let grid = project(&config(), &[reservation(1, 540, 570, 4), reservation(1, 570, 630, 1)]);
        assert_eq!(grid.courts.len(), 2);
        assert_eq!(grid.courts[0].name, "East");
        assert_eq!(grid.courts[0].cells.len(), 4);

        let first = &grid.courts[0].cells[0];
        assert!(first.full);
        assert!(!first.available);
        assert_eq!(first.remaining, 0);

        let second = &grid.courts[0].cells[1];
        assert_eq!(second.used, 1);
        assert!(second.available);

        let blocked = &grid.courts[1].cells[2];
        assert!(blocked.blocked);
        assert!(!blocked.available);
        assert!(grid.courts[1].cells[0].available);
    }

    #[test]
    fn test_projection_preparing() {
        let mut cfg = config();
        cfg.preparing = true;
        let grid = project(&cfg, &[]);
        assert!(grid.preparing);
        assert!(grid.courts.iter().flat_map(|c| &c.cells).all(|c| !c.available));
    }
}
