//! Deterministic schedule functions
//!
//! Shared by the booking write path and by grid rendering:
//! - [`grid`] - time slots and interval overlap
//! - [`capacity`] - seats used per court/window
//! - [`gate`] - blackout windows and preparing mode
//! - [`view`] - court × slot projection

pub mod capacity;
pub mod gate;
pub mod grid;
pub mod view;

pub use capacity::{COURT_CAPACITY, fits, is_full, remaining_capacity, used_capacity};
pub use gate::{GateDecision, blocking_block, bookable, evaluate};
pub use grid::{Slot, is_five_minute_aligned, make_slots, overlaps};
pub use view::{CourtColumn, DayGrid, GridCell, project};
