//! Day Configuration Model (the single active day)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upper bound on configurable courts
pub const MAX_COURTS: u32 = 21;

/// Admin-declared court/time window excluded from booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackoutBlock {
    pub court_id: u32,
    pub start_min: u32,
    pub end_min: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Active day configuration
///
/// Exactly one exists at a time; saving replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayConfig {
    pub date: NaiveDate,
    pub court_count: u32,
    /// `len() == court_count`, never blank
    pub court_names: Vec<String>,
    pub start_min: u32,
    pub end_min: u32,
    pub slot_minutes: u32,
    /// Booking suspended while true
    #[serde(default)]
    pub preparing: bool,
    /// Free-text/markup notice shown above the grid
    #[serde(default)]
    pub notice: String,
    #[serde(default)]
    pub blocks: Vec<BlackoutBlock>,
    /// Unix millis of the last save
    pub updated_at: i64,
}

impl DayConfig {
    /// Display name for a court, `None` when the court is not configured
    pub fn court_name(&self, court_id: u32) -> Option<&str> {
        if court_id == 0 {
            return None;
        }
        self.court_names
            .get((court_id - 1) as usize)
            .map(String::as_str)
    }

    /// Whether `court_id` is within `1..=court_count`
    pub fn has_court(&self, court_id: u32) -> bool {
        court_id >= 1 && court_id <= self.court_count
    }
}

/// Fallback court label: 1 -> "A", 2 -> "B", ... 27 -> "AA"
pub fn letter_label(court_id: u32) -> String {
    let mut n = court_id;
    let mut label = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        label.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    label.iter().rev().collect()
}

/// Blackout block as submitted by the admin form
///
/// Signed so out-of-range values can be dropped instead of failing the save.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackoutBlockInput {
    pub court_id: i64,
    pub start_min: i64,
    pub end_min: i64,
    pub reason: Option<String>,
}

/// Save day configuration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayConfigUpdate {
    pub date: String,
    pub court_count: u32,
    pub court_names: Vec<String>,
    pub start_min: Option<u32>,
    pub end_min: Option<u32>,
    pub slot_minutes: Option<u32>,
    #[serde(default)]
    pub preparing: bool,
    #[serde(default)]
    pub notice: Option<String>,
    #[serde(default)]
    pub blocks: Vec<BlackoutBlockInput>,
}

/// Bulk reset payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResetRequest {
    /// Delete every reservation instead of only the active day's
    #[serde(default)]
    pub all: bool,
}

/// Purge-before payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurgeRequest {
    /// YYYY-MM-DD cutoff (exclusive), defaults to today
    pub before: Option<String>,
}

/// Purge-before result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeResult {
    pub deleted: u64,
    pub before: NaiveDate,
}

/// Admin PIN rotation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPinChange {
    pub new_pin: String,
}
