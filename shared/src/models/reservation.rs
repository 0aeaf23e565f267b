//! Reservation Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reservation entity (one party on one court for one time window)
///
/// `start_min`/`end_min` are minutes since local midnight, half-open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub court_id: u32,
    /// Calendar day (YYYY-MM-DD)
    pub date: NaiveDate,
    pub start_min: u32,
    pub end_min: u32,
    /// 1..=4
    pub party_size: u32,
    /// Normalized names, `len() == party_size`
    pub player_names: Vec<String>,
    /// 4-digit cancellation PIN, absent means not cancellable via PIN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
    /// Opaque user id or the guest fallback
    pub owner_id: String,
    /// Unix millis
    pub created_at: i64,
}

impl Reservation {
    /// Public representation, never exposes the PIN
    pub fn public_view(&self) -> ReservationView {
        ReservationView {
            id: self.id.clone(),
            court_id: self.court_id,
            date: self.date,
            start_min: self.start_min,
            end_min: self.end_min,
            party_size: self.party_size,
            player_names: self.player_names.clone(),
            has_pin: self.pin.is_some(),
            owner_id: self.owner_id.clone(),
            created_at: self.created_at,
        }
    }
}

/// Reservation as returned by public endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationView {
    pub id: String,
    pub court_id: u32,
    pub date: NaiveDate,
    pub start_min: u32,
    pub end_min: u32,
    pub party_size: u32,
    pub player_names: Vec<String>,
    pub has_pin: bool,
    pub owner_id: String,
    pub created_at: i64,
}

/// Create reservation payload
///
/// Fields are deliberately loose (`Option`, signed integers) so that the
/// booking validator, not the JSON decoder, decides which typed error a
/// malformed request gets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCreate {
    pub court_id: Option<i64>,
    pub date: Option<String>,
    #[serde(default)]
    pub start_min: i64,
    #[serde(default)]
    pub end_min: i64,
    #[serde(default)]
    pub party_size: i64,
    pub player_names: Option<Vec<String>>,
    pub pin: Option<String>,
    pub idempotency_key: Option<String>,
}

/// Cancel reservation payload (PIN path)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationCancel {
    pub pin: Option<String>,
}

/// Admin name edit payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationNamesUpdate {
    pub player_names: Vec<String>,
}

/// Result of delete-style operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub deleted: u64,
}
