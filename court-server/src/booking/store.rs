//! Persistence seam of the booking engine
//!
//! [`ReservationStore`] is implemented by the redb repository in production and
//! by fault-injecting wrappers in tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::models::{DayConfig, Reservation};

use super::BookingError;
use crate::db::StoreResult;

/// Admission re-check executed inside the write transaction
///
/// Receives the active day configuration and every reservation of the
/// candidate's date, both as read by the transaction. Returning an error
/// aborts the transaction.
pub type AdmissionCheck<'a> = &'a (dyn Fn(Option<&DayConfig>, &[Reservation]) -> Result<(), BookingError>
         + Send
         + Sync);

/// Idempotency token claimed by a commit
#[derive(Debug, Clone, Copy)]
pub struct IdempotencyClaim<'a> {
    /// Owner-scoped token
    pub key: &'a str,
    /// Unix millis after which the token no longer replays
    pub expires_at: i64,
    /// Unix millis at commit time
    pub now_ms: i64,
}

/// 一次提交请求
pub struct CommitRequest<'a> {
    pub reservation: &'a Reservation,
    pub claim: Option<IdempotencyClaim<'a>>,
    pub check: AdmissionCheck<'a>,
}

/// 提交结果
#[derive(Debug)]
pub enum CommitOutcome {
    /// The reservation was inserted
    Created(Reservation),
    /// The token was already committed; the stored result is returned unchanged
    Replayed(Reservation),
    /// The admission re-check failed inside the transaction
    Rejected(BookingError),
}

/// Stored alongside a committed token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdempotencyRecord {
    pub reservation: Reservation,
    pub expires_at: i64,
}

impl IdempotencyRecord {
    pub fn is_live(&self, now_ms: i64) -> bool {
        self.expires_at > now_ms
    }
}

/// Reservation persistence
///
/// All methods are synchronous; the redb implementation runs each call in its
/// own transaction.
pub trait ReservationStore: Send + Sync {
    /// All reservations of one date
    fn list_day(&self, date: NaiveDate) -> StoreResult<Vec<Reservation>>;

    /// Every stored reservation
    fn list_all(&self) -> StoreResult<Vec<Reservation>>;

    fn get(&self, id: &str) -> StoreResult<Option<Reservation>>;

    /// Look up a live idempotency token
    fn find_token(&self, key: &str, now_ms: i64) -> StoreResult<Option<Reservation>>;

    /// Re-check and insert atomically
    fn commit(&self, request: CommitRequest<'_>) -> StoreResult<CommitOutcome>;

    /// Remove one reservation, returning it if it existed
    fn delete(&self, id: &str) -> StoreResult<Option<Reservation>>;

    /// Remove every reservation of one date
    fn delete_day(&self, date: NaiveDate) -> StoreResult<u64>;

    /// Remove every reservation
    fn delete_all(&self) -> StoreResult<u64>;

    /// Remove every reservation dated strictly before `cutoff`
    fn delete_before(&self, cutoff: NaiveDate) -> StoreResult<u64>;

    /// Replace the player names of one reservation
    fn update_names(&self, id: &str, names: Vec<String>) -> StoreResult<Option<Reservation>>;

    /// Drop expired idempotency tokens
    fn purge_tokens(&self, now_ms: i64) -> StoreResult<usize>;
}
