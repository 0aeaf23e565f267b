//! BookingManager - reservation write path and admin mutations
//!
//! # 预约流程
//!
//! ```text
//! create(owner, payload)
//!     ├─ 1. 幂等检查 (cache → redb)
//!     ├─ 2. 请求校验 (字段 / 姓名 / 时间 / 人数 / PIN)
//!     ├─ 3. 营业日闸门 (未开放 / 准备中 / 场地 / 营业时间 / 封场)
//!     ├─ 4. 快照预检 (同人守卫 + 容量)
//!     └─ 5. 写事务: 事务内幂等 + 复核 (闸门 / 守卫 / 容量) + 插入
//!            └─ Conflict / Unavailable → 固定等待后重试一次
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use shared::models::{DayConfig, PurgeResult, Reservation, ReservationCreate};
use shared::schedule::{DayGrid, fits, project, used_capacity};
use std::sync::Arc;
use std::time::Duration;

use super::guard::{self, GuardCandidate};
use super::idempotency::IdempotencyCache;
use super::names::{NamePolicy, canonical_party};
use super::store::{CommitOutcome, CommitRequest, IdempotencyClaim, ReservationStore};
use super::validation::{self, ValidBooking};
use super::BookingError;
use crate::db::{DayConfigRepository, StoreError, StoreFailure};
use crate::security_log;
use crate::utils::time::{Clock, now_millis};

/// Retries after the first failed commit
const MAX_COMMIT_RETRIES: u32 = 1;

/// Guard and capacity, evaluated against one day snapshot
fn admit(
    booking: &ValidBooking,
    day: &[Reservation],
    now: NaiveDateTime,
) -> Result<(), BookingError> {
    let candidate = GuardCandidate {
        names: &booking.player_names,
        date: booking.date,
        start_min: booking.start_min,
        end_min: booking.end_min,
    };
    guard::check(day, candidate, now).map_err(|v| BookingError::DuplicatePersonConflict {
        name: v.name,
        reservation_id: v.reservation_id,
        ends_at: v.ends_at,
    })?;

    let same_day: Vec<Reservation> = day
        .iter()
        .filter(|r| r.date == booking.date)
        .cloned()
        .collect();
    let used = used_capacity(&same_day, booking.court_id, booking.start_min, booking.end_min);
    if !fits(used, booking.party_size) {
        return Err(BookingError::CapacityExceeded {
            used,
            requested: booking.party_size,
        });
    }
    Ok(())
}

/// Storage failure that survived the retry
fn surface(err: StoreError) -> BookingError {
    match err.failure() {
        StoreFailure::Conflict => BookingError::SlotConflict(err.to_string()),
        StoreFailure::Transient => BookingError::TransientStore(err.to_string()),
        StoreFailure::Fatal => BookingError::Store(err),
    }
}

pub struct BookingManager {
    store: Arc<dyn ReservationStore>,
    days: DayConfigRepository,
    cache: IdempotencyCache,
    clock: Arc<dyn Clock>,
    policy: NamePolicy,
    retry_delay: Duration,
}

impl std::fmt::Debug for BookingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingManager")
            .field("policy", &self.policy)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

impl BookingManager {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        days: DayConfigRepository,
        cache: IdempotencyCache,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            days,
            cache,
            clock,
            policy: NamePolicy::default(),
            retry_delay: Duration::from_millis(150),
        }
    }

    pub fn with_policy(mut self, policy: NamePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn policy(&self) -> &NamePolicy {
        &self.policy
    }

    // ========== Booking ==========

    /// Create a reservation
    pub async fn create(
        &self,
        owner_id: &str,
        req: ReservationCreate,
    ) -> Result<Reservation, BookingError> {
        // 1. 幂等检查
        let token_key = req
            .idempotency_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| IdempotencyCache::scoped_key(owner_id, k));

        if let Some(key) = &token_key {
            if let Some(previous) = self.cache.lookup(key) {
                tracing::debug!(key = %key, reservation_id = %previous.id, "Idempotent replay (cache)");
                return Ok(previous);
            }
            if let Some(previous) = self.store.find_token(key, now_millis())? {
                tracing::debug!(key = %key, reservation_id = %previous.id, "Idempotent replay (store)");
                self.cache.remember(key, &previous);
                return Ok(previous);
            }
        }

        // 2-3. 校验与闸门
        let booking = validation::validate_request(&req, &self.policy)?;
        let day = self.days.find_active()?;
        validation::gate(&booking, day.as_ref())?;

        // 4. 快照预检 (快速失败，事务内还会复核)
        let now = self.clock.now();
        let snapshot = self.store.list_day(booking.date)?;
        if let Err(e) = admit(&booking, &snapshot, now) {
            tracing::info!(court_id = booking.court_id, date = %booking.date, error = %e, "Booking rejected");
            return Err(e);
        }

        // 5. 写事务: 闸门、守卫与容量按事务内读到的配置和快照复核
        let check = |active: Option<&DayConfig>, day: &[Reservation]| {
            validation::gate(&booking, active)?;
            admit(&booking, day, now)
        };
        let ttl_ms = i64::try_from(self.cache.ttl().as_millis()).unwrap_or(i64::MAX);

        let mut attempt = 0;
        loop {
            let reservation = self.build(&booking, owner_id);
            let now_ms = now_millis();
            let claim = token_key.as_deref().map(|key| IdempotencyClaim {
                key,
                expires_at: now_ms.saturating_add(ttl_ms),
                now_ms,
            });

            let err = match self.store.commit(CommitRequest {
                reservation: &reservation,
                claim,
                check: &check,
            }) {
                Ok(CommitOutcome::Created(created)) => {
                    if let Some(key) = &token_key {
                        self.cache.remember(key, &created);
                    }
                    tracing::info!(
                        reservation_id = %created.id,
                        court_id = created.court_id,
                        date = %created.date,
                        start_min = created.start_min,
                        end_min = created.end_min,
                        party_size = created.party_size,
                        "Reservation created"
                    );
                    return Ok(created);
                }
                Ok(CommitOutcome::Replayed(previous)) => {
                    if let Some(key) = &token_key {
                        self.cache.remember(key, &previous);
                    }
                    return Ok(previous);
                }
                Ok(CommitOutcome::Rejected(e)) => {
                    tracing::info!(court_id = booking.court_id, date = %booking.date, error = %e, "Booking rejected at commit");
                    return Err(e);
                }
                Err(e) => e,
            };

            if attempt >= MAX_COMMIT_RETRIES || !err.is_retryable() {
                return Err(surface(err));
            }
            attempt += 1;
            tracing::warn!(
                court_id = booking.court_id,
                date = %booking.date,
                error = %err,
                "Commit failed, retrying once"
            );
            drop(err);
            tokio::time::sleep(self.retry_delay).await;
        }
    }

    fn build(&self, booking: &ValidBooking, owner_id: &str) -> Reservation {
        Reservation {
            id: uuid::Uuid::new_v4().to_string(),
            court_id: booking.court_id,
            date: booking.date,
            start_min: booking.start_min,
            end_min: booking.end_min,
            party_size: booking.party_size,
            player_names: booking.player_names.clone(),
            pin: booking.pin.clone(),
            owner_id: owner_id.to_string(),
            created_at: now_millis(),
        }
    }

    // ========== Cancellation ==========

    /// Cancel with the reservation's PIN
    pub fn cancel_with_pin(
        &self,
        id: &str,
        raw_pin: Option<&str>,
    ) -> Result<Reservation, BookingError> {
        let existing = self
            .store
            .get(id)?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;
        let Some(stored) = existing.pin.as_deref() else {
            return Err(BookingError::PinNotSupported);
        };
        let pin = validation::parse_cancel_pin(raw_pin)?;
        if pin != stored {
            security_log!(WARN, "pin_mismatch", reservation_id = %id);
            return Err(BookingError::PinMismatch);
        }

        let removed = self
            .store
            .delete(id)?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;
        tracing::info!(reservation_id = %id, "Reservation cancelled with PIN");
        Ok(removed)
    }

    // ========== Admin ==========

    /// Delete regardless of PIN; deleting a missing id reports zero
    pub fn force_delete(&self, id: &str) -> Result<u64, BookingError> {
        let deleted = u64::from(self.store.delete(id)?.is_some());
        tracing::info!(reservation_id = %id, deleted, "Reservation force-deleted");
        Ok(deleted)
    }

    /// Delete the active day's reservations, or all reservations
    pub fn reset(&self, all: bool) -> Result<u64, BookingError> {
        let deleted = if all {
            self.store.delete_all()?
        } else {
            match self.days.find_active()? {
                Some(day) => self.store.delete_day(day.date)?,
                None => 0,
            }
        };
        self.days.touch(now_millis())?;
        tracing::info!(all, deleted, "Reservations reset");
        Ok(deleted)
    }

    /// Delete everything dated before `before` (default: today)
    pub fn purge_before(&self, before: Option<NaiveDate>) -> Result<PurgeResult, BookingError> {
        let before = before.unwrap_or_else(|| self.clock.today());
        let deleted = self.store.delete_before(before)?;
        tracing::info!(before = %before, deleted, "Past reservations purged");
        Ok(PurgeResult { deleted, before })
    }

    /// Replace player names without re-running the guard or capacity
    pub fn update_names(&self, id: &str, raw: &[String]) -> Result<Reservation, BookingError> {
        let existing = self
            .store
            .get(id)?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        let party = canonical_party(raw);
        if party.len() != existing.party_size as usize {
            return Err(BookingError::PlayerCountMismatch {
                expected: i64::from(existing.party_size),
                actual: party.len(),
            });
        }
        for (index, name) in &party {
            self.policy
                .check(name)
                .map_err(|reason| BookingError::InvalidName {
                    index: *index,
                    reason,
                })?;
        }

        let names = party.into_iter().map(|(_, n)| n).collect();
        let updated = self
            .store
            .update_names(id, names)?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;
        tracing::info!(reservation_id = %id, "Player names updated by admin");
        Ok(updated)
    }

    // ========== Queries ==========

    pub fn get(&self, id: &str) -> Result<Option<Reservation>, BookingError> {
        Ok(self.store.get(id)?)
    }

    /// Reservations of one date (optionally one court), or all of them
    pub fn list(
        &self,
        date: Option<NaiveDate>,
        court_id: Option<u32>,
    ) -> Result<Vec<Reservation>, BookingError> {
        let mut list = match date {
            Some(date) => self.store.list_day(date)?,
            None => self.store.list_all()?,
        };
        if let Some(court_id) = court_id {
            list.retain(|r| r.court_id == court_id);
        }
        Ok(list)
    }

    /// Court × slot grid of the active day
    pub fn grid(&self) -> Result<Option<DayGrid>, BookingError> {
        let Some(day) = self.days.find_active()? else {
            return Ok(None);
        };
        let reservations = self.store.list_day(day.date)?;
        Ok(Some(project(&day, &reservations)))
    }

    /// Drop expired idempotency tokens from cache and store
    pub fn purge_expired_tokens(&self) -> Result<usize, BookingError> {
        let cached = self.cache.purge_expired();
        let stored = self.store.purge_tokens(now_millis())?;
        if cached + stored > 0 {
            tracing::debug!(cached, stored, "Expired idempotency tokens purged");
        }
        Ok(stored)
    }
}
