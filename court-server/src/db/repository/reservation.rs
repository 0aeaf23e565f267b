//! Reservation Repository
//!
//! redb implementation of [`ReservationStore`].

use chrono::NaiveDate;
use redb::{ReadableTable, ReadableTableMetadata};
use shared::models::Reservation;

use crate::booking::store::{CommitOutcome, CommitRequest, IdempotencyRecord, ReservationStore};
use super::day_config::read_active;
use crate::db::{
    DAY_CONFIG_TABLE, DAY_INDEX_TABLE, DbService, IDEMPOTENCY_TABLE, RESERVATIONS_TABLE,
    StoreError, StoreResult,
};

/// Upper bound for reservation ids inside one date's index range
const ID_MAX: &str = "\u{10FFFF}";

type DayKey = (&'static str, &'static str);

#[derive(Clone)]
pub struct ReservationRepository {
    db: DbService,
}

impl ReservationRepository {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }
}

/// Reservation ids indexed under one date
fn day_ids<T>(index: &T, date: &str) -> StoreResult<Vec<String>>
where
    T: ReadableTable<DayKey, ()>,
{
    let mut ids = Vec::new();
    for result in index.range((date, "")..=(date, ID_MAX))? {
        let (key, _) = result?;
        let (_, id) = key.value();
        ids.push(id.to_string());
    }
    Ok(ids)
}

fn load_records<T>(records: &T, ids: &[String]) -> StoreResult<Vec<Reservation>>
where
    T: ReadableTable<&'static str, &'static [u8]>,
{
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(value) = records.get(id.as_str())? {
            out.push(serde_json::from_slice::<Reservation>(value.value())?);
        } else {
            tracing::warn!(reservation_id = %id, "Day index points at a missing reservation");
        }
    }
    out.sort_by(|a, b| {
        (a.court_id, a.start_min, a.created_at).cmp(&(b.court_id, b.start_min, b.created_at))
    });
    Ok(out)
}

fn read_token<T>(tokens: &T, key: &str, now_ms: i64) -> StoreResult<Option<Reservation>>
where
    T: ReadableTable<&'static str, &'static [u8]>,
{
    match tokens.get(key)? {
        Some(value) => {
            let record: IdempotencyRecord = serde_json::from_slice(value.value())?;
            Ok(record.is_live(now_ms).then_some(record.reservation))
        }
        None => Ok(None),
    }
}

impl ReservationStore for ReservationRepository {
    fn list_day(&self, date: NaiveDate) -> StoreResult<Vec<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(DAY_INDEX_TABLE)?;
        let records = read_txn.open_table(RESERVATIONS_TABLE)?;
        let ids = day_ids(&index, &date.to_string())?;
        load_records(&records, &ids)
    }

    fn list_all(&self) -> StoreResult<Vec<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let records = read_txn.open_table(RESERVATIONS_TABLE)?;
        let mut out = Vec::new();
        for result in records.iter()? {
            let (_key, value) = result?;
            out.push(serde_json::from_slice::<Reservation>(value.value())?);
        }
        out.sort_by(|a, b| {
            (a.date, a.court_id, a.start_min, a.created_at)
                .cmp(&(b.date, b.court_id, b.start_min, b.created_at))
        });
        Ok(out)
    }

    fn get(&self, id: &str) -> StoreResult<Option<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let records = read_txn.open_table(RESERVATIONS_TABLE)?;
        match records.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn find_token(&self, key: &str, now_ms: i64) -> StoreResult<Option<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let tokens = read_txn.open_table(IDEMPOTENCY_TABLE)?;
        read_token(&tokens, key, now_ms)
    }

    fn commit(&self, request: CommitRequest<'_>) -> StoreResult<CommitOutcome> {
        let reservation = request.reservation;
        let date = reservation.date.to_string();

        let txn = self.db.begin_write()?;
        let outcome = {
            let mut records = txn.open_table(RESERVATIONS_TABLE)?;
            let mut index = txn.open_table(DAY_INDEX_TABLE)?;
            let mut tokens = txn.open_table(IDEMPOTENCY_TABLE)?;
            let days = txn.open_table(DAY_CONFIG_TABLE)?;

            // 1. 事务内幂等检查 (防止并发重复提交)
            let replayed = match &request.claim {
                Some(claim) => read_token(&tokens, claim.key, claim.now_ms)?,
                None => None,
            };

            if let Some(previous) = replayed {
                CommitOutcome::Replayed(previous)
            } else {
                // 2. 在写事务内重新读取营业日配置与当天快照并复核
                let active = read_active(&days)?;
                let ids = day_ids(&index, &date)?;
                let day = load_records(&records, &ids)?;

                match (request.check)(active.as_ref(), &day) {
                    Err(rejection) => CommitOutcome::Rejected(rejection),
                    Ok(()) => {
                        if records.get(reservation.id.as_str())?.is_some() {
                            return Err(StoreError::Conflict(format!(
                                "reservation id {} already exists",
                                reservation.id
                            )));
                        }

                        // 3. 写入记录、索引与幂等令牌
                        let value = serde_json::to_vec(reservation)?;
                        records.insert(reservation.id.as_str(), value.as_slice())?;
                        index.insert((date.as_str(), reservation.id.as_str()), ())?;

                        if let Some(claim) = &request.claim {
                            let record = IdempotencyRecord {
                                reservation: reservation.clone(),
                                expires_at: claim.expires_at,
                            };
                            let value = serde_json::to_vec(&record)?;
                            tokens.insert(claim.key, value.as_slice())?;
                        }

                        CommitOutcome::Created(reservation.clone())
                    }
                }
            }
        };

        match outcome {
            CommitOutcome::Created(_) => txn.commit()?,
            _ => txn.abort()?,
        }
        Ok(outcome)
    }

    fn delete(&self, id: &str) -> StoreResult<Option<Reservation>> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut records = txn.open_table(RESERVATIONS_TABLE)?;
            let mut index = txn.open_table(DAY_INDEX_TABLE)?;

            let removed: Option<Reservation> = match records.remove(id)? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };
            if let Some(r) = &removed {
                let date = r.date.to_string();
                index.remove((date.as_str(), id))?;
            }
            removed
        };
        txn.commit()?;
        Ok(removed)
    }

    fn delete_day(&self, date: NaiveDate) -> StoreResult<u64> {
        let date = date.to_string();
        let txn = self.db.begin_write()?;
        let deleted = {
            let mut records = txn.open_table(RESERVATIONS_TABLE)?;
            let mut index = txn.open_table(DAY_INDEX_TABLE)?;

            let ids = day_ids(&index, &date)?;
            for id in &ids {
                records.remove(id.as_str())?;
                index.remove((date.as_str(), id.as_str()))?;
            }
            ids.len() as u64
        };
        txn.commit()?;
        Ok(deleted)
    }

    fn delete_all(&self) -> StoreResult<u64> {
        let txn = self.db.begin_write()?;
        let deleted = {
            let mut records = txn.open_table(RESERVATIONS_TABLE)?;
            let mut index = txn.open_table(DAY_INDEX_TABLE)?;
            let count = records.len()?;

            // Collect first to avoid borrow issues while removing
            let mut keys: Vec<(String, String)> = Vec::new();
            for result in index.iter()? {
                let (key, _) = result?;
                let (date, id) = key.value();
                keys.push((date.to_string(), id.to_string()));
            }
            for (date, id) in &keys {
                index.remove((date.as_str(), id.as_str()))?;
            }

            let mut ids: Vec<String> = Vec::new();
            for result in records.iter()? {
                let (key, _) = result?;
                ids.push(key.value().to_string());
            }
            for id in &ids {
                records.remove(id.as_str())?;
            }
            count
        };
        txn.commit()?;
        Ok(deleted)
    }

    fn delete_before(&self, cutoff: NaiveDate) -> StoreResult<u64> {
        let cutoff = cutoff.to_string();
        let txn = self.db.begin_write()?;
        let deleted = {
            let mut records = txn.open_table(RESERVATIONS_TABLE)?;
            let mut index = txn.open_table(DAY_INDEX_TABLE)?;

            let mut keys: Vec<(String, String)> = Vec::new();
            for result in index.range(..(cutoff.as_str(), ""))? {
                let (key, _) = result?;
                let (date, id) = key.value();
                keys.push((date.to_string(), id.to_string()));
            }
            for (date, id) in &keys {
                index.remove((date.as_str(), id.as_str()))?;
                records.remove(id.as_str())?;
            }
            keys.len() as u64
        };
        txn.commit()?;
        Ok(deleted)
    }

    fn update_names(&self, id: &str, names: Vec<String>) -> StoreResult<Option<Reservation>> {
        let txn = self.db.begin_write()?;
        let updated = {
            let mut records = txn.open_table(RESERVATIONS_TABLE)?;
            let existing: Option<Reservation> = match records.get(id)? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };
            match existing {
                Some(mut r) => {
                    r.player_names = names;
                    let value = serde_json::to_vec(&r)?;
                    records.insert(id, value.as_slice())?;
                    Some(r)
                }
                None => None,
            }
        };
        txn.commit()?;
        Ok(updated)
    }

    fn purge_tokens(&self, now_ms: i64) -> StoreResult<usize> {
        let txn = self.db.begin_write()?;
        let purged = {
            let mut tokens = txn.open_table(IDEMPOTENCY_TABLE)?;
            let days = txn.open_table(DAY_CONFIG_TABLE)?;
            let mut expired: Vec<String> = Vec::new();
            for result in tokens.iter()? {
                let (key, value) = result?;
                let record: IdempotencyRecord = serde_json::from_slice(value.value())?;
                if !record.is_live(now_ms) {
                    expired.push(key.value().to_string());
                }
            }
            for key in &expired {
                tokens.remove(key.as_str())?;
            }
            expired.len()
        };
        txn.commit()?;
        Ok(purged)
    }
}
