//! Idempotency cache
//!
//! Fast path in front of the write transaction. The authoritative record lives
//! in the redb `idempotency` table and is written in the same transaction as
//! the reservation; this cache only saves a transaction on hot replays.

use dashmap::DashMap;
use shared::models::Reservation;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Key-value store with per-entry expiry
pub trait TtlStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    fn put(&self, key: &str, value: Vec<u8>, ttl: Duration);

    /// Drop expired entries, returning how many were removed
    fn purge_expired(&self) -> usize;
}

/// In-process [`TtlStore`] backed by a concurrent map
#[derive(Debug, Default)]
pub struct MemoryTtlStore {
    entries: DashMap<String, (Instant, Vec<u8>)>,
}

impl MemoryTtlStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TtlStore for MemoryTtlStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let now = Instant::now();
        let live = self
            .entries
            .get(key)
            .and_then(|entry| (entry.0 > now).then(|| entry.1.clone()));
        if live.is_none() {
            // Expired entries are removed lazily
            self.entries.remove_if(key, |_, (expires, _)| *expires <= now);
        }
        live
    }

    fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        self.entries
            .insert(key.to_string(), (Instant::now() + ttl, value));
    }

    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, (expires, _)| *expires > now);
        before.saturating_sub(self.entries.len())
    }
}

/// Reservation replay cache keyed by owner-scoped token
#[derive(Clone)]
pub struct IdempotencyCache {
    store: Arc<dyn TtlStore>,
    ttl: Duration,
}

impl IdempotencyCache {
    pub fn new(store: Arc<dyn TtlStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Tokens are scoped per owner so two users cannot replay each other
    pub fn scoped_key(owner_id: &str, token: &str) -> String {
        format!("{}:{}", owner_id, token)
    }

    pub fn lookup(&self, key: &str) -> Option<Reservation> {
        let bytes = self.store.get(key)?;
        match serde_json::from_slice(&bytes) {
            Ok(reservation) => Some(reservation),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding unreadable idempotency entry");
                None
            }
        }
    }

    pub fn remember(&self, key: &str, reservation: &Reservation) {
        match serde_json::to_vec(reservation) {
            Ok(bytes) => self.store.put(key, bytes, self.ttl),
            Err(e) => tracing::warn!(key = %key, error = %e, "Failed to cache idempotency entry"),
        }
    }

    pub fn purge_expired(&self) -> usize {
        self.store.purge_expired()
    }
}
