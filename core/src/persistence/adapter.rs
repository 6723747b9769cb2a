//! Best-effort persistence on top of a [`super::kvstore::KVStore`]:
//! save/load of room snapshots, stale-room GC, and the persistent
//! local-user-id / per-room admin-token bookkeeping used at rejoin.
//!
//! Saves are coalesced: every mutation calls [`PersistenceAdapter::note_change`],
//! which just records the latest snapshot and resets a deadline; the host
//! calls [`PersistenceAdapter::tick`] on its own cadence, and only once the
//! debounce window has elapsed without a newer change does a write
//! actually happen. There is no timer/async here — ticking is the host's
//! job per the single-threaded cooperative model.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::errors::{PersistenceError, PersistenceResult};
use crate::ids::{RoomId, UserId};
use crate::persistence::kvstore::KVStore;
use crate::store::serialize::{PersistedRecord, Snapshot};
use crate::utils::random::{new_admin_token, new_local_user_id};

pub const DEFAULT_PREFIX: &str = "seedless_";
pub const DEFAULT_RETENTION_DAYS: i64 = 30;
pub const DEBOUNCE_WINDOW: Duration = Duration::from_secs(1);

pub struct PersistenceAdapter<K: KVStore> {
    store: K,
    prefix: String,
    retention: Duration,
    pending: HashMap<RoomId, (Snapshot, Instant)>,
}

impl<K: KVStore> PersistenceAdapter<K> {
    pub fn new(store: K) -> Self {
        Self::with_prefix(store, DEFAULT_PREFIX)
    }

    pub fn with_prefix(store: K, prefix: impl Into<String>) -> Self {
        PersistenceAdapter {
            store,
            prefix: prefix.into(),
            retention: Duration::from_secs(DEFAULT_RETENTION_DAYS as u64 * 86_400),
            pending: HashMap::new(),
        }
    }

    fn key(&self, suffix: &str) -> String {
        format!("{}{}", self.prefix, suffix)
    }

    fn room_key(&self, room_id: &RoomId) -> String {
        self.key(&format!("room:{room_id}"))
    }

    fn admin_token_key(&self, room_id: &RoomId) -> String {
        self.key(&format!("admin_token:{room_id}"))
    }

    /// Records a snapshot as the latest pending write for `room_id`,
    /// resetting the debounce deadline. Call this from the change-event
    /// listener, filtered to non-`local.` mutations.
    pub fn note_change(&mut self, room_id: RoomId, snapshot: Snapshot, now: Instant) {
        self.pending.insert(room_id, (snapshot, now + DEBOUNCE_WINDOW));
    }

    /// Flushes any pending writes whose debounce window has elapsed.
    /// Persistence failures are logged and otherwise ignored (§7: the
    /// core continues in memory).
    pub fn tick(&mut self, now: Instant, saved_at_ms: i64) {
        let due: Vec<RoomId> = self
            .pending
            .iter()
            .filter(|(_, (_, deadline))| now >= *deadline)
            .map(|(id, _)| id.clone())
            .collect();
        for room_id in due {
            if let Some((snapshot, _)) = self.pending.remove(&room_id) {
                if let Err(err) = self.save(&room_id, snapshot, saved_at_ms) {
                    warn!("persistence save failed for {room_id}: {err}");
                }
            }
        }
    }

    /// Forces an immediate write regardless of debounce state, used on
    /// merge (per §3 lifecycle: "persisted after every non-local mutation
    /// ... and on merge").
    pub fn save(&mut self, room_id: &RoomId, snapshot: Snapshot, saved_at_ms: i64) -> PersistenceResult<()> {
        self.pending.remove(room_id);
        let record = PersistedRecord { snapshot, saved_at: saved_at_ms };
        let serialized = serde_json::to_string(&record)
            .map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
        match self.store.set(&self.room_key(room_id), &serialized) {
            Ok(()) => Ok(()),
            Err(PersistenceError::QuotaExceeded) => {
                self.cleanup_old(saved_at_ms)?;
                self.store.set(&self.room_key(room_id), &serialized)
            }
            Err(other) => Err(other),
        }
    }

    /// Loads a room's snapshot if present and within the retention
    /// window; evicts and returns `None` otherwise.
    pub fn load(&mut self, room_id: &RoomId, now_ms: i64) -> PersistenceResult<Option<Snapshot>> {
        let key = self.room_key(room_id);
        let Some(raw) = self.store.get(&key)? else {
            return Ok(None);
        };
        let record: PersistedRecord =
            serde_json::from_str(&raw).map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
        if now_ms - record.saved_at > self.retention.as_millis() as i64 {
            self.store.delete(&key)?;
            return Ok(None);
        }
        Ok(Some(record.snapshot))
    }

    pub fn cleanup_old(&mut self, now_ms: i64) -> PersistenceResult<()> {
        for key in self.store.list(&self.key("room:"))? {
            if let Some(raw) = self.store.get(&key)? {
                if let Ok(record) = serde_json::from_str::<PersistedRecord>(&raw) {
                    if now_ms - record.saved_at > self.retention.as_millis() as i64 {
                        self.store.delete(&key)?;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn set_retention(&mut self, retention: Duration) {
        self.retention = retention;
    }

    /// Returns this endpoint's persistent id, minting and storing one on
    /// first use.
    pub fn local_user_id(&mut self) -> PersistenceResult<UserId> {
        let key = self.key("local_user_id");
        if let Some(existing) = self.store.get(&key)? {
            return Ok(UserId::from(existing));
        }
        let id = new_local_user_id();
        self.store.set(&key, &id)?;
        Ok(UserId::from(id))
    }

    pub fn save_admin_token(&mut self, room_id: &RoomId, token: &str) -> PersistenceResult<()> {
        self.store.set(&self.admin_token_key(room_id), token)
    }

    pub fn load_admin_token(&mut self, room_id: &RoomId) -> PersistenceResult<Option<String>> {
        self.store.get(&self.admin_token_key(room_id))
    }

    pub fn mint_admin_token(&mut self, room_id: &RoomId) -> PersistenceResult<String> {
        let token = new_admin_token();
        self.save_admin_token(room_id, &token)?;
        Ok(token)
    }
}
