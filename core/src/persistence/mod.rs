//! The persistence adapter (C5): best-effort save/load on top of an
//! abstract KVStore, plus local-user-id and admin-token bookkeeping.

pub mod adapter;
pub mod kvstore;

pub use adapter::{PersistenceAdapter, DEBOUNCE_WINDOW, DEFAULT_PREFIX, DEFAULT_RETENTION_DAYS};
pub use kvstore::KVStore;
