//! The replicated state store (C3): document, events, serialization, and
//! the CRDT merge.

pub mod document;
pub mod events;
pub mod merge;
pub mod serialize;

pub use document::{LocalState, StateDocument};
pub use events::{Event, EventEmitter, SubscriptionId};
pub use serialize::{PersistedRecord, Snapshot};
