//! An in-process, fan-out `PeerChannel` hub plus a matching in-memory
//! `KVStore`, standing in for the WebRTC/WebSocket mesh and browser
//! storage a real embedder would supply. Used by the integration tests
//! and the demo CLI to run several replicas in one process.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

use tracing::trace;

use seedless_core::errors::PersistenceResult;
use seedless_core::persistence::KVStore;
use seedless_core::protocol::{Envelope, Payload, PeerChannel};
use seedless_core::PeerId;

#[derive(Default)]
struct HubState {
    next_peer_seq: u64,
    next_timestamp: i64,
    inboxes: HashMap<PeerId, VecDeque<Envelope>>,
}

/// A shared message bus. Clone to hand a handle to each simulated
/// endpoint; all clones see the same underlying state.
#[derive(Clone, Default)]
pub struct Hub {
    state: Rc<RefCell<HubState>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new endpoint and returns its channel handle. Mirrors a
    /// peer connecting to the room's transport.
    pub fn join(&self) -> MemoryChannel {
        let mut state = self.state.borrow_mut();
        state.next_peer_seq += 1;
        let id = PeerId::from(format!("peer-{}", state.next_peer_seq));
        state.inboxes.insert(id.clone(), VecDeque::new());
        trace!(peer = %id, "joined memory hub");
        MemoryChannel { hub: self.state.clone(), self_id: id }
    }
}

pub struct MemoryChannel {
    hub: Rc<RefCell<HubState>>,
    self_id: PeerId,
}

impl MemoryChannel {
    /// Drains every envelope queued for this endpoint since the last
    /// call. The host feeds each into `Replica::handle_inbound` on its
    /// own tick.
    pub fn drain_inbound(&mut self) -> Vec<Envelope> {
        let mut state = self.hub.borrow_mut();
        let Some(inbox) = state.inboxes.get_mut(&self.self_id) else {
            return Vec::new();
        };
        inbox.drain(..).collect()
    }
}

impl PeerChannel for MemoryChannel {
    fn self_id(&self) -> PeerId {
        self.self_id.clone()
    }

    fn peers(&self) -> Vec<PeerId> {
        self.hub
            .borrow()
            .inboxes
            .keys()
            .filter(|id| **id != self.self_id)
            .cloned()
            .collect()
    }

    fn broadcast(&mut self, payload: Payload) {
        let mut state = self.hub.borrow_mut();
        state.next_timestamp += 1;
        let envelope = Envelope { payload, sender_id: self.self_id.clone(), timestamp: state.next_timestamp };
        for (id, inbox) in state.inboxes.iter_mut() {
            if *id != self.self_id {
                inbox.push_back(envelope.clone());
            }
        }
    }

    fn send_to(&mut self, payload: Payload, targets: &[PeerId]) {
        let mut state = self.hub.borrow_mut();
        state.next_timestamp += 1;
        let envelope = Envelope { payload, sender_id: self.self_id.clone(), timestamp: state.next_timestamp };
        for target in targets {
            if let Some(inbox) = state.inboxes.get_mut(target) {
                inbox.push_back(envelope.clone());
            }
        }
    }

    fn leave(&mut self) {
        self.hub.borrow_mut().inboxes.remove(&self.self_id);
    }
}

/// A bare in-memory `KVStore`, namespaced by key prefix only. No
/// capacity limit, so `QuotaExceeded` never fires here; that path is
/// exercised against a bounded fake in `integration_testing` instead.
#[derive(Debug, Default, Clone)]
pub struct MemoryKvStore {
    entries: BTreeMap<String, String>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KVStore for MemoryKvStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> PersistenceResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn list(&self, prefix: &str) -> PersistenceResult<Vec<String>> {
        Ok(self.entries.keys().filter(|k| k.starts_with(prefix)).cloned().collect())
    }
}
