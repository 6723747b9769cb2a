//! Domain event emitter. Every `subscribe` returns a handle that must be
//! passed to `unsubscribe`; the document never leaks a listener past that
//! call, matching the host's expectation that a view (lobby, bracket) can
//! tear down its subscriptions when it unmounts.

use serde_json::Value;

use crate::ids::{MatchId, ParticipantId};

#[derive(Debug, Clone)]
pub enum Event {
    Change {
        path: String,
        value: Value,
        old_value: Option<Value>,
    },
    Batch(Vec<(String, Value)>),
    Reset,
    Sync,
    Merge,
    ParticipantJoin(ParticipantId),
    ParticipantLeave(ParticipantId),
    ParticipantUpdate(ParticipantId),
    MatchUpdate(MatchId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Event)>;

#[derive(Default)]
pub struct EventEmitter {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, listener));
        SubscriptionId(id)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(i, _)| *i != id.0);
    }

    pub fn emit(&mut self, event: Event) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listener_count", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut emitter = EventEmitter::new();
        let seen = Rc::new(RefCell::new(0));
        let seen2 = seen.clone();
        let id = emitter.subscribe(Box::new(move |_| *seen2.borrow_mut() += 1));
        emitter.emit(Event::Reset);
        emitter.unsubscribe(id);
        emitter.emit(Event::Reset);
        assert_eq!(*seen.borrow(), 1);
    }
}
