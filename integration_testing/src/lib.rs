//! A small harness for driving several [`seedless_core::Replica`]s over a
//! shared [`memory_transport::Hub`] inside one test process: spin up an
//! admin and N joiners, pump queued messages until the network is quiet,
//! and assert on the resulting documents.

use memory_transport::{Hub, MemoryChannel};
use seedless_core::ids::{RoomId, UserId};
use seedless_core::Replica;

pub struct Node {
    pub replica: Replica<MemoryChannel>,
}

pub struct Network {
    hub: Hub,
    pub nodes: Vec<Node>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    pub fn new() -> Self {
        Network { hub: Hub::new(), nodes: Vec::new() }
    }

    pub fn create_admin(&mut self, room: &str, display_name: &str, now: i64) -> usize {
        let channel = self.hub.join();
        let replica = Replica::create_room(
            RoomId::from(room),
            display_name.to_string(),
            UserId::from(format!("user-{display_name}")),
            "admin-token".to_string(),
            channel,
            now,
        )
        .expect("valid room slug");
        self.nodes.push(Node { replica });
        self.nodes.len() - 1
    }

    pub fn join(&mut self, room: &str, display_name: &str, now: i64) -> usize {
        let channel = self.hub.join();
        let replica = Replica::join_room(
            RoomId::from(room),
            display_name.to_string(),
            UserId::from(format!("user-{display_name}")),
            channel,
            now,
        )
        .expect("valid room slug");
        self.nodes.push(Node { replica });
        self.nodes.len() - 1
    }

    /// Delivers every queued envelope to every node, repeating until a
    /// full pass delivers nothing. Bounded so a bug that keeps both
    /// endpoints chattering can't hang a test.
    pub fn pump(&mut self, now: i64) {
        for _ in 0..64 {
            let mut delivered_any = false;
            let inboxes: Vec<_> = self
                .nodes
                .iter_mut()
                .map(|n| n.replica.channel.drain_inbound())
                .collect();
            for (idx, envelopes) in inboxes.into_iter().enumerate() {
                for envelope in envelopes {
                    delivered_any = true;
                    self.nodes[idx].replica.handle_inbound(&envelope, now);
                }
            }
            if !delivered_any {
                return;
            }
        }
    }

    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub fn node_mut(&mut self, idx: usize) -> &mut Node {
        &mut self.nodes[idx]
    }
}
