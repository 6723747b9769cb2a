//! The `PeerChannel` port: an abstract, unreliable, fan-out transport the
//! core depends on but never implements. Per the single-threaded
//! cooperative concurrency model, this is a plain synchronous trait rather
//! than an async one — an implementor's worker threads (if any) must
//! deliver callbacks serialized onto the host's queue before calling back
//! into core, not hand core a future to poll.
//!
//! The source interface registers `onAction`/`onPeerJoin`/`onPeerLeave`
//! callbacks on the channel; here the host instead owns the loop and
//! drives [`crate::protocol::sync::SyncEngine`] directly with inbound
//! envelopes and peer events (see DESIGN.md) — callback registration has
//! no Rust-idiomatic equivalent that doesn't require the channel to hold
//! trait objects naming the engine, which this port avoids.

use crate::ids::PeerId;
use crate::protocol::messages::Payload;

pub trait PeerChannel {
    /// This replica's own transient connection id.
    fn self_id(&self) -> PeerId;

    /// Currently connected peers.
    fn peers(&self) -> Vec<PeerId>;

    /// Fan-out to every connected peer. Queued, non-blocking.
    fn broadcast(&mut self, payload: Payload);

    /// Unicast to specific peers. Queued, non-blocking.
    fn send_to(&mut self, payload: Payload, targets: &[PeerId]);

    /// Disconnects from the room's transport.
    fn leave(&mut self);
}
