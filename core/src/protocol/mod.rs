//! The sync protocol (C4): message shapes, wire envelope, the
//! `PeerChannel` port, and inbound validation/authorization/apply logic.

pub mod envelope;
pub mod messages;
pub mod peer_channel;
pub mod sync;

pub use envelope::Envelope;
pub use messages::{Code, Payload};
pub use peer_channel::PeerChannel;
pub use sync::{needs_resync, PeerIdentity};
