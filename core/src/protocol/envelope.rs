//! Wire envelope: `{payload, senderId, timestamp}`, transmitted as-is.

use serde::{Deserialize, Serialize};

use crate::ids::PeerId;
use crate::protocol::messages::Payload;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub payload: Payload,
    pub sender_id: PeerId,
    pub timestamp: i64,
}
