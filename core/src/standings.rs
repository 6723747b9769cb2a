//! Points-race standings.

use serde::{Deserialize, Serialize};

use crate::ids::ParticipantId;
use crate::utils::OrderedMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub name: String,
    pub points: u32,
    pub wins: u32,
    pub games_completed: u32,
}

impl StandingEntry {
    pub fn new(name: String) -> Self {
        StandingEntry {
            name,
            points: 0,
            wins: 0,
            games_completed: 0,
        }
    }
}

pub type Standings = OrderedMap<ParticipantId, StandingEntry>;
