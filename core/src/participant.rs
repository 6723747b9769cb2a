//! Participants and teams.

use serde::{Deserialize, Serialize};

use crate::ids::{ParticipantId, PeerId, TeamId, UserId};

/// Entrant of a tournament; either an individual athlete or (in doubles
/// mode) a team member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub peer_id: Option<PeerId>,
    pub name: String,
    pub seed: Option<u32>,
    pub team_id: Option<TeamId>,
    pub is_connected: bool,
    pub is_manual: bool,
    pub claimed_by: Option<ParticipantId>,
    pub joined_at: i64,
}

impl Participant {
    pub fn new(id: ParticipantId, name: String, joined_at: i64) -> Self {
        Participant {
            id,
            peer_id: None,
            name,
            seed: None,
            team_id: None,
            is_connected: true,
            is_manual: false,
            claimed_by: None,
            joined_at,
        }
    }

    pub fn manual(id: ParticipantId, name: String, joined_at: i64) -> Self {
        Participant {
            id,
            peer_id: None,
            name,
            seed: None,
            team_id: None,
            is_connected: false,
            is_manual: true,
            claimed_by: None,
            joined_at,
        }
    }

    /// This participant is the same user as `user_id`, either directly or as
    /// the manual slot `user_id` has claimed.
    pub fn represents(&self, user_id: &UserId) -> bool {
        self.id.as_str() == user_id.as_str()
            || self
                .claimed_by
                .as_ref()
                .is_some_and(|c| c.as_str() == user_id.as_str())
    }
}

/// A doubles-mode team, derived from `team_assignments` at tournament
/// start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub members: Vec<ParticipantId>,
}
