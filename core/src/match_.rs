//! Matches: the unit of competition within a bracket.

use serde::{Deserialize, Serialize};

use crate::ids::{MatchId, ParticipantId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketKind {
    Winners,
    Losers,
    GrandFinals,
    Single,
    PointsRace,
}

/// Static pointer from a double-elim winners match to the losers-bracket
/// slot receiving its loser. `slot` disambiguates which of the destination
/// match's two seats this loser occupies: a minor losers round receives two
/// independent dropouts per match, so `(round, position)` alone is not
/// enough (see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropsTo {
    pub round: u32,
    pub position: usize,
    pub slot: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub bracket: BracketKind,
    pub round: u32,
    pub position: usize,
    pub participants: [Option<ParticipantId>; 2],
    pub scores: [u32; 2],
    pub winner_id: Option<ParticipantId>,
    pub loser_id: Option<ParticipantId>,
    pub reported_by: Option<ParticipantId>,
    pub reported_at: i64,
    pub verified_by: Option<UserId>,
    pub is_bye: bool,
    pub version: u64,
    pub drops_to: Option<DropsTo>,
}

impl Match {
    pub fn new(id: MatchId, bracket: BracketKind, round: u32, position: usize) -> Self {
        Match {
            id,
            bracket,
            round,
            position,
            participants: [None, None],
            scores: [0, 0],
            winner_id: None,
            loser_id: None,
            reported_by: None,
            reported_at: 0,
            verified_by: None,
            is_bye: false,
            version: 0,
            drops_to: None,
        }
    }

    /// Slot index (0 or 1) of `participant_id` within this match, if seated.
    pub fn slot_of(&self, participant_id: &ParticipantId) -> Option<usize> {
        self.participants
            .iter()
            .position(|p| p.as_ref() == Some(participant_id))
    }

    pub fn is_resolved(&self) -> bool {
        self.winner_id.is_some()
    }

    /// Seats a participant, auto-resolving a bye if this leaves exactly one
    /// slot filled and the match is flagged for bye resolution by the
    /// caller (bracket generation decides when a match is a bye; see
    /// `brackets::single_elim`).
    pub fn set_slot(&mut self, slot: usize, participant_id: Option<ParticipantId>) {
        self.participants[slot] = participant_id;
    }

    /// Resolves this match in favor of `winner_id`, which must currently sit
    /// in one of the two slots. No-op (idempotent) if already resolved with
    /// the same winner.
    pub fn resolve(&mut self, winner_id: ParticipantId, scores: [u32; 2], reported_at: i64) {
        let loser = self
            .participants
            .iter()
            .flatten()
            .find(|p| **p != winner_id)
            .cloned();
        self.scores = scores;
        self.winner_id = Some(winner_id);
        self.loser_id = loser;
        self.reported_at = reported_at;
        self.version += 1;
    }
}
