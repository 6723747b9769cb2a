//! Transport-safe snapshot of the replicated fields of a [`super::document::StateDocument`].
//!
//! Maps are carried as ordered `(key, value)` pair vectors rather than JSON
//! objects so that insertion order survives a roundtrip verbatim (a JSON
//! object's key order is not something every receiver is guaranteed to
//! preserve across languages/implementations).

use serde::{Deserialize, Serialize};

use crate::brackets::Bracket;
use crate::ids::{ParticipantId, TeamId};
use crate::match_::Match;
use crate::meta::Meta;
use crate::participant::{Participant, Team};
use crate::standings::StandingEntry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub meta: Meta,
    pub participants: Vec<(ParticipantId, Participant)>,
    pub matches: Vec<(crate::ids::MatchId, Match)>,
    pub bracket: Option<Bracket>,
    pub standings: Vec<(ParticipantId, StandingEntry)>,
    pub team_assignments: Vec<(ParticipantId, TeamId)>,
    pub teams: Vec<(TeamId, Team)>,
}

/// Snapshot plus the `savedAt` stamp the persistence adapter attaches
/// before handing it to the KVStore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedRecord {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub saved_at: i64,
}
