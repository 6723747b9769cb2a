//! Bracket data types and the pure generators that build them (C1).
//!
//! Each generator takes a seeded participant list and a [`crate::meta::Config`]
//! and returns a `(Bracket, OrderedMap<MatchId, Match>)` pair. Generation is
//! deterministic: the same input always produces byte-identical output,
//! which is what lets independent replicas agree on bracket shape without
//! exchanging it (only the admin's `t:start` message needs to carry it, but
//! determinism means any replica could reproduce it from the same inputs).

pub mod doubles;
pub mod double_elim;
pub mod points_race;
pub mod seeding;
pub mod single_elim;

use serde::{Deserialize, Serialize};

use crate::ids::{GameId, MatchId, ParticipantId, TeamId};
use crate::meta::PointsTable;
use crate::participant::Team;
use crate::utils::OrderedMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub number: u32,
    pub name: String,
    pub matches: Vec<MatchId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleBracket {
    pub rounds: Vec<Round>,
}

impl SingleBracket {
    pub fn is_complete(&self, matches: &OrderedMap<MatchId, crate::match_::Match>) -> bool {
        let Some(last) = self.rounds.last() else {
            return false;
        };
        last.matches
            .iter()
            .all(|id| matches.get(id).is_some_and(|m| m.winner_id.is_some()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrandFinals {
    pub game_1: MatchId,
    pub game_2: MatchId,
    pub requires_play: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoubleBracket {
    pub winners_rounds_list: Vec<Round>,
    pub losers_rounds_list: Vec<Round>,
    pub grand_finals: GrandFinals,
    pub bracket_size: usize,
    pub winners_rounds: u32,
    pub losers_rounds: u32,
    pub is_complete: bool,
}

impl DoubleBracket {
    pub fn gf1(&self) -> &MatchId {
        &self.grand_finals.game_1
    }
    pub fn gf2(&self) -> &MatchId {
        &self.grand_finals.game_2
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceGame {
    pub id: GameId,
    pub participants: Vec<ParticipantId>,
    pub game_number: u32,
    pub results: Vec<ParticipantId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsRaceBracket {
    pub games: OrderedMap<GameId, RaceGame>,
    pub total_games: u32,
    pub games_complete: u32,
    pub points_table: PointsTable,
    pub is_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoublesBracket {
    pub inner: Box<Bracket>,
    pub teams: OrderedMap<TeamId, Team>,
    pub team_assignments: OrderedMap<ParticipantId, TeamId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Bracket {
    Single(SingleBracket),
    Double(DoubleBracket),
    PointsRace(PointsRaceBracket),
    Doubles(DoublesBracket),
}

impl Bracket {
    pub fn is_complete(&self, matches: &OrderedMap<MatchId, crate::match_::Match>) -> bool {
        match self {
            Bracket::Single(b) => b.is_complete(matches),
            Bracket::Double(b) => b.is_complete,
            Bracket::PointsRace(b) => b.is_complete,
            Bracket::Doubles(b) => b.inner.is_complete(matches),
        }
    }
}
