// leaderless, partition-tolerant tournament coordination core

pub mod advancement;
pub mod brackets;
pub mod control;
pub mod errors;
pub mod ids;
pub mod match_;
pub mod meta;
pub mod participant;
pub mod persistence;
pub mod protocol;
pub mod standings;
pub mod store;
pub mod utils;

pub use control::Replica;
pub use errors::{ControlError, ControlResult, PersistenceError, PersistenceResult, ProtocolError, ProtocolResult};
pub use ids::{GameId, MatchId, ParticipantId, PeerId, RoomId, TeamId, UserId};
pub use match_::{DropsTo, Match};
pub use meta::{Config, Meta, PointsTable, TournamentStatus, TournamentType};
pub use participant::{Participant, Team};
pub use standings::{StandingEntry, Standings};
pub use store::{Event, EventEmitter, LocalState, StateDocument, SubscriptionId};
