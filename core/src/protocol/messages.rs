//! The twelve message codes exchanged over the [`super::peer_channel::PeerChannel`]
//! and their payload shapes.

use serde::{Deserialize, Serialize};

use crate::brackets::Bracket;
use crate::ids::{GameId, MatchId, ParticipantId, UserId};
use crate::match_::Match;
use crate::standings::StandingEntry;
use crate::store::serialize::Snapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Code {
    StReq,
    StRes,
    PJoin,
    PUpd,
    PLeave,
    TStart,
    TReset,
    MResult,
    MVerify,
    SUpd,
    RResult,
    VCheck,
}

impl Code {
    /// The ASCII wire form (<= 12 bytes, per the external-interfaces
    /// contract on action codes).
    pub fn as_wire(&self) -> &'static str {
        match self {
            Code::StReq => "st:req",
            Code::StRes => "st:res",
            Code::PJoin => "p:join",
            Code::PUpd => "p:upd",
            Code::PLeave => "p:leave",
            Code::TStart => "t:start",
            Code::TReset => "t:reset",
            Code::MResult => "m:result",
            Code::MVerify => "m:verify",
            Code::SUpd => "s:upd",
            Code::RResult => "r:result",
            Code::VCheck => "v:check",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StReqPayload {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StResPayload {
    pub snapshot: Snapshot,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PJoinPayload {
    pub name: String,
    /// Accepts the older `odocalUserId` wire field name alongside the
    /// current one, so peers running a prior protocol revision still
    /// interop.
    #[serde(alias = "odocalUserId")]
    pub local_user_id: UserId,
    pub joined_at: i64,
    #[serde(default)]
    pub is_manual: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PUpdPayload {
    pub id: Option<ParticipantId>,
    pub name: Option<String>,
    pub seed: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PLeavePayload {
    pub removed_id: Option<ParticipantId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TStartPayload {
    pub bracket: Bracket,
    pub matches: Vec<(MatchId, Match)>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TResetPayload {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MResultPayload {
    pub match_id: MatchId,
    pub scores: [u32; 2],
    pub winner_id: ParticipantId,
    pub reported_at: i64,
    pub version: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MVerifyPayload {
    pub match_id: MatchId,
    pub scores: [u32; 2],
    pub winner_id: ParticipantId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SUpdPayload {
    pub standings: Vec<(ParticipantId, StandingEntry)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RResultPayload {
    pub game_id: GameId,
    pub results: Vec<ParticipantId>,
    pub reported_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VCheckPayload {
    pub version: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum Payload {
    #[serde(rename = "st:req")]
    StReq(StReqPayload),
    #[serde(rename = "st:res")]
    StRes(StResPayload),
    #[serde(rename = "p:join")]
    PJoin(PJoinPayload),
    #[serde(rename = "p:upd")]
    PUpd(PUpdPayload),
    #[serde(rename = "p:leave")]
    PLeave(PLeavePayload),
    #[serde(rename = "t:start")]
    TStart(TStartPayload),
    #[serde(rename = "t:reset")]
    TReset(TResetPayload),
    #[serde(rename = "m:result")]
    MResult(MResultPayload),
    #[serde(rename = "m:verify")]
    MVerify(MVerifyPayload),
    #[serde(rename = "s:upd")]
    SUpd(SUpdPayload),
    #[serde(rename = "r:result")]
    RResult(RResultPayload),
    #[serde(rename = "v:check")]
    VCheck(VCheckPayload),
}

impl Payload {
    pub fn code(&self) -> Code {
        match self {
            Payload::StReq(_) => Code::StReq,
            Payload::StRes(_) => Code::StRes,
            Payload::PJoin(_) => Code::PJoin,
            Payload::PUpd(_) => Code::PUpd,
            Payload::PLeave(_) => Code::PLeave,
            Payload::TStart(_) => Code::TStart,
            Payload::TReset(_) => Code::TReset,
            Payload::MResult(_) => Code::MResult,
            Payload::MVerify(_) => Code::MVerify,
            Payload::SUpd(_) => Code::SUpd,
            Payload::RResult(_) => Code::RResult,
            Payload::VCheck(_) => Code::VCheck,
        }
    }
}
