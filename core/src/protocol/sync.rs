//! Validates, authorizes, and applies inbound messages (C4). Outbound
//! emission and the control-surface operations that trigger it live in
//! [`crate::control`]; this module is purely the inbound half plus the
//! peer-identity map and bootstrap/heartbeat bookkeeping shared by both
//! directions.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::errors::{ProtocolError, ProtocolResult};
use crate::ids::{MatchId, ParticipantId, PeerId, UserId};
use crate::match_::Match;
use crate::meta::TournamentStatus;
use crate::participant::Participant;
use crate::protocol::envelope::Envelope;
use crate::protocol::messages::Payload;
use crate::store::document::StateDocument;
use crate::utils::normalize::valid_name;
use crate::utils::OrderedMap;

/// Bidirectional `peerId <-> localUserId` map. A `p:join` or a trusted
/// `st:res` populates it; lookups that miss fall back to treating the
/// peerId itself as the userId, a deliberate, spec-preserved quirk (see
/// DESIGN.md open questions) that can alias a disconnected user briefly.
#[derive(Debug, Default)]
pub struct PeerIdentity {
    peer_to_user: HashMap<PeerId, UserId>,
    user_to_peer: HashMap<UserId, PeerId>,
}

impl PeerIdentity {
    pub fn record(&mut self, peer_id: PeerId, user_id: UserId) {
        if let Some(old_peer) = self.user_to_peer.insert(user_id.clone(), peer_id.clone()) {
            self.peer_to_user.remove(&old_peer);
        }
        self.peer_to_user.insert(peer_id, user_id);
    }

    pub fn user_for(&self, peer_id: &PeerId) -> UserId {
        self.peer_to_user
            .get(peer_id)
            .cloned()
            .unwrap_or_else(|| UserId::from(peer_id.as_str()))
    }

    pub fn forget_peer(&mut self, peer_id: &PeerId) {
        if let Some(user_id) = self.peer_to_user.remove(peer_id) {
            self.user_to_peer.remove(&user_id);
        }
    }
}

pub const NAME_MAX_LEN: usize = 100;
pub const MATCH_ID_MAX_LEN: usize = 50;

fn validate_result_shape(match_id: &MatchId, scores: &[u32; 2]) -> ProtocolResult<()> {
    if match_id.as_str().len() > MATCH_ID_MAX_LEN {
        return Err(ProtocolError::Validation("matchId too long".into()));
    }
    let _ = scores; // u32 is already non-negative; kept for documentation parity with the source's shape check
    Ok(())
}

/// Applies an accepted inbound envelope to `doc`. Any authorization or
/// validation failure is returned as a `ProtocolError` for the caller to
/// log and drop — nothing here ever panics or surfaces to the embedder.
pub fn handle_inbound(
    doc: &mut StateDocument,
    identity: &mut PeerIdentity,
    envelope: &Envelope,
    now: i64,
) -> ProtocolResult<()> {
    let sender_user = identity.user_for(&envelope.sender_id);
    let is_admin_sender = sender_user == doc.meta.admin_id;

    match &envelope.payload {
        Payload::StReq(_) => {
            debug!("st:req accepted from {}", envelope.sender_id);
            Ok(())
        }

        Payload::StRes(p) => {
            // The sender's own p:join may never have reached us (e.g. it
            // announced itself before we connected), so a responder
            // claiming to be the admin binds its peerId to that admin's
            // userId here rather than relying on a prior p:join having
            // recorded it.
            let remote_admin_id = if p.is_admin {
                identity.record(envelope.sender_id.clone(), p.snapshot.meta.admin_id.clone());
                Some(p.snapshot.meta.admin_id.clone())
            } else {
                None
            };
            doc.merge(&p.snapshot, remote_admin_id.as_ref());
            doc.local.state_initialized = true;
            Ok(())
        }

        Payload::PJoin(p) => {
            if !valid_name(&p.name, NAME_MAX_LEN) {
                return Err(ProtocolError::Validation("invalid participant name".into()));
            }
            if p.local_user_id == doc.meta.admin_id && sender_user != doc.meta.admin_id {
                return Err(ProtocolError::Unauthorized);
            }
            let claimed_by_other_live_peer = doc
                .participants
                .get(&ParticipantId::from(p.local_user_id.as_str()))
                .is_some_and(|existing| existing.is_connected)
                && identity
                    .user_to_peer
                    .get(&p.local_user_id)
                    .is_some_and(|peer| *peer != envelope.sender_id);
            if claimed_by_other_live_peer {
                return Err(ProtocolError::Unauthorized);
            }
            identity.record(envelope.sender_id.clone(), p.local_user_id.clone());

            if let Some(existing) = find_manual_slot(doc, &p.name) {
                if existing.claimed_by.is_none() {
                    let id = existing.id.clone();
                    if let Some(slot) = doc.participants.get_mut(&id) {
                        slot.claimed_by = Some(ParticipantId::from(p.local_user_id.as_str()));
                        slot.is_connected = true;
                    }
                    return Ok(());
                }
            }

            let participant = Participant::new(
                ParticipantId::from(p.local_user_id.as_str()),
                p.name.clone(),
                p.joined_at,
            );
            doc.merge_participant(participant);
            Ok(())
        }

        Payload::PUpd(p) => {
            let target = p.id.clone().unwrap_or_else(|| ParticipantId::from(sender_user.as_str()));
            let is_self = target.as_str() == sender_user.as_str();
            if !is_self && !is_admin_sender {
                return Err(ProtocolError::Unauthorized);
            }
            doc.update_participant(&target, p.name.clone(), p.seed)
                .map_err(|e| ProtocolError::Precondition(e.to_string()))
        }

        Payload::PLeave(p) => {
            if let Some(removed_id) = &p.removed_id {
                if !is_admin_sender {
                    return Err(ProtocolError::Unauthorized);
                }
                doc.remove_participant(removed_id)
                    .map_err(|e| ProtocolError::Precondition(e.to_string()))
            } else {
                let id = ParticipantId::from(sender_user.as_str());
                if let Some(participant) = doc.participants.get_mut(&id) {
                    participant.is_connected = false;
                }
                Ok(())
            }
        }

        Payload::TStart(p) => {
            if !is_admin_sender {
                return Err(ProtocolError::Unauthorized);
            }
            doc.bracket = Some(p.bracket.clone());
            doc.matches = OrderedMap::from_ordered_pairs(p.matches.clone());
            doc.meta.status = TournamentStatus::Active;
            doc.local.state_initialized = true;
            Ok(())
        }

        Payload::TReset(_) => {
            if !is_admin_sender {
                return Err(ProtocolError::Unauthorized);
            }
            doc.reset_tournament();
            Ok(())
        }

        Payload::MResult(p) => {
            ensure_state_initialized(doc)?;
            validate_result_shape(&p.match_id, &p.scores)?;
            authorize_match_sender(doc, &p.match_id, &sender_user, is_admin_sender)?;
            doc.resolve_match(
                &p.match_id,
                p.winner_id.clone(),
                p.scores,
                Some(ParticipantId::from(sender_user.as_str())),
                p.reported_at,
            )
            .map(|_| ())
            .map_err(|e| ProtocolError::Precondition(e.to_string()))
        }

        Payload::MVerify(p) => {
            if !is_admin_sender {
                return Err(ProtocolError::Unauthorized);
            }
            doc.verify_match(&p.match_id, p.winner_id.clone(), p.scores, sender_user, now)
                .map_err(|e| ProtocolError::Precondition(e.to_string()))
        }

        Payload::SUpd(p) => {
            if !is_admin_sender {
                return Err(ProtocolError::Unauthorized);
            }
            doc.standings = crate::standings::Standings::from_ordered_pairs(p.standings.clone());
            Ok(())
        }

        Payload::RResult(p) => {
            ensure_state_initialized(doc)?;
            authorize_game_sender(doc, &p.game_id, &sender_user, is_admin_sender)?;
            doc.report_race_result(&p.game_id, p.results.clone())
                .map_err(|e| ProtocolError::Precondition(e.to_string()))
        }

        Payload::VCheck(_) => Ok(()), // handled by the caller driving the heartbeat response, see `needs_resync`
    }
}

fn ensure_state_initialized(doc: &StateDocument) -> ProtocolResult<()> {
    if doc.local.state_initialized {
        Ok(())
    } else {
        Err(ProtocolError::StateNotInitialized)
    }
}

fn find_manual_slot<'a>(doc: &'a StateDocument, name: &str) -> Option<&'a Participant> {
    doc.participants
        .values()
        .find(|p| p.is_manual && p.name.eq_ignore_ascii_case(name))
}

fn authorize_match_sender(
    doc: &StateDocument,
    match_id: &MatchId,
    sender_user: &UserId,
    is_admin_sender: bool,
) -> ProtocolResult<()> {
    if is_admin_sender {
        return Ok(());
    }
    let m: &Match = doc
        .matches
        .get(match_id)
        .ok_or_else(|| ProtocolError::UnknownMatch(match_id.clone()))?;
    let sender_participant = ParticipantId::from(sender_user.as_str());
    let is_direct_participant = m.participants.contains(&Some(sender_participant.clone()));
    let is_team_member = m.participants.iter().flatten().any(|seat| {
        doc.team_assignments.get(seat) == doc.team_assignments.get(&sender_participant)
            && doc.team_assignments.get(&sender_participant).is_some()
    });
    if is_direct_participant || is_team_member {
        Ok(())
    } else {
        warn!("rejected m:result from non-participant {sender_user}");
        Err(ProtocolError::Unauthorized)
    }
}

fn authorize_game_sender(
    doc: &StateDocument,
    game_id: &crate::ids::GameId,
    sender_user: &UserId,
    is_admin_sender: bool,
) -> ProtocolResult<()> {
    if is_admin_sender {
        return Ok(());
    }
    let crate::brackets::Bracket::PointsRace(race) = doc.bracket.as_ref().ok_or(ProtocolError::StateNotInitialized)? else {
        return Err(ProtocolError::Precondition("not a points-race tournament".into()));
    };
    let game = race
        .games
        .get(game_id)
        .ok_or_else(|| ProtocolError::Precondition(format!("unknown game {game_id}")))?;
    let sender_participant = ParticipantId::from(sender_user.as_str());
    if game.participants.contains(&sender_participant) {
        Ok(())
    } else {
        Err(ProtocolError::Unauthorized)
    }
}

/// Version-heartbeat check: does `remote_version` indicate this replica
/// has missed updates and should send `st:req` to the admin?
pub fn needs_resync(doc: &StateDocument, remote_version: u64) -> bool {
    doc.meta.version < remote_version
}
