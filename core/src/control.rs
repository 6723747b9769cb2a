//! The control surface: the CLI-analog operations an embedding UI calls
//! directly, wired to a [`StateDocument`], a [`PeerChannel`], and the
//! [`PeerIdentity`] map. Every operation mutates the document first (which
//! emits its own events) and then marshals the change into an outbound
//! message — the in-process equivalent of the spec's "event listener
//! marshals the change into a message" control flow, inlined here rather
//! than implemented as a generic listener-to-message dispatcher.

use tracing::info;

use crate::errors::{ControlError, ControlResult};
use crate::ids::{GameId, MatchId, ParticipantId, PeerId, RoomId, UserId};
use crate::meta::{Config, Meta};
use crate::participant::Participant;
use crate::protocol::envelope::Envelope;
use crate::protocol::messages::{
    MResultPayload, MVerifyPayload, PJoinPayload, PLeavePayload, Payload, RResultPayload,
    StReqPayload, StResPayload, TResetPayload, TStartPayload, VCheckPayload,
};
use crate::protocol::peer_channel::PeerChannel;
use crate::protocol::sync::{self, PeerIdentity};
use crate::store::document::StateDocument;
use crate::utils::normalize::valid_room_slug;

pub struct Replica<C: PeerChannel> {
    pub doc: StateDocument,
    pub channel: C,
    identity: PeerIdentity,
    local_display_name: String,
    local_joined_at: i64,
}

impl<C: PeerChannel> Replica<C> {
    /// `createRoom`: becomes admin, mints `adminToken`, announces itself.
    pub fn create_room(
        slug: RoomId,
        display_name: String,
        local_user_id: UserId,
        admin_token: String,
        channel: C,
        now: i64,
    ) -> ControlResult<Self> {
        if !valid_room_slug(slug.as_str()) {
            return Err(ControlError::InvalidRoomSlug(slug.as_str().to_string()));
        }
        let meta = Meta::new(slug, String::new(), local_user_id.clone(), admin_token, now);
        let mut doc = StateDocument::new(meta, local_user_id.clone(), true);
        doc.join_participant(Participant::new(
            ParticipantId::from(local_user_id.as_str()),
            display_name.clone(),
            now,
        ));
        doc.local.state_initialized = true;
        let mut replica = Replica {
            doc,
            channel,
            identity: PeerIdentity::default(),
            local_display_name: display_name.clone(),
            local_joined_at: now,
        };
        replica.channel.broadcast(Payload::PJoin(PJoinPayload {
            name: display_name,
            local_user_id,
            joined_at: now,
            is_manual: false,
        }));
        Ok(replica)
    }

    /// `joinRoom`: announces and requests state. The caller supplies a
    /// placeholder `Meta` (room id known, rest filled in once the first
    /// `st:res` merges); admin status, if the room's stored admin token
    /// matches, is reclaimed by the inbound `st:res` handler comparing
    /// `meta.adminToken`, not by this constructor.
    pub fn join_room(
        slug: RoomId,
        display_name: String,
        local_user_id: UserId,
        channel: C,
        now: i64,
    ) -> ControlResult<Self> {
        if !valid_room_slug(slug.as_str()) {
            return Err(ControlError::InvalidRoomSlug(slug.as_str().to_string()));
        }
        let meta = Meta::new(slug, String::new(), UserId::from(""), String::new(), now);
        let doc = StateDocument::new(meta, local_user_id.clone(), false);
        let mut replica = Replica {
            doc,
            channel,
            identity: PeerIdentity::default(),
            local_display_name: display_name.clone(),
            local_joined_at: now,
        };
        replica.channel.broadcast(Payload::PJoin(PJoinPayload {
            name: display_name,
            local_user_id,
            joined_at: now,
            is_manual: false,
        }));
        replica.channel.broadcast(Payload::StReq(StReqPayload::default()));
        Ok(replica)
    }

    fn require_admin(&self) -> ControlResult<()> {
        if self.doc.local.is_admin {
            Ok(())
        } else {
            Err(ControlError::NotAuthorized("admin-only operation".into()))
        }
    }

    pub fn leave(&mut self) {
        self.channel.broadcast(Payload::PLeave(PLeavePayload::default()));
        self.channel.leave();
    }

    pub fn add_participant(&mut self, name: String, now: i64) -> ControlResult<ParticipantId> {
        self.require_admin()?;
        let id = ParticipantId::from(format!("manual-{now}-{}", self.doc.participants.len()));
        let participant = Participant::manual(id.clone(), name, now);
        self.doc.join_participant(participant);
        Ok(id)
    }

    pub fn remove_participant(&mut self, id: ParticipantId) -> ControlResult<()> {
        self.require_admin()?;
        self.doc.remove_participant(&id)?;
        self.channel.broadcast(Payload::PLeave(PLeavePayload { removed_id: Some(id) }));
        Ok(())
    }

    pub fn start_tournament(&mut self, config: Config, now: i64) -> ControlResult<()> {
        self.require_admin()?;
        self.doc.start_tournament(config, now)?;
        let bracket = self.doc.bracket.clone().ok_or(ControlError::NoBracket)?;
        let matches = self.doc.matches.to_ordered_pairs();
        self.channel.broadcast(Payload::TStart(TStartPayload { bracket, matches }));
        Ok(())
    }

    pub fn reset_tournament(&mut self) -> ControlResult<()> {
        self.require_admin()?;
        self.doc.reset_tournament();
        self.channel.broadcast(Payload::TReset(TResetPayload::default()));
        Ok(())
    }

    pub fn apply_manual_seeding(&mut self, ordered: Vec<ParticipantId>) -> ControlResult<()> {
        self.require_admin()?;
        self.doc.apply_manual_seeding(ordered);
        Ok(())
    }

    /// Assigns a participant to a team ahead of starting a `Doubles`
    /// tournament. No wire message of its own: the resulting
    /// `team_assignments` map rides along inside the next `t:start`
    /// broadcast's bracket/match payload, the same way manual seeding does.
    pub fn assign_team(&mut self, participant_id: ParticipantId, team_id: crate::ids::TeamId) -> ControlResult<()> {
        self.require_admin()?;
        self.doc.assign_team(participant_id, team_id);
        Ok(())
    }

    pub fn report_match_result(
        &mut self,
        match_id: MatchId,
        scores: [u32; 2],
        winner_id: ParticipantId,
        now: i64,
    ) -> ControlResult<()> {
        let reporter = ParticipantId::from(self.doc.local.local_user_id.as_str());
        self.doc
            .resolve_match(&match_id, winner_id.clone(), scores, Some(reporter), now)?;
        self.channel.broadcast(Payload::MResult(MResultPayload {
            match_id,
            scores,
            winner_id,
            reported_at: now,
            version: self.doc.meta.version,
        }));
        Ok(())
    }

    pub fn verify_match_result(
        &mut self,
        match_id: MatchId,
        scores: [u32; 2],
        winner_id: ParticipantId,
        now: i64,
    ) -> ControlResult<()> {
        self.require_admin()?;
        let admin_id = self.doc.meta.admin_id.clone();
        self.doc.verify_match(&match_id, winner_id.clone(), scores, admin_id, now)?;
        self.channel
            .broadcast(Payload::MVerify(MVerifyPayload { match_id, scores, winner_id }));
        Ok(())
    }

    pub fn report_race_result(&mut self, game_id: GameId, results: Vec<ParticipantId>, now: i64) -> ControlResult<()> {
        self.doc.report_race_result(&game_id, results.clone())?;
        self.channel.broadcast(Payload::RResult(RResultPayload { game_id, results, reported_at: now }));
        Ok(())
    }

    /// Runs the admin's periodic `v:check` heartbeat. A no-op for
    /// non-admin replicas.
    pub fn heartbeat_tick(&mut self) {
        if self.doc.local.is_admin {
            self.channel.broadcast(Payload::VCheck(VCheckPayload { version: self.doc.meta.version }));
        }
    }

    /// Call when a `v:check` arrives: requests a resync unicast to the
    /// sender if this replica is behind.
    pub fn on_version_check(&mut self, remote_version: u64, sender_peer: PeerId) {
        if sync::needs_resync(&self.doc, remote_version) {
            self.channel.send_to(Payload::StReq(StReqPayload::default()), &[sender_peer]);
        }
    }

    /// Call on transport peer-join: bootstraps a late joiner per §4.4.
    pub fn on_peer_join(&mut self, peer_id: PeerId) {
        self.channel.send_to(Payload::StReq(StReqPayload::default()), &[peer_id]);
    }

    pub fn on_peer_leave(&mut self, peer_id: PeerId) {
        self.identity.forget_peer(&peer_id);
    }

    /// Responds to an inbound `st:req` with a full snapshot.
    pub fn respond_to_state_request(&mut self, requester: PeerId) {
        let snapshot = self.doc.serialize();
        self.channel.send_to(
            Payload::StRes(StResPayload { snapshot, is_admin: self.doc.local.is_admin }),
            &[requester],
        );
    }

    /// Applies an inbound envelope, logging (never panicking on) any
    /// rejection.
    pub fn handle_inbound(&mut self, envelope: &Envelope, now: i64) {
        if let Payload::StReq(_) = &envelope.payload {
            self.respond_to_state_request(envelope.sender_id.clone());
            return;
        }
        let is_first_st_res = matches!(&envelope.payload, Payload::StRes(_)) && !self.doc.local.state_initialized;
        if let Err(err) = sync::handle_inbound(&mut self.doc, &mut self.identity, envelope, now) {
            info!("dropped inbound message: {err}");
            return;
        }
        if is_first_st_res {
            // First bootstrap snapshot merged: re-announce so every peer
            // that joined the hub before we did (and so never saw our
            // original p:join) still learns about us.
            self.channel.broadcast(Payload::PJoin(PJoinPayload {
                name: self.local_display_name.clone(),
                local_user_id: self.doc.local.local_user_id.clone(),
                joined_at: self.local_joined_at,
                is_manual: false,
            }));
        }
    }
}
