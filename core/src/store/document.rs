//! The State Document: the single in-memory root holding every replicated
//! entity plus local (non-replicated) state, and the typed mutators that
//! are the document's primary API (see design note on path-based access).

use serde_json::json;

use crate::advancement;
use crate::brackets::{self, Bracket};
use crate::errors::{ControlError, ControlResult};
use crate::ids::{GameId, MatchId, ParticipantId, TeamId, UserId};
use crate::match_::Match;
use crate::meta::{Config, Meta, TournamentStatus, TournamentType};
use crate::participant::{Participant, Team};
use crate::standings::Standings;
use crate::store::events::{Event, EventEmitter, SubscriptionId};
use crate::store::serialize::Snapshot;
use crate::utils::OrderedMap;

/// Non-replicated, per-endpoint state. Mutations here never bump
/// `meta.version`, never emit replicated events, and are excluded from
/// `serialize`/`merge`.
#[derive(Debug, Clone)]
pub struct LocalState {
    pub local_user_id: UserId,
    pub is_admin: bool,
    pub state_initialized: bool,
}

pub struct StateDocument {
    pub meta: Meta,
    pub participants: OrderedMap<ParticipantId, Participant>,
    pub matches: OrderedMap<MatchId, Match>,
    pub bracket: Option<Bracket>,
    pub standings: Standings,
    pub team_assignments: OrderedMap<ParticipantId, TeamId>,
    pub teams: OrderedMap<TeamId, Team>,
    pub local: LocalState,
    pub(crate) events: EventEmitter,
}

impl StateDocument {
    pub fn new(meta: Meta, local_user_id: UserId, is_admin: bool) -> Self {
        StateDocument {
            meta,
            participants: OrderedMap::default(),
            matches: OrderedMap::default(),
            bracket: None,
            standings: Standings::default(),
            team_assignments: OrderedMap::default(),
            teams: OrderedMap::default(),
            local: LocalState {
                local_user_id,
                is_admin,
                state_initialized: false,
            },
            events: EventEmitter::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn FnMut(&Event)>) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.events.unsubscribe(id);
    }

    fn bump_version(&mut self) {
        self.meta.version += 1;
    }

    /// Minimal, read-only dotted-path accessor over the top-level
    /// replicated roots. Intended for tests/debug tooling only; all
    /// production call sites use the typed mutators below (see design
    /// note on path-based access).
    pub fn get_path(&self, path: &str) -> Option<serde_json::Value> {
        let mut segments = path.split('.');
        let root = segments.next()?;
        let value = match root {
            "meta" => serde_json::to_value(&self.meta).ok()?,
            "standings" => serde_json::to_value(self.standings.to_ordered_pairs()).ok()?,
            "bracket" => serde_json::to_value(&self.bracket).ok()?,
            _ => return None,
        };
        let mut cursor = value;
        for seg in segments {
            cursor = cursor.get(seg)?.clone();
        }
        Some(cursor)
    }

    // -- participants --------------------------------------------------

    /// Local self-join (the `p:join` a replica sends for itself, or
    /// applies when it arrives from a peer).
    pub fn join_participant(&mut self, participant: Participant) {
        let id = participant.id.clone();
        self.participants.insert(id.clone(), participant);
        self.bump_version();
        self.events.emit(Event::ParticipantJoin(id));
    }

    pub fn update_participant(&mut self, id: &ParticipantId, name: Option<String>, seed: Option<u32>) -> ControlResult<()> {
        let p = self
            .participants
            .get_mut(id)
            .ok_or_else(|| ControlError::NotAuthorized(format!("unknown participant {id}")))?;
        if let Some(name) = name {
            p.name = name;
        }
        if let Some(seed) = seed {
            p.seed = Some(seed);
        }
        self.bump_version();
        self.events.emit(Event::ParticipantUpdate(id.clone()));
        Ok(())
    }

    /// Removes a participant. Refuses to remove the admin (invariant:
    /// "exactly one entity in participants is identified by
    /// meta.adminId; this entity may not be removed by any message").
    pub fn remove_participant(&mut self, id: &ParticipantId) -> ControlResult<()> {
        if id.as_str() == self.meta.admin_id.as_str() {
            return Err(ControlError::NotAuthorized("cannot remove the admin".into()));
        }
        self.participants.remove(id);
        self.bump_version();
        self.events.emit(Event::ParticipantLeave(id.clone()));
        Ok(())
    }

    pub fn merge_participant(&mut self, remote: Participant) {
        let id = remote.id.clone();
        match self.participants.get(&id) {
            None => {
                self.participants.insert(id.clone(), remote);
            }
            Some(local) => {
                if remote.joined_at > local.joined_at {
                    self.participants.insert(id.clone(), remote);
                }
            }
        }
        self.bump_version();
        self.events.emit(Event::ParticipantUpdate(id));
    }

    // -- tournament lifecycle -------------------------------------------

    /// `startTournament`: builds the bracket for `meta.config`/`meta.kind`
    /// from the current roster, seeded by `seed_order` (participants in
    /// ascending `seed`, falling back to join order), and transitions
    /// `meta.status` to `active`.
    pub fn start_tournament(&mut self, config: Config, now: i64) -> ControlResult<()> {
        self.meta
            .config
            .validate(self.meta.kind)
            .map_err(ControlError::InvalidConfig)?;
        let mut seeded: Vec<&Participant> = self.participants.values().collect();
        seeded.sort_by_key(|p| (p.seed.unwrap_or(u32::MAX), p.joined_at));
        let ids: Vec<ParticipantId> = seeded.iter().map(|p| p.id.clone()).collect();
        if ids.len() < 2 {
            return Err(ControlError::InvalidConfig("at least 2 participants required".into()));
        }

        let (bracket, matches) = match self.meta.kind {
            TournamentType::Single => {
                let (b, m) = brackets::single_elim::generate(&ids, "", now);
                (Bracket::Single(b), m)
            }
            TournamentType::Double => {
                let (b, m) = brackets::double_elim::generate(&ids, now);
                (Bracket::Double(b), m)
            }
            TournamentType::Mariokart => {
                let b = brackets::points_race::generate(&ids, &config);
                for participant in &ids {
                    let name = self
                        .participants
                        .get(participant)
                        .map(|p| p.name.clone())
                        .unwrap_or_default();
                    self.standings.insert(participant.clone(), crate::standings::StandingEntry::new(name));
                }
                (Bracket::PointsRace(b), OrderedMap::default())
            }
            TournamentType::Doubles => {
                let team_size = config.team_size.unwrap_or(2);
                let inner_kind = config.bracket_type.unwrap_or(TournamentType::Single);
                let (b, m) = brackets::doubles::generate(
                    &self.team_assignments,
                    &OrderedMap::default(),
                    team_size,
                    inner_kind,
                    now,
                );
                self.teams = b.teams.clone();
                (Bracket::Doubles(b), m)
            }
        };

        self.meta.config = config;
        self.bracket = Some(bracket);
        self.matches = matches;
        self.meta.status = TournamentStatus::Active;
        self.bump_version();
        self.events.emit(Event::Change {
            path: "meta.status".into(),
            value: json!("active"),
            old_value: Some(json!("lobby")),
        });
        Ok(())
    }

    /// `resetTournament`: clears bracket/matches/standings/teams, keeps
    /// participants and adminship, returns status to `lobby`.
    pub fn reset_tournament(&mut self) {
        self.bracket = None;
        self.matches = OrderedMap::default();
        self.standings = Standings::default();
        self.teams = OrderedMap::default();
        self.meta.status = TournamentStatus::Lobby;
        self.bump_version();
        self.events.emit(Event::Change {
            path: "meta.status".into(),
            value: json!("lobby"),
            old_value: Some(json!("active")),
        });
    }

    pub fn apply_manual_seeding(&mut self, ordered: Vec<ParticipantId>) {
        for (idx, id) in ordered.iter().enumerate() {
            if let Some(p) = self.participants.get_mut(id) {
                p.seed = Some(idx as u32 + 1);
            }
        }
        self.bump_version();
    }

    /// Places a participant on a team ahead of `start_tournament` for
    /// `TournamentType::Doubles`. Re-assigning replaces any prior team.
    pub fn assign_team(&mut self, participant_id: ParticipantId, team_id: TeamId) {
        self.team_assignments.insert(participant_id, team_id);
        self.bump_version();
    }

    // -- matches ----------------------------------------------------------

    /// Applies a first-hand or relayed `m:result`. Returns `true` if it
    /// changed the local record (an older/duplicate report is a no-op).
    pub fn resolve_match(
        &mut self,
        match_id: &MatchId,
        winner_id: ParticipantId,
        scores: [u32; 2],
        reported_by: Option<ParticipantId>,
        reported_at: i64,
    ) -> ControlResult<bool> {
        let bracket = self.bracket.as_mut().ok_or(ControlError::NoBracket)?;
        let m = self
            .matches
            .get_mut(match_id)
            .ok_or_else(|| ControlError::UnknownMatch(match_id.clone()))?;
        if m.verified_by.is_some() {
            return Ok(false);
        }
        if !m.participants.contains(&Some(winner_id.clone())) {
            return Err(ControlError::InvalidWinner);
        }
        if m.is_resolved() && reported_at <= m.reported_at {
            return Ok(false);
        }
        m.reported_by = reported_by;
        m.resolve(winner_id, scores, reported_at);
        advancement::advance(bracket, &mut self.matches, match_id);
        self.check_completion();
        self.bump_version();
        self.events.emit(Event::MatchUpdate(match_id.clone()));
        Ok(true)
    }

    /// `verifyMatchResult` / inbound `m:verify`: admin-authoritative,
    /// overrides any unverified value regardless of timestamp.
    pub fn verify_match(
        &mut self,
        match_id: &MatchId,
        winner_id: ParticipantId,
        scores: [u32; 2],
        admin_id: UserId,
        now: i64,
    ) -> ControlResult<()> {
        let bracket = self.bracket.as_mut().ok_or(ControlError::NoBracket)?;
        let m = self
            .matches
            .get_mut(match_id)
            .ok_or_else(|| ControlError::UnknownMatch(match_id.clone()))?;
        if !m.participants.contains(&Some(winner_id.clone())) {
            return Err(ControlError::InvalidWinner);
        }
        m.resolve(winner_id, scores, now);
        m.verified_by = Some(admin_id);
        advancement::advance(bracket, &mut self.matches, match_id);
        self.check_completion();
        self.bump_version();
        self.events.emit(Event::MatchUpdate(match_id.clone()));
        Ok(())
    }

    pub fn report_race_result(&mut self, game_id: &GameId, results: Vec<ParticipantId>) -> ControlResult<()> {
        let Some(Bracket::PointsRace(b)) = self.bracket.as_mut() else {
            return Err(ControlError::NoBracket);
        };
        advancement::record_race_result(b, &mut self.standings, game_id, results);
        if b.is_complete {
            self.meta.status = TournamentStatus::Complete;
        }
        self.bump_version();
        Ok(())
    }

    fn check_completion(&mut self) {
        let Some(bracket) = &self.bracket else { return };
        if bracket.is_complete(&self.matches) {
            self.meta.status = TournamentStatus::Complete;
        }
    }

    // -- serialize / merge -----------------------------------------------

    pub fn serialize(&self) -> Snapshot {
        Snapshot {
            meta: self.meta.clone(),
            participants: self.participants.to_ordered_pairs(),
            matches: self.matches.to_ordered_pairs(),
            bracket: self.bracket.clone(),
            standings: self.standings.to_ordered_pairs(),
            team_assignments: self.team_assignments.to_ordered_pairs(),
            teams: self.teams.to_ordered_pairs(),
        }
    }

    pub fn deserialize(&mut self, snapshot: Snapshot) {
        self.meta = snapshot.meta;
        self.participants = OrderedMap::from_ordered_pairs(snapshot.participants);
        self.matches = OrderedMap::from_ordered_pairs(snapshot.matches);
        self.bracket = snapshot.bracket;
        self.standings = OrderedMap::from_ordered_pairs(snapshot.standings);
        self.team_assignments = OrderedMap::from_ordered_pairs(snapshot.team_assignments);
        self.teams = OrderedMap::from_ordered_pairs(snapshot.teams);
        self.events.emit(Event::Sync);
    }

    pub fn merge(&mut self, remote: &Snapshot, remote_admin_id: Option<&UserId>) {
        crate::store::merge::merge_into(self, remote, remote_admin_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::RoomId;

    fn doc() -> StateDocument {
        let meta = Meta::new(RoomId::from("room"), "Room".into(), UserId::from("admin"), "tok".into(), 0);
        let mut d = StateDocument::new(meta.clone(), UserId::from("admin"), true);
        d.join_participant(Participant::new(ParticipantId::from("admin"), "Admin".into(), 1));
        d
    }

    #[test]
    fn admin_cannot_be_removed() {
        let mut d = doc();
        let result = d.remove_participant(&ParticipantId::from("admin"));
        assert!(result.is_err());
    }

    #[test]
    fn start_tournament_requires_two_participants() {
        let mut d = doc();
        let err = d.start_tournament(Config::default(), 0).unwrap_err();
        assert_eq!(err, ControlError::InvalidConfig("at least 2 participants required".into()));
    }

    #[test]
    fn single_elim_completes_and_advances() {
        let mut d = doc();
        d.join_participant(Participant::new(ParticipantId::from("b"), "B".into(), 2));
        d.start_tournament(Config::default(), 0).unwrap();
        let bracket_matches = d.matches.to_ordered_pairs();
        let (only_id, _) = &bracket_matches[0];
        let winner = d.matches.get(only_id).unwrap().participants[0].clone().unwrap();
        d.resolve_match(only_id, winner, [2, 0], None, 1000).unwrap();
        assert_eq!(d.meta.status, TournamentStatus::Complete);
    }
}
