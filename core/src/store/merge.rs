//! The CRDT join: `merge(local, remote, remoteAdminId)`.
//!
//! Each field family has its own convergence rule (OR-Set+LWW for
//! participants, LWW-with-verification-override for matches,
//! admin-authoritative for meta/bracket/teamAssignments, overwrite for
//! derived standings). Applying the same remote snapshot twice is a no-op
//! (idempotence), and merging A then B converges to the same state as B
//! then A (commutativity) because every rule is a pure function of the two
//! input records, never of merge order.

use crate::ids::UserId;
use crate::match_::Match;
use crate::participant::Participant;
use crate::store::document::StateDocument;
use crate::store::serialize::Snapshot;

pub fn merge_into(doc: &mut StateDocument, remote: &Snapshot, remote_admin_id: Option<&UserId>) {
    let is_remote_admin = remote_admin_id.is_some_and(|id| *id == remote.meta.admin_id);

    if is_remote_admin || remote.meta.version > doc.meta.version {
        doc.meta = remote.meta.clone();
    }

    for (id, remote_p) in &remote.participants {
        match doc.participants.get(id) {
            None => {
                doc.participants.insert(id.clone(), remote_p.clone());
            }
            Some(local_p) => {
                if remote_p.joined_at > local_p.joined_at {
                    let merged = overlay_participant(local_p, remote_p);
                    doc.participants.insert(id.clone(), merged);
                }
            }
        }
    }

    if is_remote_admin {
        if let Some(bracket) = &remote.bracket {
            doc.bracket = Some(bracket.clone());
        }
    }

    for (id, remote_m) in &remote.matches {
        match doc.matches.get(id) {
            None => {
                doc.matches.insert(id.clone(), remote_m.clone());
            }
            Some(local_m) => {
                if adopt_remote_match(local_m, remote_m) {
                    doc.matches.insert(id.clone(), remote_m.clone());
                }
            }
        }
    }

    doc.standings = crate::standings::Standings::from_ordered_pairs(remote.standings.clone());

    if is_remote_admin {
        doc.team_assignments =
            crate::utils::OrderedMap::from_ordered_pairs(remote.team_assignments.clone());
        doc.teams = crate::utils::OrderedMap::from_ordered_pairs(remote.teams.clone());
    }

    doc.events.emit(crate::store::events::Event::Merge);
}

/// `{...local, ...remote}`: remote wins field-by-field, but since
/// `Participant` is a closed record this collapses to "take remote"
/// except that a local `claimed_by` set by this replica's own
/// manual-slot-claim flow is not clobbered by a remote record that
/// predates the claim.
fn overlay_participant(local: &Participant, remote: &Participant) -> Participant {
    let mut merged = remote.clone();
    if merged.claimed_by.is_none() && local.claimed_by.is_some() {
        merged.claimed_by = local.claimed_by.clone();
    }
    merged
}

fn adopt_remote_match(local: &Match, remote: &Match) -> bool {
    let remote_verified = remote.verified_by.is_some();
    let local_verified = local.verified_by.is_some();
    if remote_verified && !local_verified {
        true
    } else if local_verified && !remote_verified {
        false
    } else {
        remote.reported_at > local.reported_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{MatchId, ParticipantId, RoomId};
    use crate::match_::BracketKind;
    use crate::meta::Meta;

    fn base_doc() -> StateDocument {
        let meta = Meta::new(
            RoomId::from("room"),
            "Room".into(),
            UserId::from("admin"),
            "tok".into(),
            0,
        );
        StateDocument::new(meta, UserId::from("local"), false)
    }

    fn empty_snapshot(admin_id: &str, version: u64) -> Snapshot {
        let mut meta = Meta::new(RoomId::from("room"), "Room".into(), UserId::from(admin_id), "tok".into(), 0);
        meta.version = version;
        Snapshot {
            meta,
            participants: vec![],
            matches: vec![],
            bracket: None,
            standings: vec![],
            team_assignments: vec![],
            teams: vec![],
        }
    }

    #[test]
    fn match_verification_overrides_later_unverified_report() {
        let mut doc = base_doc();
        let mut m = Match::new(MatchId::from("r1m0"), BracketKind::Single, 1, 0);
        m.participants = [Some(ParticipantId::from("a")), Some(ParticipantId::from("b"))];
        m.resolve(ParticipantId::from("b"), [2, 0], 1000);
        m.verified_by = Some(UserId::from("admin"));
        doc.matches.insert(m.id.clone(), m);

        let mut remote = empty_snapshot("admin", 0);
        let mut remote_m = Match::new(MatchId::from("r1m0"), BracketKind::Single, 1, 0);
        remote_m.participants = [Some(ParticipantId::from("a")), Some(ParticipantId::from("b"))];
        remote_m.resolve(ParticipantId::from("a"), [2, 1], 5000);
        remote.matches.push((remote_m.id.clone(), remote_m));

        merge_into(&mut doc, &remote, None);
        let result = doc.matches.get(&MatchId::from("r1m0")).unwrap();
        assert_eq!(result.winner_id, Some(ParticipantId::from("b")));
        assert_eq!(result.verified_by, Some(UserId::from("admin")));
    }

    #[test]
    fn unverified_lww_takes_later_report() {
        let mut doc = base_doc();
        let mut m = Match::new(MatchId::from("r1m0"), BracketKind::Single, 1, 0);
        m.participants = [Some(ParticipantId::from("a")), Some(ParticipantId::from("b"))];
        m.resolve(ParticipantId::from("a"), [2, 1], 1000);
        doc.matches.insert(m.id.clone(), m);

        let mut remote = empty_snapshot("admin", 0);
        let mut remote_m = Match::new(MatchId::from("r1m0"), BracketKind::Single, 1, 0);
        remote_m.participants = [Some(ParticipantId::from("a")), Some(ParticipantId::from("b"))];
        remote_m.resolve(ParticipantId::from("b"), [2, 0], 2000);
        remote.matches.push((remote_m.id.clone(), remote_m));

        merge_into(&mut doc, &remote, None);
        assert_eq!(
            doc.matches.get(&MatchId::from("r1m0")).unwrap().winner_id,
            Some(ParticipantId::from("b"))
        );
    }

    #[test]
    fn non_admin_remote_meta_with_lower_version_is_ignored() {
        let mut doc = base_doc();
        doc.meta.version = 5;
        let remote = empty_snapshot("someone-else", 1);
        merge_into(&mut doc, &remote, None);
        assert_eq!(doc.meta.admin_id, UserId::from("admin"));
    }

    #[test]
    fn admin_remote_meta_wins_regardless_of_version() {
        let mut doc = base_doc();
        doc.meta.version = 100;
        let remote = empty_snapshot("admin", 1);
        merge_into(&mut doc, &remote, Some(&UserId::from("admin")));
        assert_eq!(doc.meta.version, 1);
    }
}
