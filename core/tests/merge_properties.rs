use seedless_core::match_::BracketKind;
use seedless_core::meta::Meta;
use seedless_core::store::serialize::Snapshot;
use seedless_core::{Match, MatchId, ParticipantId, RoomId, StateDocument, UserId};

fn base_doc() -> StateDocument {
    let meta = Meta::new(RoomId::from("room"), "Room".into(), UserId::from("admin"), "tok".into(), 0);
    let mut doc = StateDocument::new(meta, UserId::from("local"), false);
    let mut m = Match::new(MatchId::from("r1m0"), BracketKind::Single, 1, 0);
    m.participants = [Some(ParticipantId::from("a")), Some(ParticipantId::from("b"))];
    doc.matches.insert(m.id.clone(), m);
    doc
}

fn snapshot_with_result(winner: &str, reported_at: i64) -> Snapshot {
    let meta = Meta::new(RoomId::from("room"), "Room".into(), UserId::from("admin"), "tok".into(), 0);
    let mut m = Match::new(MatchId::from("r1m0"), BracketKind::Single, 1, 0);
    m.participants = [Some(ParticipantId::from("a")), Some(ParticipantId::from("b"))];
    m.resolve(ParticipantId::from(winner), [2, 0], reported_at);
    Snapshot {
        meta,
        participants: vec![],
        matches: vec![(m.id.clone(), m)],
        bracket: None,
        standings: vec![],
        team_assignments: vec![],
        teams: vec![],
    }
}

/// Merging two conflicting unverified reports in either order converges
/// on the later-timestamped one: merge is commutative because every
/// field rule is a pure function of the (local, remote) pair, never of
/// arrival order.
#[test]
fn conflicting_reports_converge_regardless_of_merge_order() {
    let later = snapshot_with_result("a", 100);
    let earlier = snapshot_with_result("b", 50);

    let mut later_then_earlier = base_doc();
    later_then_earlier.merge(&later, None);
    later_then_earlier.merge(&earlier, None);

    let mut earlier_then_later = base_doc();
    earlier_then_later.merge(&earlier, None);
    earlier_then_later.merge(&later, None);

    let winner_a = later_then_earlier.matches.get(&MatchId::from("r1m0")).unwrap().winner_id.clone();
    let winner_b = earlier_then_later.matches.get(&MatchId::from("r1m0")).unwrap().winner_id.clone();
    assert_eq!(winner_a, Some(ParticipantId::from("a")));
    assert_eq!(winner_a, winner_b);
}

/// Merging the same snapshot twice is a no-op beyond the first
/// application (idempotence).
#[test]
fn merging_same_snapshot_twice_is_idempotent() {
    let snapshot = snapshot_with_result("a", 100);
    let mut doc = base_doc();
    doc.merge(&snapshot, None);
    let after_first = doc.matches.get(&MatchId::from("r1m0")).unwrap().clone();
    doc.merge(&snapshot, None);
    let after_second = doc.matches.get(&MatchId::from("r1m0")).unwrap().clone();
    assert_eq!(after_first, after_second);
}
