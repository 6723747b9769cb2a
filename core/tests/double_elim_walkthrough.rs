use seedless_core::meta::{Config, Meta, TournamentStatus, TournamentType};
use seedless_core::{ParticipantId, Participant, RoomId, StateDocument, UserId};

fn doc_with(n: usize) -> StateDocument {
    let mut meta = Meta::new(RoomId::from("room"), "Room".into(), UserId::from("admin"), "tok".into(), 0);
    meta.kind = TournamentType::Double;
    let mut doc = StateDocument::new(meta, UserId::from("admin"), true);
    for i in 0..n {
        doc.join_participant(Participant::new(ParticipantId::from(format!("p{i}")), format!("P{i}"), i as i64));
    }
    doc
}

fn pid(n: usize) -> ParticipantId {
    ParticipantId::from(format!("p{n}"))
}

/// Plays a full 4-player double-elimination bracket through to a bracket
/// reset (the losers finalist beats the previously-undefeated winners
/// finalist in `gf1`, forcing `gf2`), confirming the tournament only
/// completes after the reset decider is played.
#[test]
fn four_player_double_elim_reaches_bracket_reset() {
    let mut doc = doc_with(4);
    doc.start_tournament(Config::default(), 0).unwrap();

    // winners round 1: p0 beats p1, p2 beats p3.
    doc.resolve_match(&"w1m0".into(), pid(0), [2, 0], None, 10).unwrap();
    doc.resolve_match(&"w1m1".into(), pid(2), [2, 0], None, 11).unwrap();

    // both losers (p1, p3) meet in the minor losers round.
    let l1 = doc.matches.get(&"l1m0".into()).unwrap();
    assert_eq!(l1.participants, [Some(pid(1)), Some(pid(3))]);
    doc.resolve_match(&"l1m0".into(), pid(1), [2, 1], None, 20).unwrap();

    // winners final: p0 beats p2, sending p2 down to the losers bracket.
    doc.resolve_match(&"w2m0".into(), pid(0), [2, 0], None, 30).unwrap();
    let l2 = doc.matches.get(&"l2m0".into()).unwrap();
    assert_eq!(l2.participants, [Some(pid(1)), Some(pid(2))]);

    // losers final: p2 survives, earning the rematch against p0.
    doc.resolve_match(&"l2m0".into(), pid(2), [2, 1], None, 40).unwrap();
    let gf1 = doc.matches.get(&"gf1".into()).unwrap();
    assert_eq!(gf1.participants, [Some(pid(0)), Some(pid(2))]);
    assert_eq!(doc.meta.status, TournamentStatus::Active);

    // gf1: the losers finalist upsets the undefeated winners finalist,
    // forcing a bracket reset rather than ending the tournament.
    doc.resolve_match(&"gf1".into(), pid(2), [1, 2], None, 50).unwrap();
    assert_eq!(doc.meta.status, TournamentStatus::Active);
    let gf2 = doc.matches.get(&"gf2".into()).unwrap();
    assert_eq!(gf2.participants, [Some(pid(0)), Some(pid(2))]);

    // gf2 always ends the tournament, whoever wins it.
    doc.resolve_match(&"gf2".into(), pid(0), [2, 1], None, 60).unwrap();
    assert_eq!(doc.meta.status, TournamentStatus::Complete);
}

/// When the winners finalist also wins `gf1`, there is no reset: the
/// tournament completes immediately and `gf2` is never seeded.
#[test]
fn four_player_double_elim_completes_without_reset() {
    let mut doc = doc_with(4);
    doc.start_tournament(Config::default(), 0).unwrap();
    doc.resolve_match(&"w1m0".into(), pid(0), [2, 0], None, 10).unwrap();
    doc.resolve_match(&"w1m1".into(), pid(2), [2, 0], None, 11).unwrap();
    doc.resolve_match(&"l1m0".into(), pid(1), [2, 1], None, 20).unwrap();
    doc.resolve_match(&"w2m0".into(), pid(0), [2, 0], None, 30).unwrap();
    doc.resolve_match(&"l2m0".into(), pid(2), [2, 1], None, 40).unwrap();
    doc.resolve_match(&"gf1".into(), pid(0), [2, 0], None, 50).unwrap();
    assert_eq!(doc.meta.status, TournamentStatus::Complete);
    assert!(doc.matches.get(&"gf2".into()).unwrap().participants == [None, None]);
}
