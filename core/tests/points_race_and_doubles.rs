use seedless_core::brackets::Bracket;
use seedless_core::meta::{Config, Meta, TournamentStatus, TournamentType};
use seedless_core::{ParticipantId, Participant, RoomId, StateDocument, TeamId, UserId};

fn doc_with(n: usize, kind: TournamentType) -> StateDocument {
    let mut meta = Meta::new(RoomId::from("room"), "Room".into(), UserId::from("admin"), "tok".into(), 0);
    meta.kind = kind;
    let mut doc = StateDocument::new(meta, UserId::from("admin"), true);
    for i in 0..n {
        doc.join_participant(Participant::new(ParticipantId::from(format!("p{i}")), format!("P{i}"), i as i64));
    }
    doc
}

fn pid(n: usize) -> ParticipantId {
    ParticipantId::from(format!("p{n}"))
}

/// A 4-player points-race completes once every scheduled game has a
/// result, and standings accumulate points across games rather than
/// being overwritten by each report.
#[test]
fn points_race_accumulates_standings_to_completion() {
    let mut doc = doc_with(4, TournamentType::Mariokart);
    let config = Config { players_per_game: Some(2), games_per_player: Some(1), ..Config::default() };
    doc.start_tournament(config, 0).unwrap();

    assert_eq!(doc.matches.len(), 0); // points-race keeps no Match records

    let Bracket::PointsRace(race) = doc.bracket.as_ref().unwrap() else {
        panic!("expected a points-race bracket");
    };
    assert_eq!(race.total_games, 2);

    doc.report_race_result(&"g0".into(), vec![pid(1), pid(0)]).unwrap();
    assert_eq!(doc.meta.status, TournamentStatus::Active);
    doc.report_race_result(&"g1".into(), vec![pid(3), pid(2)]).unwrap();
    assert_eq!(doc.meta.status, TournamentStatus::Complete);

    assert_eq!(doc.standings.get(&pid(1)).unwrap().points, 2);
    assert_eq!(doc.standings.get(&pid(0)).unwrap().points, 1);
    assert_eq!(doc.standings.get(&pid(1)).unwrap().wins, 1);

    // Re-reporting the same game is idempotent: points don't double.
    doc.report_race_result(&"g0".into(), vec![pid(1), pid(0)]).unwrap();
    assert_eq!(doc.standings.get(&pid(1)).unwrap().points, 2);
}

/// Doubles mode groups participants into teams via `team_assignments` and
/// delegates to the inner single-elimination generator using team ids as
/// surrogate entrants; short teams are excluded from the bracket.
#[test]
fn doubles_groups_teams_and_excludes_short_ones() {
    let mut doc = doc_with(5, TournamentType::Doubles);
    doc.team_assignments.insert(pid(0), TeamId::from("team-a"));
    doc.team_assignments.insert(pid(1), TeamId::from("team-a"));
    doc.team_assignments.insert(pid(2), TeamId::from("team-b"));
    doc.team_assignments.insert(pid(3), TeamId::from("team-b"));
    doc.team_assignments.insert(pid(4), TeamId::from("team-c")); // short team, excluded

    let config = Config {
        team_size: Some(2),
        bracket_type: Some(TournamentType::Single),
        ..Config::default()
    };
    doc.start_tournament(config, 0).unwrap();

    let Bracket::Doubles(db) = doc.bracket.as_ref().unwrap() else {
        panic!("expected a doubles bracket");
    };
    assert_eq!(db.teams.len(), 2);
    assert!(!db.teams.contains_key(&TeamId::from("team-c")));
    assert_eq!(doc.matches.len(), 1); // 2 teams -> single match, no byes
}
