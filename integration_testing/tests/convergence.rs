use integration_testing::Network;
use seedless_core::meta::Config;

/// Four participants run a single-elimination bracket to completion,
/// with each round's winner reporting their own result, and every
/// replica converges on the same final state.
#[test]
fn four_player_single_elim_converges() {
    let mut net = Network::new();
    let admin = net.create_admin("room", "Alice", 0);
    let bob = net.join("room", "Bob", 1);
    let carol = net.join("room", "Carol", 2);
    let dave = net.join("room", "Dave", 3);
    net.pump(10);

    net.node_mut(admin)
        .replica
        .start_tournament(Config::default(), 10)
        .unwrap();
    net.pump(11);

    for node_idx in [admin, bob, carol, dave] {
        assert_eq!(net.node(node_idx).replica.doc.matches.len(), 3);
    }

    let match_ids: Vec<_> = net
        .node(admin)
        .replica
        .doc
        .matches
        .keys()
        .cloned()
        .collect();
    let round1: Vec<_> = match_ids
        .iter()
        .filter(|id| id.as_str().starts_with("r1"))
        .cloned()
        .collect();
    assert_eq!(round1.len(), 2);

    for match_id in &round1 {
        let (winner, scores) = {
            let m = net.node(admin).replica.doc.matches.get(match_id).unwrap();
            (m.participants[0].clone().unwrap(), [2, 0])
        };
        net.node_mut(admin)
            .replica
            .report_match_result(match_id.clone(), scores, winner, 20)
            .unwrap();
    }
    net.pump(21);

    let final_id = match_ids
        .iter()
        .find(|id| id.as_str().starts_with("r2"))
        .cloned()
        .unwrap();
    let winner = net
        .node(admin)
        .replica
        .doc
        .matches
        .get(&final_id)
        .unwrap()
        .participants[0]
        .clone()
        .unwrap();
    net.node_mut(admin)
        .replica
        .report_match_result(final_id, [2, 1], winner.clone(), 30)
        .unwrap();
    net.pump(31);

    let admin_final_winner = net
        .node(admin)
        .replica
        .doc
        .matches
        .values()
        .find(|m| m.bracket == seedless_core::match_::BracketKind::Single && m.round == 2)
        .and_then(|m| m.winner_id.clone())
        .unwrap();
    assert_eq!(admin_final_winner, winner);

    for node_idx in [admin, bob, carol, dave] {
        let doc = &net.node(node_idx).replica.doc;
        assert_eq!(doc.meta.status, seedless_core::meta::TournamentStatus::Complete);
        let their_winner = doc
            .matches
            .values()
            .find(|m| m.bracket == seedless_core::match_::BracketKind::Single && m.round == 2)
            .and_then(|m| m.winner_id.clone())
            .unwrap();
        assert_eq!(their_winner, admin_final_winner);
    }
}
