use integration_testing::Network;
use seedless_core::meta::Config;

/// A participant reports an unverified result; the admin then verifies a
/// different winner. The admin's verified call overrides everywhere,
/// regardless of report ordering or timestamps.
#[test]
fn admin_verification_overrides_participant_report() {
    let mut net = Network::new();
    let admin = net.create_admin("room", "Admin", 0);
    let bob = net.join("room", "Bob", 1);
    net.pump(5);

    net.node_mut(admin)
        .replica
        .start_tournament(Config::default(), 5)
        .unwrap();
    net.pump(6);

    let match_id = net
        .node(admin)
        .replica
        .doc
        .matches
        .keys()
        .next()
        .cloned()
        .unwrap();
    let (p0, p1) = {
        let m = net.node(admin).replica.doc.matches.get(&match_id).unwrap();
        (m.participants[0].clone().unwrap(), m.participants[1].clone().unwrap())
    };

    net.node_mut(bob)
        .replica
        .report_match_result(match_id.clone(), [1, 2], p1.clone(), 100)
        .unwrap();
    net.pump(101);

    for node_idx in [admin, bob] {
        let winner = net.node(node_idx).replica.doc.matches.get(&match_id).unwrap().winner_id.clone();
        assert_eq!(winner, Some(p1.clone()));
    }

    net.node_mut(admin)
        .replica
        .verify_match_result(match_id.clone(), [2, 1], p0.clone(), 200)
        .unwrap();
    net.pump(201);

    for node_idx in [admin, bob] {
        let m = net.node(node_idx).replica.doc.matches.get(&match_id).unwrap();
        assert_eq!(m.winner_id, Some(p0.clone()));
        assert!(m.verified_by.is_some());
    }

    // A later unverified report for the same match must not undo the
    // admin's verified call.
    net.node_mut(bob)
        .replica
        .report_match_result(match_id.clone(), [0, 2], p1.clone(), 300)
        .unwrap();
    net.pump(301);
    let m = net.node(admin).replica.doc.matches.get(&match_id).unwrap();
    assert_eq!(m.winner_id, Some(p0));
}
