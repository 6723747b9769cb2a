use integration_testing::Network;
use seedless_core::meta::{Config, TournamentStatus};

/// A participant who joins only after the tournament has already started
/// still bootstraps the active bracket via `st:req`/`st:res`.
#[test]
fn joiner_after_start_bootstraps_active_bracket() {
    let mut net = Network::new();
    let admin = net.create_admin("room", "Admin", 0);
    let bob = net.join("room", "Bob", 1);
    net.pump(5);

    net.node_mut(admin)
        .replica
        .start_tournament(Config::default(), 5)
        .unwrap();
    net.pump(6);
    assert_eq!(net.node(bob).replica.doc.meta.status, TournamentStatus::Active);

    let carol = net.join("room", "Carol", 10);
    net.pump(11);

    let carol_doc = &net.node(carol).replica.doc;
    assert_eq!(carol_doc.meta.status, TournamentStatus::Active);
    assert_eq!(carol_doc.matches.len(), net.node(admin).replica.doc.matches.len());
    assert!(carol_doc.participants.contains_key(&seedless_core::ParticipantId::from("user-Admin")));
    assert!(carol_doc.participants.contains_key(&seedless_core::ParticipantId::from("user-Bob")));
}
