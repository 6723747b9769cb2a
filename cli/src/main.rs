//! Demo: runs a handful of replicas of one room over the in-memory
//! transport, plays a single-elimination bracket to completion, and
//! prints the final state as every replica sees it. Exercises the core
//! crate the way a real embedder would, without any real network or
//! browser storage.

use anyhow::Result;
use memory_transport::Hub;
use seedless_core::ids::{RoomId, UserId};
use seedless_core::meta::{Config, TournamentStatus};
use seedless_core::Replica;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

const PLAYERS: &[&str] = &["Alice", "Bob", "Carol", "Dave"];

fn main() -> Result<()> {
    init_tracing();

    let hub = Hub::new();
    let room = RoomId::from("demo-room");
    let mut now: i64 = 0;

    let mut admin = Replica::create_room(
        room.clone(),
        PLAYERS[0].to_string(),
        UserId::from("user-alice"),
        "admin-token".to_string(),
        hub.join(),
        now,
    )?;
    info!(room = %room, "room created");

    let mut joiners = PLAYERS[1..]
        .iter()
        .map(|name| {
            now += 1;
            Replica::join_room(room.clone(), name.to_string(), UserId::from(format!("user-{name}")), hub.join(), now)
        })
        .collect::<Result<Vec<_>, _>>()?;

    pump_all(&mut admin, &mut joiners, now);

    now += 1;
    admin.start_tournament(Config::default(), now).expect("start tournament");
    pump_all(&mut admin, &mut joiners, now);
    info!(matches = admin.doc.matches.len(), "bracket generated");

    // Resolve every open match in whatever order the bracket happens to
    // produce, always picking the first seated participant as the
    // winner, until the tournament is complete.
    while admin.doc.meta.status != TournamentStatus::Complete {
        let open: Vec<_> = admin
            .doc
            .matches
            .iter()
            .filter(|(_, m)| !m.is_resolved() && m.participants[0].is_some() && m.participants[1].is_some())
            .map(|(id, m)| (id.clone(), m.participants[0].clone().unwrap()))
            .collect();
        if open.is_empty() {
            break;
        }
        for (match_id, winner) in open {
            now += 1;
            admin
                .report_match_result(match_id, [2, 0], winner, now)
                .expect("report result");
        }
        pump_all(&mut admin, &mut joiners, now);
    }

    info!(status = ?admin.doc.meta.status, "tournament finished");
    for joiner in &joiners {
        assert_eq!(joiner.doc.meta.status, admin.doc.meta.status, "replicas diverged");
    }
    println!("final status: {:?}", admin.doc.meta.status);
    Ok(())
}

/// Drains and applies every queued message across the admin and its
/// joiners until the network is quiet.
fn pump_all(
    admin: &mut Replica<memory_transport::MemoryChannel>,
    joiners: &mut [Replica<memory_transport::MemoryChannel>],
    now: i64,
) {
    for _ in 0..64 {
        let mut delivered = false;
        for envelope in admin.channel.drain_inbound() {
            delivered = true;
            admin.handle_inbound(&envelope, now);
        }
        for joiner in joiners.iter_mut() {
            for envelope in joiner.channel.drain_inbound() {
                delivered = true;
                joiner.handle_inbound(&envelope, now);
            }
        }
        if !delivered {
            break;
        }
    }
}
