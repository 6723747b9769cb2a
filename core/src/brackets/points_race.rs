//! Points-race (Mario-Kart style) bracket generator: a near-regular
//! round-robin of multi-player games rather than a head-to-head bracket.

use crate::brackets::{PointsRaceBracket, RaceGame};
use crate::ids::{GameId, ParticipantId};
use crate::meta::{Config, PointsTable};
use crate::utils::OrderedMap;

/// Builds the game schedule for `participants` under `config`. Every
/// participant plays exactly `games_per_player` games; every game seats up
/// to `players_per_game` participants (the final game may be short if
/// `n * games_per_player` is not a multiple of `players_per_game`).
///
/// Scheduling rotates the participant list by one position per "wave" (one
/// wave = one game per participant) before chunking it into game-sized
/// groups, which spreads repeat pairings across waves instead of
/// clustering them in the same few games.
pub fn generate(participants: &[ParticipantId], config: &Config) -> PointsRaceBracket {
    let k = config.players_per_game.unwrap_or(4) as usize;
    let g = config.games_per_player.unwrap_or(1) as usize;
    let n = participants.len();

    let mut flat: Vec<ParticipantId> = Vec::with_capacity(n * g);
    for wave in 0..g {
        let offset = wave % n.max(1);
        for i in 0..n {
            flat.push(participants[(i + offset) % n].clone());
        }
    }

    let total_games = flat.len().div_ceil(k);
    let mut games: OrderedMap<GameId, RaceGame> = OrderedMap::default();
    for (game_number, chunk) in flat.chunks(k).enumerate() {
        let id = GameId::from(format!("g{game_number}"));
        games.insert(
            id.clone(),
            RaceGame {
                id,
                participants: chunk.to_vec(),
                game_number: game_number as u32 + 1,
                results: Vec::new(),
            },
        );
    }

    PointsRaceBracket {
        games,
        total_games: total_games as u32,
        games_complete: 0,
        points_table: config.points_table.clone().unwrap_or(PointsTable::Sequential),
        is_complete: total_games == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(n: usize) -> ParticipantId {
        ParticipantId::from(format!("p{n}"))
    }

    #[test]
    fn every_participant_plays_games_per_player_games() {
        let parts: Vec<_> = (1..=6).map(pid).collect();
        let config = Config {
            players_per_game: Some(4),
            games_per_player: Some(3),
            ..Config::default()
        };
        let bracket = generate(&parts, &config);
        assert_eq!(bracket.total_games, bracket.games.len() as u32);
        let mut counts = std::collections::HashMap::new();
        for game in bracket.games.values() {
            for p in &game.participants {
                *counts.entry(p.clone()).or_insert(0u32) += 1;
            }
        }
        for p in &parts {
            assert_eq!(counts[p], 3);
        }
    }

    #[test]
    fn games_are_capped_at_players_per_game() {
        let parts: Vec<_> = (1..=10).map(pid).collect();
        let config = Config {
            players_per_game: Some(4),
            games_per_player: Some(1),
            ..Config::default()
        };
        let bracket = generate(&parts, &config);
        for game in bracket.games.values() {
            assert!(game.participants.len() <= 4);
        }
        assert_eq!(bracket.total_games, 3); // ceil(10/4)
    }
}
