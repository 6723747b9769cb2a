//! Tournament metadata: identity, lifecycle status, and configuration.

use serde::{Deserialize, Serialize};

use crate::ids::{RoomId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentType {
    Single,
    Double,
    Mariokart,
    Doubles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Lobby,
    Active,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingMode {
    Random,
    Manual,
}

/// Either a fixed, ordered sequence of positive point values, or the
/// `sequential` scheme: position `i` (1-based) in an `n`-player game scores
/// `n - i + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsTable {
    Sequential,
    Fixed(Vec<u32>),
}

impl PointsTable {
    /// Points awarded for finishing in 1-based `position` out of `n`
    /// players in a single game.
    pub fn points_for(&self, position: usize, n: usize) -> u32 {
        match self {
            PointsTable::Sequential => (n.saturating_sub(position) + 1) as u32,
            PointsTable::Fixed(values) => values.get(position - 1).copied().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub best_of: u32,
    pub num_rounds: Option<u32>,
    pub players_per_game: Option<u32>,
    pub games_per_player: Option<u32>,
    pub points_table: Option<PointsTable>,
    pub team_size: Option<u32>,
    pub bracket_type: Option<TournamentType>,
    pub seeding_mode: SeedingMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            best_of: 1,
            num_rounds: None,
            players_per_game: None,
            games_per_player: None,
            points_table: None,
            team_size: None,
            bracket_type: None,
            seeding_mode: SeedingMode::Random,
        }
    }
}

impl Config {
    /// Validates ranges named explicitly by the spec. Does not validate
    /// cross-field requirements that depend on the entrant count (that is
    /// the bracket engine's job at generation time).
    pub fn validate(&self, tournament_type: TournamentType) -> Result<(), String> {
        if self.best_of == 0 {
            return Err("best_of must be >= 1".into());
        }
        if tournament_type == TournamentType::Mariokart {
            let k = self
                .players_per_game
                .ok_or("players_per_game is required for mariokart")?;
            if !(2..=12).contains(&k) {
                return Err("players_per_game must be in 2..=12".into());
            }
            let g = self
                .games_per_player
                .ok_or("games_per_player is required for mariokart")?;
            if !(1..=20).contains(&g) {
                return Err("games_per_player must be in 1..=20".into());
            }
        }
        if tournament_type == TournamentType::Doubles {
            let size = self.team_size.ok_or("team_size is required for doubles")?;
            if !(2..=4).contains(&size) {
                return Err("team_size must be in 2..=4".into());
            }
            if self.bracket_type.is_none() {
                return Err("bracket_type is required for doubles".into());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub version: u64,
    pub id: RoomId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TournamentType,
    pub status: TournamentStatus,
    pub admin_id: UserId,
    pub admin_token: String,
    pub created_at: i64,
    pub config: Config,
}

impl Meta {
    pub fn new(id: RoomId, name: String, admin_id: UserId, admin_token: String, now_ms: i64) -> Self {
        Meta {
            version: 0,
            id,
            name,
            kind: TournamentType::Single,
            status: TournamentStatus::Lobby,
            admin_id,
            admin_token,
            created_at: now_ms,
            config: Config::default(),
        }
    }
}
