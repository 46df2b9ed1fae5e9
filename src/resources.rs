use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::ai::Algorithm;

/// Highest level; clearing it with enough score wins the game.
pub const MAX_LEVEL: u32 = 4;

/// Score needed to leave level 1.
pub const FIRST_LEVEL_UP_THRESHOLD: u64 = 100;

#[derive(Resource, Debug)]
pub struct Score(pub u64);

#[derive(Resource, Debug)]
pub struct CurrentLevel(pub u32);

/// Score required before a cleared level advances instead of replaying.
#[derive(Resource, Debug)]
pub struct LevelUpThreshold(pub u64);

/// Session random source. Seeded from `GameConfig::seed` when one is set.
#[derive(Resource)]
pub struct GameRng(pub StdRng);

impl GameRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

// ---------------------------------------------------------------------------
// Level config
// ---------------------------------------------------------------------------

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct LevelConfig {
    pub level: u32,
    pub algorithm: Algorithm,
    /// Player moves per second.
    pub player_speed: f32,
    /// Ghost moves (and path recomputations) per second.
    pub ghost_speed: f32,
    /// Number of random wall blocks placed inside the boundary.
    pub wall_blocks: u32,
    /// Upper bound on fruit placed; also capped by open space.
    pub fruit_count: usize,
}

/// Build the level configuration for a given level number.
pub fn level_config(level: u32) -> LevelConfig {
    let algorithm = if level <= 2 {
        Algorithm::Bfs
    } else {
        Algorithm::AStar
    };

    LevelConfig {
        level,
        algorithm,
        player_speed: 6.0 + level as f32,
        ghost_speed: 2.0 + level as f32,
        wall_blocks: level * 20 / 2,
        fruit_count: (level as f32 * 1.5).floor() as usize + 3,
    }
}

// ---------------------------------------------------------------------------
// Game stats
// ---------------------------------------------------------------------------

#[derive(Resource, Debug, Default)]
pub struct GameStats {
    pub food_eaten: u64,
    pub fruit_eaten: u64,
    pub levels_cleared: u32,
    pub ghost_moves: u64,
}

/// Final result handed to the external high score service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSubmission {
    pub player_name: String,
    pub score: u64,
    pub level: u32,
}

impl ScoreSubmission {
    pub fn to_json(&self) -> String {
        // Plain strings and integers only; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
