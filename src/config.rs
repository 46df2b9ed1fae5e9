//! Session configuration, read from an optional JSON file.
//!
//! Every field has a default, so `{}` is a valid config.

use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;

use crate::ai::Algorithm;
use crate::resources::MAX_LEVEL;

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Fixed RNG seed for reproducible mazes; entropy when absent.
    pub seed: Option<u64>,
    pub start_level: u32,
    /// Forces one search algorithm for every level.
    pub algorithm: Option<Algorithm>,
    pub width: usize,
    pub height: usize,
    /// Frame period of the headless runner.
    pub tick_ms: u64,
    /// Stop the runner after this many frames.
    pub max_frames: Option<u64>,
    pub player_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            start_level: 1,
            algorithm: None,
            width: 30,
            height: 22,
            tick_ms: 16,
            max_frames: None,
            player_name: "PacFan".to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_json(text: &str) -> Result<Self, String> {
        let config: GameConfig =
            serde_json::from_str(text).map_err(|e| format!("Invalid config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &str) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path, e))?;
        Self::from_json(&text)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    fn validate(&self) -> Result<(), String> {
        // Spawns, boundary ring and wall-block placement all need room.
        if self.width < 8 || self.height < 8 {
            return Err(format!(
                "Maze must be at least 8x8, got {}x{}",
                self.width, self.height
            ));
        }
        if !(1..=MAX_LEVEL).contains(&self.start_level) {
            return Err(format!(
                "start_level must be within 1..={}, got {}",
                MAX_LEVEL, self.start_level
            ));
        }
        Ok(())
    }
}
