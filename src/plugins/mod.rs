pub mod autopilot;
pub mod collectibles;
pub mod enemies;
pub mod game_over;
pub mod maze;
pub mod player;
pub mod progression;
pub mod telemetry;
