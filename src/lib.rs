pub mod ai;
pub mod app_state;
pub mod components;
pub mod config;
pub mod events;
pub mod plugins;
pub mod resources;

use bevy::prelude::*;
use micromegas_tracing::prelude::{info, span_fn, span_scope};

use app_state::{AppState, PlayingState};
use config::GameConfig;
use plugins::collectibles::CollectiblePlugin;
use plugins::enemies::EnemyPlugin;
use plugins::game_over::GameOverPlugin;
use plugins::maze::MazePlugin;
use plugins::player::PlayerPlugin;
use plugins::progression::ProgressionPlugin;
use plugins::telemetry::TelemetryPlugin;
use resources::{
    CurrentLevel, FIRST_LEVEL_UP_THRESHOLD, GameRng, GameStats, LevelUpThreshold, Score,
};

/// The whole game loop minus input. Add an input provider such as
/// [`plugins::autopilot::AutopilotPlugin`] to drive the player.
///
/// Requires `StatesPlugin` (part of `DefaultPlugins`, not `MinimalPlugins`).
pub struct MazeChasePlugin;

impl Plugin for MazeChasePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>();
        app.add_sub_state::<PlayingState>();
        app.init_resource::<GameConfig>();

        app.add_plugins(TelemetryPlugin);
        app.add_plugins(MazePlugin);
        app.add_plugins(PlayerPlugin);
        app.add_plugins(EnemyPlugin);
        app.add_plugins(CollectiblePlugin);
        app.add_plugins(ProgressionPlugin);
        app.add_plugins(GameOverPlugin);

        app.add_systems(Update, start_game.run_if(in_state(AppState::Boot)));

        // Per-game-session resources: inserted fresh on each game start,
        // persist through GameOver/Won for the session report.
        app.add_systems(OnEnter(AppState::InGame), init_game_session);
        app.add_systems(OnExit(AppState::GameOver), cleanup_game_session);
        app.add_systems(OnExit(AppState::Won), cleanup_game_session);
    }
}

fn start_game(mut next_state: ResMut<NextState<AppState>>) {
    next_state.set(AppState::InGame);
}

/// Insert per-game-session resources with fresh defaults.
/// Runs on each `OnEnter(AppState::InGame)`, so a new game always starts clean.
#[span_fn]
fn init_game_session(mut commands: Commands, config: Res<GameConfig>) {
    info!(
        "session start: level {}, seed {:?}",
        config.start_level, config.seed
    );
    commands.insert_resource(Score(0));
    commands.insert_resource(CurrentLevel(config.start_level));
    commands.insert_resource(LevelUpThreshold(FIRST_LEVEL_UP_THRESHOLD));
    commands.insert_resource(GameStats::default());
    commands.insert_resource(GameRng::new(config.seed));
}

/// Remove per-game-session resources when leaving the end screen.
#[span_fn]
fn cleanup_game_session(mut commands: Commands) {
    commands.remove_resource::<Score>();
    commands.remove_resource::<CurrentLevel>();
    commands.remove_resource::<LevelUpThreshold>();
    commands.remove_resource::<GameStats>();
    commands.remove_resource::<GameRng>();
}
