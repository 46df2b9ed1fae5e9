//! Level flow: intro, the post-clear pause, and advancing or replaying.

use bevy::prelude::*;
use micromegas_tracing::prelude::{imetric, info, span_fn, span_scope};

use crate::app_state::{AppState, PlayingState};
use crate::plugins::maze::{despawn_maze_entities, generate_maze};
use crate::resources::{CurrentLevel, GameStats, LevelConfig, LevelUpThreshold, Score, MAX_LEVEL};

/// Pause between clearing a level and what comes next.
pub const LEVEL_CLEARED_SECS: f32 = 2.0;

pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(PlayingState::LevelIntro),
            start_level.after(generate_maze),
        );

        app.add_systems(OnEnter(PlayingState::LevelCleared), start_level_cleared_timer);
        app.add_systems(
            Update,
            level_cleared_delay.run_if(in_state(PlayingState::LevelCleared)),
        );
        app.add_systems(OnExit(PlayingState::LevelCleared), remove_level_cleared_timer);

        app.add_systems(
            OnEnter(PlayingState::LevelTransition),
            (despawn_maze_entities, advance_level.after(despawn_maze_entities)),
        );
    }
}

#[derive(Resource, Deref, DerefMut)]
pub struct LevelClearedTimer(pub Timer);

/// What a cleared level leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Move on to the next level.
    Advance,
    /// Final level cleared with enough score.
    Won,
    /// Not enough score yet: play the same level on a new maze.
    Replay,
}

pub fn next_stage(level: u32, score: u64, threshold: u64) -> Stage {
    if score < threshold {
        Stage::Replay
    } else if level >= MAX_LEVEL {
        Stage::Won
    } else {
        Stage::Advance
    }
}

/// Threshold for leaving `new_level`, given the one just met.
pub fn raised_threshold(threshold: u64, new_level: u32) -> u64 {
    threshold + 100 * new_level as u64
}

/// Announce the level and hand control to the player.
fn start_level(
    config: Res<LevelConfig>,
    threshold: Res<LevelUpThreshold>,
    mut next_state: ResMut<NextState<PlayingState>>,
) {
    info!(
        "Level {} | {} | Next @{}",
        config.level,
        config.algorithm.label(),
        threshold.0
    );
    next_state.set(PlayingState::Playing);
}

fn start_level_cleared_timer(
    mut commands: Commands,
    level: Res<CurrentLevel>,
    score: Res<Score>,
    mut stats: ResMut<GameStats>,
) {
    stats.levels_cleared += 1;
    imetric!("levels_cleared", "count", stats.levels_cleared as u64);
    info!("level {} cleared with score {}", level.0, score.0);
    commands.insert_resource(LevelClearedTimer(Timer::from_seconds(
        LEVEL_CLEARED_SECS,
        TimerMode::Once,
    )));
}

fn level_cleared_delay(
    time: Res<Time>,
    mut timer: ResMut<LevelClearedTimer>,
    mut next_state: ResMut<NextState<PlayingState>>,
) {
    timer.tick(time.delta());
    if timer.just_finished() {
        next_state.set(PlayingState::LevelTransition);
    }
}

fn remove_level_cleared_timer(mut commands: Commands) {
    commands.remove_resource::<LevelClearedTimer>();
}

/// Advance, win, or replay depending on the score reached.
#[span_fn]
fn advance_level(
    mut level: ResMut<CurrentLevel>,
    mut threshold: ResMut<LevelUpThreshold>,
    score: Res<Score>,
    mut next_playing: ResMut<NextState<PlayingState>>,
    mut next_app: ResMut<NextState<AppState>>,
) {
    match next_stage(level.0, score.0, threshold.0) {
        Stage::Advance => {
            level.0 += 1;
            threshold.0 = raised_threshold(threshold.0, level.0);
            next_playing.set(PlayingState::LevelIntro);
        }
        Stage::Won => {
            info!("all {} levels cleared", MAX_LEVEL);
            next_app.set(AppState::Won);
        }
        Stage::Replay => {
            info!(
                "score {} below {}, replaying level {}",
                score.0, threshold.0, level.0
            );
            next_playing.set(PlayingState::LevelIntro);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
