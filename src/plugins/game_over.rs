//! End of session: build the score submission when the game is lost or won.

use bevy::prelude::*;
use micromegas_tracing::prelude::{imetric, info, span_fn, span_scope};

use crate::app_state::AppState;
use crate::config::GameConfig;
use crate::resources::{CurrentLevel, GameStats, Score, ScoreSubmission};

pub struct GameOverPlugin;

impl Plugin for GameOverPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::GameOver), build_session_report);
        app.add_systems(OnEnter(AppState::Won), build_session_report);
    }
}

/// Final outcome of a session, kept until the app exits.
#[derive(Resource, Debug, Clone)]
pub struct SessionReport {
    pub won: bool,
    pub submission: ScoreSubmission,
}

#[span_fn]
fn build_session_report(
    mut commands: Commands,
    state: Res<State<AppState>>,
    config: Res<GameConfig>,
    score: Res<Score>,
    level: Res<CurrentLevel>,
    stats: Res<GameStats>,
) {
    let won = *state.get() == AppState::Won;
    let submission = ScoreSubmission {
        player_name: config.player_name.clone(),
        score: score.0,
        level: level.0,
    };

    info!(
        "{}: score {} at level {} ({} food, {} fruit, {} levels cleared)",
        if won { "game won" } else { "game over" },
        score.0,
        level.0,
        stats.food_eaten,
        stats.fruit_eaten,
        stats.levels_cleared
    );
    info!("score submission: {}", submission.to_json());
    imetric!("final_score", "points", score.0);

    commands.insert_resource(SessionReport { won, submission });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
