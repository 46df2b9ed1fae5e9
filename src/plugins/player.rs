//! Player spawning and grid movement.
//!
//! The player moves one cell per cadence interval: the buffered input
//! direction if there is one, otherwise the current heading. Where the input
//! comes from is up to whoever writes `InputDirection`.

use bevy::prelude::*;
use micromegas_tracing::prelude::*;

use crate::app_state::PlayingState;
use crate::components::*;
use crate::plugins::maze::{generate_maze, MazeEntity, MazeMap};
use crate::plugins::telemetry::GameSet;
use crate::resources::LevelConfig;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(PlayingState::LevelIntro),
            spawn_player.after(generate_maze),
        );
        app.add_systems(
            Update,
            player_movement
                .in_set(GameSet::Player)
                .run_if(in_state(PlayingState::Playing)),
        );
    }
}

/// Spawn the player at the maze's player spawn, heading right.
#[span_fn]
pub fn spawn_player(mut commands: Commands, maze: Res<MazeMap>, config: Res<LevelConfig>) {
    commands.spawn((
        Player,
        maze.player_spawn(),
        MoveCadence::new(config.player_speed),
        InputDirection::default(),
        Heading(Direction::Right),
        MazeEntity,
    ));
}

/// Where a step from `from` in `dir` lands, or None if that cell is a wall.
pub fn step_target(maze: &MazeMap, from: Cell, dir: Direction) -> Option<Cell> {
    let next = maze.wrap(from.offset(dir));
    (!maze.is_wall(next)).then_some(next)
}

/// Attempt one move per cadence interval. The input buffer is consumed by
/// every attempt, and the heading only changes when the move succeeds.
#[span_fn]
fn player_movement(
    time: Res<Time>,
    maze: Res<MazeMap>,
    mut query: Query<
        (&mut Cell, &mut MoveCadence, &mut InputDirection, &mut Heading),
        With<Player>,
    >,
) {
    for (mut pos, mut cadence, mut input, mut heading) in &mut query {
        if !cadence.tick(time.delta()) {
            continue;
        }
        let dir = input.0.take().unwrap_or(heading.0);
        if let Some(next) = step_target(&maze, *pos, dir) {
            *pos = next;
            heading.0 = dir;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
