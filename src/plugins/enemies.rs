//! Ghost spawning, per-frame pursuit, and catching the player.

use bevy::prelude::*;
use micromegas_tracing::prelude::{imetric, span_scope};

use crate::ai::{Pursuer, PursuitStep};
use crate::app_state::{AppState, PlayingState};
use crate::components::*;
use crate::events::PlayerCaught;
use crate::plugins::maze::{generate_maze, MazeEntity, MazeMap};
use crate::plugins::telemetry::GameSet;
use crate::resources::{GameStats, LevelConfig};

pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(PlayingState::LevelIntro),
            spawn_ghost.after(generate_maze),
        );
        app.add_systems(
            Update,
            ghost_pursuit
                .in_set(GameSet::Pursuit)
                .run_if(in_state(PlayingState::Playing)),
        );
        app.add_systems(
            Update,
            ghost_catches_player
                .in_set(GameSet::Catch)
                .run_if(in_state(PlayingState::Playing)),
        );
    }
}

/// Spawn the ghost at its spawn cell with this level's speed and search.
pub fn spawn_ghost(mut commands: Commands, maze: Res<MazeMap>, config: Res<LevelConfig>) {
    let spawn = maze.ghost_spawn();
    commands.spawn((
        Ghost,
        spawn,
        Pursuer::new(spawn, config.ghost_speed, config.algorithm),
        MazeEntity,
    ));
}

/// Step every ghost toward the player's current cell.
#[allow(clippy::type_complexity)]
fn ghost_pursuit(
    time: Res<Time>,
    maze: Res<MazeMap>,
    player_query: Query<&Cell, (With<Player>, Without<Ghost>)>,
    mut ghost_query: Query<(&mut Pursuer, &mut Cell), (With<Ghost>, Without<Player>)>,
    mut stats: ResMut<GameStats>,
) {
    span_scope!("ghost_pursuit");

    let Ok(target) = player_query.single() else {
        return;
    };

    for (mut pursuer, mut cell) in &mut ghost_query {
        let step = pursuer.step(&maze, *target, time.delta());
        if step == PursuitStep::Waiting {
            continue;
        }
        imetric!("ghost_path_len", "cells", pursuer.last_path().len() as u64);
        if let PursuitStep::Moved(next) = step {
            *cell = next;
            stats.ghost_moves += 1;
        }
    }
}

/// A ghost on the player's cell ends the game.
#[allow(clippy::type_complexity)]
fn ghost_catches_player(
    mut commands: Commands,
    player_query: Query<&Cell, (With<Player>, Without<Ghost>)>,
    ghost_query: Query<&Cell, (With<Ghost>, Without<Player>)>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Ok(player_pos) = player_query.single() else {
        return;
    };
    if ghost_query.iter().any(|ghost_pos| ghost_pos == player_pos) {
        commands.trigger(PlayerCaught);
        next_state.set(AppState::GameOver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Algorithm;
    use crate::resources::level_config;
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn setup_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(StatesPlugin);
        app.init_state::<AppState>();
        app.add_sub_state::<PlayingState>();
        app.init_resource::<GameStats>();
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.insert_resource(
            MazeMap::parse("#######\n#     #\n#     #\n#     #\n#######").unwrap(),
        );
        app.insert_resource(level_config(1));
        app.add_systems(
            Update,
            (ghost_pursuit, ghost_catches_player.after(ghost_pursuit))
                .run_if(in_state(PlayingState::Playing)),
        );

        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::InGame);
        for _ in 0..3 {
            app.update();
        }
        app.world_mut()
            .resource_mut::<NextState<PlayingState>>()
            .set(PlayingState::Playing);
        app.update();
        app
    }

    fn spawn_pair(app: &mut App, ghost_at: Cell, player_at: Cell, speed: f32) -> (Entity, Entity) {
        let ghost = app
            .world_mut()
            .spawn((Ghost, ghost_at, Pursuer::new(ghost_at, speed, Algorithm::Bfs)))
            .id();
        let player = app.world_mut().spawn((Player, player_at)).id();
        (ghost, player)
    }

    #[test]
    fn ghost_cell_tracks_pursuer() {
        let mut app = setup_app();
        let (ghost, _) = spawn_pair(&mut app, Cell::new(5, 1), Cell::new(1, 3), 4.0);

        for _ in 0..5 {
            app.update();
        }

        let entity = app.world().entity(ghost);
        let cell = *entity.get::<Cell>().unwrap();
        assert_ne!(cell, Cell::new(5, 1));
        assert_eq!(cell, entity.get::<Pursuer>().unwrap().position());
        assert!(app.world().resource::<GameStats>().ghost_moves >= 1);
    }

    #[test]
    fn slow_ghost_waits() {
        let mut app = setup_app();
        // One move per ten seconds; a few 100ms frames are not enough.
        let (ghost, _) = spawn_pair(&mut app, Cell::new(5, 1), Cell::new(1, 3), 0.1);

        for _ in 0..5 {
            app.update();
        }

        assert_eq!(*app.world().entity(ghost).get::<Cell>().unwrap(), Cell::new(5, 1));
        assert_eq!(app.world().resource::<GameStats>().ghost_moves, 0);
    }

    #[test]
    fn ghost_reaches_player_and_ends_game() {
        let mut app = setup_app();
        spawn_pair(&mut app, Cell::new(3, 1), Cell::new(1, 1), 10.0);

        for _ in 0..20 {
            app.update();
        }

        let state = app.world().resource::<State<AppState>>();
        assert_eq!(*state.get(), AppState::GameOver);
    }

    #[test]
    fn same_cell_triggers_game_over() {
        let mut app = setup_app();
        spawn_pair(&mut app, Cell::new(2, 2), Cell::new(2, 2), 0.0);

        app.update();
        app.update();

        let state = app.world().resource::<State<AppState>>();
        assert_eq!(*state.get(), AppState::GameOver);
    }
}
