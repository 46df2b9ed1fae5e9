//! Headless input provider: steers the player toward the nearest collectible.
//!
//! Writes `InputDirection` only when the buffer is empty, so any other input
//! source that fills it first takes precedence.

use std::collections::HashSet;

use bevy::prelude::*;
use pathfinding::prelude::bfs;
use rand::seq::SliceRandom;

use crate::app_state::PlayingState;
use crate::components::{Cell, Direction, Food, Fruit, Ghost, InputDirection, Player};
use crate::plugins::maze::MazeMap;
use crate::plugins::player::step_target;
use crate::plugins::telemetry::GameSet;
use crate::resources::GameRng;

pub struct AutopilotPlugin;

impl Plugin for AutopilotPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            autopilot_input
                .in_set(GameSet::Input)
                .run_if(in_state(PlayingState::Playing)),
        );
    }
}

/// Cells the player should not step into: each ghost and its neighbors.
pub fn danger_zone(maze: &MazeMap, ghosts: impl IntoIterator<Item = Cell>) -> HashSet<Cell> {
    let mut danger = HashSet::new();
    for ghost in ghosts {
        danger.insert(ghost);
        danger.extend(maze.neighbors(ghost));
    }
    danger
}

/// Direction whose single wrapped step turns `from` into `to`.
pub fn direction_between(maze: &MazeMap, from: Cell, to: Cell) -> Option<Direction> {
    Direction::SEARCH_ORDER
        .into_iter()
        .find(|dir| maze.wrap(from.offset(*dir)) == to)
}

/// First direction of a shortest safe route to any of `targets`.
pub fn plan_direction(
    maze: &MazeMap,
    from: Cell,
    targets: &HashSet<Cell>,
    danger: &HashSet<Cell>,
) -> Option<Direction> {
    let route = bfs(
        &from,
        |cell| {
            maze.neighbors(*cell)
                .into_iter()
                .filter(|next| !danger.contains(next))
                .collect::<Vec<_>>()
        },
        |cell| targets.contains(cell),
    )?;
    let next = *route.get(1)?;
    direction_between(maze, from, next)
}

#[allow(clippy::type_complexity)]
fn autopilot_input(
    maze: Res<MazeMap>,
    mut rng: ResMut<GameRng>,
    mut player_query: Query<(&Cell, &mut InputDirection), With<Player>>,
    ghost_query: Query<&Cell, (With<Ghost>, Without<Player>)>,
    food_query: Query<&Cell, (With<Food>, Without<Player>)>,
    fruit_query: Query<&Cell, (With<Fruit>, Without<Player>)>,
) {
    let Ok((pos, mut input)) = player_query.single_mut() else {
        return;
    };
    if input.0.is_some() {
        return;
    }

    let targets: HashSet<Cell> = food_query.iter().chain(fruit_query.iter()).copied().collect();
    let danger = danger_zone(&maze, ghost_query.iter().copied());

    if let Some(dir) = plan_direction(&maze, *pos, &targets, &danger) {
        input.0 = Some(dir);
        return;
    }

    // No safe route: wander to any open neighbor, preferring safe ones.
    let open: Vec<Direction> = Direction::SEARCH_ORDER
        .into_iter()
        .filter(|dir| step_target(&maze, *pos, *dir).is_some())
        .collect();
    let safe: Vec<Direction> = open
        .iter()
        .copied()
        .filter(|dir| {
            step_target(&maze, *pos, *dir).is_some_and(|cell| !danger.contains(&cell))
        })
        .collect();
    let choices = if safe.is_empty() { &open } else { &safe };
    input.0 = choices.choose(&mut rng.0).copied();
}
