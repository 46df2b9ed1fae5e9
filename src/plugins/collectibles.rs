//! Collectible systems: food and fruit placement, eating, and level clearing.

use bevy::prelude::*;
use micromegas_tracing::prelude::{info, span_fn, span_scope};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::app_state::PlayingState;
use crate::components::{Cell, Food, Fruit, Player};
use crate::events::{FoodEaten, FruitEaten};
use crate::plugins::maze::{generate_maze, MazeEntity, MazeMap};
use crate::plugins::telemetry::GameSet;
use crate::resources::{GameRng, LevelConfig, Score};

/// Points for one food pellet.
pub const FOOD_POINTS: u64 = 1;

pub struct CollectiblePlugin;

impl Plugin for CollectiblePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(PlayingState::LevelIntro),
            spawn_collectibles.after(generate_maze),
        );
        app.add_systems(
            Update,
            (eat_collectibles, check_level_cleared.after(eat_collectibles))
                .in_set(GameSet::Collect)
                .run_if(in_state(PlayingState::Playing)),
        );
    }
}

/// How many fruit fit among `free_cells`, the open cells other than spawns.
pub fn fruit_capacity(fruit_count: usize, free_cells: usize) -> usize {
    fruit_count.min(free_cells / 10)
}

/// Fill every open cell except the spawns with food, then swap a random
/// sample of them for fruit.
#[span_fn]
pub fn spawn_collectibles(
    mut commands: Commands,
    maze: Res<MazeMap>,
    config: Res<LevelConfig>,
    mut rng: ResMut<GameRng>,
) {
    let spawns = [maze.player_spawn(), maze.ghost_spawn()];
    let cells: Vec<Cell> = maze
        .open_cells()
        .filter(|cell| !spawns.contains(cell))
        .collect();

    let total = cells.len();
    let fruit_total = fruit_capacity(config.fruit_count, total);
    let fruit_cells: Vec<Cell> = cells
        .choose_multiple(&mut rng.0, fruit_total)
        .copied()
        .collect();

    for &cell in &fruit_cells {
        let kind = Fruit::ALL[rng.0.gen_range(0..Fruit::ALL.len())];
        commands.spawn((kind, cell, MazeEntity));
    }
    for cell in cells.into_iter().filter(|c| !fruit_cells.contains(c)) {
        commands.spawn((Food, cell, MazeEntity));
    }

    info!(
        "collectibles placed: {} fruit, {} food",
        fruit_cells.len(),
        total - fruit_cells.len()
    );
}

/// Despawn whatever the player is standing on and award its points.
fn eat_collectibles(
    mut commands: Commands,
    mut score: ResMut<Score>,
    player_query: Query<&Cell, With<Player>>,
    food_query: Query<(Entity, &Cell), With<Food>>,
    fruit_query: Query<(Entity, &Cell, &Fruit)>,
) {
    let Ok(player_pos) = player_query.single() else {
        return;
    };

    for (entity, pos) in &food_query {
        if pos == player_pos {
            commands.entity(entity).despawn();
            score.0 += FOOD_POINTS;
            commands.trigger(FoodEaten);
        }
    }
    for (entity, pos, fruit) in &fruit_query {
        if pos == player_pos {
            commands.entity(entity).despawn();
            score.0 += fruit.points();
            commands.trigger(FruitEaten(*fruit));
        }
    }
}

/// With no food and no fruit left, the level is cleared.
fn check_level_cleared(
    food_query: Query<(), With<Food>>,
    fruit_query: Query<(), With<Fruit>>,
    mut next_state: ResMut<NextState<PlayingState>>,
) {
    if food_query.is_empty() && fruit_query.is_empty() {
        next_state.set(PlayingState::LevelCleared);
    }
}
