//! Frame-level telemetry and the per-frame system ordering of the game loop.

use bevy::prelude::*;
use micromegas_tracing::prelude::{fmetric, imetric, info, span_scope};

use crate::events::{FoodEaten, FruitEaten, PlayerCaught};
use crate::resources::GameStats;

/// Per-frame stages while playing, run in declaration order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    Input,
    Player,
    Pursuit,
    Collect,
    Catch,
}

pub struct TelemetryPlugin;

impl Plugin for TelemetryPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                GameSet::Input,
                GameSet::Player,
                GameSet::Pursuit,
                GameSet::Collect,
                GameSet::Catch,
            )
                .chain(),
        );
        app.add_systems(Last, frame_telemetry);
        app.add_observer(on_food_eaten);
        app.add_observer(on_fruit_eaten);
        app.add_observer(on_player_caught);
    }
}

fn frame_telemetry(time: Res<Time>) {
    span_scope!("frame");
    let dt_ms = time.delta_secs_f64() * 1000.0;
    fmetric!("frame_time_ms", "ms", dt_ms);
}

fn on_food_eaten(_trigger: On<FoodEaten>, stats: Option<ResMut<GameStats>>) {
    if let Some(mut stats) = stats {
        stats.food_eaten += 1;
        imetric!("food_eaten", "count", stats.food_eaten);
    }
}

fn on_fruit_eaten(trigger: On<FruitEaten>, stats: Option<ResMut<GameStats>>) {
    let fruit = trigger.event().0;
    info!("fruit eaten: {:?} (+{})", fruit, fruit.points());
    if let Some(mut stats) = stats {
        stats.fruit_eaten += 1;
        imetric!("fruit_eaten", "count", stats.fruit_eaten);
    }
}

fn on_player_caught(_trigger: On<PlayerCaught>, stats: Option<Res<GameStats>>) {
    let ghost_moves = stats.map(|s| s.ghost_moves).unwrap_or_default();
    info!("player caught after {} ghost moves", ghost_moves);
}
