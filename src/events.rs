//! Game events triggered by gameplay systems and observed by telemetry.

use bevy::prelude::*;

use crate::components::Fruit;

#[derive(Event)]
pub struct FoodEaten;

#[derive(Event)]
pub struct FruitEaten(pub Fruit);

/// The pursuer reached the player's cell.
#[derive(Event)]
pub struct PlayerCaught;
