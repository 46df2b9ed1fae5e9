use std::time::Duration;

use bevy::prelude::*;

// ---------------------------------------------------------------------------
// Grid and spatial
// ---------------------------------------------------------------------------

/// A grid coordinate. Equality is structural; there is no other identity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step away in `dir`, before any wraparound.
    pub fn offset(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Cardinal direction for movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Expansion order used by every search: +x, -x, +y, -y.
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    /// Grid offset for this direction. +y points down.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// Time gate for discrete grid movement.
///
/// `speed` is in moves per second. Elapsed frame time accumulates until it
/// reaches `1 / speed`; at that point one move attempt is allowed and the
/// accumulator starts over from zero, whether or not the attempt moved.
#[derive(Component, Debug, Clone)]
pub struct MoveCadence {
    speed: f32,
    accumulated: Duration,
}

impl MoveCadence {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            accumulated: Duration::ZERO,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Time between move attempts, or `None` when the speed never moves.
    pub fn interval(&self) -> Option<Duration> {
        if self.speed > 0.0 {
            Duration::try_from_secs_f32(1.0 / self.speed).ok()
        } else {
            None
        }
    }

    /// Accumulate `elapsed` and report whether a move attempt is due now.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let Some(interval) = self.interval() else {
            return false;
        };
        self.accumulated += elapsed;
        if self.accumulated < interval {
            return false;
        }
        self.accumulated = Duration::ZERO;
        true
    }
}

/// Buffered input direction (player only). Consumed by the next move attempt.
#[derive(Component, Debug, Default)]
pub struct InputDirection(pub Option<Direction>);

/// Direction the player keeps moving in when no input is buffered.
#[derive(Component, Debug, Clone, Copy)]
pub struct Heading(pub Direction);

// ---------------------------------------------------------------------------
// Entity markers
// ---------------------------------------------------------------------------

#[derive(Component, Debug)]
pub struct Player;

#[derive(Component, Debug)]
pub struct Ghost;

#[derive(Component, Debug)]
pub struct Food;

/// Bonus collectible. Worth more than food.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fruit {
    Cherry,
    Strawberry,
    Orange,
}

impl Fruit {
    pub const ALL: [Fruit; 3] = [Fruit::Cherry, Fruit::Strawberry, Fruit::Orange];

    pub fn points(&self) -> u64 {
        match self {
            Fruit::Cherry => 10,
            Fruit::Strawberry => 20,
            Fruit::Orange => 30,
        }
    }
}
