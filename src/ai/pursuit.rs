//! Ghost pursuit policy.
//!
//! The ghost never follows a stored plan. Each time its cadence allows a
//! move it searches again from its own cell to the target's current cell and
//! takes only the first step of the result.

use std::time::Duration;

use bevy::prelude::*;
use micromegas_tracing::prelude::*;

use super::{find_path, Algorithm, PathOutcome};
use crate::components::{Cell, MoveCadence};
use crate::plugins::maze::MazeMap;

/// What a single call to [`Pursuer::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PursuitStep {
    /// The cadence interval has not elapsed; nothing was searched.
    Waiting,
    /// Moved one cell along a fresh path.
    Moved(Cell),
    /// Already on the target's cell.
    Arrived,
    /// No path to the target exists.
    Stalled,
    /// The first step landed on a wall; the path was dropped.
    Blocked,
}

/// State owned by one pursuing ghost.
#[derive(Component, Debug, Clone)]
pub struct Pursuer {
    position: Cell,
    cadence: MoveCadence,
    algorithm: Algorithm,
    /// Most recent search result, kept for inspection only.
    last_path: Vec<Cell>,
}

impl Pursuer {
    pub fn new(position: Cell, speed: f32, algorithm: Algorithm) -> Self {
        Self {
            position,
            cadence: MoveCadence::new(speed),
            algorithm,
            last_path: Vec::new(),
        }
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    pub fn speed(&self) -> f32 {
        self.cadence.speed()
    }

    pub fn last_path(&self) -> &[Cell] {
        &self.last_path
    }

    /// Advance the cadence by `elapsed` and, if a move is due, chase `target`.
    #[span_fn]
    pub fn step(&mut self, maze: &MazeMap, target: Cell, elapsed: Duration) -> PursuitStep {
        if !self.cadence.tick(elapsed) {
            return PursuitStep::Waiting;
        }

        let outcome = find_path(self.algorithm, maze, self.position, target);
        self.follow(maze, outcome)
    }

    /// Commit the first step of `outcome` if it lands on an open cell.
    pub(crate) fn follow(&mut self, maze: &MazeMap, outcome: PathOutcome) -> PursuitStep {
        let result = match &outcome {
            PathOutcome::AtGoal => PursuitStep::Arrived,
            PathOutcome::Unreachable => PursuitStep::Stalled,
            PathOutcome::Found(_) => match outcome.first_step().map(|c| maze.wrap(c)) {
                Some(next) if !maze.is_wall(next) => {
                    self.position = next;
                    PursuitStep::Moved(next)
                }
                _ => PursuitStep::Blocked,
            },
        };

        self.last_path = match result {
            PursuitStep::Blocked => Vec::new(),
            _ => outcome.into_steps(),
        };
        result
    }
}
