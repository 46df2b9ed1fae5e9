//! Ghost pursuit: shortest-path search over the wraparound maze and the
//! per-tick policy that turns a path into a single step.

pub mod astar;
pub mod bfs;
pub mod heuristic;
pub mod pursuit;

use serde::{Deserialize, Serialize};

use crate::components::Cell;
use crate::plugins::maze::MazeMap;

pub use astar::astar;
pub use bfs::bfs;
pub use heuristic::toroidal_manhattan;
pub use pursuit::{Pursuer, PursuitStep};

/// Which search the ghost runs every time it steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bfs,
    AStar,
}

impl Algorithm {
    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "BFS",
            Algorithm::AStar => "ASTAR",
        }
    }
}

/// Result of a single-source, single-goal search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    /// Start and goal are the same cell; zero moves needed.
    AtGoal,
    /// Steps from (excluding) start to (including) goal. Never empty.
    Found(Vec<Cell>),
    /// The search exhausted without reaching the goal.
    Unreachable,
}

impl PathOutcome {
    /// The path as a plain step list; empty unless `Found`.
    pub fn steps(&self) -> &[Cell] {
        match self {
            PathOutcome::Found(steps) => steps,
            PathOutcome::AtGoal | PathOutcome::Unreachable => &[],
        }
    }

    pub fn into_steps(self) -> Vec<Cell> {
        match self {
            PathOutcome::Found(steps) => steps,
            PathOutcome::AtGoal | PathOutcome::Unreachable => Vec::new(),
        }
    }

    pub fn first_step(&self) -> Option<Cell> {
        self.steps().first().copied()
    }
}

/// Run the selected search from `start` to `goal`.
pub fn find_path(algorithm: Algorithm, maze: &MazeMap, start: Cell, goal: Cell) -> PathOutcome {
    match algorithm {
        Algorithm::Bfs => bfs(maze, start, goal),
        Algorithm::AStar => astar(maze, start, goal),
    }
}

/// Walk predecessor links back from `goal`, then reverse. `start` is left out.
///
/// `came_from` is indexed by `MazeMap::index`; every link on the chain from
/// `goal` must lead back to `start`.
fn reconstruct(maze: &MazeMap, came_from: &[Option<Cell>], start: Cell, goal: Cell) -> Vec<Cell> {
    let mut steps = Vec::new();
    let mut current = goal;
    while current != start {
        steps.push(current);
        match maze.index(current).and_then(|i| came_from[i]) {
            Some(prev) => current = prev,
            None => break,
        }
    }
    steps.reverse();
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_steps() {
        assert!(PathOutcome::AtGoal.steps().is_empty());
        assert!(PathOutcome::Unreachable.steps().is_empty());
        let found = PathOutcome::Found(vec![Cell::new(1, 0), Cell::new(2, 0)]);
        assert_eq!(found.first_step(), Some(Cell::new(1, 0)));
        assert_eq!(found.into_steps().len(), 2);
    }

    #[test]
    fn algorithm_serde_names() {
        assert_eq!(serde_json::to_string(&Algorithm::Bfs).unwrap(), "\"bfs\"");
        assert_eq!(serde_json::to_string(&Algorithm::AStar).unwrap(), "\"astar\"");
        let parsed: Algorithm = serde_json::from_str("\"astar\"").unwrap();
        assert_eq!(parsed, Algorithm::AStar);
    }

    #[test]
    fn dispatch_matches_direct_calls() {
        let maze = MazeMap::parse("#####\n#   #\n     \n#   #\n#####").unwrap();
        let (start, goal) = (Cell::new(1, 1), Cell::new(3, 3));
        assert_eq!(find_path(Algorithm::Bfs, &maze, start, goal), bfs(&maze, start, goal));
        assert_eq!(find_path(Algorithm::AStar, &maze, start, goal), astar(&maze, start, goal));
    }
}
