//! Breadth-first search over the wraparound maze.

use std::collections::VecDeque;

use micromegas_tracing::prelude::*;

use super::{reconstruct, PathOutcome};
use crate::components::Cell;
use crate::plugins::maze::MazeMap;

/// Shortest path by step count from `start` to `goal`.
///
/// Each cell's predecessor is recorded the first time it is discovered, and
/// the goal is only accepted when it comes off the queue. Among several
/// shortest paths the one favoured by the +x, -x, +y, -y neighbor order wins.
#[span_fn]
pub fn bfs(maze: &MazeMap, start: Cell, goal: Cell) -> PathOutcome {
    if start == goal {
        return PathOutcome::AtGoal;
    }
    let (Some(start_idx), Some(_)) = (maze.index(start), maze.index(goal)) else {
        return PathOutcome::Unreachable;
    };

    let cell_count = maze.width * maze.height;
    let mut visited = vec![false; cell_count];
    let mut came_from: Vec<Option<Cell>> = vec![None; cell_count];
    let mut queue = VecDeque::new();

    visited[start_idx] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            return PathOutcome::Found(reconstruct(maze, &came_from, start, goal));
        }
        for next in maze.neighbors(current) {
            let Some(i) = maze.index(next) else { continue };
            if visited[i] {
                continue;
            }
            visited[i] = true;
            came_from[i] = Some(current);
            queue.push_back(next);
        }
    }

    PathOutcome::Unreachable
}
