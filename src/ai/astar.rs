//! Heuristic best-first search (A*) over the wraparound maze.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use micromegas_tracing::prelude::*;

use super::heuristic::toroidal_manhattan;
use super::{reconstruct, PathOutcome};
use crate::components::Cell;
use crate::plugins::maze::MazeMap;

/// Frontier entry. Ordered by estimate, then by push order, so equal
/// estimates come out first-in first-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Frontier {
    estimate: u32,
    seq: u64,
    index: usize,
}

/// Cost-optimal path from `start` to `goal` under unit step cost.
///
/// Costs are only ever lowered by pushing a fresh frontier entry; entries
/// whose estimate is worse than the cell's current best are skipped when
/// popped.
#[span_fn]
pub fn astar(maze: &MazeMap, start: Cell, goal: Cell) -> PathOutcome {
    if start == goal {
        return PathOutcome::AtGoal;
    }
    let (Some(start_idx), Some(_)) = (maze.index(start), maze.index(goal)) else {
        return PathOutcome::Unreachable;
    };

    let h = |cell: Cell| toroidal_manhattan(cell, goal, maze.width, maze.height);

    let cell_count = maze.width * maze.height;
    let mut best_cost = vec![u32::MAX; cell_count];
    let mut came_from: Vec<Option<Cell>> = vec![None; cell_count];
    let mut frontier = BinaryHeap::new();
    let mut seq = 0u64;

    best_cost[start_idx] = 0;
    frontier.push(Reverse(Frontier {
        estimate: h(start),
        seq,
        index: start_idx,
    }));

    while let Some(Reverse(entry)) = frontier.pop() {
        let current = maze.cell_at(entry.index);
        let cost = best_cost[entry.index];

        if entry.estimate > cost.saturating_add(h(current)) {
            continue;
        }

        if current == goal {
            return PathOutcome::Found(reconstruct(maze, &came_from, start, goal));
        }

        let tentative = cost + 1;
        for next in maze.neighbors(current) {
            let Some(i) = maze.index(next) else { continue };
            if tentative < best_cost[i] {
                came_from[i] = Some(current);
                best_cost[i] = tentative;
                seq += 1;
                frontier.push(Reverse(Frontier {
                    estimate: tentative + h(next),
                    seq,
                    index: i,
                }));
            }
        }
    }

    PathOutcome::Unreachable
}
