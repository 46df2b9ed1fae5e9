//! Search and pursuit properties checked on generated mazes, with the
//! `pathfinding` crate as an independent shortest-path oracle.

use std::time::Duration;

use maze_chase::ai::{astar, bfs, find_path, toroidal_manhattan, Algorithm, PathOutcome, Pursuer, PursuitStep};
use maze_chase::components::Cell;
use maze_chase::plugins::maze::MazeMap;
use maze_chase::resources::{level_config, MAX_LEVEL};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const PAIRS_PER_MAZE: usize = 40;

fn tunnel_box() -> MazeMap {
    MazeMap::parse("#####\n#   #\n     \n#   #\n#####").unwrap()
}

fn generated_mazes() -> Vec<MazeMap> {
    let mut mazes = Vec::new();
    for seed in 0..6u64 {
        for level in 1..=MAX_LEVEL {
            let mut rng = StdRng::seed_from_u64(seed * 31 + level as u64);
            mazes.push(MazeMap::generate(30, 22, level_config(level).wall_blocks, &mut rng));
        }
    }
    mazes
}

fn sample_pairs(maze: &MazeMap, seed: u64) -> Vec<(Cell, Cell)> {
    let open: Vec<Cell> = maze.open_cells().collect();
    let mut rng = StdRng::seed_from_u64(seed);
    (0..PAIRS_PER_MAZE)
        .map(|_| {
            let start = *open.choose(&mut rng).unwrap();
            let goal = *open.choose(&mut rng).unwrap();
            (start, goal)
        })
        .collect()
}

/// Step count of a shortest route, from the reference implementation.
fn oracle_len(maze: &MazeMap, start: Cell, goal: Cell) -> Option<usize> {
    pathfinding::prelude::bfs(&start, |c| maze.neighbors(*c), |c| *c == goal)
        .map(|route| route.len() - 1)
}

fn assert_walkable(maze: &MazeMap, start: Cell, goal: Cell, steps: &[Cell]) {
    assert_eq!(steps.last(), Some(&goal));
    let mut prev = start;
    for step in steps {
        assert!(!maze.is_wall(*step), "path crosses wall at {:?}", step);
        assert!(
            maze.neighbors(prev).contains(step),
            "{:?} is not adjacent to {:?}",
            step,
            prev
        );
        prev = *step;
    }
}

#[test]
fn same_cell_needs_no_steps() {
    for maze in generated_mazes() {
        for cell in maze.open_cells().take(25) {
            assert_eq!(bfs(&maze, cell, cell), PathOutcome::AtGoal);
            assert_eq!(astar(&maze, cell, cell), PathOutcome::AtGoal);
            assert!(bfs(&maze, cell, cell).steps().is_empty());
        }
    }
}

#[test]
fn both_searches_are_shortest() {
    for (i, maze) in generated_mazes().iter().enumerate() {
        for (start, goal) in sample_pairs(maze, i as u64) {
            let expected = oracle_len(maze, start, goal).expect("generated mazes are connected");
            let by_bfs = bfs(maze, start, goal);
            let by_astar = astar(maze, start, goal);
            assert_eq!(by_bfs.steps().len(), expected, "bfs {:?} -> {:?}", start, goal);
            assert_eq!(by_astar.steps().len(), expected, "astar {:?} -> {:?}", start, goal);
        }
    }
}

#[test]
fn paths_are_open_and_adjacent() {
    for (i, maze) in generated_mazes().iter().enumerate() {
        for (start, goal) in sample_pairs(maze, 100 + i as u64) {
            if start == goal {
                continue;
            }
            for algorithm in [Algorithm::Bfs, Algorithm::AStar] {
                let outcome = find_path(algorithm, maze, start, goal);
                assert!(matches!(outcome, PathOutcome::Found(_)));
                assert_walkable(maze, start, goal, outcome.steps());
            }
        }
    }
}

#[test]
fn searches_are_idempotent() {
    for (i, maze) in generated_mazes().iter().enumerate() {
        for (start, goal) in sample_pairs(maze, 200 + i as u64).into_iter().take(10) {
            assert_eq!(bfs(maze, start, goal), bfs(maze, start, goal));
            assert_eq!(astar(maze, start, goal), astar(maze, start, goal));
        }
    }
}

#[test]
fn heuristic_is_exact_on_open_torus() {
    let maze = MazeMap::open(7, 5);
    let cells: Vec<Cell> = maze.open_cells().collect();
    for &a in &cells {
        for &b in &cells {
            let h = toroidal_manhattan(a, b, maze.width, maze.height) as usize;
            assert_eq!(h, bfs(&maze, a, b).steps().len(), "{:?} -> {:?}", a, b);
            assert_eq!(h == 0, a == b);
        }
    }
}

#[test]
fn heuristic_never_overestimates_with_walls() {
    for (i, maze) in generated_mazes().iter().enumerate() {
        for (start, goal) in sample_pairs(maze, 300 + i as u64) {
            let h = toroidal_manhattan(start, goal, maze.width, maze.height) as usize;
            assert!(h <= bfs(maze, start, goal).steps().len());
        }
    }
}

#[test]
fn bfs_crosses_the_open_box() {
    let maze = tunnel_box();
    assert_eq!(
        bfs(&maze, Cell::new(1, 1), Cell::new(3, 1)).steps(),
        &[Cell::new(2, 1), Cell::new(3, 1)]
    );
}

#[test]
fn astar_goes_straight_down() {
    let maze = tunnel_box();
    assert_eq!(
        astar(&maze, Cell::new(1, 1), Cell::new(1, 3)).steps(),
        &[Cell::new(1, 2), Cell::new(1, 3)]
    );
}

#[test]
fn only_route_is_the_tunnel() {
    let maze = MazeMap::parse("#####\n#####\n  #  \n#####\n#####").unwrap();
    for algorithm in [Algorithm::Bfs, Algorithm::AStar] {
        let outcome = find_path(algorithm, &maze, Cell::new(1, 2), Cell::new(3, 2));
        assert_eq!(
            outcome.steps(),
            &[Cell::new(0, 2), Cell::new(4, 2), Cell::new(3, 2)]
        );
    }
}

#[test]
fn pursuer_holds_before_interval() {
    let maze = tunnel_box();
    for speed in [1.0_f32, 3.0, 5.0, 10.0] {
        let mut ghost = Pursuer::new(Cell::new(3, 3), speed, Algorithm::AStar);
        let just_short = Duration::from_secs_f32(0.9 / speed);
        assert_eq!(
            ghost.step(&maze, Cell::new(1, 1), just_short),
            PursuitStep::Waiting
        );
        assert_eq!(ghost.position(), Cell::new(3, 3));
    }
}

#[test]
fn pursuer_closes_in_on_generated_maze() {
    let mut rng = StdRng::seed_from_u64(11);
    let maze = MazeMap::generate(30, 22, level_config(3).wall_blocks, &mut rng);
    let target = maze.player_spawn();
    let mut ghost = Pursuer::new(maze.ghost_spawn(), 5.0, Algorithm::AStar);
    let mut remaining = oracle_len(&maze, ghost.position(), target).unwrap();

    while remaining > 0 {
        let step = ghost.step(&maze, target, Duration::from_millis(250));
        assert!(matches!(step, PursuitStep::Moved(_)));
        let now = oracle_len(&maze, ghost.position(), target).unwrap();
        assert_eq!(now + 1, remaining);
        remaining = now;
    }
    assert_eq!(
        ghost.step(&maze, target, Duration::from_millis(250)),
        PursuitStep::Arrived
    );
}
