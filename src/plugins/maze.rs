//! Maze grid, generation, and per-level maze lifecycle.
//!
//! The grid is a torus: stepping off one edge re-enters on the opposite
//! edge. The generated maze is walled on its boundary except for one tunnel
//! row, so in practice only that row wraps.

use std::collections::HashSet;

use bevy::prelude::*;
use micromegas_tracing::prelude::{info, span_scope};
use pathfinding::prelude::bfs_reach;
use rand::Rng;

use crate::ai::toroidal_manhattan;
use crate::app_state::{AppState, PlayingState};
use crate::components::{Cell, Direction};
use crate::config::GameConfig;
use crate::resources::{level_config, CurrentLevel, GameRng, LevelConfig};

pub struct MazePlugin;

impl Plugin for MazePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(PlayingState::LevelIntro),
            (update_level_config, generate_maze.after(update_level_config)),
        );

        // LevelTransition despawns maze entities between levels, but leaving
        // InGame for GameOver or Won skips that path.
        app.add_systems(OnExit(AppState::InGame), despawn_maze_entities);
    }
}

// ---------------------------------------------------------------------------
// Tile types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Open,
}

impl Tile {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(Tile::Wall),
            ' ' | '.' => Some(Tile::Open),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Maze map resource
// ---------------------------------------------------------------------------

/// Read-only passability grid used by every search.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct MazeMap {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Vec<Tile>>,
}

impl MazeMap {
    /// A grid with every cell open.
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![Tile::Open; width]; height],
        }
    }

    /// Parse an ASCII maze: `#` is a wall, space or `.` is open.
    pub fn parse(text: &str) -> Result<Self, String> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.is_empty() {
            return Err("Empty maze".to_string());
        }

        let height = lines.len();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        if width == 0 {
            return Err("Maze has zero width".to_string());
        }

        let mut tiles = Vec::with_capacity(height);
        for (y, line) in lines.iter().enumerate() {
            let mut row = Vec::with_capacity(width);
            for (x, ch) in line.chars().enumerate() {
                let tile = Tile::from_char(ch).ok_or_else(|| {
                    format!("Unknown tile character '{}' at ({}, {})", ch, x, y)
                })?;
                row.push(tile);
            }
            // Pad short rows with open tiles
            row.resize(width, Tile::Open);
            tiles.push(row);
        }

        Ok(MazeMap {
            width,
            height,
            tiles,
        })
    }

    /// Whether `cell` blocks movement. Anything outside the grid is a wall.
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.tile_at(cell) != Some(Tile::Open)
    }

    /// Get the tile at a cell, or None if out of bounds. No wraparound.
    pub fn tile_at(&self, cell: Cell) -> Option<Tile> {
        if cell.x < 0 || cell.y < 0 {
            return None;
        }
        let (x, y) = (cell.x as usize, cell.y as usize);
        self.tiles.get(y).and_then(|row| row.get(x)).copied()
    }

    pub(crate) fn set_tile(&mut self, cell: Cell, tile: Tile) {
        if self.index(cell).is_some() {
            self.tiles[cell.y as usize][cell.x as usize] = tile;
        }
    }

    /// Bring any coordinate back onto the torus.
    pub fn wrap(&self, cell: Cell) -> Cell {
        Cell {
            x: cell.x.rem_euclid(self.width as i32),
            y: cell.y.rem_euclid(self.height as i32),
        }
    }

    /// Row-major index for dense per-cell arrays, or None if out of bounds.
    pub fn index(&self, cell: Cell) -> Option<usize> {
        let in_range = cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.width
            && (cell.y as usize) < self.height;
        in_range.then(|| cell.y as usize * self.width + cell.x as usize)
    }

    /// Inverse of [`MazeMap::index`].
    pub fn cell_at(&self, index: usize) -> Cell {
        Cell {
            x: (index % self.width) as i32,
            y: (index / self.width) as i32,
        }
    }

    /// Open cells one step away, wrapping at the edges.
    ///
    /// Always tested in the order +x, -x, +y, -y; search tie-breaking
    /// depends on it.
    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        Direction::SEARCH_ORDER
            .iter()
            .map(|dir| self.wrap(cell.offset(*dir)))
            .filter(|next| !self.is_wall(*next))
            .collect()
    }

    /// All open cells, row by row.
    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.width * self.height)
            .map(|i| self.cell_at(i))
            .filter(|c| !self.is_wall(*c))
    }

    /// Row whose two boundary cells are left open.
    pub fn tunnel_row(&self) -> i32 {
        (self.height / 2) as i32
    }

    pub fn player_spawn(&self) -> Cell {
        Cell::new(1, 1)
    }

    pub fn ghost_spawn(&self) -> Cell {
        Cell::new(self.width as i32 - 2, 1)
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    /// Build a random maze: a walled boundary with one tunnel row, `blocks`
    /// small wall rectangles inside, and every open cell reachable from the
    /// player spawn.
    pub fn generate(width: usize, height: usize, blocks: u32, rng: &mut impl Rng) -> Self {
        let mut maze = MazeMap::open(width, height);
        let (w, h) = (width as i32, height as i32);

        for x in 0..w {
            maze.set_tile(Cell::new(x, 0), Tile::Wall);
            maze.set_tile(Cell::new(x, h - 1), Tile::Wall);
        }
        for y in 0..h {
            maze.set_tile(Cell::new(0, y), Tile::Wall);
            maze.set_tile(Cell::new(w - 1, y), Tile::Wall);
        }

        for _ in 0..blocks {
            let start_x = rng.gen_range(2..w - 4);
            let start_y = rng.gen_range(2..h - 4);
            let block_w = rng.gen_range(1..=3);
            let block_h = rng.gen_range(1..=2);
            for bx in start_x..start_x + block_w {
                for by in start_y..start_y + block_h {
                    if (1..w - 1).contains(&bx) && (1..h - 1).contains(&by) {
                        maze.set_tile(Cell::new(bx, by), Tile::Wall);
                    }
                }
            }
        }

        let tunnel = maze.tunnel_row();
        maze.set_tile(Cell::new(0, tunnel), Tile::Open);
        maze.set_tile(Cell::new(w - 1, tunnel), Tile::Open);

        let root = maze.player_spawn();
        maze.connect_open_regions(root);
        maze
    }

    /// Carve interior walls until every open cell is reachable from `root`.
    ///
    /// Each pass opens the wall bordering the reached region that is closest
    /// to a stranded cell; a single wall between two regions is always
    /// chosen first.
    fn connect_open_regions(&mut self, root: Cell) {
        let (w, h) = (self.width as i32, self.height as i32);
        for _ in 0..self.width * self.height {
            let reached: HashSet<Cell> = bfs_reach(root, |c| self.neighbors(*c)).collect();
            let stranded: Vec<Cell> = self.open_cells().filter(|c| !reached.contains(c)).collect();
            if stranded.is_empty() {
                return;
            }

            let carve = (1..h - 1)
                .flat_map(|y| (1..w - 1).map(move |x| Cell::new(x, y)))
                .filter(|c| self.is_wall(*c))
                .filter(|c| {
                    Direction::SEARCH_ORDER
                        .iter()
                        .any(|d| reached.contains(&self.wrap(c.offset(*d))))
                })
                .min_by_key(|c| {
                    stranded
                        .iter()
                        .map(|s| toroidal_manhattan(*c, *s, self.width, self.height))
                        .min()
                        .unwrap_or(u32::MAX)
                });

            match carve {
                Some(cell) => self.set_tile(cell, Tile::Open),
                None => return,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Marker components
// ---------------------------------------------------------------------------

/// Marker for entities that belong to the current maze (despawned on level transition).
#[derive(Component, Debug)]
pub struct MazeEntity;

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Insert LevelConfig for the current level, honoring an algorithm override.
fn update_level_config(
    mut commands: Commands,
    level: Res<CurrentLevel>,
    config: Res<GameConfig>,
) {
    let mut level_cfg = level_config(level.0);
    if let Some(algorithm) = config.algorithm {
        level_cfg.algorithm = algorithm;
    }
    commands.insert_resource(level_cfg);
}

/// Generate a fresh maze for the current level.
pub fn generate_maze(
    mut commands: Commands,
    config: Res<GameConfig>,
    level_cfg: Res<LevelConfig>,
    mut rng: ResMut<GameRng>,
) {
    span_scope!("maze_generate");
    let maze = MazeMap::generate(config.width, config.height, level_cfg.wall_blocks, &mut rng.0);
    info!(
        "maze generated: level {} ({}x{}, {} open cells)",
        level_cfg.level,
        maze.width,
        maze.height,
        maze.open_cells().count()
    );
    commands.insert_resource(maze);
}

/// Despawn all maze entities and drop the level's resources.
pub fn despawn_maze_entities(mut commands: Commands, query: Query<Entity, With<MazeEntity>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<MazeMap>();
    commands.remove_resource::<LevelConfig>();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
