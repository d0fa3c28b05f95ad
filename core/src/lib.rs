#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Escape engine.
//!
//! This crate defines the vocabulary that connects the pure systems
//! (generation, pathfinding, placement, turn resolution) with the world
//! crate that owns the level lifecycle. Systems consume and produce these
//! values; the world crate assembles them into [`GameState`] snapshots and
//! hands fresh snapshots back to callers after every resolved turn.

use std::collections::HashSet;

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Points granted to the player when a fresh level starts.
pub const STARTING_POINTS: i32 = 100;

/// Points deducted for every accepted player step.
pub const STEP_COST: i32 = 1;

/// Points granted when the player walks onto a coin.
pub const COIN_BONUS: i32 = 25;

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

/// Cardinal movement directions available to the player and to monsters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All four cardinal directions in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Returns the cell one step away in this direction.
    ///
    /// Steps that would leave the non-negative coordinate range yield `None`;
    /// the upper grid bound is the maze's concern, not the coordinate's.
    #[must_use]
    pub fn step(self, from: CellCoord) -> Option<CellCoord> {
        match self {
            Direction::North => from
                .row()
                .checked_sub(1)
                .map(|row| CellCoord::new(from.column(), row)),
            Direction::East => from
                .column()
                .checked_add(1)
                .map(|column| CellCoord::new(column, from.row())),
            Direction::South => from
                .row()
                .checked_add(1)
                .map(|row| CellCoord::new(from.column(), row)),
            Direction::West => from
                .column()
                .checked_sub(1)
                .map(|column| CellCoord::new(column, from.row())),
        }
    }
}

/// Contents of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Impassable cell that blocks movement and sight.
    Wall,
    /// Open cell that entities may occupy.
    Floor,
}

/// Dense rectangular grid of [`Tile`] values describing one level's layout.
///
/// Dimensions are always odd in both axes so that lattice cells sit on odd
/// coordinates with carvable walls between them; the generation system relies
/// on this to guarantee full connectivity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl Maze {
    /// Creates a maze of the provided dimensions with every cell walled.
    #[must_use]
    pub fn filled_with_walls(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            tiles: vec![Tile::Wall; capacity],
        }
    }

    /// Number of columns contained in the maze.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the maze.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies within the maze bounds.
    #[must_use]
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Returns the tile stored at the provided cell, if it is in bounds.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell).and_then(|index| self.tiles.get(index)).copied()
    }

    /// Reports whether the cell is open floor. Out-of-bounds cells are not.
    #[must_use]
    pub fn is_floor(&self, cell: CellCoord) -> bool {
        matches!(self.tile(cell), Some(Tile::Floor))
    }

    /// Opens the provided cell to floor. Out-of-bounds cells are ignored.
    pub fn carve(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.tiles.get_mut(index) {
                *slot = Tile::Floor;
            }
        }
    }

    /// Iterates over every floor cell in row-major order.
    pub fn floor_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let columns = self.columns;
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile == Tile::Floor)
            .map(move |(index, _)| {
                let index = u32::try_from(index).unwrap_or(u32::MAX);
                CellCoord::new(index % columns, index / columns)
            })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Lifecycle phase of a single level instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// The level is live and accepts player moves.
    Playing,
    /// The player reached the exit while holding the key. Terminal.
    Won,
    /// The player ran out of points or was caught by a monster. Terminal.
    Lost,
}

/// Difficulty-derived sizing and population parameters for one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelParameters {
    level: u32,
    columns: u32,
    rows: u32,
    trees: u32,
    rocks: u32,
    monsters: u32,
    coins: u32,
}

impl LevelParameters {
    /// Derives the parameters for the provided level number.
    ///
    /// Levels below one are clamped to one. The maze side length grows by two
    /// cells per level from 13 up to a cap of 41, staying odd throughout, and
    /// every population count is monotonically non-decreasing with its own
    /// cap.
    #[must_use]
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        let side = 13_u32.saturating_add((level - 1).saturating_mul(2)).min(41);
        Self {
            level,
            columns: side,
            rows: side,
            trees: 4_u32.saturating_add(level.saturating_mul(2)).min(30),
            rocks: 2_u32.saturating_add(level).min(12),
            monsters: 1_u32.saturating_add(level / 2).min(8),
            coins: 5_u32.saturating_add(level.saturating_mul(2)).min(24),
        }
    }

    /// Level number the parameters were derived from.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Number of maze columns. Always odd.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of maze rows. Always odd.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of trees to scatter across the level.
    #[must_use]
    pub const fn trees(&self) -> u32 {
        self.trees
    }

    /// Number of pushable rocks to scatter across the level.
    #[must_use]
    pub const fn rocks(&self) -> u32 {
        self.rocks
    }

    /// Number of monsters to release into the level.
    #[must_use]
    pub const fn monsters(&self) -> u32 {
        self.monsters
    }

    /// Number of coins to scatter across the level.
    #[must_use]
    pub const fn coins(&self) -> u32 {
        self.coins
    }
}

/// Complete snapshot of one level in play.
///
/// The world crate is the only producer; callers treat snapshots as read-only
/// and receive a fresh snapshot from every resolved turn rather than observing
/// in-place mutation. The session RNG travels inside the snapshot so that a
/// seeded game replays identically move for move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Level number the snapshot belongs to.
    pub level: u32,
    /// Tile layout of the level.
    pub maze: Maze,
    /// Cell currently occupied by the player.
    pub player: CellCoord,
    /// Cell the player must reach, key in hand, to win.
    pub exit: CellCoord,
    /// Cell holding the exit key.
    pub key: CellCoord,
    /// Whether the player has collected the key.
    pub has_key: bool,
    /// Cells holding uncollected coins.
    pub coins: HashSet<CellCoord>,
    /// Cells holding trees. Trees block sight but never movement.
    pub trees: HashSet<CellCoord>,
    /// Cells holding pushable rocks.
    pub rocks: HashSet<CellCoord>,
    /// Cells occupied by monsters.
    pub monsters: HashSet<CellCoord>,
    /// Remaining point budget. The level is lost the moment it reaches zero.
    pub points: i32,
    /// Lifecycle phase of the level.
    pub status: GameStatus,
    /// Number of accepted player moves so far.
    pub steps: u32,
    /// Session RNG consumed by monster arbitration.
    pub rng: ChaCha8Rng,
}
