#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level lifecycle for Maze Escape.
//!
//! This crate is the only producer of [`GameState`] snapshots: it assembles
//! the generation, pathfinding, and placement systems into `new_game` and
//! hands every turn to the resolver through `move_player`. `Won` and `Lost`
//! are terminal per snapshot lineage; advancing to the next level or
//! retrying is the caller's policy and always starts from a fresh
//! `new_game`.

use maze_escape_core::{
    CellCoord, Direction, GameState, GameStatus, LevelParameters, STARTING_POINTS,
};
use maze_escape_system_generation as generation;
use maze_escape_system_pathfinding as pathfinding;
use maze_escape_system_placement as placement;
use maze_escape_system_turn as turn;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Starts a fresh level seeded from process entropy.
#[must_use]
pub fn new_game(level: u32) -> GameState {
    new_game_with_seed(level, rand::random())
}

/// Starts a fresh level from an explicit seed.
///
/// Equal levels and seeds produce identical sessions move for move, which
/// is the reproducibility seam every stochastic stage (carving, braiding,
/// rooms, placement, monster tie-breaking) flows through.
#[must_use]
pub fn new_game_with_seed(level: u32, seed: u64) -> GameState {
    let parameters = LevelParameters::for_level(level);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let maze = generation::generate(parameters.columns(), parameters.rows(), &mut rng);
    let player = CellCoord::new(1, 1);
    let exit = CellCoord::new(parameters.columns() - 2, parameters.rows() - 2);
    let safe_path = pathfinding::shortest_path(&maze, player, exit)
        .expect("generated maze connects the entry to the exit");
    let key = placement::key_cell(&safe_path);
    let scattered = placement::place(&maze, &safe_path, key, &parameters, &mut rng);

    GameState {
        level: parameters.level(),
        maze,
        player,
        exit,
        key,
        has_key: false,
        coins: scattered.coins,
        trees: scattered.trees,
        rocks: scattered.rocks,
        monsters: scattered.monsters,
        points: STARTING_POINTS,
        status: GameStatus::Playing,
        steps: 0,
        rng,
    }
}

/// Resolves one player turn and returns the successor snapshot.
///
/// Rejected moves (walls, grid edges, illegal rock pushes) return a snapshot
/// equal to the input; terminal snapshots pass through untouched.
#[must_use]
pub fn move_player(state: &GameState, direction: Direction) -> GameState {
    turn::resolve(state, direction)
}

/// Read-only helpers for rendering and input collaborators.
pub mod query {
    use maze_escape_core::{CellCoord, GameState};

    /// The most prominent thing a renderer should draw on a cell.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum Occupant {
        /// The player.
        Player,
        /// A pursuing monster.
        Monster,
        /// A pushable rock.
        Rock,
        /// A tree. Blocks sight, never the player.
        Tree,
        /// An uncollected coin.
        Coin,
        /// The uncollected exit key.
        Key,
        /// The exit cell.
        Exit,
    }

    /// Classifies the occupant of the provided cell, in draw-priority order.
    #[must_use]
    pub fn occupant(state: &GameState, cell: CellCoord) -> Option<Occupant> {
        if cell == state.player {
            Some(Occupant::Player)
        } else if state.monsters.contains(&cell) {
            Some(Occupant::Monster)
        } else if state.rocks.contains(&cell) {
            Some(Occupant::Rock)
        } else if state.trees.contains(&cell) {
            Some(Occupant::Tree)
        } else if state.coins.contains(&cell) {
            Some(Occupant::Coin)
        } else if cell == state.key && !state.has_key {
            Some(Occupant::Key)
        } else if cell == state.exit {
            Some(Occupant::Exit)
        } else {
            None
        }
    }

    /// Reports whether the player could attempt a step onto the cell.
    #[must_use]
    pub fn is_walkable(state: &GameState, cell: CellCoord) -> bool {
        state.maze.is_floor(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_fresh_level_starts_at_the_entry_with_a_full_budget() {
        let state = new_game_with_seed(1, 99);

        assert_eq!(state.level, 1);
        assert_eq!(state.player, CellCoord::new(1, 1));
        assert_eq!(state.exit, CellCoord::new(11, 11));
        assert_eq!(state.points, STARTING_POINTS);
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.steps, 0);
        assert!(!state.has_key);
        assert_ne!(state.key, state.player);
    }

    #[test]
    fn level_zero_is_clamped_to_level_one() {
        let state = new_game_with_seed(0, 4);
        assert_eq!(state.level, 1);
        assert_eq!(state.maze.columns(), 13);
    }

    #[test]
    fn equal_seeds_build_equal_levels() {
        assert_eq!(new_game_with_seed(3, 12), new_game_with_seed(3, 12));
    }

    #[test]
    fn occupant_ranks_the_player_above_everything() {
        let mut state = new_game_with_seed(1, 7);
        let cell = state.player;
        let _ = state.monsters.insert(cell);

        assert_eq!(query::occupant(&state, cell), Some(query::Occupant::Player));
    }

    #[test]
    fn occupant_reports_the_key_only_while_uncollected() {
        let mut state = new_game_with_seed(1, 7);
        let key = state.key;

        assert_eq!(query::occupant(&state, key), Some(query::Occupant::Key));

        state.has_key = true;
        assert_eq!(query::occupant(&state, key), None);
    }

    #[test]
    fn walkability_follows_the_maze_floor() {
        let state = new_game_with_seed(1, 7);
        assert!(query::is_walkable(&state, state.player));
        assert!(!query::is_walkable(&state, CellCoord::new(0, 0)));
    }
}
