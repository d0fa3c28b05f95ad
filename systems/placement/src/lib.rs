#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Hazard and collectible placement over a generated maze.
//!
//! Every entity is drawn from a single shuffled pool of floor cells that
//! excludes the certified entry-to-exit route and the key cell, so the four
//! output sets are pairwise disjoint and the route stays clear by
//! construction.

use std::collections::HashSet;

use maze_escape_core::{CellCoord, LevelParameters, Maze};
use rand::{seq::SliceRandom, Rng};

/// Disjoint entity sets produced for a fresh level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    /// Cells holding trees.
    pub trees: HashSet<CellCoord>,
    /// Cells holding pushable rocks.
    pub rocks: HashSet<CellCoord>,
    /// Cells occupied by monsters.
    pub monsters: HashSet<CellCoord>,
    /// Cells holding coins.
    pub coins: HashSet<CellCoord>,
}

/// Selects the key cell roughly 60% of the way along the certified route.
///
/// The bias keeps the key away from both the entry and the exit so a run
/// always detours instead of sweeping the key up in passing. The route must
/// contain at least the entry and the exit.
#[must_use]
pub fn key_cell(safe_path: &[CellCoord]) -> CellCoord {
    let length = safe_path.len();
    debug_assert!(length >= 2, "a certified route spans at least two cells");

    let biased = length * 3 / 5;
    let index = biased.min(length.saturating_sub(2)).max(1).min(length - 1);
    safe_path[index]
}

/// Samples disjoint tree, rock, monster, and coin cells for a fresh level.
///
/// The pool holds every floor cell off the certified route and away from the
/// key; requested counts larger than the pool are clamped rather than
/// rejected, so sparse mazes simply come up short on scenery.
#[must_use]
pub fn place<R: Rng>(
    maze: &Maze,
    safe_path: &[CellCoord],
    key: CellCoord,
    parameters: &LevelParameters,
    rng: &mut R,
) -> Placement {
    let mut reserved: HashSet<CellCoord> = safe_path.iter().copied().collect();
    let _ = reserved.insert(key);

    let mut pool: Vec<CellCoord> = maze
        .floor_cells()
        .filter(|cell| !reserved.contains(cell))
        .collect();
    pool.shuffle(rng);

    let mut pool = pool.into_iter();
    Placement {
        trees: draw(&mut pool, parameters.trees()),
        rocks: draw(&mut pool, parameters.rocks()),
        monsters: draw(&mut pool, parameters.monsters()),
        coins: draw(&mut pool, parameters.coins()),
    }
}

fn draw<I>(pool: &mut I, count: u32) -> HashSet<CellCoord>
where
    I: Iterator<Item = CellCoord>,
{
    let count = usize::try_from(count).unwrap_or(0);
    pool.by_ref().take(count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_escape_system_generation as generation;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn straight_path(length: u32) -> Vec<CellCoord> {
        (1..=length).map(|column| CellCoord::new(column, 1)).collect()
    }

    #[test]
    fn key_cell_sits_sixty_percent_along_the_route() {
        assert_eq!(key_cell(&straight_path(10)), CellCoord::new(7, 1));
        assert_eq!(key_cell(&straight_path(20)), CellCoord::new(13, 1));
    }

    #[test]
    fn key_cell_stays_off_the_endpoints_of_short_routes() {
        assert_eq!(key_cell(&straight_path(3)), CellCoord::new(2, 1));
        assert_eq!(key_cell(&straight_path(4)), CellCoord::new(3, 1));
    }

    #[test]
    fn placement_respects_the_reserved_route_and_key() {
        let parameters = LevelParameters::for_level(3);
        let mut rng = rng(17);
        let maze = generation::generate(parameters.columns(), parameters.rows(), &mut rng);
        let safe_path: Vec<CellCoord> = (1..12).map(|column| CellCoord::new(column, 1)).collect();
        let key = key_cell(&safe_path);

        let placement = place(&maze, &safe_path, key, &parameters, &mut rng);

        for set in [
            &placement.trees,
            &placement.rocks,
            &placement.monsters,
            &placement.coins,
        ] {
            for cell in set {
                assert!(maze.is_floor(*cell));
                assert!(!safe_path.contains(cell));
                assert_ne!(*cell, key);
            }
        }
    }

    #[test]
    fn placement_sets_are_pairwise_disjoint() {
        let parameters = LevelParameters::for_level(6);
        let mut rng = rng(29);
        let maze = generation::generate(parameters.columns(), parameters.rows(), &mut rng);
        let safe_path = straight_path(11);
        let key = key_cell(&safe_path);

        let placement = place(&maze, &safe_path, key, &parameters, &mut rng);

        let sets = [
            &placement.trees,
            &placement.rocks,
            &placement.monsters,
            &placement.coins,
        ];
        for (left_index, left) in sets.iter().enumerate() {
            for right in sets.iter().skip(left_index + 1) {
                assert!(left.is_disjoint(right));
            }
        }
    }

    #[test]
    fn placement_fills_requested_counts_on_ample_mazes() {
        let parameters = LevelParameters::for_level(2);
        let mut rng = rng(41);
        let maze = generation::generate(parameters.columns(), parameters.rows(), &mut rng);
        let safe_path = straight_path(11);
        let key = key_cell(&safe_path);

        let placement = place(&maze, &safe_path, key, &parameters, &mut rng);

        assert_eq!(placement.trees.len() as u32, parameters.trees());
        assert_eq!(placement.rocks.len() as u32, parameters.rocks());
        assert_eq!(placement.monsters.len() as u32, parameters.monsters());
        assert_eq!(placement.coins.len() as u32, parameters.coins());
    }

    #[test]
    fn placement_clamps_to_the_available_pool() {
        // A nine-cell corridor with a three-cell route leaves too little room
        // for a high level's scenery; placement must saturate, not panic.
        let mut maze = Maze::filled_with_walls(11, 3);
        for column in 1..10 {
            maze.carve(CellCoord::new(column, 1));
        }
        let safe_path = straight_path(3);
        let key = key_cell(&safe_path);
        let parameters = LevelParameters::for_level(30);

        let placement = place(&maze, &safe_path, key, &parameters, &mut rng(5));

        let placed = placement.trees.len()
            + placement.rocks.len()
            + placement.monsters.len()
            + placement.coins.len();
        // The key sits on the route, so only the three route cells are
        // withheld from the nine-cell corridor.
        assert_eq!(placed, 9 - 3);
    }
}
