#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural maze generation: spanning-tree carving, braiding, room carving.

use maze_escape_core::{CellCoord, Direction, Maze};
use rand::{seq::SliceRandom, Rng};

const MIN_SIDE: u32 = 9;
const ROOM_MIN_SIDE: u32 = 3;
const ROOM_MAX_SIDE: u32 = 7;
const ROOM_AREA_PER_ATTEMPT: u32 = 170;

/// Generates a maze of the provided odd dimensions.
///
/// The result is guaranteed to connect every lattice cell, and therefore the
/// conventional entry `(1, 1)` and exit `(columns - 2, rows - 2)`: the
/// spanning-tree carve alone establishes full connectivity, and the braiding
/// and room passes only ever open additional cells.
pub fn generate<R: Rng>(columns: u32, rows: u32, rng: &mut R) -> Maze {
    debug_assert!(
        columns % 2 == 1 && rows % 2 == 1,
        "maze dimensions must be odd"
    );
    debug_assert!(
        columns >= MIN_SIDE && rows >= MIN_SIDE,
        "maze dimensions must be at least {MIN_SIDE}"
    );

    let mut maze = Maze::filled_with_walls(columns, rows);
    carve_spanning_tree(&mut maze, rng);
    braid_dead_ends(&mut maze, rng);
    carve_rooms(&mut maze, rng);
    maze
}

/// Depth-first carve over the odd-coordinate lattice with an explicit stack.
///
/// The stack keeps the pass immune to call-stack limits on the largest grids.
fn carve_spanning_tree<R: Rng>(maze: &mut Maze, rng: &mut R) {
    let start = CellCoord::new(1, 1);
    maze.carve(start);
    let mut stack = vec![start];

    while let Some(&current) = stack.last() {
        let candidates: Vec<(CellCoord, CellCoord)> = Direction::ALL
            .iter()
            .filter_map(|direction| jump(maze, current, *direction))
            .filter(|(_, target)| !maze.is_floor(*target))
            .collect();

        match candidates.choose(rng) {
            Some(&(midpoint, target)) => {
                maze.carve(midpoint);
                maze.carve(target);
                stack.push(target);
            }
            None => {
                let _ = stack.pop();
            }
        }
    }
}

/// Opens one extra connection per remaining dead end until a full scan over
/// the lattice improves nothing. Only adds openings, never removes them.
fn braid_dead_ends<R: Rng>(maze: &mut Maze, rng: &mut R) {
    let scan_cap = maze.rows().saturating_mul(maze.columns());
    for _ in 0..scan_cap {
        if !braid_scan(maze, rng) {
            break;
        }
    }
}

fn braid_scan<R: Rng>(maze: &mut Maze, rng: &mut R) -> bool {
    let mut improved = false;

    let mut row = 1;
    while row < maze.rows() {
        let mut column = 1;
        while column < maze.columns() {
            let cell = CellCoord::new(column, row);
            if maze.is_floor(cell) && open_neighbour_count(maze, cell) < 2 {
                let candidates: Vec<(CellCoord, CellCoord)> = Direction::ALL
                    .iter()
                    .filter_map(|direction| jump(maze, cell, *direction))
                    .filter(|(midpoint, target)| {
                        !maze.is_floor(*midpoint) && maze.is_floor(*target)
                    })
                    .collect();

                if let Some(&(midpoint, _)) = candidates.choose(rng) {
                    maze.carve(midpoint);
                    improved = true;
                }
            }
            column += 2;
        }
        row += 2;
    }

    improved
}

/// Stamps a handful of odd-sized rectangular rooms over the carved maze and
/// opens doors from their side midpoints onto surrounding lattice cells.
fn carve_rooms<R: Rng>(maze: &mut Maze, rng: &mut R) {
    let area = maze.columns().saturating_mul(maze.rows());
    let attempts = (area / ROOM_AREA_PER_ATTEMPT).clamp(2, 8);
    for _ in 0..attempts {
        carve_room(maze, rng);
    }
}

fn carve_room<R: Rng>(maze: &mut Maze, rng: &mut R) {
    let width = odd_between(rng, ROOM_MIN_SIDE, ROOM_MAX_SIDE);
    let height = odd_between(rng, ROOM_MIN_SIDE, ROOM_MAX_SIDE);
    let origin_column = odd_between(rng, 1, maze.columns() - 1 - width);
    let origin_row = odd_between(rng, 1, maze.rows() - 1 - height);

    for row in origin_row..origin_row + height {
        for column in origin_column..origin_column + width {
            maze.carve(CellCoord::new(column, row));
        }
    }

    // Door columns and rows snap to the nearest odd coordinate so that every
    // door faces a lattice cell, which the spanning-tree pass already carved.
    let door_column = snap_odd(origin_column + width / 2);
    let door_row = snap_odd(origin_row + height / 2);

    let mut doors: Vec<CellCoord> = Vec::with_capacity(4);
    push_door(
        maze,
        &mut doors,
        origin_row.checked_sub(1).map(|row| CellCoord::new(door_column, row)),
        origin_row.checked_sub(2).map(|row| CellCoord::new(door_column, row)),
    );
    push_door(
        maze,
        &mut doors,
        Some(CellCoord::new(door_column, origin_row + height)),
        Some(CellCoord::new(door_column, origin_row + height + 1)),
    );
    push_door(
        maze,
        &mut doors,
        origin_column
            .checked_sub(1)
            .map(|column| CellCoord::new(column, door_row)),
        origin_column
            .checked_sub(2)
            .map(|column| CellCoord::new(column, door_row)),
    );
    push_door(
        maze,
        &mut doors,
        Some(CellCoord::new(origin_column + width, door_row)),
        Some(CellCoord::new(origin_column + width + 1, door_row)),
    );

    doors.shuffle(rng);
    let open = rng.gen_range(2_usize..=3).min(doors.len());
    for door in doors.iter().take(open) {
        maze.carve(*door);
    }
}

fn push_door(
    maze: &Maze,
    doors: &mut Vec<CellCoord>,
    door: Option<CellCoord>,
    beyond: Option<CellCoord>,
) {
    let (Some(door), Some(beyond)) = (door, beyond) else {
        return;
    };
    if maze.in_bounds(door) && maze.is_floor(beyond) {
        doors.push(door);
    }
}

/// Midpoint and landing cell two steps away, when the landing is in bounds.
fn jump(maze: &Maze, from: CellCoord, direction: Direction) -> Option<(CellCoord, CellCoord)> {
    let midpoint = direction.step(from)?;
    let target = direction.step(midpoint)?;
    maze.in_bounds(target).then_some((midpoint, target))
}

fn open_neighbour_count(maze: &Maze, cell: CellCoord) -> usize {
    Direction::ALL
        .iter()
        .filter_map(|direction| direction.step(cell))
        .filter(|neighbour| maze.is_floor(*neighbour))
        .count()
}

/// Uniformly samples an odd value from the inclusive range `[low, high]`.
fn odd_between<R: Rng>(rng: &mut R, low: u32, high: u32) -> u32 {
    debug_assert!(low % 2 == 1 && high % 2 == 1 && low <= high);
    let choices = (high - low) / 2 + 1;
    low + rng.gen_range(0..choices) * 2
}

fn snap_odd(value: u32) -> u32 {
    if value % 2 == 0 {
        value - 1
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::{HashSet, VecDeque};

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn generation_is_deterministic_for_equal_seeds() {
        let first = generate(13, 13, &mut rng(7));
        let second = generate(13, 13, &mut rng(7));
        assert_eq!(first, second);
    }

    #[test]
    fn border_cells_stay_walled() {
        for seed in 0..8 {
            let maze = generate(13, 13, &mut rng(seed));
            for column in 0..maze.columns() {
                assert!(!maze.is_floor(CellCoord::new(column, 0)));
                assert!(!maze.is_floor(CellCoord::new(column, maze.rows() - 1)));
            }
            for row in 0..maze.rows() {
                assert!(!maze.is_floor(CellCoord::new(0, row)));
                assert!(!maze.is_floor(CellCoord::new(maze.columns() - 1, row)));
            }
        }
    }

    #[test]
    fn every_lattice_cell_is_carved() {
        let maze = generate(21, 21, &mut rng(3));
        let mut row = 1;
        while row < maze.rows() {
            let mut column = 1;
            while column < maze.columns() {
                assert!(
                    maze.is_floor(CellCoord::new(column, row)),
                    "lattice cell ({column}, {row}) stayed walled"
                );
                column += 2;
            }
            row += 2;
        }
    }

    #[test]
    fn every_floor_cell_is_reachable_from_the_entry() {
        for seed in 0..8 {
            let maze = generate(17, 17, &mut rng(seed));
            let start = CellCoord::new(1, 1);

            let mut visited: HashSet<CellCoord> = HashSet::new();
            let mut frontier = VecDeque::new();
            let _ = visited.insert(start);
            frontier.push_back(start);
            while let Some(cell) = frontier.pop_front() {
                for direction in Direction::ALL {
                    let Some(neighbour) = direction.step(cell) else {
                        continue;
                    };
                    if maze.is_floor(neighbour) && visited.insert(neighbour) {
                        frontier.push_back(neighbour);
                    }
                }
            }

            let floor_count = maze.floor_cells().count();
            assert_eq!(visited.len(), floor_count, "seed {seed} left floors cut off");
        }
    }

    #[test]
    fn braiding_reaches_a_fixpoint() {
        let maze = generate(15, 15, &mut rng(11));

        let mut row = 1;
        while row < maze.rows() {
            let mut column = 1;
            while column < maze.columns() {
                let cell = CellCoord::new(column, row);
                if maze.is_floor(cell) && open_neighbour_count(&maze, cell) < 2 {
                    let improvable = Direction::ALL.iter().any(|direction| {
                        jump(&maze, cell, *direction).map_or(false, |(midpoint, target)| {
                            !maze.is_floor(midpoint) && maze.is_floor(target)
                        })
                    });
                    assert!(
                        !improvable,
                        "dead end at ({column}, {row}) still has an openable wall"
                    );
                }
                column += 2;
            }
            row += 2;
        }
    }

    #[test]
    fn odd_between_only_returns_odd_values_in_range() {
        let mut rng = rng(5);
        for _ in 0..64 {
            let value = odd_between(&mut rng, 3, 7);
            assert!(value % 2 == 1);
            assert!((3..=7).contains(&value));
        }
    }
}
