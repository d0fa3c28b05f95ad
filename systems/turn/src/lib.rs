#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single-turn resolution: the player phase followed by one monster step each.

use std::collections::HashSet;

use maze_escape_core::{CellCoord, Direction, GameState, GameStatus, COIN_BONUS, STEP_COST};
use maze_escape_system_pathfinding::line_of_sight;
use rand::seq::SliceRandom;

/// Resolves one complete turn and returns the successor snapshot.
///
/// Terminal snapshots pass through untouched. A move into a wall, off the
/// grid, or an illegal rock push is rejected: the returned snapshot equals
/// the input and no turn is consumed. An accepted move costs [`STEP_COST`]
/// points and collects whatever the target cell holds; unless that already
/// decided the level, every monster then advances one step before the
/// snapshot is returned.
#[must_use]
pub fn resolve(state: &GameState, direction: Direction) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }

    let mut next = state.clone();

    let Some(target) = direction.step(next.player) else {
        return next;
    };
    if !next.maze.is_floor(target) {
        return next;
    }
    if next.rocks.contains(&target) && !push_rock(&mut next, target, direction) {
        return next;
    }

    next.player = target;
    next.steps = next.steps.saturating_add(1);
    next.points -= STEP_COST;
    if next.coins.remove(&target) {
        next.points += COIN_BONUS;
    }
    if target == next.key && !next.has_key {
        next.has_key = true;
    }

    // Terminal checks in fixed order: exhaustion beats a monster contact,
    // which beats reaching the exit.
    if next.points <= 0 {
        next.status = GameStatus::Lost;
        return next;
    }
    if next.monsters.contains(&target) {
        next.status = GameStatus::Lost;
        return next;
    }
    if target == next.exit && next.has_key {
        next.status = GameStatus::Won;
        return next;
    }

    if advance_monsters(&mut next) {
        next.status = GameStatus::Lost;
    }
    next
}

/// Attempts to shove the rock on `target` one cell further along.
///
/// The push fails when the landing cell is walled, off the grid, already
/// holds any entity, or is the exit or key cell; a failed push rejects the
/// whole move.
fn push_rock(state: &mut GameState, target: CellCoord, direction: Direction) -> bool {
    let Some(beyond) = direction.step(target) else {
        return false;
    };
    if !state.maze.is_floor(beyond) {
        return false;
    }
    if state.rocks.contains(&beyond)
        || state.trees.contains(&beyond)
        || state.coins.contains(&beyond)
        || state.monsters.contains(&beyond)
    {
        return false;
    }
    if beyond == state.exit || beyond == state.key {
        return false;
    }

    let _ = state.rocks.remove(&target);
    let _ = state.rocks.insert(beyond);
    true
}

/// Advances every monster one step under claim-as-you-go arbitration.
///
/// Monsters resolve in a freshly shuffled order. Each releases its own cell,
/// then claims either the straight-line chase step toward a sighted player
/// or a random open sidestep; a monster that finds every candidate claimed
/// stays put. Returns `true` when any monster lands on the player.
fn advance_monsters(state: &mut GameState) -> bool {
    let mut order: Vec<CellCoord> = state.monsters.iter().copied().collect();
    // Sort before shuffling: set iteration order must never leak into the
    // RNG-driven outcome, or seeded sessions stop replaying.
    order.sort_unstable();
    order.shuffle(&mut state.rng);

    let mut occupied = state.monsters.clone();
    let mut resolved: HashSet<CellCoord> = HashSet::with_capacity(order.len());
    let mut caught = false;

    for monster in order {
        let _ = occupied.remove(&monster);

        let chosen = match chase_step(state, monster, &occupied) {
            Some(cell) => cell,
            None => {
                let mut directions = Direction::ALL;
                directions.shuffle(&mut state.rng);
                wander_step(state, monster, &occupied, directions).unwrap_or(monster)
            }
        };

        if chosen == state.player {
            caught = true;
        }
        let _ = occupied.insert(chosen);
        let _ = resolved.insert(chosen);
    }

    state.monsters = resolved;
    caught
}

/// Straight-line pursuit step, taken only under line of sight.
fn chase_step(
    state: &GameState,
    monster: CellCoord,
    occupied: &HashSet<CellCoord>,
) -> Option<CellCoord> {
    let player = state.player;
    let toward = direction_toward(monster, player)?;
    if !line_of_sight(&state.maze, monster, player, |cell| {
        state.trees.contains(&cell) || state.rocks.contains(&cell)
    }) {
        return None;
    }

    let step = toward.step(monster)?;
    if blocks_monster(state, step) {
        return None;
    }
    if step != player && occupied.contains(&step) {
        return None;
    }
    Some(step)
}

/// Random sidestep: the first shuffled direction whose cell is open and
/// unclaimed. Landing on the player is allowed; that ends the level.
fn wander_step(
    state: &GameState,
    monster: CellCoord,
    occupied: &HashSet<CellCoord>,
    directions: [Direction; 4],
) -> Option<CellCoord> {
    directions.iter().find_map(|direction| {
        let step = direction.step(monster)?;
        if blocks_monster(state, step) {
            return None;
        }
        if step != state.player && occupied.contains(&step) {
            return None;
        }
        Some(step)
    })
}

/// Cells a monster may never stand on: walls, trees, rocks, coins, and the
/// key while it is still uncollected. Keeping coins and the key clear
/// preserves the pairwise disjointness of the entity sets.
fn blocks_monster(state: &GameState, cell: CellCoord) -> bool {
    !state.maze.is_floor(cell)
        || state.trees.contains(&cell)
        || state.rocks.contains(&cell)
        || state.coins.contains(&cell)
        || (!state.has_key && cell == state.key)
}

/// Axis direction from `from` toward `to`, when the two share an axis.
fn direction_toward(from: CellCoord, to: CellCoord) -> Option<Direction> {
    if from.row() == to.row() {
        if to.column() > from.column() {
            Some(Direction::East)
        } else if to.column() < from.column() {
            Some(Direction::West)
        } else {
            None
        }
    } else if from.column() == to.column() {
        if to.row() > from.row() {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    } else {
        None
    }
}
