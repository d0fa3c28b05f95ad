#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first routing and straight-line sight tests over a maze.

use std::collections::VecDeque;

use maze_escape_core::{CellCoord, Direction, Maze};

/// Computes the shortest 4-connected floor route from `start` to `goal`,
/// inclusive of both endpoints.
///
/// Returns `None` when either endpoint is walled or no route exists. The
/// generation system guarantees a route between the level entry and exit, so
/// a `None` there signals an internal defect rather than a playable outcome.
#[must_use]
pub fn shortest_path(maze: &Maze, start: CellCoord, goal: CellCoord) -> Option<Vec<CellCoord>> {
    if !maze.is_floor(start) || !maze.is_floor(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let width = usize::try_from(maze.columns()).ok()?;
    let height = usize::try_from(maze.rows()).ok()?;
    let cell_count = width.checked_mul(height)?;

    let mut parents: Vec<Option<CellCoord>> = vec![None; cell_count];
    let mut visited = vec![false; cell_count];
    let mut frontier = VecDeque::new();

    visited[index(width, start)?] = true;
    frontier.push_back(start);

    while let Some(cell) = frontier.pop_front() {
        for direction in Direction::ALL {
            let Some(neighbour) = direction.step(cell) else {
                continue;
            };
            if !maze.is_floor(neighbour) {
                continue;
            }
            let Some(slot) = index(width, neighbour) else {
                continue;
            };
            if visited[slot] {
                continue;
            }

            visited[slot] = true;
            parents[slot] = Some(cell);

            if neighbour == goal {
                return Some(walk_parents(&parents, width, start, goal));
            }
            frontier.push_back(neighbour);
        }
    }

    None
}

/// Reports whether `from` and `to` share a row or column with nothing but
/// open, unblocked floor strictly between them.
///
/// The maze supplies walls; `is_blocked` supplies every other opaque
/// obstacle the caller cares about (the turn resolver passes trees and
/// rocks). Cells outside a shared row or column never have sight.
#[must_use]
pub fn line_of_sight<F>(maze: &Maze, from: CellCoord, to: CellCoord, is_blocked: F) -> bool
where
    F: Fn(CellCoord) -> bool,
{
    if from.row() == to.row() {
        let row = from.row();
        let (low, high) = ordered(from.column(), to.column());
        ((low + 1)..high).all(|column| {
            let cell = CellCoord::new(column, row);
            maze.is_floor(cell) && !is_blocked(cell)
        })
    } else if from.column() == to.column() {
        let column = from.column();
        let (low, high) = ordered(from.row(), to.row());
        ((low + 1)..high).all(|row| {
            let cell = CellCoord::new(column, row);
            maze.is_floor(cell) && !is_blocked(cell)
        })
    } else {
        false
    }
}

fn walk_parents(
    parents: &[Option<CellCoord>],
    width: usize,
    start: CellCoord,
    goal: CellCoord,
) -> Vec<CellCoord> {
    let mut path = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        let Some(parent) = index(width, cursor).and_then(|slot| parents[slot]) else {
            break;
        };
        path.push(parent);
        cursor = parent;
    }
    path.reverse();
    path
}

fn ordered(first: u32, second: u32) -> (u32, u32) {
    if first <= second {
        (first, second)
    } else {
        (second, first)
    }
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
