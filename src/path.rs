//! Turning a goal state back into a path, and stamping that path onto a maze.
use crate::error::Result;
use crate::maze::{order_symbol, Cell, Maze, Position};
use crate::state::{GoalSet, SearchState};
use log::warn;
use std::collections::{HashMap, HashSet};

/// Walks parent links from `goal` back to the initial state and returns the
/// positions from start to `goal`, both inclusive.
///
/// `came_from` maps every settled state to its parent; the initial state maps
/// to `None`.
pub fn reconstruct(
    came_from: &HashMap<SearchState, Option<SearchState>>,
    goal: &SearchState,
) -> Vec<Position> {
    let mut path = Vec::new();
    let mut cursor = Some(goal);
    while let Some(state) = cursor {
        path.push(state.pos);
        cursor = came_from.get(state).and_then(|parent| parent.as_ref());
    }
    path.reverse();
    path
}

/// Marks `path` on `maze` and returns the goals in the order the path visits them.
///
/// Every path cell except the start becomes [`Cell::Path`]. A goal becomes
/// [`Cell::Visit`] numbered by its first visit along the path (1, 2, 3, ...),
/// which is not necessarily the order the search discovered it in. Later
/// passes over an already numbered goal leave its number in place.
pub fn annotate(maze: &mut Maze, path: &[Position], goals: &GoalSet) -> Result<Vec<Position>> {
    let mut order = Vec::new();
    let mut numbered = HashSet::new();

    for &pos in path {
        if maze.classify(pos)? == Cell::Start {
            continue;
        }
        if !goals.contains(pos) {
            maze.set(pos, Cell::Path)?;
            continue;
        }
        if numbered.insert(pos) {
            order.push(pos);
            let n = order.len() as u32;
            let mark = if order_symbol(n).is_some() {
                Cell::Visit(n)
            } else {
                warn!("goal #{} at {} has no order symbol left, marking as path", n, pos);
                Cell::Path
            };
            maze.set(pos, mark)?;
        }
    }
    Ok(order)
}
