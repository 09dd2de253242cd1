//! Search states and their successors.
//!
//! A search state couples a maze position with the set of goals not yet
//! visited. Two visits to the same cell with different goals remaining are
//! different states, which is what lets one search collect several goals.
use crate::error::Result;
use crate::maze::{Maze, Position};
use std::collections::BTreeSet;

/// The goals still to be visited.
///
/// Backed by an ordered set so that iteration order and hashing are stable,
/// which keeps `SearchState` usable as a map key with reproducible results.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GoalSet(BTreeSet<Position>);

impl GoalSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.0.contains(&pos)
    }

    /// Returns a copy of the set with `pos` removed. Sets only ever shrink
    /// along a search path.
    pub fn without(&self, pos: Position) -> GoalSet {
        let mut next = self.clone();
        next.0.remove(&pos);
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> + '_ {
        self.0.iter()
    }
}

impl FromIterator<Position> for GoalSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        GoalSet(iter.into_iter().collect())
    }
}

/// A node of the search graph: where we stand and what is left to collect.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchState {
    pub pos: Position,
    pub remaining: GoalSet,
}

impl SearchState {
    pub fn new(pos: Position, remaining: GoalSet) -> Self {
        SearchState { pos, remaining }
    }

    /// A state is a goal state once every goal has been visited.
    pub fn is_goal(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// The state space induced by a maze: its start, its goals, and the
/// successor function.
#[derive(Clone, Debug)]
pub struct StateSpace<'a> {
    maze: &'a Maze,
    start: Position,
    goals: GoalSet,
}

impl<'a> StateSpace<'a> {
    /// Reads the start and the goal set out of `maze`.
    ///
    /// # Errors
    /// `MissingStart` if the maze has no start cell.
    pub fn new(maze: &'a Maze) -> Result<Self> {
        Ok(StateSpace {
            maze,
            start: maze.find_start()?,
            goals: maze.find_goals(),
        })
    }

    pub fn maze(&self) -> &'a Maze {
        self.maze
    }

    pub fn start(&self) -> Position {
        self.start
    }

    /// Every goal of the maze, as found when the state space was built.
    pub fn goals(&self) -> &GoalSet {
        &self.goals
    }

    /// The state the search begins in: the start cell with all goals pending.
    pub fn initial_state(&self) -> SearchState {
        SearchState::new(self.start, self.goals.clone())
    }

    /// Expands `state` into its successors with their step costs.
    ///
    /// One successor per non-wall neighbor, in neighbor order (up, right,
    /// down, left). Stepping onto a pending goal removes it from the
    /// successor's goal set. Every step costs 1. Duplicates are not filtered
    /// here.
    ///
    /// # Errors
    /// `OutOfBounds` if a neighbor lies outside the grid.
    pub fn expand(&self, state: &SearchState) -> Result<Vec<(SearchState, u32)>> {
        let mut successors = Vec::with_capacity(4);
        for next in self.maze.neighbors4(state.pos)? {
            if self.maze.classify(next)?.is_wall() {
                continue;
            }
            let remaining = if state.remaining.contains(next) {
                state.remaining.without(next)
            } else {
                state.remaining.clone()
            };
            successors.push((SearchState::new(next, remaining), 1));
        }
        Ok(successors)
    }
}
