//! Error types for maze loading and search.

use thiserror::Error;

/// Everything that can go wrong between reading a maze and returning a solution.
#[derive(Error, Debug)]
pub enum MazeError {
    /// The maze is not rectangular, not walled on its border, contains an
    /// unknown symbol or more than one start.
    #[error("Malformed maze: {0}")]
    MalformedMaze(String),

    #[error("Maze has no start cell ('P')")]
    MissingStart,

    /// A lookup left the grid. Signed coordinates so that a step past row or
    /// column zero can still be reported.
    #[error("Position ({row}, {col}) is outside the {height}x{width} maze")]
    OutOfBounds {
        row: isize,
        col: isize,
        height: usize,
        width: usize,
    },

    /// The frontier ran dry with goals still unvisited.
    #[error("No path visits all {goals} goal(s) of the maze")]
    NoSolution { goals: usize },

    /// An [`ExpansionBudget`](crate::solver::ExpansionBudget) stopped the search.
    #[error("Search stopped after {expanded} expansions without reaching every goal")]
    BudgetExhausted { expanded: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MazeError>;
