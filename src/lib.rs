//! # Maze Search Library
//!
//! This library finds a route through a 2-D maze that starts at the `P` cell
//! and visits every goal (`.`) without crossing a wall (`%`). Four
//! interchangeable strategies run over the same state space: breadth-first,
//! depth-first, greedy best-first and A*.
//!
//! It is used by two binaries:
//! - `maze_solver`: reads a maze file, solves it with a chosen algorithm,
//!   prints the cost and expansion count, and optionally writes the annotated maze.
//! - `strategy_evaluator`: solves a batch of seeded random mazes with every
//!   algorithm and compares their average path cost and expansions.
//!
//! ## Modules
//! - `maze`: the grid (`Maze`, `Cell`, `Position`), parsing and validation,
//!   neighbor lookup, and seeded random generation.
//! - `heuristics`: Manhattan distance and the mean-distance estimate used by
//!   greedy and A*.
//! - `state`: search states (position plus remaining goals) and their successors.
//! - `frontier`: the `Algorithm` enum and the FIFO / LIFO / priority frontier.
//! - `solver`: the search loop (`solve`, `solve_with`), statistics and observers.
//! - `path`: path reconstruction and annotation of the solved maze.
//! - `utils`: loading mazes from strings and files, writing results.
//! - `error`: the `MazeError` type.

pub mod error;
pub mod frontier;
pub mod heuristics;
pub mod maze;
pub mod path;
pub mod solver;
pub mod state;
pub mod utils;

pub use error::{MazeError, Result};
pub use frontier::Algorithm;
pub use maze::{Cell, Maze, Position};
pub use solver::{solve, solve_with, Solution};
