//! Maze representation for the search engine.
//!
//! This module defines the grid the solver walks over:
//! - `Cell`: the symbol stored in each grid position (wall, open, start, goal,
//!   and the two markers stamped onto a solved maze).
//! - `Position`: a (row, column) value type.
//! - `Maze`: a validated rectangular grid with bounds-checked classification,
//!   fixed-order neighbor lookup, and start/goal discovery.
use crate::error::{MazeError, Result};
use crate::state::GoalSet;
use log::debug;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;

/// Symbol for a cell that lies on the solution path.
pub const PATH_SYMBOL: char = '.';

/// Symbols used to number goals in the order the solution path reaches them.
/// `P` is left out so an annotated maze never shows a second start.
pub const ORDER_SYMBOLS: &str = "123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOQRSTUVWXYZ";

/// A single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// `%`: never traversable.
    Wall,
    /// ` `: traversable, nothing to collect.
    Open,
    /// `P`: the unique starting cell.
    Start,
    /// `.` in an unsolved maze: a dot that must be visited.
    Goal,
    /// `.` in a solved maze: a cell on the solution path.
    Path,
    /// A goal stamped with its 1-based visit order on the solution path.
    Visit(u32),
}

impl Cell {
    /// Converts the cell to its character in the maze file format.
    ///
    /// # Examples
    ///
    /// ```
    /// use maze_search::maze::Cell;
    /// assert_eq!(Cell::Wall.to_char(), '%');
    /// assert_eq!(Cell::Visit(1).to_char(), '1');
    /// assert_eq!(Cell::Visit(10).to_char(), 'a');
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            Cell::Wall => '%',
            Cell::Open => ' ',
            Cell::Start => 'P',
            Cell::Goal | Cell::Path => PATH_SYMBOL,
            Cell::Visit(n) => order_symbol(*n).unwrap_or(PATH_SYMBOL),
        }
    }

    /// Parses a maze file character. Only `%`, ` `, `P` and `.` are valid.
    pub fn from_char(ch: char) -> Option<Cell> {
        match ch {
            '%' => Some(Cell::Wall),
            ' ' => Some(Cell::Open),
            'P' => Some(Cell::Start),
            '.' => Some(Cell::Goal),
            _ => None,
        }
    }

    /// Parses a character of an annotated (solved) maze. `.` reads back as
    /// `Path` and order symbols as `Visit(n)`, so the result has no goals.
    pub fn from_solved_char(ch: char) -> Option<Cell> {
        match ch {
            '.' => Some(Cell::Path),
            '%' | ' ' | 'P' => Cell::from_char(ch),
            _ => ORDER_SYMBOLS
                .chars()
                .position(|s| s == ch)
                .map(|idx| Cell::Visit(idx as u32 + 1)),
        }
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, Cell::Wall)
    }
}

/// Returns the symbol for the `n`-th visited goal (1-based), or `None` once
/// the alphabet is exhausted.
pub fn order_symbol(n: u32) -> Option<char> {
    if n == 0 {
        return None;
    }
    ORDER_SYMBOLS.chars().nth(n as usize - 1)
}

/// A (row, column) coordinate in the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// Manhattan distance `|Δrow| + |Δcol|` to `other`.
    pub fn manhattan(&self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// True if `other` is one orthogonal step away.
    pub fn is_adjacent(&self, other: Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Row/column deltas in neighbor order: up, right, down, left.
///
/// FIFO and LIFO frontiers break ties by insertion order, so this order is
/// part of the solver's observable output.
const NEIGHBOR_DELTAS: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// A validated maze grid.
///
/// Invariants upheld by every constructor:
/// - at least one row, all rows the same width;
/// - every border cell is a wall, so `neighbors4` of any traversable cell
///   stays in bounds;
/// - exactly one start cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Maze {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl Maze {
    /// Builds a maze from rows of cells, validating shape, border and start.
    ///
    /// # Errors
    /// * `MalformedMaze` if there are no rows, rows differ in width, a border
    ///   cell is not a wall, or more than one start exists.
    /// * `MissingStart` if no start cell exists.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(MazeError::MalformedMaze("maze has no rows".into()));
        }
        let width = rows[0].len();
        if width == 0 {
            return Err(MazeError::MalformedMaze("maze rows are empty".into()));
        }
        for (r, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(MazeError::MalformedMaze(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    width
                )));
            }
        }

        let height = rows.len();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let on_border = r == 0 || r == height - 1 || c == 0 || c == width - 1;
                if on_border && !cell.is_wall() {
                    return Err(MazeError::MalformedMaze(format!(
                        "border cell ({}, {}) is '{}', expected a wall",
                        r,
                        c,
                        cell.to_char()
                    )));
                }
            }
        }

        let starts = rows
            .iter()
            .flatten()
            .filter(|cell| **cell == Cell::Start)
            .count();
        match starts {
            0 => return Err(MazeError::MissingStart),
            1 => {}
            n => {
                return Err(MazeError::MalformedMaze(format!(
                    "found {} start cells, expected exactly one",
                    n
                )))
            }
        }

        Ok(Maze { rows, width })
    }

    /// Generates a walled maze with one start, `goals` dots, and interior walls
    /// placed with probability `wall_density`.
    ///
    /// The same seed always produces the same maze. Goals may end up walled
    /// off; such a maze is valid and simply has no solution.
    ///
    /// # Errors
    /// `MalformedMaze` if the grid is smaller than 3x3 or its interior cannot
    /// hold the start plus all goals.
    ///
    /// # Examples
    /// ```
    /// use maze_search::maze::Maze;
    /// let a = Maze::new_random_with_seed(7, 9, 2, 0.2, 42).unwrap();
    /// let b = Maze::new_random_with_seed(7, 9, 2, 0.2, 42).unwrap();
    /// assert_eq!(a, b);
    /// assert_eq!(a.find_goals().len(), 2);
    /// ```
    pub fn new_random_with_seed(
        height: usize,
        width: usize,
        goals: usize,
        wall_density: f64,
        seed: u64,
    ) -> Result<Self> {
        if height < 3 || width < 3 {
            return Err(MazeError::MalformedMaze(format!(
                "a {}x{} maze has no interior",
                height, width
            )));
        }
        let mut interior: Vec<Position> = (1..height - 1)
            .flat_map(|r| (1..width - 1).map(move |c| Position::new(r, c)))
            .collect();
        if interior.len() < goals + 1 {
            return Err(MazeError::MalformedMaze(format!(
                "{} interior cells cannot hold a start and {} goals",
                interior.len(),
                goals
            )));
        }

        if !(0.0..=1.0).contains(&wall_density) {
            return Err(MazeError::MalformedMaze(format!(
                "wall density {} is not within 0..=1",
                wall_density
            )));
        }

        let mut rng = SmallRng::seed_from_u64(seed);
        let mut rows = vec![vec![Cell::Wall; width]; height];

        interior.shuffle(&mut rng);
        let (special, rest) = interior.split_at(goals + 1);
        for pos in rest {
            rows[pos.row][pos.col] = if rng.gen_bool(wall_density) {
                Cell::Wall
            } else {
                Cell::Open
            };
        }
        rows[special[0].row][special[0].col] = Cell::Start;
        for pos in &special[1..] {
            rows[pos.row][pos.col] = Cell::Goal;
        }

        Maze::from_rows(rows)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the cell at `pos`, or `None` if it lies outside the grid.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.rows.get(pos.row).and_then(|row| row.get(pos.col)).copied()
    }

    /// Returns the cell at `pos`.
    ///
    /// # Errors
    /// `OutOfBounds` if `pos` is outside the grid.
    pub fn classify(&self, pos: Position) -> Result<Cell> {
        self.get(pos).ok_or_else(|| self.out_of_bounds(pos.row as isize, pos.col as isize))
    }

    /// Overwrites the cell at `pos`. Used to stamp the solution path.
    pub fn set(&mut self, pos: Position, cell: Cell) -> Result<()> {
        let oob = self.out_of_bounds(pos.row as isize, pos.col as isize);
        let slot = self
            .rows
            .get_mut(pos.row)
            .and_then(|row| row.get_mut(pos.col))
            .ok_or(oob)?;
        *slot = cell;
        Ok(())
    }

    /// The four orthogonal neighbors of `pos` in the order up, right, down, left.
    ///
    /// Walls are not filtered out here.
    ///
    /// # Errors
    /// `OutOfBounds` if `pos` or any neighbor lies outside the grid. This
    /// cannot happen for traversable cells of a validated maze.
    pub fn neighbors4(&self, pos: Position) -> Result<[Position; 4]> {
        self.classify(pos)?;
        let mut out = [pos; 4];
        for (slot, (dr, dc)) in out.iter_mut().zip(NEIGHBOR_DELTAS) {
            let r = pos.row as isize + dr;
            let c = pos.col as isize + dc;
            if r < 0 || c < 0 || r as usize >= self.height() || c as usize >= self.width {
                return Err(self.out_of_bounds(r, c));
            }
            *slot = Position::new(r as usize, c as usize);
        }
        Ok(out)
    }

    /// Locates the start cell.
    ///
    /// # Errors
    /// `MissingStart` if the maze has no start cell.
    pub fn find_start(&self) -> Result<Position> {
        self.positions()
            .find(|(_, cell)| *cell == Cell::Start)
            .map(|(pos, _)| pos)
            .ok_or(MazeError::MissingStart)
    }

    /// Collects every unvisited goal cell.
    pub fn find_goals(&self) -> GoalSet {
        self.positions()
            .filter(|(_, cell)| *cell == Cell::Goal)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Iterates all cells in row-major order with their positions.
    pub fn positions(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, cell)| (Position::new(r, c), *cell))
        })
    }

    /// Positions of every wall, row-major.
    pub fn walls(&self) -> Vec<Position> {
        self.positions()
            .filter(|(_, cell)| cell.is_wall())
            .map(|(pos, _)| pos)
            .collect()
    }

    fn out_of_bounds(&self, row: isize, col: isize) -> MazeError {
        MazeError::OutOfBounds {
            row,
            col,
            height: self.height(),
            width: self.width,
        }
    }
}

impl Maze {
    /// Reads back a maze written by `Display` after annotation.
    ///
    /// Unlike `str::parse`, this accepts the goal order symbols. Every `.`
    /// becomes `Cell::Path`, so the returned maze has no goals left.
    pub fn parse_solved(s: &str) -> Result<Maze> {
        Maze::parse_with(s, Cell::from_solved_char)
    }

    fn parse_with(s: &str, decode: fn(char) -> Option<Cell>) -> Result<Maze> {
        let mut lines: Vec<&str> = s.lines().map(|l| l.trim_end_matches('\r')).collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        debug!("parsing maze with {} rows", lines.len());

        let mut rows = Vec::with_capacity(lines.len());
        for (r, line) in lines.iter().enumerate() {
            let mut row = Vec::with_capacity(line.len());
            for (c, ch) in line.chars().enumerate() {
                let cell = decode(ch).ok_or_else(|| {
                    MazeError::MalformedMaze(format!(
                        "unrecognized character '{}' in row {} col {}",
                        ch, r, c
                    ))
                })?;
                row.push(cell);
            }
            rows.push(row);
        }
        Maze::from_rows(rows)
    }
}

impl FromStr for Maze {
    type Err = MazeError;

    /// Parses the line-per-row maze format: `%`, ` `, `P` and `.` only.
    ///
    /// Line endings (`\n` or `\r\n`) and trailing blank lines are dropped.
    /// Rows are not padded: a short row is a `MalformedMaze`.
    fn from_str(s: &str) -> Result<Self> {
        Maze::parse_with(s, Cell::from_char)
    }
}

impl fmt::Display for Maze {
    /// Writes the maze back in the file format, one row per line, no trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.rows.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.to_char())?;
            }
        }
        Ok(())
    }
}
