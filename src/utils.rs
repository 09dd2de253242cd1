use crate::error::Result;
use crate::maze::Maze;
use log::debug;
use std::fs;
use std::path::Path;

/// Parses an array of string slices into a `Maze`.
///
/// Each string slice is one row, starting from row 0. Valid characters are:
/// - '%': wall
/// - ' ': open cell
/// - 'P': start (exactly one)
/// - '.': goal
///
/// Rows are not padded, so every row must have the same length.
///
/// # Errors
/// * `MalformedMaze` if the rows are ragged, the border is not all walls, a
///   character is unrecognized, or there is more than one start.
/// * `MissingStart` if no row contains a start.
///
/// # Examples
/// ```
/// use maze_search::utils::maze_from_str_array;
/// use maze_search::maze::{Cell, Position};
///
/// let maze = maze_from_str_array(&[
///     "%%%%%",
///     "%P .%",
///     "%%%%%",
/// ]).unwrap();
/// assert_eq!(maze.classify(Position::new(1, 1)).unwrap(), Cell::Start);
/// assert_eq!(maze.classify(Position::new(1, 3)).unwrap(), Cell::Goal);
///
/// assert!(maze_from_str_array(&["%%%%", "%P#%", "%%%%"]).is_err());
/// ```
pub fn maze_from_str_array(s: &[&str]) -> Result<Maze> {
    s.join("\n").parse()
}

/// Reads a maze file. See [`Maze`]'s `FromStr` impl for the accepted layout.
pub fn read_maze_file(path: impl AsRef<Path>) -> Result<Maze> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    debug!("read {} bytes from {}", content.len(), path.display());
    content.parse()
}

/// Writes `maze` in the same line-per-row format it is read from, with a
/// trailing newline.
pub fn write_maze_file(path: impl AsRef<Path>, maze: &Maze) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, format!("{}\n", maze))?;
    debug!("wrote {}x{} maze to {}", maze.height(), maze.width(), path.display());
    Ok(())
}
