use crate::maze::Position;
use crate::state::GoalSet;

/// Manhattan distance between two positions: `|Δrow| + |Δcol|`.
pub fn manhattan(a: Position, b: Position) -> usize {
    a.manhattan(b)
}

/// Estimates the remaining distance from `pos` to the goals still unvisited.
///
/// The estimate is the arithmetic mean of the Manhattan distances from `pos`
/// to each remaining goal, and 0 once no goals remain. With a single goal this
/// is the plain Manhattan distance, which is admissible and consistent. With
/// several goals the mean can overestimate the remaining tour, so A* is not
/// guaranteed to return an optimal path in that case.
///
/// Greedy best-first scores states by this value alone; A* adds the path cost.
///
/// # Examples
/// ```
/// use maze_search::heuristics::estimate;
/// use maze_search::maze::Position;
/// use maze_search::state::GoalSet;
///
/// let goals: GoalSet = [Position::new(1, 1), Position::new(1, 5)].into_iter().collect();
/// assert_eq!(estimate(Position::new(1, 3), &goals), 2.0);
/// assert_eq!(estimate(Position::new(1, 3), &GoalSet::default()), 0.0);
/// ```
pub fn estimate(pos: Position, remaining: &GoalSet) -> f64 {
    if remaining.is_empty() {
        return 0.0;
    }
    let total: f64 = remaining
        .iter()
        .map(|goal| manhattan(pos, *goal) as f64)
        .sum();
    total / remaining.len() as f64
}
