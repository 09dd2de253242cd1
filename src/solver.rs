use crate::error::{MazeError, Result};
use crate::frontier::{Algorithm, Frontier, FrontierEntry};
use crate::maze::{Maze, Position};
use crate::path::{annotate, reconstruct};
use crate::state::{SearchState, StateSpace};
use log::{debug, trace};
use std::collections::HashMap;
use std::ops::ControlFlow;

/// Counters collected during one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States popped and marked explored, the goal state included.
    pub expanded: usize,
    /// Successors produced by expansion, before any duplicate pruning.
    pub generated: usize,
    /// Frontier entries replaced by a cheaper route to the same state.
    pub superseded: usize,
    /// Superseded entries discarded when they were eventually popped.
    pub stale: usize,
    /// Largest frontier size seen, stale entries included.
    pub peak_frontier: usize,
}

/// Represents a solution found by the solver.
#[derive(Clone, Debug)]
pub struct Solution {
    /// A copy of the input maze with the path and goal visit order stamped on it.
    pub maze: Maze,
    /// Positions from the start to the last goal, both inclusive.
    pub path: Vec<Position>,
    /// Number of steps along `path`.
    pub cost: u32,
    /// Number of states explored.
    pub expanded: usize,
    /// Goals in the order the path reaches them.
    pub goal_order: Vec<Position>,
    pub stats: SearchStats,
}

/// Hook called once per explored state.
///
/// Returning `ControlFlow::Break(())` stops the search with
/// [`MazeError::BudgetExhausted`] unless the state just explored is already a
/// goal state. `()` is the observer that never interferes.
pub trait SearchObserver {
    /// `explored` counts states explored so far, `state` included.
    fn on_expand(&mut self, state: &SearchState, explored: usize) -> ControlFlow<()> {
        let _ = (state, explored);
        ControlFlow::Continue(())
    }
}

impl SearchObserver for () {}

/// Stops a search once it has explored `limit` states.
#[derive(Clone, Copy, Debug)]
pub struct ExpansionBudget {
    limit: usize,
}

impl ExpansionBudget {
    pub fn new(limit: usize) -> Self {
        ExpansionBudget { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl SearchObserver for ExpansionBudget {
    fn on_expand(&mut self, _state: &SearchState, explored: usize) -> ControlFlow<()> {
        if explored >= self.limit {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Finds a path from the start of `maze` that visits every goal.
///
/// The input maze is left untouched; the returned [`Solution`] carries an
/// annotated copy.
///
/// BFS returns a path with the fewest steps, which relies on every step
/// costing 1. A* does too when the maze has at most one goal; with more goals
/// the mean-distance heuristic can overestimate and A* may return a longer
/// path. DFS and greedy make no length guarantee.
///
/// # Errors
/// * `MissingStart` if the maze has no start.
/// * `NoSolution` if some goal cannot be reached.
///
/// # Examples
/// ```
/// use maze_search::frontier::Algorithm;
/// use maze_search::maze::Maze;
/// use maze_search::solver::solve;
///
/// let maze: Maze = "%%%%%%\n%P  .%\n%%%%%%".parse().unwrap();
/// let solution = solve(&maze, Algorithm::AStar).unwrap();
/// assert_eq!(solution.cost, 3);
/// assert_eq!(solution.maze.to_string(), "%%%%%%\n%P..1%\n%%%%%%");
/// ```
pub fn solve(maze: &Maze, algorithm: Algorithm) -> Result<Solution> {
    solve_with(maze, algorithm, &mut ())
}

/// Like [`solve`], reporting every explored state to `observer`.
///
/// # Errors
/// As [`solve`], plus `BudgetExhausted` when the observer stops the search.
pub fn solve_with<O: SearchObserver + ?Sized>(
    maze: &Maze,
    algorithm: Algorithm,
    observer: &mut O,
) -> Result<Solution> {
    let space = StateSpace::new(maze)?;
    debug!(
        "solving {}x{} maze with {} goal(s) using {}",
        maze.height(),
        maze.width(),
        space.goals().len(),
        algorithm
    );

    let mut stats = SearchStats::default();
    let mut frontier = Frontier::new(algorithm.order());
    // Explored states and the state each was reached from. Entries are
    // permanent: a state is explored at most once.
    let mut explored: HashMap<SearchState, Option<SearchState>> = HashMap::new();

    let initial = space.initial_state();
    frontier.push(FrontierEntry {
        score: algorithm.score(&initial, 0),
        state: initial,
        cost: 0,
        parent: None,
    });
    stats.peak_frontier = frontier.len();

    while let Some(entry) = frontier.pop() {
        if !frontier.retire(&entry) {
            stats.stale += 1;
            continue;
        }
        let FrontierEntry {
            state,
            cost,
            parent,
            ..
        } = entry;
        debug_assert!(!explored.contains_key(&state));

        explored.insert(state.clone(), parent);
        stats.expanded = explored.len();
        trace!(
            "explore #{} at {} cost {} with {} goal(s) left",
            stats.expanded,
            state.pos,
            cost,
            state.remaining.len()
        );
        let flow = observer.on_expand(&state, stats.expanded);

        if state.is_goal() {
            let path = reconstruct(&explored, &state);
            let mut annotated = maze.clone();
            let goal_order = annotate(&mut annotated, &path, space.goals())?;
            debug!(
                "{} found a path of cost {} after {} expansions",
                algorithm, cost, stats.expanded
            );
            return Ok(Solution {
                maze: annotated,
                path,
                cost,
                expanded: stats.expanded,
                goal_order,
                stats,
            });
        }
        if flow.is_break() {
            debug!("{} stopped by observer after {} expansions", algorithm, stats.expanded);
            return Err(MazeError::BudgetExhausted {
                expanded: stats.expanded,
            });
        }

        for (next, step) in space.expand(&state)? {
            stats.generated += 1;
            if explored.contains_key(&next) {
                continue;
            }
            let next_cost = cost + step;
            match frontier.recorded_cost(&next) {
                Some(recorded) if recorded <= next_cost => continue,
                Some(_) => stats.superseded += 1,
                None => {}
            }
            frontier.push(FrontierEntry {
                score: algorithm.score(&next, next_cost),
                state: next,
                cost: next_cost,
                parent: Some(state.clone()),
            });
        }
        stats.peak_frontier = stats.peak_frontier.max(frontier.len());
    }

    debug!("{} exhausted the frontier after {} expansions", algorithm, stats.expanded);
    Err(MazeError::NoSolution {
        goals: space.goals().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Cell;

    fn maze(rows: &[&str]) -> Maze {
        rows.join("\n").parse().unwrap()
    }

    fn assert_valid_path(maze: &Maze, solution: &Solution) {
        let start = maze.find_start().unwrap();
        let goals = maze.find_goals();
        assert_eq!(solution.path.first(), Some(&start));
        assert_eq!(solution.cost as usize, solution.path.len() - 1);
        for step in solution.path.windows(2) {
            assert!(step[0].is_adjacent(step[1]), "{} -> {} is not a step", step[0], step[1]);
        }
        for pos in &solution.path {
            assert!(!maze.classify(*pos).unwrap().is_wall(), "path crosses wall at {}", pos);
        }
        assert_eq!(solution.goal_order.len(), goals.len());
        assert!(solution.goal_order.iter().all(|g| goals.contains(*g)));
        if let Some(last) = solution.goal_order.last() {
            assert_eq!(solution.path.last(), Some(last));
        }
    }

    #[derive(Default)]
    struct Recorder {
        counts: Vec<usize>,
    }

    impl SearchObserver for Recorder {
        fn on_expand(&mut self, _state: &SearchState, explored: usize) -> ControlFlow<()> {
            self.counts.push(explored);
            ControlFlow::Continue(())
        }
    }

    #[test]
    fn test_no_goals_start_is_goal_state() {
        let m = maze(&["%%%", "%P%", "%%%"]);
        for alg in Algorithm::ALL {
            let sol = solve(&m, alg).unwrap();
            assert_eq!(sol.cost, 0, "{}", alg);
            assert_eq!(sol.expanded, 1, "{}", alg);
            assert_eq!(sol.path, vec![Position::new(1, 1)]);
            assert!(sol.goal_order.is_empty());
            assert_eq!(sol.maze, m);
        }
    }

    #[test]
    fn test_corridor_all_strategies() {
        let m = maze(&["%%%%%%", "%P  .%", "%%%%%%"]);
        for alg in Algorithm::ALL {
            let sol = solve(&m, alg).unwrap();
            assert_eq!(sol.cost, 3, "{}", alg);
            assert_eq!(
                sol.path,
                (1..=4).map(|c| Position::new(1, c)).collect::<Vec<_>>(),
                "{}",
                alg
            );
            assert_eq!(sol.expanded, 4, "{}", alg);
            assert_eq!(sol.maze.to_string(), "%%%%%%\n%P..1%\n%%%%%%");
        }
    }

    #[test]
    fn test_adjacent_goal_chain_costs_one_step_per_goal() {
        let m = maze(&["%%%%%%", "%P...%", "%%%%%%"]);
        let sol = solve(&m, Algorithm::Bfs).unwrap();
        assert_eq!(sol.cost, 3);
        assert_eq!(
            sol.goal_order,
            vec![Position::new(1, 2), Position::new(1, 3), Position::new(1, 4)]
        );
        assert_eq!(sol.maze.to_string(), "%%%%%%\n%P123%\n%%%%%%");
    }

    #[test]
    fn test_bfs_multi_goal_is_shortest() {
        // Either end first: 3 steps out, 6 back across.
        let m = maze(&["%%%%%%%%%", "%.  P  .%", "%%%%%%%%%"]);
        let sol = solve(&m, Algorithm::Bfs).unwrap();
        assert_eq!(sol.cost, 9);
        assert_valid_path(&m, &sol);
        let text = sol.maze.to_string();
        assert!(text.contains("1") && text.contains("2"));
    }

    #[test]
    fn test_enclosed_goal_has_no_solution() {
        let m = maze(&["%%%%%%%", "%P  %.%", "%%%%%%%"]);
        for alg in Algorithm::ALL {
            let err = solve(&m, alg).unwrap_err();
            assert!(matches!(err, MazeError::NoSolution { goals: 1 }), "{}: {:?}", alg, err);
        }
    }

    #[test]
    fn test_unreachable_second_goal_has_no_solution() {
        let m = maze(&["%%%%%%%", "%P .%.%", "%%%%%%%"]);
        for alg in Algorithm::ALL {
            assert!(matches!(
                solve(&m, alg),
                Err(MazeError::NoSolution { goals: 2 })
            ));
        }
    }

    #[test]
    fn test_input_maze_not_mutated() {
        let m = maze(&["%%%%%%", "%P  .%", "%%%%%%"]);
        let before = m.clone();
        let _ = solve(&m, Algorithm::Bfs).unwrap();
        assert_eq!(m, before);
    }

    #[test]
    fn test_observer_sees_monotonic_counts_matching_expanded() {
        let m = Maze::new_random_with_seed(9, 11, 3, 0.2, 7).unwrap();
        for alg in Algorithm::ALL {
            let mut rec = Recorder::default();
            match solve_with(&m, alg, &mut rec) {
                Ok(sol) => {
                    let expected: Vec<usize> = (1..=sol.expanded).collect();
                    assert_eq!(rec.counts, expected, "{}", alg);
                    assert_eq!(sol.stats.expanded, sol.expanded);
                }
                Err(MazeError::NoSolution { .. }) => {
                    assert!(rec.counts.windows(2).all(|w| w[1] == w[0] + 1));
                }
                Err(e) => panic!("unexpected error {:?}", e),
            }
        }
    }

    #[test]
    fn test_expansion_budget_stops_search() {
        let m = maze(&["%%%%%%", "%P  .%", "%%%%%%"]);
        let err = solve_with(&m, Algorithm::Bfs, &mut ExpansionBudget::new(2)).unwrap_err();
        assert!(matches!(err, MazeError::BudgetExhausted { expanded: 2 }));

        // The goal state is reached on the fourth expansion, inside the budget.
        let sol = solve_with(&m, Algorithm::Bfs, &mut ExpansionBudget::new(4)).unwrap();
        assert_eq!(sol.cost, 3);
    }

    #[test]
    fn test_repeat_runs_are_identical() {
        for seed in 0..10 {
            let m = Maze::new_random_with_seed(9, 13, 3, 0.25, seed).unwrap();
            for alg in Algorithm::ALL {
                let a = solve(&m, alg);
                let b = solve(&m, alg);
                match (a, b) {
                    (Ok(a), Ok(b)) => {
                        assert_eq!(a.cost, b.cost);
                        assert_eq!(a.expanded, b.expanded);
                        assert_eq!(a.path, b.path);
                        assert_eq!(a.maze, b.maze);
                    }
                    (Err(MazeError::NoSolution { .. }), Err(MazeError::NoSolution { .. })) => {}
                    (a, b) => panic!("seed {} {}: {:?} vs {:?}", seed, alg, a.err(), b.err()),
                }
            }
        }
    }

    #[test]
    fn test_single_goal_bfs_and_astar_agree_on_cost() {
        for seed in 0..40 {
            let m = Maze::new_random_with_seed(15, 15, 1, 0.3, seed).unwrap();
            match (solve(&m, Algorithm::Bfs), solve(&m, Algorithm::AStar)) {
                (Ok(bfs), Ok(astar)) => {
                    assert_eq!(bfs.cost, astar.cost, "seed {}", seed);
                    assert_valid_path(&m, &astar);
                }
                (Err(MazeError::NoSolution { .. }), Err(MazeError::NoSolution { .. })) => {}
                (a, b) => panic!("seed {}: {:?} vs {:?}", seed, a.err(), b.err()),
            }
        }
    }

    #[test]
    fn test_multi_goal_paths_are_valid_and_bfs_is_shortest() {
        for seed in 0..15 {
            let m = Maze::new_random_with_seed(9, 11, 3, 0.2, seed).unwrap();
            let bfs = match solve(&m, Algorithm::Bfs) {
                Ok(sol) => sol,
                Err(MazeError::NoSolution { .. }) => {
                    for alg in Algorithm::ALL {
                        assert!(matches!(solve(&m, alg), Err(MazeError::NoSolution { .. })));
                    }
                    continue;
                }
                Err(e) => panic!("seed {}: {:?}", seed, e),
            };
            assert_valid_path(&m, &bfs);
            for alg in [Algorithm::Dfs, Algorithm::Greedy, Algorithm::AStar] {
                let sol = solve(&m, alg).unwrap();
                assert_valid_path(&m, &sol);
                assert!(sol.cost >= bfs.cost, "seed {} {} beat bfs", seed, alg);
                assert!(sol.stats.stale <= sol.stats.superseded);
            }
        }
    }

    #[test]
    fn test_annotated_output_round_trips_layout() {
        let m = Maze::new_random_with_seed(11, 11, 4, 0.15, 3).unwrap();
        for alg in Algorithm::ALL {
            let Ok(sol) = solve(&m, alg) else { continue };
            let text = sol.maze.to_string();
            assert!(text.parse::<Maze>().is_err() || sol.goal_order.is_empty());
            let reparsed = Maze::parse_solved(&text).unwrap();
            assert_eq!(reparsed.walls(), m.walls());
            assert_eq!(reparsed.find_start().unwrap(), m.find_start().unwrap());
            for (pos, cell) in reparsed.positions() {
                let original = m.classify(pos).unwrap();
                if cell != original {
                    assert!(matches!(original, Cell::Open | Cell::Goal));
                }
            }
        }
    }

    #[test]
    fn test_solved_maze_reads_back_without_goals() {
        let m = maze(&["%%%%%%%", "%P  . %", "% %%% %", "%.    %", "%%%%%%%"]);
        let sol = solve(&m, Algorithm::Bfs).unwrap();
        let reparsed = Maze::parse_solved(&sol.maze.to_string()).unwrap();
        for (pos, cell) in reparsed.positions() {
            assert_ne!(cell, Cell::Goal, "path cell {} read back as a goal", pos);
        }
        assert!(reparsed.find_goals().is_empty());
        let again = solve(&reparsed, Algorithm::AStar).unwrap();
        assert_eq!(again.cost, 0);
        assert_eq!(again.path, vec![m.find_start().unwrap()]);
    }
}
