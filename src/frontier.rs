//! Search strategies and the frontier they order.
//!
//! - `Algorithm`: the four strategies, each defined by a removal order and a
//!   scoring rule.
//! - `Frontier`: the discovered-but-unexpanded states, with an explicit
//!   membership map next to the ordered container.
//!
//! The frontier never supports decrease-key. When a cheaper route to a state
//! already waiting in the frontier is found, the cheaper entry is pushed and
//! the membership map is updated to its cost. The older entry stays in the
//! container and is recognized as stale when it is popped, because its cost no
//! longer matches the recorded one (see [`Frontier::retire`]).
use crate::heuristics::estimate;
use crate::state::SearchState;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;

/// The search strategy used by the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Breadth-first: oldest entry first. Shortest in steps, since every step costs 1.
    Bfs,
    /// Depth-first: newest entry first. Finds a path, not necessarily a short one.
    Dfs,
    /// Greedy best-first: lowest heuristic estimate first.
    Greedy,
    /// A*: lowest path cost plus heuristic estimate first.
    AStar,
}

/// How a frontier picks the next entry to remove.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrontierOrder {
    Fifo,
    Lifo,
    /// Lowest score first, ties broken by insertion order.
    Priority,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Greedy,
        Algorithm::AStar,
    ];

    pub fn order(self) -> FrontierOrder {
        match self {
            Algorithm::Bfs => FrontierOrder::Fifo,
            Algorithm::Dfs => FrontierOrder::Lifo,
            Algorithm::Greedy | Algorithm::AStar => FrontierOrder::Priority,
        }
    }

    /// Scores a state reached at path cost `cost`. Only priority frontiers
    /// look at the score; for BFS and DFS it is the path cost, for reporting.
    pub fn score(self, state: &SearchState, cost: u32) -> f64 {
        match self {
            Algorithm::Bfs | Algorithm::Dfs => cost as f64,
            Algorithm::Greedy => estimate(state.pos, &state.remaining),
            Algorithm::AStar => cost as f64 + estimate(state.pos, &state.remaining),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Greedy => "greedy",
            Algorithm::AStar => "astar",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" => Ok(Algorithm::Bfs),
            "dfs" => Ok(Algorithm::Dfs),
            "greedy" => Ok(Algorithm::Greedy),
            "astar" | "a*" => Ok(Algorithm::AStar),
            other => Err(format!(
                "unknown algorithm '{}', expected one of: bfs, dfs, greedy, astar",
                other
            )),
        }
    }
}

/// A state waiting in the frontier together with how it was reached.
#[derive(Clone, Debug)]
pub struct FrontierEntry {
    pub score: f64,
    pub state: SearchState,
    /// Path length from the start.
    pub cost: u32,
    /// The state this one was expanded from; `None` for the initial state.
    pub parent: Option<SearchState>,
}

/// Heap wrapper: lowest score first, then lowest insertion sequence.
#[derive(Debug)]
struct Ranked {
    seq: u64,
    entry: FrontierEntry,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both keys: BinaryHeap is a max-heap.
        other
            .entry
            .score
            .total_cmp(&self.entry.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
enum Queue {
    Fifo(VecDeque<FrontierEntry>),
    Lifo(Vec<FrontierEntry>),
    Priority(BinaryHeap<Ranked>),
}

/// Ordered container of pending states plus their live costs.
#[derive(Debug)]
pub struct Frontier {
    queue: Queue,
    /// Cost of the live entry for every state currently waiting.
    members: HashMap<SearchState, u32>,
    next_seq: u64,
}

impl Frontier {
    pub fn new(order: FrontierOrder) -> Self {
        let queue = match order {
            FrontierOrder::Fifo => Queue::Fifo(VecDeque::new()),
            FrontierOrder::Lifo => Queue::Lifo(Vec::new()),
            FrontierOrder::Priority => Queue::Priority(BinaryHeap::new()),
        };
        Frontier {
            queue,
            members: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Inserts `entry` and makes it the live entry for its state.
    ///
    /// If the state was already waiting at a higher cost, that older entry is
    /// superseded: it stays queued but will fail [`retire`](Self::retire).
    pub fn push(&mut self, entry: FrontierEntry) {
        self.members.insert(entry.state.clone(), entry.cost);
        match &mut self.queue {
            Queue::Fifo(q) => q.push_back(entry),
            Queue::Lifo(q) => q.push(entry),
            Queue::Priority(q) => {
                q.push(Ranked {
                    seq: self.next_seq,
                    entry,
                });
                self.next_seq += 1;
            }
        }
    }

    /// Removes the next entry in strategy order. May return a stale entry.
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        match &mut self.queue {
            Queue::Fifo(q) => q.pop_front(),
            Queue::Lifo(q) => q.pop(),
            Queue::Priority(q) => q.pop().map(|ranked| ranked.entry),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of queued entries, stale ones included.
    pub fn len(&self) -> usize {
        match &self.queue {
            Queue::Fifo(q) => q.len(),
            Queue::Lifo(q) => q.len(),
            Queue::Priority(q) => q.len(),
        }
    }

    pub fn contains(&self, state: &SearchState) -> bool {
        self.members.contains_key(state)
    }

    /// The cost of the live entry for `state`, if it is waiting.
    pub fn recorded_cost(&self, state: &SearchState) -> Option<u32> {
        self.members.get(state).copied()
    }

    /// Settles a popped entry.
    ///
    /// Returns `true` and drops the state's membership if `entry` is the live
    /// entry for its state. Returns `false` for a superseded entry (a cheaper
    /// one was pushed later) or for a state that has already been settled.
    pub fn retire(&mut self, entry: &FrontierEntry) -> bool {
        match self.members.get(&entry.state) {
            Some(&cost) if cost == entry.cost => {
                self.members.remove(&entry.state);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Position;
    use crate::state::GoalSet;

    fn state(r: usize, c: usize) -> SearchState {
        SearchState::new(Position::new(r, c), GoalSet::default())
    }

    fn entry(score: f64, s: SearchState, cost: u32) -> FrontierEntry {
        FrontierEntry {
            score,
            state: s,
            cost,
            parent: None,
        }
    }

    fn drain(frontier: &mut Frontier) -> Vec<Position> {
        let mut out = Vec::new();
        while let Some(e) = frontier.pop() {
            if frontier.retire(&e) {
                out.push(e.state.pos);
            }
        }
        out
    }

    #[test]
    fn test_fifo_order() {
        let mut f = Frontier::new(FrontierOrder::Fifo);
        for c in 1..=3 {
            f.push(entry(0.0, state(1, c), c as u32));
        }
        assert_eq!(
            drain(&mut f),
            vec![Position::new(1, 1), Position::new(1, 2), Position::new(1, 3)]
        );
        assert!(f.is_empty());
    }

    #[test]
    fn test_lifo_order() {
        let mut f = Frontier::new(FrontierOrder::Lifo);
        for c in 1..=3 {
            f.push(entry(0.0, state(1, c), c as u32));
        }
        assert_eq!(
            drain(&mut f),
            vec![Position::new(1, 3), Position::new(1, 2), Position::new(1, 1)]
        );
    }

    #[test]
    fn test_priority_lowest_score_first_ties_by_insertion() {
        let mut f = Frontier::new(FrontierOrder::Priority);
        f.push(entry(2.0, state(1, 1), 1));
        f.push(entry(1.0, state(1, 2), 1));
        f.push(entry(2.0, state(1, 3), 1));
        f.push(entry(1.0, state(1, 4), 1));
        assert_eq!(
            drain(&mut f),
            vec![
                Position::new(1, 2),
                Position::new(1, 4),
                Position::new(1, 1),
                Position::new(1, 3),
            ]
        );
    }

    #[test]
    fn test_membership() {
        let mut f = Frontier::new(FrontierOrder::Fifo);
        let s = state(2, 2);
        assert!(!f.contains(&s));
        f.push(entry(0.0, s.clone(), 4));
        assert!(f.contains(&s));
        assert_eq!(f.recorded_cost(&s), Some(4));
        let e = f.pop().unwrap();
        assert!(f.retire(&e));
        assert!(!f.contains(&s));
        // A second retire of the same entry is rejected.
        assert!(!f.retire(&e));
    }

    #[test]
    fn test_superseded_entry_is_stale_even_when_popped_first() {
        // Equal scores, as with greedy: the older, costlier entry pops first
        // and must be recognized as stale.
        let mut f = Frontier::new(FrontierOrder::Priority);
        let s = state(3, 3);
        f.push(entry(5.0, s.clone(), 7));
        f.push(entry(5.0, s.clone(), 4));
        assert_eq!(f.recorded_cost(&s), Some(4));
        assert_eq!(f.len(), 2);

        let first = f.pop().unwrap();
        assert_eq!(first.cost, 7);
        assert!(!f.retire(&first));

        let second = f.pop().unwrap();
        assert_eq!(second.cost, 4);
        assert!(f.retire(&second));
        assert!(f.is_empty());
    }

    #[test]
    fn test_algorithm_orders_and_scores() {
        let goals: GoalSet = [Position::new(1, 5)].into_iter().collect();
        let s = SearchState::new(Position::new(1, 1), goals);
        assert_eq!(Algorithm::Bfs.order(), FrontierOrder::Fifo);
        assert_eq!(Algorithm::Dfs.order(), FrontierOrder::Lifo);
        assert_eq!(Algorithm::Greedy.order(), FrontierOrder::Priority);
        assert_eq!(Algorithm::AStar.order(), FrontierOrder::Priority);
        assert_eq!(Algorithm::Greedy.score(&s, 10), 4.0);
        assert_eq!(Algorithm::AStar.score(&s, 10), 14.0);
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("BFS".parse::<Algorithm>().unwrap(), Algorithm::Bfs);
        assert_eq!("dfs".parse::<Algorithm>().unwrap(), Algorithm::Dfs);
        assert_eq!("Greedy".parse::<Algorithm>().unwrap(), Algorithm::Greedy);
        assert_eq!("astar".parse::<Algorithm>().unwrap(), Algorithm::AStar);
        assert_eq!("a*".parse::<Algorithm>().unwrap(), Algorithm::AStar);
        assert!("dijkstra".parse::<Algorithm>().is_err());
        for alg in Algorithm::ALL {
            assert_eq!(alg.to_string().parse::<Algorithm>().unwrap(), alg);
        }
    }
}
