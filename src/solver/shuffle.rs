use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::Result;
use crate::node::Node;
use crate::solver::{log_outcome, log_start, Budget, SearchConfig, SearchStats, SolveStrategy};

/// Random walk of a fixed number of moves. Not a solver.
///
/// Each step picks uniformly among the current node's children, so every step
/// obeys the same rules as a search, including the ban on undoing the previous
/// move. Starting from a solved board the result is therefore always solvable,
/// and its parent chain records the walk.
#[derive(Clone, Debug)]
pub struct ShuffleStrategy {
    count: u32,
    rng: SmallRng,
    config: SearchConfig,
    stats: SearchStats,
}

impl ShuffleStrategy {
    /// A shuffle of `count` moves seeded from system entropy.
    pub fn new(count: u32) -> Self {
        ShuffleStrategy::from_rng(count, SmallRng::from_entropy())
    }

    /// A reproducible shuffle of `count` moves.
    ///
    /// # Examples
    /// ```
    /// use sliding_puzzle::engine::{BoardSize, PuzzleArena, PuzzleNode};
    /// use sliding_puzzle::node::Node;
    /// use sliding_puzzle::solver::{ShuffleStrategy, SolveStrategy};
    ///
    /// let arena = PuzzleArena::new();
    /// let start = PuzzleNode::goal(&arena, BoardSize::new(3, 3).unwrap());
    /// let a = ShuffleStrategy::with_seed(10, 7).solve(start).unwrap().unwrap();
    /// let b = ShuffleStrategy::with_seed(10, 7).solve(start).unwrap().unwrap();
    /// assert_eq!(a.state(), b.state());
    /// assert_eq!(a.cost(), 10);
    /// ```
    pub fn with_seed(count: u32, seed: u64) -> Self {
        ShuffleStrategy::from_rng(count, SmallRng::seed_from_u64(seed))
    }

    fn from_rng(count: u32, rng: SmallRng) -> Self {
        ShuffleStrategy {
            count,
            rng,
            config: SearchConfig::default(),
            stats: SearchStats::default(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

impl SolveStrategy for ShuffleStrategy {
    /// Returns the node reached after the walk; never `Ok(None)`.
    fn solve<'a, N: Node<'a>>(&mut self, start: &'a N) -> Result<Option<&'a N>> {
        log_start("shuffle", start, &self.config);
        let mut budget = Budget::new(&self.config);
        let result = random_walk(start, self.count, &mut self.rng, &mut budget).map(Some);
        self.stats = budget.stats();
        log_outcome("shuffle", &result, &self.stats);
        result
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }
}

fn random_walk<'a, N: Node<'a>>(
    start: &'a N,
    count: u32,
    rng: &mut SmallRng,
    budget: &mut Budget<'_>,
) -> Result<&'a N> {
    let mut current = start;
    for _ in 0..count {
        budget.visit()?;
        match current.children().choose(rng) {
            Some(&next) => current = next,
            None => break,
        }
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BoardSize, PuzzleArena, PuzzleNode};
    use crate::error::Error;
    use crate::heuristics::is_solvable;
    use crate::path::{move_sequence, path_to_root};
    use crate::solver::CancelToken;

    #[test]
    fn test_shuffle_walks_exactly_count_moves() {
        let arena = PuzzleArena::new();
        let size = BoardSize::new(4, 4).unwrap();
        let start = PuzzleNode::goal(&arena, size);
        let mut shuffle = ShuffleStrategy::with_seed(25, 42);
        let end = shuffle.solve(start).unwrap().unwrap();
        assert_eq!(end.cost(), 25);
        assert_eq!(path_to_root(end).len(), 26);
        assert_eq!(shuffle.stats().visited, 25);
        assert!(is_solvable(size, end.tiles()));

        let moves = move_sequence(end);
        for pair in moves.windows(2) {
            assert_ne!(pair[1], pair[0].opposite());
        }
    }

    #[test]
    fn test_shuffle_zero_moves_returns_start() {
        let arena = PuzzleArena::new();
        let start = PuzzleNode::goal(&arena, BoardSize::new(3, 3).unwrap());
        let end = ShuffleStrategy::new(0).solve(start).unwrap().unwrap();
        assert!(std::ptr::eq(end, start));
    }

    #[test]
    fn test_shuffle_seeds_differ() {
        let arena = PuzzleArena::new();
        let start = PuzzleNode::goal(&arena, BoardSize::new(4, 4).unwrap());
        let ends: Vec<Vec<u16>> = (0..8)
            .map(|seed| {
                ShuffleStrategy::with_seed(30, seed)
                    .solve(start)
                    .unwrap()
                    .unwrap()
                    .state()
            })
            .collect();
        assert!(ends.iter().any(|state| state != &ends[0]));
    }

    #[test]
    fn test_shuffle_honours_cancellation() {
        let arena = PuzzleArena::new();
        let start = PuzzleNode::goal(&arena, BoardSize::new(3, 3).unwrap());
        let token = CancelToken::new();
        token.cancel();
        let config = SearchConfig::default().with_cancel(token);
        let mut shuffle = ShuffleStrategy::with_seed(5, 1).with_config(config);
        assert_eq!(
            shuffle.solve(start),
            Err(Error::Cancelled { visited: 0 })
        );
    }
}
