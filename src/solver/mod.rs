//! Solve strategies over [`Node`] search spaces.
//!
//! Every strategy implements [`SolveStrategy`]: given a start node it returns a
//! goal node reachable from it, `Ok(None)` when its search space is exhausted,
//! or an abort error when cancelled or out of budget. The returned goal's
//! parent chain leads back to the start node.
//!
//! - [`BreadthSearch`]: ply-by-ply, minimum number of moves.
//! - [`DepthSearch`]: depth-first in child order, no bound unless configured.
//! - [`IterativeDeepening`]: depth-bounded passes with a growing limit.
//! - [`AStarSearch`]: best-first on `cost + heuristic_estimate`.
//! - [`ShuffleStrategy`]: not a solver; a random walk used to scramble a board.
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::node::Node;

mod astar;
mod breadth;
mod depth;
mod shuffle;

pub use astar::AStarSearch;
pub use breadth::BreadthSearch;
pub use depth::{DepthSearch, IterativeDeepening};
pub use shuffle::ShuffleStrategy;

/// The common contract of all strategies.
pub trait SolveStrategy {
    /// Searches from `start` for a node whose `is_goal()` holds.
    ///
    /// # Errors
    /// Returns an abort error (`Cancelled`, `NodeLimitReached`,
    /// `DepthLimitReached`, `TimeLimitReached`) when the search stopped early.
    fn solve<'a, N: Node<'a>>(&mut self, start: &'a N) -> Result<Option<&'a N>>;

    /// Statistics of the most recent `solve` call.
    fn stats(&self) -> SearchStats;
}

/// Optional bounds on a single search. All unset by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Deepest level (moves from the start) the search may reach.
    pub max_depth: Option<u32>,
    /// Maximum number of nodes visited.
    pub max_nodes: Option<u64>,
    /// Maximum wall-clock time.
    pub time_limit: Option<Duration>,
}

impl SearchLimits {
    pub fn unlimited() -> Self {
        SearchLimits::default()
    }

    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_max_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = Some(nodes);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

/// Cooperative cancellation flag shared between a running search and its caller.
///
/// Clones share the same flag. Searches check it every time they visit a node.
///
/// # Examples
/// ```
/// use sliding_puzzle::solver::CancelToken;
/// let token = CancelToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Limits and cancellation handle carried by a strategy.
#[derive(Clone, Debug, Default)]
pub struct SearchConfig {
    pub limits: SearchLimits,
    pub cancel: CancelToken,
}

impl SearchConfig {
    pub fn new(limits: SearchLimits) -> Self {
        SearchConfig {
            limits,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Counters recorded by a strategy during its last run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes visited (goal-tested), including repeats across passes.
    pub visited: u64,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

/// Tracks the resources a single search has used against its config.
pub(crate) struct Budget<'c> {
    config: &'c SearchConfig,
    started: Instant,
    visited: u64,
}

impl<'c> Budget<'c> {
    pub(crate) fn new(config: &'c SearchConfig) -> Self {
        Budget {
            config,
            started: Instant::now(),
            visited: 0,
        }
    }

    /// Accounts for one node visit. Called before the node's goal test.
    pub(crate) fn visit(&mut self) -> Result<()> {
        if self.config.cancel.is_cancelled() {
            return Err(Error::Cancelled {
                visited: self.visited,
            });
        }
        let limits = &self.config.limits;
        if let Some(limit) = limits.max_nodes {
            if self.visited >= limit {
                return Err(Error::NodeLimitReached { limit });
            }
        }
        if let Some(limit) = limits.time_limit {
            if self.started.elapsed() >= limit {
                return Err(Error::TimeLimitReached { limit });
            }
        }
        self.visited += 1;
        Ok(())
    }

    pub(crate) fn max_depth(&self) -> Option<u32> {
        self.config.limits.max_depth
    }

    pub(crate) fn stats(&self) -> SearchStats {
        SearchStats {
            visited: self.visited,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Logs the start of a search run.
pub(crate) fn log_start<'a, N: Node<'a>>(name: &str, start: &'a N, config: &SearchConfig) {
    log::debug!(
        "{}: starting at depth {} with estimate {} ({:?})",
        name,
        start.cost(),
        start.heuristic_estimate(),
        config.limits
    );
}

/// Logs the end of a search run.
pub(crate) fn log_outcome<'a, N: Node<'a>>(
    name: &str,
    result: &Result<Option<&'a N>>,
    stats: &SearchStats,
) {
    match result {
        Ok(Some(goal)) => log::debug!(
            "{}: goal at depth {} after {} nodes in {:?}",
            name,
            goal.cost(),
            stats.visited,
            stats.elapsed
        ),
        Ok(None) => log::debug!(
            "{}: search space exhausted after {} nodes",
            name,
            stats.visited
        ),
        Err(err) => log::warn!("{}: {} ({} nodes visited)", name, err, stats.visited),
    }
}

/// Selects one of the solving strategies by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    Breadth,
    Depth,
    IterativeDeepening,
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Breadth,
        Strategy::Depth,
        Strategy::IterativeDeepening,
        Strategy::AStar,
    ];

    /// Runs this strategy on `start` with `config`.
    ///
    /// Returns the search result together with the run's statistics, which are
    /// recorded whether or not the search succeeded.
    pub fn run<'a, N: Node<'a>>(
        self,
        start: &'a N,
        config: &SearchConfig,
    ) -> (Result<Option<&'a N>>, SearchStats) {
        match self {
            Strategy::Breadth => run_with(BreadthSearch::with_config(config.clone()), start),
            Strategy::Depth => run_with(DepthSearch::with_config(config.clone()), start),
            Strategy::IterativeDeepening => {
                run_with(IterativeDeepening::with_config(config.clone()), start)
            }
            Strategy::AStar => run_with(AStarSearch::with_config(config.clone()), start),
        }
    }
}

fn run_with<'a, N: Node<'a>, S: SolveStrategy>(
    mut strategy: S,
    start: &'a N,
) -> (Result<Option<&'a N>>, SearchStats) {
    let result = strategy.solve(start);
    (result, strategy.stats())
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Breadth => "breadth",
            Strategy::Depth => "depth",
            Strategy::IterativeDeepening => "iterative",
            Strategy::AStar => "astar",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "breadth" | "bfs" => Ok(Strategy::Breadth),
            "depth" | "dfs" => Ok(Strategy::Depth),
            "iterative" | "iddfs" | "iterative-deepening" => Ok(Strategy::IterativeDeepening),
            "astar" | "a*" => Ok(Strategy::AStar),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}
