use crate::error::{Error, Result};
use crate::node::Node;
use crate::solver::{log_outcome, log_start, Budget, SearchConfig, SearchStats, SolveStrategy};

/// Breadth-first search, one ply at a time.
///
/// Every node of depth `d` is goal-tested before any node of depth `d + 1`, so the
/// first goal found uses the fewest moves. Frontiers are not deduplicated: the
/// same state reached by different move sequences is kept once per sequence.
#[derive(Clone, Debug, Default)]
pub struct BreadthSearch {
    config: SearchConfig,
    stats: SearchStats,
}

impl BreadthSearch {
    pub fn new() -> Self {
        BreadthSearch::default()
    }

    pub fn with_config(config: SearchConfig) -> Self {
        BreadthSearch {
            config,
            stats: SearchStats::default(),
        }
    }

    fn search<'a, N: Node<'a>>(
        &self,
        start: &'a N,
        budget: &mut Budget<'_>,
    ) -> Result<Option<&'a N>> {
        let mut frontier = vec![start];
        let mut depth = 0u32;

        loop {
            // The last permitted level is goal-tested but not expanded.
            let at_limit = budget.max_depth().filter(|&limit| depth >= limit);
            let mut next = Vec::new();
            let mut cut_off = false;
            for &node in &frontier {
                budget.visit()?;
                if node.is_goal() {
                    return Ok(Some(node));
                }
                if at_limit.is_none() {
                    next.extend_from_slice(node.children());
                } else if !cut_off {
                    cut_off = !node.successors(&node.state(), node.last_step()).is_empty();
                }
            }

            if let Some(limit) = at_limit.filter(|_| cut_off) {
                return Err(Error::DepthLimitReached { limit });
            }
            if next.is_empty() {
                return Ok(None);
            }
            depth += 1;
            log::trace!("breadth: frontier of {} nodes at depth {}", next.len(), depth);
            frontier = next;
        }
    }
}

impl SolveStrategy for BreadthSearch {
    fn solve<'a, N: Node<'a>>(&mut self, start: &'a N) -> Result<Option<&'a N>> {
        log_start("breadth", start, &self.config);
        let mut budget = Budget::new(&self.config);
        let result = self.search(start, &mut budget);
        self.stats = budget.stats();
        log_outcome("breadth", &result, &self.stats);
        result
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }
}
