use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

use crate::error::{Error, Result};
use crate::node::Node;
use crate::solver::{log_outcome, log_start, Budget, SearchConfig, SearchStats, SolveStrategy};

/// An entry of the open set, ordered so that `BinaryHeap` pops the lowest
/// `f = cost + estimate` first and, among equal `f`, the earliest arrival.
struct OpenEntry<'a, N> {
    f: u32,
    arrival: u64,
    node: &'a N,
}

impl<N> PartialEq for OpenEntry<'_, N> {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.arrival == other.arrival
    }
}

impl<N> Eq for OpenEntry<'_, N> {}

impl<N> PartialOrd for OpenEntry<'_, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N> Ord for OpenEntry<'_, N> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.arrival.cmp(&self.arrival))
    }
}

/// A* search ordered by `cost + heuristic_estimate`.
///
/// States are compared by value. A child is offered to the open set only if its
/// state has not been seen yet, or has only been seen via a longer path; stale
/// open entries are skipped when popped. With an admissible estimate the first
/// goal popped uses the fewest moves.
#[derive(Clone, Debug, Default)]
pub struct AStarSearch {
    config: SearchConfig,
    stats: SearchStats,
}

impl AStarSearch {
    pub fn new() -> Self {
        AStarSearch::default()
    }

    pub fn with_config(config: SearchConfig) -> Self {
        AStarSearch {
            config,
            stats: SearchStats::default(),
        }
    }

    fn search<'a, N: Node<'a>>(
        &self,
        start: &'a N,
        budget: &mut Budget<'_>,
    ) -> Result<Option<&'a N>> {
        let base_cost = start.cost();
        let mut open = BinaryHeap::new();
        // Cheapest known cost per state; covers both open and closed states.
        let mut best_cost: HashMap<N::State, u32> = HashMap::new();
        let mut arrivals = 0u64;
        let mut cut_off = false;

        best_cost.insert(start.state(), base_cost);
        open.push(OpenEntry {
            f: base_cost + start.heuristic_estimate(),
            arrival: arrivals,
            node: start,
        });

        while let Some(OpenEntry { node, .. }) = open.pop() {
            let cost = node.cost();
            if best_cost
                .get(&node.state())
                .is_some_and(|&best| best < cost)
            {
                continue;
            }

            budget.visit()?;
            if node.is_goal() {
                return Ok(Some(node));
            }

            for &child in node.children() {
                let child_cost = child.cost();
                if let Some(limit) = budget.max_depth() {
                    if child_cost - base_cost > limit {
                        cut_off = true;
                        continue;
                    }
                }
                match best_cost.entry(child.state()) {
                    Entry::Occupied(seen) if *seen.get() <= child_cost => continue,
                    Entry::Occupied(mut seen) => {
                        seen.insert(child_cost);
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(child_cost);
                    }
                }
                arrivals += 1;
                open.push(OpenEntry {
                    f: child_cost + child.heuristic_estimate(),
                    arrival: arrivals,
                    node: child,
                });
            }
            log::trace!(
                "astar: {} open, {} states seen",
                open.len(),
                best_cost.len()
            );
        }

        match budget.max_depth() {
            Some(limit) if cut_off => Err(Error::DepthLimitReached { limit }),
            _ => Ok(None),
        }
    }
}

impl SolveStrategy for AStarSearch {
    fn solve<'a, N: Node<'a>>(&mut self, start: &'a N) -> Result<Option<&'a N>> {
        log_start("astar", start, &self.config);
        let mut budget = Budget::new(&self.config);
        let result = self.search(start, &mut budget);
        self.stats = budget.stats();
        log_outcome("astar", &result, &self.stats);
        result
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }
}
