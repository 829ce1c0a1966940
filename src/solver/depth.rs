use crate::error::{Error, Result};
use crate::node::Node;
use crate::solver::{log_outcome, log_start, Budget, SearchConfig, SearchStats, SolveStrategy};

/// How a depth-bounded traversal ended.
enum Pass<'a, N> {
    Found(&'a N),
    /// Every node was visited; nothing was cut off by the bound.
    Exhausted,
    /// No goal found, but some nodes lay below the bound.
    CutOff,
}

/// One level of the traversal: the successors of the state at `depth` and the
/// index of the next one to try.
struct Frame<Step, State> {
    successors: Vec<(Step, State)>,
    next: usize,
    depth: u32,
}

/// Depth-first traversal in child order, never descending below `limit`.
///
/// The walk runs on bare states from [`Node::successors`] instead of cached
/// children, so a pass holds one frame per level and leaves the node storage
/// untouched. Only when a goal is found is its ancestor chain built as nodes,
/// below `start`.
fn depth_limited<'a, N: Node<'a>>(
    start: &'a N,
    limit: Option<u32>,
    budget: &mut Budget<'_>,
) -> Result<Pass<'a, N>> {
    budget.visit()?;
    if start.is_goal() {
        return Ok(Pass::Found(start));
    }

    let mut cut_off = false;
    let mut stack = vec![Frame {
        successors: start.successors(&start.state(), start.last_step()),
        next: 0,
        depth: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.successors.len() {
            stack.pop();
            continue;
        }
        if limit.is_some_and(|limit| frame.depth >= limit) {
            cut_off = true;
            stack.pop();
            continue;
        }

        let index = frame.next;
        frame.next += 1;
        let (step, state) = &frame.successors[index];

        budget.visit()?;
        if start.is_goal_state(state) {
            return goal_node(start, &stack).map(Pass::Found);
        }
        let successors = start.successors(state, Some(*step));
        let depth = frame.depth + 1;
        stack.push(Frame {
            successors,
            next: 0,
            depth,
        });
    }

    Ok(if cut_off { Pass::CutOff } else { Pass::Exhausted })
}

/// Follows the steps taken by every frame on `stack`, creating the nodes from
/// `start` down to the goal.
fn goal_node<'a, N: Node<'a>>(
    start: &'a N,
    stack: &[Frame<N::Step, N::State>],
) -> Result<&'a N> {
    stack.iter().try_fold(start, |node, frame| {
        let (step, _) = &frame.successors[frame.next - 1];
        node.child_by_step(*step).ok_or(Error::MissingChild {
            depth: frame.depth + 1,
        })
    })
}

/// Depth-first search trying children in their fixed order.
///
/// Without a configured `max_depth` the search has no bound and no visited set,
/// so on large or unsolvable boards it only stops through a node limit, a time
/// limit or cancellation. With `max_depth` set, nodes deeper than the bound are
/// skipped and `DepthLimitReached` is reported if that hid the whole remainder
/// of the search space.
#[derive(Clone, Debug, Default)]
pub struct DepthSearch {
    config: SearchConfig,
    stats: SearchStats,
}

impl DepthSearch {
    pub fn new() -> Self {
        DepthSearch::default()
    }

    pub fn with_config(config: SearchConfig) -> Self {
        DepthSearch {
            config,
            stats: SearchStats::default(),
        }
    }
}

impl SolveStrategy for DepthSearch {
    fn solve<'a, N: Node<'a>>(&mut self, start: &'a N) -> Result<Option<&'a N>> {
        log_start("depth", start, &self.config);
        let mut budget = Budget::new(&self.config);
        let limit = budget.max_depth();
        let result = depth_limited(start, limit, &mut budget).and_then(|pass| match pass {
            Pass::Found(goal) => Ok(Some(goal)),
            Pass::Exhausted => Ok(None),
            Pass::CutOff => Err(Error::DepthLimitReached {
                limit: limit.unwrap_or_default(),
            }),
        });
        self.stats = budget.stats();
        log_outcome("depth", &result, &self.stats);
        result
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }
}

/// Iterative deepening depth-first search.
///
/// Runs depth-bounded passes with limits 0, 1, 2, ... until one finds a goal,
/// so the goal found uses the fewest moves. Shallow levels are revisited on
/// every pass. The depth of each node is tracked by the traversal itself, not
/// read from [`Node::cost`].
#[derive(Clone, Debug, Default)]
pub struct IterativeDeepening {
    config: SearchConfig,
    stats: SearchStats,
}

impl IterativeDeepening {
    pub fn new() -> Self {
        IterativeDeepening::default()
    }

    pub fn with_config(config: SearchConfig) -> Self {
        IterativeDeepening {
            config,
            stats: SearchStats::default(),
        }
    }

    fn search<'a, N: Node<'a>>(
        &self,
        start: &'a N,
        budget: &mut Budget<'_>,
    ) -> Result<Option<&'a N>> {
        let mut limit = 0u32;
        loop {
            match depth_limited(start, Some(limit), budget)? {
                Pass::Found(goal) => return Ok(Some(goal)),
                Pass::Exhausted => return Ok(None),
                Pass::CutOff => {}
            }
            if let Some(max_depth) = budget.max_depth() {
                if limit >= max_depth {
                    return Err(Error::DepthLimitReached { limit: max_depth });
                }
            }
            limit += 1;
            log::debug!("iterative: raising depth limit to {}", limit);
        }
    }
}

impl SolveStrategy for IterativeDeepening {
    fn solve<'a, N: Node<'a>>(&mut self, start: &'a N) -> Result<Option<&'a N>> {
        log_start("iterative", start, &self.config);
        let mut budget = Budget::new(&self.config);
        let result = self.search(start, &mut budget);
        self.stats = budget.stats();
        log_outcome("iterative", &result, &self.stats);
        result
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BoardSize, Move, PuzzleArena, PuzzleNode};
    use crate::path::move_sequence;
    use crate::solver::SearchLimits;

    fn size3() -> BoardSize {
        BoardSize::new(3, 3).unwrap()
    }

    #[test]
    fn test_depth_search_follows_child_order() {
        // Blank top-left: DOWN is tried before RIGHT. With a bound of 2 the DOWN
        // subtree holds no goal, so the goal under RIGHT is the first one found.
        let arena = PuzzleArena::new();
        let size = BoardSize::new(2, 2).unwrap();
        let start = PuzzleNode::root(&arena, size, vec![0, 1, 3, 2]).unwrap();
        let config = SearchConfig::new(SearchLimits::default().with_max_depth(2));
        let goal = DepthSearch::with_config(config).solve(start).unwrap().unwrap();
        assert_eq!(move_sequence(goal), vec![Move::Right, Move::Down]);
    }

    #[test]
    fn test_depth_search_unbounded_finds_a_goal_on_two_by_two() {
        // A 2x2 board with one reverse move pruned is a single cycle, so the
        // first branch reaches the goal without a bound.
        let arena = PuzzleArena::new();
        let size = BoardSize::new(2, 2).unwrap();
        let start = PuzzleNode::root(&arena, size, vec![1, 2, 0, 3]).unwrap();
        let mut search = DepthSearch::new();
        let goal = search.solve(start).unwrap().unwrap();
        assert!(goal.is_goal());
        // UP first: the blank walks the long way round the cycle.
        assert_eq!(goal.cost(), 11);
        assert_eq!(search.stats().visited, 12);
    }

    #[test]
    fn test_depth_search_reports_cut_off() {
        let arena = PuzzleArena::new();
        let start = PuzzleNode::root(&arena, size3(), vec![1, 2, 3, 0, 4, 6, 7, 5, 8]).unwrap();
        let config = SearchConfig::new(SearchLimits::default().with_max_depth(2));
        let mut search = DepthSearch::with_config(config);
        assert_eq!(
            search.solve(start),
            Err(Error::DepthLimitReached { limit: 2 })
        );
        assert_eq!(search.stats().visited, 9);
    }

    #[test]
    fn test_depth_search_does_not_consume_cached_children() {
        let arena = PuzzleArena::new();
        let start = PuzzleNode::root(&arena, size3(), vec![1, 2, 3, 0, 4, 6, 7, 5, 8]).unwrap();
        let before = start.children().len();
        let config = SearchConfig::new(SearchLimits::default().with_max_depth(3));
        DepthSearch::with_config(config).solve(start).unwrap();
        assert_eq!(start.children().len(), before);
    }

    #[test]
    fn test_iterative_deepening_finds_shortest_path() {
        let arena = PuzzleArena::new();
        let start = PuzzleNode::root(&arena, size3(), vec![1, 2, 3, 0, 4, 6, 7, 5, 8]).unwrap();
        let mut search = IterativeDeepening::new();
        let goal = search.solve(start).unwrap().unwrap();
        assert_eq!(goal.cost(), 3);
        assert_eq!(
            move_sequence(goal),
            vec![Move::Right, Move::Down, Move::Right]
        );
        // Passes 0, 1 and 2 revisit shallow levels: 1 + 4 + 9, then pass 3 up to the goal.
        assert!(search.stats().visited > 14);
    }

    #[test]
    fn test_iterative_deepening_keeps_only_the_goal_chain() {
        let arena = PuzzleArena::new();
        let start = PuzzleNode::root(&arena, size3(), vec![1, 2, 3, 0, 4, 6, 7, 5, 8]).unwrap();
        let goal = IterativeDeepening::new().solve(start).unwrap().unwrap();
        assert_eq!(goal.cost(), 3);
        // At most one sibling group per level of the goal's ancestor chain.
        assert!(arena.len() <= 1 + 4 * 3);
    }

    #[test]
    fn test_iterative_deepening_passes_allocate_no_nodes() {
        // Unsolvable: every pass is cut off and nothing is ever found.
        let arena = PuzzleArena::new();
        let start = PuzzleNode::root(&arena, size3(), vec![2, 1, 3, 4, 5, 6, 7, 8, 0]).unwrap();
        let config = SearchConfig::new(SearchLimits::default().with_max_depth(12));
        let mut search = IterativeDeepening::with_config(config);
        assert_eq!(
            search.solve(start),
            Err(Error::DepthLimitReached { limit: 12 })
        );
        assert!(search.stats().visited > 1_000);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_iterative_deepening_depth_limit() {
        let arena = PuzzleArena::new();
        let start = PuzzleNode::root(&arena, size3(), vec![1, 2, 3, 0, 4, 6, 7, 5, 8]).unwrap();
        let config = SearchConfig::new(SearchLimits::default().with_max_depth(2));
        let mut search = IterativeDeepening::with_config(config);
        assert_eq!(
            search.solve(start),
            Err(Error::DepthLimitReached { limit: 2 })
        );
        assert_eq!(search.stats().visited, 1 + 4 + 9);
    }
}
