//! The state-space node contract shared by every solve strategy.

use std::fmt::Debug;
use std::hash::Hash;

/// A vertex of a search space.
///
/// Nodes are immutable apart from internally memoized values. `'a` is the
/// lifetime of the storage that owns the nodes: parents and children are handed
/// out as `&'a` references, so a goal node returned by a search can be walked
/// back to its root for as long as that storage lives.
pub trait Node<'a>: Sized + 'a {
    /// Payload of a node. Equal states denote the same position in the search space.
    type State: Clone + Eq + Hash + Debug;

    /// Label of the edge between a node and one of its children.
    type Step: Copy + Eq + Debug;

    /// A copy of this node's state; changing it does not affect the node.
    fn state(&self) -> Self::State;

    fn is_goal(&self) -> bool;

    /// The direct predecessor, or `None` for a root.
    fn parent(&self) -> Option<&'a Self>;

    /// All direct successors, in a fixed order.
    ///
    /// Computed on first call and cached; later calls return the same slice.
    fn children(&'a self) -> &'a [&'a Self];

    /// The step that produced this node, `None` for a root.
    fn last_step(&self) -> Option<Self::Step>;

    /// Successors of a bare `state` reached through `last`, in the same order
    /// and under the same pruning rules as [`Node::children`].
    ///
    /// Nothing is allocated in the node storage, so bounded searches can walk
    /// deep subtrees without retaining them. `self` only supplies context (board
    /// shape, rules); `state` need not be this node's own state.
    fn successors(
        &self,
        state: &Self::State,
        last: Option<Self::Step>,
    ) -> Vec<(Self::Step, Self::State)>;

    /// Goal test on a bare state; agrees with [`Node::is_goal`].
    fn is_goal_state(&self, state: &Self::State) -> bool;

    /// The cached child reached through `step`, if that step is legal here.
    fn child_by_step(&'a self, step: Self::Step) -> Option<&'a Self>;

    /// Estimated remaining cost to a goal, for heuristic strategies.
    fn heuristic_estimate(&self) -> u32;

    /// Number of parent links between this node and its root.
    fn cost(&self) -> u32;
}
