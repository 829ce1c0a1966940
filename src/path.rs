//! Reconstruction of solutions from a goal node's ancestor chain.
//!
//! A strategy returns a goal node; the move sequence is encoded in its parent
//! links. Walking them back to the root and reversing gives the path from the
//! start board to the goal.
use crate::engine::{apply_move, BoardSize, Move, PuzzleNode, Tile};
use crate::error::Result;
use crate::node::Node;

/// Returns every node from the root down to `goal`, root first.
pub fn path_to_root<'a, N: Node<'a>>(goal: &'a N) -> Vec<&'a N> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(parent) = current.parent() {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}

/// The root of `node`'s ancestor chain.
pub fn root_of<'a, N: Node<'a>>(node: &'a N) -> &'a N {
    let mut current = node;
    while let Some(parent) = current.parent() {
        current = parent;
    }
    current
}

/// Moves leading from the root to `goal`, in the order they were made.
pub fn move_sequence<'a>(goal: &'a PuzzleNode<'a>) -> Vec<Move> {
    path_to_root(goal)
        .into_iter()
        .filter_map(|node| node.last_move())
        .collect()
}

/// Applies `moves` to `tiles` one after another and returns the final board.
///
/// # Errors
/// Fails if `tiles` is not a valid board or a move would push the blank off it.
pub fn replay(size: BoardSize, tiles: &[Tile], moves: &[Move]) -> Result<Vec<Tile>> {
    let mut board = tiles.to_vec();
    for &direction in moves {
        apply_move(size, &mut board, direction)?;
    }
    Ok(board)
}

/// Represents a solution extracted from a goal node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    /// Moves of the blank from the start board to the goal.
    pub moves: Vec<Move>,
    /// Every board along the way, start first and goal last.
    pub states: Vec<Vec<Tile>>,
    /// Number of moves; equal to the goal node's cost.
    pub depth: u32,
}

impl Solution {
    /// Builds a `Solution` by walking `goal`'s parent links.
    ///
    /// # Examples
    /// ```
    /// use sliding_puzzle::engine::{BoardSize, PuzzleArena, PuzzleNode};
    /// use sliding_puzzle::path::Solution;
    /// use sliding_puzzle::solver::{BreadthSearch, SolveStrategy};
    ///
    /// let arena = PuzzleArena::new();
    /// let size = BoardSize::new(3, 3).unwrap();
    /// let start = PuzzleNode::root(&arena, size, vec![1, 2, 3, 4, 5, 6, 0, 7, 8]).unwrap();
    /// let goal = BreadthSearch::new().solve(start).unwrap().unwrap();
    /// let solution = Solution::from_goal(goal);
    /// assert_eq!(solution.depth, 2);
    /// assert_eq!(solution.states.len(), 3);
    /// ```
    pub fn from_goal<'a>(goal: &'a PuzzleNode<'a>) -> Self {
        let path = path_to_root(goal);
        Solution {
            moves: path.iter().filter_map(|node| node.last_move()).collect(),
            states: path.iter().map(|node| node.state()).collect(),
            depth: goal.cost(),
        }
    }

    /// The first board, or `None` for a `Solution` built without states.
    pub fn start(&self) -> Option<&[Tile]> {
        self.states.first().map(Vec::as_slice)
    }

    /// The last board, or `None` for a `Solution` built without states.
    pub fn goal(&self) -> Option<&[Tile]> {
        self.states.last().map(Vec::as_slice)
    }
}
