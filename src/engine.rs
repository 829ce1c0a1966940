//! Puzzle state model for sliding-tile puzzles.
//!
//! This module defines the concrete search node for W×H sliding puzzles:
//! - `BoardSize`: Validated board dimensions.
//! - `Move`: The four directions the blank can travel.
//! - `PuzzleNode`: A node holding a flat tile array, its board size, the move that
//!   produced it and a back-reference to its parent. Children, the heuristic
//!   estimate and the path cost are computed on first access and cached.
//!
//! Nodes live in a `PuzzleArena`. Parent links and cached children are plain
//! references into that arena, so a goal node's ancestor chain stays valid for as
//! long as the caller keeps the arena alive.
use std::cell::OnceCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use typed_arena::Arena;

use crate::error::{Error, Result};
use crate::heuristics::Heuristic;
use crate::node::Node;

/// Value stored in a board cell. `0` is the blank.
pub type Tile = u16;

/// The largest number of cells a board may have, so that every tile fits in a `Tile`.
pub const MAX_CELLS: usize = Tile::MAX as usize + 1;

/// Arena owning every node of one or more searches.
pub type PuzzleArena<'a> = Arena<PuzzleNode<'a>>;

/// Dimensions of a sliding puzzle board.
///
/// Both dimensions are at least 2 and the cell count never exceeds [`MAX_CELLS`].
///
/// # Examples
/// ```
/// use sliding_puzzle::engine::BoardSize;
/// let size = BoardSize::new(3, 2).unwrap();
/// assert_eq!(size.len(), 6);
/// assert!(BoardSize::new(1, 5).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoardSize {
    width: usize,
    height: usize,
}

impl BoardSize {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width < 2 || height < 2 {
            return Err(Error::InvalidBoardSize { width, height });
        }
        match width.checked_mul(height) {
            Some(cells) if cells <= MAX_CELLS => Ok(BoardSize { width, height }),
            _ => Err(Error::BoardTooLarge {
                width,
                height,
                max: MAX_CELLS,
            }),
        }
    }

    /// A square board of `n`×`n` cells.
    pub fn square(n: usize) -> Result<Self> {
        BoardSize::new(n, n)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells on the board.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Always `false`; a valid board has at least four cells.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Converts a flat index into `(x, y)` grid coordinates.
    pub fn coordinates(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Direction in which the blank travels.
///
/// `Up` swaps the blank with the tile above it, and so on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Right,
    Left,
}

impl Move {
    /// Expansion order of children. Depth-first search and shuffling depend on it.
    pub const ORDER: [Move; 4] = [Move::Up, Move::Down, Move::Right, Move::Left];

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Right => Move::Left,
            Move::Left => Move::Right,
        }
    }

    /// Index the blank at `blank` moves to, or `None` if it would leave the board.
    pub fn target(&self, blank: usize, size: BoardSize) -> Option<usize> {
        let width = size.width();
        match self {
            Move::Up => (blank >= width).then(|| blank - width),
            Move::Down => (blank < width * (size.height() - 1)).then(|| blank + width),
            Move::Right => (blank % width != width - 1).then(|| blank + 1),
            Move::Left => (blank % width != 0).then(|| blank - 1),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::Up => "UP",
            Move::Down => "DOWN",
            Move::Right => "RIGHT",
            Move::Left => "LEFT",
        };
        write!(f, "{}", s)
    }
}

/// Returns the canonical solved board: `1..len` in order, blank in the last cell.
pub fn goal_tiles(size: BoardSize) -> Vec<Tile> {
    let len = size.len();
    (1..len)
        .map(|value| value as Tile)
        .chain(std::iter::once(0))
        .collect()
}

/// Checks that `tiles` is a permutation of `0..size.len()`.
///
/// Returns the index of the blank on success.
pub fn validate_tiles(size: BoardSize, tiles: &[Tile]) -> Result<usize> {
    let len = size.len();
    if tiles.len() != len {
        return Err(Error::StateLengthMismatch {
            expected: len,
            got: tiles.len(),
        });
    }
    let blank = tiles
        .iter()
        .position(|&tile| tile == 0)
        .ok_or(Error::MissingBlank)?;

    let mut seen = HashSet::with_capacity(len);
    for &tile in tiles {
        if tile as usize >= len {
            return Err(Error::TileOutOfRange {
                value: tile as usize,
                len,
            });
        }
        if !seen.insert(tile) {
            return Err(Error::DuplicateTile { value: tile });
        }
    }
    Ok(blank)
}

/// Slides the blank one step in `direction`, in place.
///
/// Unlike child generation, this ignores the reverse-move rule; it is used to
/// replay a recorded move list.
pub fn apply_move(size: BoardSize, tiles: &mut [Tile], direction: Move) -> Result<()> {
    let blank = validate_tiles(size, tiles)?;
    let target = direction
        .target(blank, size)
        .ok_or(Error::IllegalMove { direction, blank })?;
    tiles.swap(blank, target);
    Ok(())
}

/// Moves open to the blank at `blank`, with their targets, in [`Move::ORDER`].
///
/// The reverse of `last` is skipped so a child never undoes its parent's move.
fn legal_moves(
    size: BoardSize,
    blank: usize,
    last: Option<Move>,
) -> impl Iterator<Item = (Move, usize)> {
    Move::ORDER
        .into_iter()
        // cycle check of length 2
        .filter(move |direction| last != Some(direction.opposite()))
        .filter_map(move |direction| Some((direction, direction.target(blank, size)?)))
}

/// Board is solved when the first `len - 1` cells read `1, 2, ...`; the last
/// cell is not checked.
fn is_solved(tiles: &[Tile]) -> bool {
    let last = tiles.len().saturating_sub(1);
    tiles[..last]
        .iter()
        .enumerate()
        .all(|(i, &tile)| tile as usize == i + 1)
}

/// A sliding puzzle state-space node.
pub struct PuzzleNode<'a> {
    arena: &'a PuzzleArena<'a>,
    parent: Option<&'a PuzzleNode<'a>>,
    size: BoardSize,
    tiles: Box<[Tile]>,
    blank: usize,
    last_move: Option<Move>,
    heuristic: Heuristic,
    children: OnceCell<Vec<&'a PuzzleNode<'a>>>,
    heuristic_estimate: OnceCell<u32>,
    cost: OnceCell<u32>,
}

impl<'a> PuzzleNode<'a> {
    /// Builds a root node (no parent, no last move) using the Manhattan heuristic.
    ///
    /// # Errors
    /// Fails if `tiles` is not a permutation of `0..size.len()`.
    ///
    /// # Examples
    /// ```
    /// use sliding_puzzle::engine::{BoardSize, PuzzleArena, PuzzleNode};
    /// use sliding_puzzle::node::Node;
    ///
    /// let arena = PuzzleArena::new();
    /// let size = BoardSize::new(2, 2).unwrap();
    /// let root = PuzzleNode::root(&arena, size, vec![1, 2, 0, 3]).unwrap();
    /// assert!(!root.is_goal());
    /// assert_eq!(root.children().len(), 2);
    ///
    /// assert!(PuzzleNode::root(&arena, size, vec![1, 2, 3]).is_err());
    /// ```
    pub fn root(
        arena: &'a PuzzleArena<'a>,
        size: BoardSize,
        tiles: Vec<Tile>,
    ) -> Result<&'a PuzzleNode<'a>> {
        PuzzleNode::root_with_heuristic(arena, size, tiles, Heuristic::default())
    }

    /// Builds a root node whose subtree uses `heuristic` for its estimates.
    pub fn root_with_heuristic(
        arena: &'a PuzzleArena<'a>,
        size: BoardSize,
        tiles: Vec<Tile>,
        heuristic: Heuristic,
    ) -> Result<&'a PuzzleNode<'a>> {
        let blank = validate_tiles(size, &tiles)?;
        Ok(arena.alloc(PuzzleNode {
            arena,
            parent: None,
            size,
            tiles: tiles.into_boxed_slice(),
            blank,
            last_move: None,
            heuristic,
            children: OnceCell::new(),
            heuristic_estimate: OnceCell::new(),
            cost: OnceCell::new(),
        }))
    }

    /// Builds a root node holding the solved board.
    pub fn goal(arena: &'a PuzzleArena<'a>, size: BoardSize) -> &'a PuzzleNode<'a> {
        // A freshly generated goal board is always a valid permutation.
        arena.alloc(PuzzleNode {
            arena,
            parent: None,
            size,
            blank: size.len() - 1,
            tiles: goal_tiles(size).into_boxed_slice(),
            last_move: None,
            heuristic: Heuristic::default(),
            children: OnceCell::new(),
            heuristic_estimate: OnceCell::new(),
            cost: OnceCell::new(),
        })
    }

    /// Builds a new root with the same board and heuristic as this node.
    ///
    /// Searches are always started from a fresh root so that costs, move
    /// pruning and the returned ancestor chain begin at the displayed board.
    pub fn reroot(&self) -> &'a PuzzleNode<'a> {
        self.arena.alloc(PuzzleNode {
            arena: self.arena,
            parent: None,
            size: self.size,
            tiles: self.tiles.clone(),
            blank: self.blank,
            last_move: None,
            heuristic: self.heuristic,
            children: OnceCell::new(),
            heuristic_estimate: OnceCell::new(),
            cost: OnceCell::new(),
        })
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Borrowed view of the tiles, for callers that only read them.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Index of the blank cell.
    pub fn blank(&self) -> usize {
        self.blank
    }

    /// The move that produced this node, `None` for a root.
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    fn generate_children(&'a self) -> Vec<&'a PuzzleNode<'a>> {
        legal_moves(self.size, self.blank, self.last_move)
            .map(|(direction, target)| self.child(direction, target))
            .collect()
    }

    fn child(&'a self, direction: Move, target: usize) -> &'a PuzzleNode<'a> {
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, target);
        self.arena.alloc(PuzzleNode {
            arena: self.arena,
            parent: Some(self),
            size: self.size,
            tiles,
            blank: target,
            last_move: Some(direction),
            heuristic: self.heuristic,
            children: OnceCell::new(),
            heuristic_estimate: OnceCell::new(),
            cost: OnceCell::new(),
        })
    }
}

impl<'a> Node<'a> for PuzzleNode<'a> {
    type State = Vec<Tile>;
    type Step = Move;

    fn state(&self) -> Vec<Tile> {
        self.tiles.to_vec()
    }

    /// The last cell is not checked: a board whose first `len - 1` cells read
    /// `1, 2, ...` counts as solved.
    fn is_goal(&self) -> bool {
        is_solved(&self.tiles)
    }

    fn last_step(&self) -> Option<Move> {
        self.last_move
    }

    /// `state` is expected to be a board of this node's size; a state without
    /// a blank has no successors.
    fn successors(&self, state: &Vec<Tile>, last: Option<Move>) -> Vec<(Move, Vec<Tile>)> {
        let Some(blank) = state.iter().position(|&tile| tile == 0) else {
            return Vec::new();
        };
        legal_moves(self.size, blank, last)
            .map(|(direction, target)| {
                let mut next = state.clone();
                next.swap(blank, target);
                (direction, next)
            })
            .collect()
    }

    fn is_goal_state(&self, state: &Vec<Tile>) -> bool {
        is_solved(state)
    }

    fn child_by_step(&'a self, step: Move) -> Option<&'a PuzzleNode<'a>> {
        self.children()
            .iter()
            .copied()
            .find(|child| child.last_move == Some(step))
    }

    fn parent(&self) -> Option<&'a PuzzleNode<'a>> {
        self.parent
    }

    fn children(&'a self) -> &'a [&'a PuzzleNode<'a>] {
        self.children.get_or_init(|| self.generate_children())
    }

    fn heuristic_estimate(&self) -> u32 {
        *self
            .heuristic_estimate
            .get_or_init(|| self.heuristic.estimate(self.size, &self.tiles))
    }

    fn cost(&self) -> u32 {
        *self.cost.get_or_init(|| {
            let mut hops = 0;
            let mut ancestor = self.parent;
            while let Some(node) = ancestor {
                hops += 1;
                ancestor = node.parent;
            }
            hops
        })
    }
}

impl PartialEq for PuzzleNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.tiles == other.tiles
    }
}

impl Eq for PuzzleNode<'_> {}

impl Hash for PuzzleNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size.hash(state);
        self.tiles.hash(state);
    }
}

impl fmt::Debug for PuzzleNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PuzzleNode")
            .field("size", &self.size)
            .field("tiles", &self.tiles)
            .field("last_move", &self.last_move)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

impl fmt::Display for PuzzleNode<'_> {
    /// Renders the board row by row, with `.` for the blank.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell_width = (self.size.len() - 1).to_string().len();
        for (row_idx, row) in self.tiles.chunks(self.size.width()).enumerate() {
            if row_idx > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = row
                .iter()
                .map(|&tile| match tile {
                    0 => format!("{:>w$}", ".", w = cell_width),
                    n => format!("{:>w$}", n, w = cell_width),
                })
                .collect();
            write!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(width: usize, height: usize) -> BoardSize {
        BoardSize::new(width, height).unwrap()
    }

    fn moves_of<'a>(nodes: &[&'a PuzzleNode<'a>]) -> Vec<Move> {
        nodes.iter().map(|n| n.last_move().unwrap()).collect()
    }

    #[test]
    fn test_board_size_validation() {
        assert!(BoardSize::new(2, 2).is_ok());
        assert_eq!(
            BoardSize::new(1, 3),
            Err(Error::InvalidBoardSize {
                width: 1,
                height: 3
            })
        );
        assert!(matches!(
            BoardSize::new(300, 300),
            Err(Error::BoardTooLarge { .. })
        ));
        assert_eq!(size(4, 3).coordinates(7), (3, 1));
        assert_eq!(size(4, 3).to_string(), "4x3");
    }

    #[test]
    fn test_goal_tiles() {
        assert_eq!(goal_tiles(size(3, 3)), vec![1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert_eq!(goal_tiles(size(3, 2)), vec![1, 2, 3, 4, 5, 0]);
    }

    #[test]
    fn test_root_rejects_malformed_states() {
        let arena = PuzzleArena::new();
        let s = size(2, 2);
        assert_eq!(
            PuzzleNode::root(&arena, s, vec![1, 2, 0]).unwrap_err(),
            Error::StateLengthMismatch {
                expected: 4,
                got: 3
            }
        );
        assert_eq!(
            PuzzleNode::root(&arena, s, vec![1, 2, 3, 3]).unwrap_err(),
            Error::MissingBlank
        );
        assert_eq!(
            PuzzleNode::root(&arena, s, vec![1, 2, 0, 7]).unwrap_err(),
            Error::TileOutOfRange { value: 7, len: 4 }
        );
        assert_eq!(
            PuzzleNode::root(&arena, s, vec![1, 1, 0, 3]).unwrap_err(),
            Error::DuplicateTile { value: 1 }
        );
    }

    #[test]
    fn test_goal_ignores_last_cell() {
        let arena = PuzzleArena::new();
        let solved = PuzzleNode::root(&arena, size(2, 2), vec![1, 2, 3, 0]).unwrap();
        assert!(solved.is_goal());
        let solved = PuzzleNode::goal(&arena, size(3, 3));
        assert!(solved.is_goal());
        let not_goal =
            PuzzleNode::root(&arena, size(3, 3), vec![1, 2, 3, 4, 5, 6, 7, 0, 8]).unwrap();
        assert!(!not_goal.is_goal());
    }

    #[test]
    fn test_goal_check_on_two_by_two_regression() {
        // Indices 0..=2 are compared against 1, 2, 3; the blank at index 1 breaks that.
        let arena = PuzzleArena::new();
        let node = PuzzleNode::root(&arena, size(2, 2), vec![1, 0, 3, 2]).unwrap();
        assert!(!node.is_goal());
    }

    #[test]
    fn test_root_children_order_center() {
        let arena = PuzzleArena::new();
        let root =
            PuzzleNode::root(&arena, size(3, 3), vec![1, 2, 3, 4, 0, 5, 6, 7, 8]).unwrap();
        let children = root.children();
        assert_eq!(
            moves_of(children),
            vec![Move::Up, Move::Down, Move::Right, Move::Left]
        );
        assert_eq!(children[0].tiles(), &[1, 0, 3, 4, 2, 5, 6, 7, 8]);
        assert_eq!(children[1].tiles(), &[1, 2, 3, 4, 7, 5, 6, 0, 8]);
        assert_eq!(children[2].tiles(), &[1, 2, 3, 4, 5, 0, 6, 7, 8]);
        assert_eq!(children[3].tiles(), &[1, 2, 3, 0, 4, 5, 6, 7, 8]);
        for child in children {
            assert!(std::ptr::eq(child.parent().unwrap(), root));
        }
    }

    #[test]
    fn test_edges_limit_children() {
        let arena = PuzzleArena::new();
        // Blank in the top-left corner: only DOWN and RIGHT.
        let corner =
            PuzzleNode::root(&arena, size(3, 3), vec![0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(moves_of(corner.children()), vec![Move::Down, Move::Right]);
        // Blank on the bottom edge of a 3x2 board: UP, RIGHT, LEFT.
        let edge = PuzzleNode::root(&arena, size(3, 2), vec![1, 2, 3, 4, 0, 5]).unwrap();
        assert_eq!(
            moves_of(edge.children()),
            vec![Move::Up, Move::Right, Move::Left]
        );
    }

    #[test]
    fn test_children_never_reverse_last_move() {
        let arena = PuzzleArena::new();
        let root =
            PuzzleNode::root(&arena, size(3, 3), vec![1, 2, 3, 4, 0, 5, 6, 7, 8]).unwrap();
        let mut frontier = vec![root];
        for _ in 0..4 {
            let mut next = Vec::new();
            for node in frontier {
                for &child in node.children() {
                    if let Some(parent_move) = node.last_move() {
                        assert_ne!(child.last_move().unwrap(), parent_move.opposite());
                        assert!(node.children().len() <= 3);
                    }
                    assert!(!node.children().is_empty());
                    next.push(child);
                }
            }
            frontier = next;
        }
    }

    #[test]
    fn test_children_are_memoized() {
        let arena = PuzzleArena::new();
        let root =
            PuzzleNode::root(&arena, size(3, 3), vec![1, 2, 3, 4, 0, 5, 6, 7, 8]).unwrap();
        let first = root.children();
        let second = root.children();
        assert!(std::ptr::eq(first, second));
        for (a, b) in first.iter().zip(second.iter()) {
            assert!(std::ptr::eq(*a, *b));
        }
    }

    #[test]
    fn test_successors_mirror_children_without_allocating() {
        let arena = PuzzleArena::new();
        let root =
            PuzzleNode::root(&arena, size(3, 3), vec![1, 2, 3, 4, 0, 5, 6, 7, 8]).unwrap();
        let successors = root.successors(&root.state(), None);
        assert_eq!(arena.len(), 1);

        let children = root.children();
        assert_eq!(successors.len(), children.len());
        for ((step, state), child) in successors.iter().zip(children) {
            assert_eq!(Some(*step), child.last_step());
            assert_eq!(state.as_slice(), child.tiles());
        }

        // From an arbitrary state reached by LEFT: RIGHT would undo it.
        let state = vec![0, 1, 2, 3, 4, 5, 6, 7, 8];
        let steps: Vec<Move> = root
            .successors(&state, Some(Move::Left))
            .into_iter()
            .map(|(step, _)| step)
            .collect();
        assert_eq!(steps, vec![Move::Down]);
        assert!(root.successors(&vec![1, 2, 3], None).is_empty());
    }

    #[test]
    fn test_goal_state_and_child_by_step() {
        let arena = PuzzleArena::new();
        let root = PuzzleNode::goal(&arena, size(3, 3));
        assert!(root.is_goal_state(&goal_tiles(size(3, 3))));
        assert!(!root.is_goal_state(&vec![1, 2, 3, 4, 5, 6, 7, 0, 8]));

        let up = root.child_by_step(Move::Up).unwrap();
        assert!(std::ptr::eq(up, root.children()[0]));
        assert!(root.child_by_step(Move::Right).is_none());
        assert!(up.child_by_step(Move::Down).is_none());
    }

    #[test]
    fn test_cost_counts_parent_hops() {
        let arena = PuzzleArena::new();
        let root = PuzzleNode::goal(&arena, size(3, 3));
        assert_eq!(root.cost(), 0);
        let one = root.children()[0];
        let two = one.children()[0];
        let three = two.children()[0];
        assert_eq!(one.cost(), 1);
        assert_eq!(three.cost(), 3);
        assert_eq!(three.reroot().cost(), 0);
    }

    #[test]
    fn test_state_is_a_snapshot() {
        let arena = PuzzleArena::new();
        let root = PuzzleNode::goal(&arena, size(2, 2));
        let mut state = root.state();
        state[0] = 9;
        assert_eq!(root.tiles(), &[1, 2, 3, 0]);
    }

    #[test]
    fn test_equality_by_content() {
        let arena = PuzzleArena::new();
        let a = PuzzleNode::goal(&arena, size(3, 3));
        let b = PuzzleNode::root(&arena, size(3, 3), goal_tiles(size(3, 3))).unwrap();
        assert!(!std::ptr::eq(a, b));
        assert_eq!(a, b);
        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(b));
        assert_ne!(a, a.children()[0]);
    }

    #[test]
    fn test_apply_move() {
        let s = size(3, 3);
        let mut tiles = goal_tiles(s);
        apply_move(s, &mut tiles, Move::Up).unwrap();
        assert_eq!(tiles, vec![1, 2, 3, 4, 5, 0, 7, 8, 6]);
        apply_move(s, &mut tiles, Move::Down).unwrap();
        assert_eq!(tiles, goal_tiles(s));
        assert_eq!(
            apply_move(s, &mut tiles, Move::Right),
            Err(Error::IllegalMove {
                direction: Move::Right,
                blank: 8
            })
        );
    }

    #[test]
    fn test_display() {
        let arena = PuzzleArena::new();
        let tiles = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 0, 11];
        let node = PuzzleNode::root(&arena, size(4, 3), tiles).unwrap();
        assert_eq!(node.to_string(), " 1  2  3  4\n 5  6  7  8\n 9 10  . 11");
    }
}
