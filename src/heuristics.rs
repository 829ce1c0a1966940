use std::fmt;
use std::str::FromStr;

use crate::engine::{BoardSize, Tile};
use crate::error::Error;

/// Distance estimate used by heuristic strategies such as A*.
///
/// Both variants are admissible: neither ever exceeds the true number of moves
/// left to the goal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// Sum of the Manhattan distances of every non-blank tile.
    #[default]
    Manhattan,
    /// Manhattan distance of the last non-blank tile in index order only.
    ///
    /// Reproduces an estimator that overwrote its running total on every tile
    /// instead of adding to it. Much weaker than [`Heuristic::Manhattan`].
    LastTile,
}

impl Heuristic {
    pub const ALL: [Heuristic; 2] = [Heuristic::Manhattan, Heuristic::LastTile];

    /// Estimates the remaining moves for `tiles` on a board of `size`.
    pub fn estimate(self, size: BoardSize, tiles: &[Tile]) -> u32 {
        match self {
            Heuristic::Manhattan => manhattan_distance(size, tiles),
            Heuristic::LastTile => last_tile_distance(size, tiles),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Heuristic::Manhattan => write!(f, "manhattan"),
            Heuristic::LastTile => write!(f, "last-tile"),
        }
    }
}

impl FromStr for Heuristic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manhattan" => Ok(Heuristic::Manhattan),
            "last-tile" | "last_tile" | "lasttile" => Ok(Heuristic::LastTile),
            _ => Err(Error::UnknownHeuristic(s.to_string())),
        }
    }
}

/// Manhattan distance of a single tile at `index` from its solved position.
///
/// Tile `v` belongs at index `v - 1`. Returns 0 for the blank.
fn tile_distance(size: BoardSize, index: usize, tile: Tile) -> u32 {
    if tile == 0 {
        return 0;
    }
    let (x, y) = size.coordinates(index);
    let (goal_x, goal_y) = size.coordinates(tile as usize - 1);
    (x.abs_diff(goal_x) + y.abs_diff(goal_y)) as u32
}

/// Sums, over every non-blank tile, the row and column distance to its goal cell.
///
/// # Examples
/// ```
/// use sliding_puzzle::engine::BoardSize;
/// use sliding_puzzle::heuristics::manhattan_distance;
///
/// let size = BoardSize::new(3, 3).unwrap();
/// assert_eq!(manhattan_distance(size, &[1, 2, 3, 4, 5, 6, 7, 8, 0]), 0);
/// assert_eq!(manhattan_distance(size, &[2, 1, 3, 4, 5, 6, 7, 8, 0]), 2);
/// ```
pub fn manhattan_distance(size: BoardSize, tiles: &[Tile]) -> u32 {
    tiles
        .iter()
        .enumerate()
        .map(|(index, &tile)| tile_distance(size, index, tile))
        .sum()
}

/// Distance of the last non-blank tile (highest index) from its goal cell.
pub fn last_tile_distance(size: BoardSize, tiles: &[Tile]) -> u32 {
    tiles
        .iter()
        .enumerate()
        .rev()
        .find(|&(_, &tile)| tile != 0)
        .map_or(0, |(index, &tile)| tile_distance(size, index, tile))
}

/// Counts pairs of non-blank tiles that appear in the wrong relative order.
pub fn count_inversions(tiles: &[Tile]) -> usize {
    tiles
        .iter()
        .enumerate()
        .filter(|&(_, &value)| value != 0)
        .map(|(i, &value)| {
            tiles[i + 1..]
                .iter()
                .filter(|&&next| next != 0 && next < value)
                .count()
        })
        .sum()
}

/// Checks the parity condition under which `tiles` can reach the solved board.
///
/// On odd-width boards a move never changes inversion parity, so the count must
/// be even. On even-width boards each vertical move flips inversion parity and
/// the blank's row together, so `inversions + blank_row` must match the goal's
/// `height - 1` in parity.
///
/// `tiles` is assumed to be a valid permutation for `size`.
pub fn is_solvable(size: BoardSize, tiles: &[Tile]) -> bool {
    let inversions = count_inversions(tiles);
    if size.width() % 2 == 1 {
        inversions % 2 == 0
    } else {
        let blank_row = tiles
            .iter()
            .position(|&tile| tile == 0)
            .map_or(0, |index| size.coordinates(index).1);
        (inversions + blank_row) % 2 == (size.height() - 1) % 2
    }
}
