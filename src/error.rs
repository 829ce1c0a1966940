//! Error types for the sliding puzzle crate.

use std::time::Duration;

use thiserror::Error;

use crate::engine::{Move, Tile};

/// Main error type for the crate.
///
/// Malformed input is reported when a node or board is built. Search aborts
/// (cancellation and resource limits) are returned by `solve`; a search that
/// simply finds no goal returns `Ok(None)` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid board size {width}x{height}: both dimensions must be at least 2")]
    InvalidBoardSize { width: usize, height: usize },

    #[error("board of {width}x{height} cells exceeds the maximum of {max} cells")]
    BoardTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },

    #[error("state has {got} tiles but the board needs {expected}")]
    StateLengthMismatch { expected: usize, got: usize },

    #[error("state contains no blank (0) tile")]
    MissingBlank,

    #[error("tile {value} is out of range for a board of {len} cells")]
    TileOutOfRange { value: usize, len: usize },

    #[error("tile {value} appears more than once")]
    DuplicateTile { value: Tile },

    #[error("invalid tile '{token}' in row {row}")]
    InvalidTileToken { token: String, row: usize },

    #[error("row {row} has {got} tiles but the first row has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("cannot move {direction}: blank at index {blank} is on the board edge")]
    IllegalMove { direction: Move, blank: usize },

    #[error("no node matches the successor taken at depth {depth}")]
    MissingChild { depth: u32 },

    #[error("unknown strategy '{0}' (expected breadth, depth, iterative or astar)")]
    UnknownStrategy(String),

    #[error("unknown heuristic '{0}' (expected manhattan or last-tile)")]
    UnknownHeuristic(String),

    #[error("search cancelled after visiting {visited} nodes")]
    Cancelled { visited: u64 },

    #[error("search aborted: node limit of {limit} reached")]
    NodeLimitReached { limit: u64 },

    #[error("search aborted: depth limit of {limit} reached")]
    DepthLimitReached { limit: u32 },

    #[error("search aborted: time limit of {limit:?} reached")]
    TimeLimitReached { limit: Duration },
}

impl Error {
    /// Returns `true` for outcomes where a search stopped before it could
    /// decide whether a goal exists.
    pub fn is_search_abort(&self) -> bool {
        matches!(
            self,
            Error::Cancelled { .. }
                | Error::NodeLimitReached { .. }
                | Error::DepthLimitReached { .. }
                | Error::TimeLimitReached { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
