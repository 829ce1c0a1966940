//! # Sliding Puzzle Solver Library
//!
//! This library models W×H sliding-tile puzzles (8-puzzle, 15-puzzle and their
//! rectangular relatives) as a state space and provides interchangeable
//! strategies to search it for the solved board.
//!
//! It is used by two binaries:
//! - `puzzle_solver`: Loads or scrambles a board, runs one strategy and prints
//!   the move sequence that solves it.
//! - `strategy_evaluator`: Runs every strategy over a batch of seeded scrambles
//!   and compares solution length, visited nodes and time.
//!
//! ## Modules
//! - `node`: The `Node` trait every strategy searches over.
//! - `engine`: Board dimensions (`BoardSize`), moves (`Move`) and the concrete
//!   `PuzzleNode` with its arena (`PuzzleArena`).
//! - `heuristics`: Distance estimates (`Heuristic`) and the solvability check.
//! - `solver`: The `SolveStrategy` trait, breadth-first, depth-first, iterative
//!   deepening and A* searches, the random shuffle, and search limits.
//! - `path`: Turns a goal node back into a move list (`Solution`).
//! - `utils`: Parsing boards from text and formatting durations.
//! - `error`: The crate's `Error` type.

pub mod engine;
pub mod error;
pub mod heuristics;
pub mod node;
pub mod path;
pub mod solver;
pub mod utils;

pub use error::{Error, Result};
