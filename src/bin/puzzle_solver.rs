use clap::Parser;
use sliding_puzzle::engine::{goal_tiles, BoardSize, PuzzleArena, PuzzleNode, Tile};
use sliding_puzzle::heuristics::{is_solvable, Heuristic};
use sliding_puzzle::path::{path_to_root, Solution};
use sliding_puzzle::solver::{SearchConfig, SearchLimits, ShuffleStrategy, SolveStrategy, Strategy};
use sliding_puzzle::utils::{board_from_str_array, format_duration, parse_tiles};
use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Side length of a square board
    #[clap(long, default_value_t = 3)]
    size: usize,

    /// Board width (overrides --size)
    #[clap(long)]
    width: Option<usize>,

    /// Board height (overrides --size)
    #[clap(long)]
    height: Option<usize>,

    /// Start tiles, row by row, comma separated, 0 for the blank
    #[clap(long, conflicts_with = "board_file")]
    tiles: Option<String>,

    /// Path to a board file: one row per line, whitespace-separated numbers, `0` or `.` for the blank
    #[clap(long)]
    board_file: Option<PathBuf>,

    /// Number of random moves used to scramble the solved board when no board is given
    #[clap(long, default_value_t = 5)]
    shuffle: u32,

    /// Seed for the scramble
    #[clap(long)]
    seed: Option<u64>,

    /// breadth, depth, iterative or astar
    #[clap(short, long, default_value = "breadth")]
    strategy: Strategy,

    /// manhattan or last-tile (used by astar)
    #[clap(long, default_value = "manhattan")]
    heuristic: Heuristic,

    /// Deepest level the search may reach
    #[clap(short = 'd', long)]
    max_depth: Option<u32>,

    /// Maximum number of visited nodes
    #[clap(long)]
    max_nodes: Option<u64>,

    /// Wall-clock limit in milliseconds
    #[clap(long)]
    timeout_ms: Option<u64>,

    /// Search even if the parity check says the board cannot be solved
    #[clap(long)]
    allow_unsolvable: bool,
}

impl Args {
    fn board_size(&self) -> Result<BoardSize, String> {
        let width = self.width.unwrap_or(self.size);
        let height = self.height.unwrap_or(self.size);
        BoardSize::new(width, height).map_err(|e| e.to_string())
    }

    fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
            time_limit: self.timeout_ms.map(Duration::from_millis),
        }
    }
}

fn read_board_file(path: &PathBuf) -> Result<(BoardSize, Vec<Tile>), String> {
    let content = fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;

    let lines: Vec<&str> = content
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    board_from_str_array(&lines).map_err(|e| format!("Invalid board format: {}", e))
}

/// Loads the start board given on the command line, if any.
fn given_board(args: &Args) -> Result<Option<(BoardSize, Vec<Tile>)>, String> {
    if let Some(path) = &args.board_file {
        return read_board_file(path).map(Some);
    }
    match &args.tiles {
        Some(tiles) => {
            let tiles = parse_tiles(tiles).map_err(|e| e.to_string())?;
            Ok(Some((args.board_size()?, tiles)))
        }
        None => Ok(None),
    }
}

fn start_node<'a>(args: &Args, arena: &'a PuzzleArena<'a>) -> Result<&'a PuzzleNode<'a>, String> {
    if let Some((size, tiles)) = given_board(args)? {
        return PuzzleNode::root_with_heuristic(arena, size, tiles, args.heuristic)
            .map_err(|e| format!("Invalid board: {}", e));
    }

    let size = args.board_size()?;
    let solved = PuzzleNode::root_with_heuristic(arena, size, goal_tiles(size), args.heuristic)
        .map_err(|e| e.to_string())?;
    let mut shuffle = match args.seed {
        Some(seed) => ShuffleStrategy::with_seed(args.shuffle, seed),
        None => ShuffleStrategy::new(args.shuffle),
    };
    let shuffled = shuffle
        .solve(solved)
        .map_err(|e| format!("Shuffle failed: {}", e))?
        .ok_or_else(|| "Shuffle produced no board".to_string())?;
    println!("Shuffled the solved {} board with {} random moves.", size, shuffle.count());
    Ok(shuffled.reroot())
}

fn run(args: &Args) -> Result<(), String> {
    let arena = PuzzleArena::new();
    let start = start_node(args, &arena)?;

    println!("Initial board ({}):\n{}\n", start.size(), start);

    if !args.allow_unsolvable && !is_solvable(start.size(), start.tiles()) {
        return Err(
            "This board cannot reach the solved position (use --allow-unsolvable to search anyway)"
                .to_string(),
        );
    }

    println!("Searching with {} strategy...\n", args.strategy);
    let config = SearchConfig::new(args.limits());
    let (result, stats) = args.strategy.run(start, &config);

    match result {
        Ok(Some(goal)) => {
            let solution = Solution::from_goal(goal);
            println!("Solution found:\n");
            println!("Moves ({}):", solution.depth);
            if solution.moves.is_empty() {
                println!("  No moves needed.");
            }
            for (i, node) in path_to_root(goal).iter().skip(1).enumerate() {
                if let Some(direction) = node.last_move() {
                    println!("  Move {}: {}\n{}\n", i + 1, direction, node);
                }
            }
            println!(
                "Sequence: {}",
                solution
                    .moves
                    .iter()
                    .map(|m| m.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            );
        }
        Ok(None) => println!("No solution found.\n"),
        Err(e) if e.is_search_abort() => println!("Search aborted: {}\n", e),
        Err(e) => return Err(e.to_string()),
    }

    println!(
        "Visited {} nodes in {}",
        stats.visited,
        format_duration(stats.elapsed)
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
