use clap::Parser;
use sliding_puzzle::engine::{BoardSize, PuzzleArena, PuzzleNode, Tile};
use sliding_puzzle::node::Node;
use sliding_puzzle::solver::{SearchConfig, SearchLimits, ShuffleStrategy, SolveStrategy, Strategy};
use sliding_puzzle::utils::format_duration;
use std::collections::HashMap;
use std::process;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of seeded boards to evaluate
    #[clap(long, default_value_t = 20)]
    boards: usize,

    /// Random moves applied to the solved board to build each start board
    #[clap(long, default_value_t = 12)]
    shuffle: u32,

    /// Side length of the square board
    #[clap(long, default_value_t = 3)]
    size: usize,

    /// Seed of the first board; board `i` uses `start_seed + i`
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Node limit per search, so depth-first search cannot run forever
    #[clap(long, default_value_t = 200_000)]
    max_nodes: u64,
}

/// Result of one strategy on one board.
#[derive(Debug, Default)]
struct Tally {
    solved: usize,
    aborted: usize,
    total_depth: u64,
    total_visited: u64,
    total_time: Duration,
}

/// Builds the start board for `seed` by shuffling the solved board.
fn shuffled_board(size: BoardSize, moves: u32, seed: u64) -> Result<Vec<Tile>, String> {
    let arena = PuzzleArena::new();
    let solved = PuzzleNode::goal(&arena, size);
    let shuffled = ShuffleStrategy::with_seed(moves, seed)
        .solve(solved)
        .map_err(|e| e.to_string())?;
    shuffled
        .map(|node| node.state())
        .ok_or_else(|| "shuffle produced no board".to_string())
}

fn run(args: &Args) -> Result<(), String> {
    let size = BoardSize::square(args.size).map_err(|e| e.to_string())?;
    let config = SearchConfig::new(SearchLimits::default().with_max_nodes(args.max_nodes));

    let mut tallies: HashMap<Strategy, Tally> = HashMap::new();
    for strategy in Strategy::ALL {
        tallies.insert(strategy, Tally::default());
    }

    println!(
        "Starting strategy evaluation for {} boards of {} ({} shuffle moves)...",
        args.boards, size, args.shuffle
    );

    for board_idx in 0..args.boards {
        let current_seed = args.start_seed + board_idx as u64;
        let tiles = shuffled_board(size, args.shuffle, current_seed)?;
        println!("\nEvaluating Board {} (Seed: {}) {:?}", board_idx, current_seed, tiles);

        for strategy in Strategy::ALL {
            // Each strategy gets its own arena so no search reuses another's expanded nodes.
            let arena = PuzzleArena::new();
            let start = PuzzleNode::root(&arena, size, tiles.clone()).map_err(|e| e.to_string())?;
            let (result, stats) = strategy.run(start, &config);
            let tally = tallies.entry(strategy).or_default();
            tally.total_visited += stats.visited;
            tally.total_time += stats.elapsed;

            match result {
                Ok(Some(goal)) => {
                    tally.solved += 1;
                    tally.total_depth += u64::from(goal.cost());
                    println!(
                        "  Strategy: {:<10}, Depth: {:<4}, Visited: {:<9}, Time: {}",
                        strategy,
                        goal.cost(),
                        stats.visited,
                        format_duration(stats.elapsed)
                    );
                }
                Ok(None) => println!("  Strategy: {:<10}, no solution", strategy),
                Err(e) => {
                    tally.aborted += 1;
                    println!("  Strategy: {:<10}, {}", strategy, e);
                }
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of boards evaluated: {}", args.boards);
    println!(
        "Strategies evaluated: {}",
        Strategy::ALL
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("\n--- Averages ---");

    for strategy in Strategy::ALL {
        let Some(tally) = tallies.get(&strategy) else {
            continue;
        };
        if tally.solved == 0 {
            println!(
                "Strategy {:<10}: no board solved ({} aborted)",
                strategy, tally.aborted
            );
            continue;
        }
        let runs = args.boards.max(1);
        println!(
            "Strategy {:<10}: Solved = {}/{}, Avg Depth = {:.2}, Avg Visited = {:.0}, Avg Time = {}",
            strategy,
            tally.solved,
            args.boards,
            tally.total_depth as f64 / tally.solved as f64,
            tally.total_visited as f64 / runs as f64,
            format_duration(tally.total_time / runs as u32)
        );
    }
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
