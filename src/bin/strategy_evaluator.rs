use clap::Parser;
use maze_search::frontier::Algorithm;
use maze_search::maze::Maze;
use maze_search::solver::solve;
use maze_search::MazeError;
use std::collections::HashMap;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare search strategies on seeded random mazes", long_about = None)]
struct Args {
    /// Number of random mazes to evaluate
    #[clap(long, default_value_t = 20)]
    mazes: usize,

    #[clap(long, default_value_t = 15)]
    height: usize,

    #[clap(long, default_value_t = 25)]
    width: usize,

    /// Goals per maze
    #[clap(long, default_value_t = 3)]
    goals: usize,

    /// Probability that an interior cell is a wall
    #[clap(long, default_value_t = 0.25)]
    wall_density: f64,

    /// Seed of the first maze; maze i uses seed + i
    #[clap(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Default)]
struct Tally {
    solved: usize,
    total_cost: u64,
    total_expanded: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut tallies: HashMap<Algorithm, Tally> = HashMap::new();
    let mut unsolvable = 0;

    println!(
        "Evaluating {} random {}x{} mazes with {} goal(s)...",
        args.mazes, args.height, args.width, args.goals
    );

    for maze_idx in 0..args.mazes {
        let seed = args.seed + maze_idx as u64;
        let maze = match Maze::new_random_with_seed(
            args.height,
            args.width,
            args.goals,
            args.wall_density,
            seed,
        ) {
            Ok(maze) => maze,
            Err(e) => {
                eprintln!("Error: cannot generate maze: {}", e);
                return;
            }
        };

        println!("\nMaze {} (Seed: {})", maze_idx, seed);

        for algorithm in Algorithm::ALL {
            match solve(&maze, algorithm) {
                Ok(solution) => {
                    println!(
                        "  Strategy: {:<8}, Cost: {:<6}, Expanded: {}",
                        algorithm, solution.cost, solution.expanded
                    );
                    let tally = tallies.entry(algorithm).or_default();
                    tally.solved += 1;
                    tally.total_cost += solution.cost as u64;
                    tally.total_expanded += solution.expanded as u64;
                }
                Err(MazeError::NoSolution { .. }) => {
                    // Reachability does not depend on the strategy.
                    println!("  No solution.");
                    unsolvable += 1;
                    break;
                }
                Err(e) => {
                    eprintln!("Error: {} failed on maze {}: {}", algorithm, maze_idx, e);
                    break;
                }
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!(
        "Mazes evaluated: {}, unsolvable: {}",
        args.mazes, unsolvable
    );
    println!("\n--- Averages over solved mazes ---");

    for algorithm in Algorithm::ALL {
        match tallies.get(&algorithm) {
            Some(tally) if tally.solved > 0 => {
                let n = tally.solved as f64;
                println!(
                    "Strategy {:<8}: Average Cost = {:.2}, Average Expanded = {:.2}",
                    algorithm,
                    tally.total_cost as f64 / n,
                    tally.total_expanded as f64 / n
                );
            }
            _ => println!("Strategy {:<8}: No solutions recorded.", algorithm),
        }
    }
}
