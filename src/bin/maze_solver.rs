use clap::Parser;
use maze_search::frontier::Algorithm;
use maze_search::solver::{solve_with, ExpansionBudget};
use maze_search::utils::{read_maze_file, write_maze_file};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Search algorithm: bfs, dfs, greedy or astar
    #[clap(short, long, default_value = "astar")]
    algorithm: Algorithm,

    /// Write the solved maze to this file
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Give up after exploring this many states
    #[clap(long)]
    max_expansions: Option<usize>,

    /// Path to the maze file ('%' wall, 'P' start, '.' goal, ' ' open)
    maze_file: PathBuf,
}

fn run(args: &Args) -> maze_search::Result<()> {
    let maze = read_maze_file(&args.maze_file)?;
    println!("Loaded maze from {}\n", args.maze_file.display());
    println!("{}\n", maze);
    println!(
        "Searching for {} goal(s) with {}...\n",
        maze.find_goals().len(),
        args.algorithm
    );

    let mut budget = ExpansionBudget::new(args.max_expansions.unwrap_or(usize::MAX));
    let solution = solve_with(&maze, args.algorithm, &mut budget)?;

    println!("Solution found:\n");
    println!("{}\n", solution.maze);
    println!("Path cost: {}", solution.cost);
    println!("Expanded states: {}", solution.expanded);
    println!(
        "Generated: {}, superseded: {}, peak frontier: {}",
        solution.stats.generated, solution.stats.superseded, solution.stats.peak_frontier
    );
    if solution.goal_order.len() > 1 {
        let order: Vec<String> = solution.goal_order.iter().map(|p| p.to_string()).collect();
        println!("Goal order: {}", order.join(" -> "));
    }

    if let Some(output) = &args.output {
        write_maze_file(output, &solution.maze)?;
        println!("\nWrote solved maze to {}", output.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
