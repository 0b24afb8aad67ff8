//! ACO-VRP Solver - Command Line Interface
//!
//! Computes capacity-constrained vehicle routes from a depot with an
//! Ant Colony Optimization engine.

use clap::{Parser, Subcommand};
use aco_vrp_solver::config::SolverParams;
use aco_vrp_solver::instance::VrpInstance;
use aco_vrp_solver::solution::Solution;
use aco_vrp_solver::solver::{Strategy, VrpSolver};

use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "aco-vrp-solver")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "A capacitated vehicle routing solver based on ant colonies")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an instance with one strategy
    Solve {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Path to the solver parameter file
        #[arg(short, long)]
        params: PathBuf,

        /// Strategy selector: 1 single colony, 2 + 2-opt, 3/6 candidate
        /// lists, 4 multi-colony, 5 multi-colony + 2-opt
        #[arg(short, long, default_value = "1")]
        strategy: u32,

        /// Candidate-list length (required by strategies 3 and 6)
        #[arg(short, long)]
        candidates: Option<usize>,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output solution to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,
    },

    /// Compare all six strategies on an instance
    Compare {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Path to the solver parameter file
        #[arg(short, long)]
        params: PathBuf,

        /// Number of runs per strategy
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Candidate-list length for strategies 3 and 6
        #[arg(short, long, default_value = "3")]
        candidates: usize,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { instance, params, strategy, candidates, seed, output, verbose } => {
            solve_instance(&instance, &params, strategy, candidates, seed, output, verbose);
        }

        Commands::Analyze { instance } => {
            analyze_instance(&instance);
        }

        Commands::Compare { instance, params, runs, candidates, output } => {
            compare_strategies(&instance, &params, runs, candidates, output);
        }
    }
}

fn load_instance(path: &PathBuf) -> VrpInstance {
    match VrpInstance::from_file(path) {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_params(path: &PathBuf) -> SolverParams {
    match SolverParams::from_file(path) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Error loading parameters: {}", e);
            std::process::exit(1);
        }
    }
}

fn solve_instance(
    instance_path: &PathBuf,
    params_path: &PathBuf,
    selector: u32,
    candidates: Option<usize>,
    seed: u64,
    output: Option<PathBuf>,
    verbose: bool,
) {
    println!("Loading instance from {:?}...", instance_path);
    let instance = load_instance(instance_path);
    let params = load_params(params_path);

    let strategy = match Strategy::from_selector(selector, candidates) {
        Ok(strategy) => strategy,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if verbose {
        println!("{}", instance.statistics());
        println!("Vehicles: {}, capacity: {}", params.m, params.capacity);
        println!(
            "alpha: {}, beta: {}, tau0: {}, q0: {}",
            params.alpha, params.beta, params.tau0, params.q0
        );
    }

    println!("Solving with strategy: {}\n", strategy.name());
    let mut solver = VrpSolver::new(instance, params, seed);
    let solution = solver.solve(strategy);

    println!("{}", solution);

    if let Some(out_path) = output {
        match serde_json::to_string_pretty(&solution) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&out_path, json) {
                    eprintln!("Failed to write solution: {}", e);
                    std::process::exit(1);
                }
                println!("Solution exported to {:?}", out_path);
            }
            Err(e) => {
                eprintln!("Failed to serialize solution: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn analyze_instance(path: &PathBuf) {
    let instance = load_instance(path);

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());
}

fn compare_strategies(
    instance_path: &PathBuf,
    params_path: &PathBuf,
    runs: usize,
    candidates: usize,
    output: Option<PathBuf>,
) {
    let instance = load_instance(instance_path);
    let params = load_params(params_path);

    println!(
        "Comparing strategies on {} (n={})...\n",
        instance.name, instance.dimension
    );

    let selectors = [1u32, 2, 3, 4, 5, 6];
    let mut results: Vec<(String, Vec<(i64, f64)>)> = Vec::new();

    for &selector in &selectors {
        let strategy = match Strategy::from_selector(selector, Some(candidates)) {
            Ok(strategy) => strategy,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };

        print!("Testing {}... ", strategy.name());
        std::io::Write::flush(&mut std::io::stdout()).unwrap();

        let mut samples: Vec<(i64, f64)> = Vec::new();
        for seed in 0..runs as u64 {
            let start = Instant::now();
            let mut solver = VrpSolver::new(instance.clone(), params.clone(), seed);
            let solution: Solution = solver.solve(strategy);
            samples.push((solution.total_distance, start.elapsed().as_secs_f64()));
        }

        let best = samples.iter().map(|&(d, _)| d).min().unwrap_or(0);
        let avg = samples.iter().map(|&(d, _)| d).sum::<i64>() as f64 / samples.len() as f64;
        let avg_time = samples.iter().map(|&(_, t)| t).sum::<f64>() / samples.len() as f64;
        println!("avg={:.2}, best={}, time={:.4}s", avg, best, avg_time);

        results.push((strategy.name().to_string(), samples));
    }

    println!("\n========== Summary ==========");
    println!("{:<32} {:>10} {:>10} {:>10} {:>10}",
        "Strategy", "Best", "Average", "Worst", "Avg Time");
    println!("{}", "-".repeat(76));

    for (name, samples) in &results {
        let best = samples.iter().map(|&(d, _)| d).min().unwrap_or(0);
        let worst = samples.iter().map(|&(d, _)| d).max().unwrap_or(0);
        let avg = samples.iter().map(|&(d, _)| d).sum::<i64>() as f64 / samples.len() as f64;
        let avg_time = samples.iter().map(|&(_, t)| t).sum::<f64>() / samples.len() as f64;

        println!("{:<32} {:>10} {:>10.2} {:>10} {:>10.4}",
            name, best, avg, worst, avg_time);
    }

    if let Some(out_path) = output {
        let mut csv = String::new();
        csv.push_str("strategy,run,total_distance,time\n");

        for (name, samples) in &results {
            for (i, (distance, time)) in samples.iter().enumerate() {
                csv.push_str(&format!("{},{},{},{:.4}\n", name, i, distance, time));
            }
        }

        if let Err(e) = std::fs::write(&out_path, csv) {
            eprintln!("Failed to write CSV: {}", e);
            std::process::exit(1);
        }
        println!("\nResults exported to {:?}", out_path);
    }
}
