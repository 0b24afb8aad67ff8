//! ACO-VRP Solver Library
//!
//! A capacitated vehicle routing solver built on Ant Colony Optimization.
//!
//! # Features
//!
//! - Round-robin route construction with candidate-list and
//!   pheromone-biased selection policies
//! - Local, global and background-evaporation pheromone updates
//! - Single-colony, candidate-list and multi-colony orchestration
//! - 2-opt post-processing of committed routes
//!
//! # Example
//!
//! ```no_run
//! use aco_vrp_solver::instance::VrpInstance;
//! use aco_vrp_solver::config::SolverParams;
//! use aco_vrp_solver::solver::{Strategy, VrpSolver};
//!
//! // Load instance and parameters
//! let instance = VrpInstance::from_file("instance.vrp").unwrap();
//! let params = SolverParams::from_file("params.txt").unwrap();
//!
//! // Solve with a single colony followed by 2-opt
//! let mut solver = VrpSolver::new(instance, params, 42);
//! let solution = solver.solve(Strategy::SingleColonyTwoOpt);
//!
//! println!("{}", solution);
//! ```

pub mod colony;
pub mod config;
pub mod instance;
pub mod solution;
pub mod solver;

pub use config::SolverParams;
pub use instance::VrpInstance;
pub use solution::Solution;
pub use solver::{Strategy, VrpSolver};
