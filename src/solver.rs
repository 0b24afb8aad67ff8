//! Strategy selection and colony orchestration.
//!
//! Six strategies are exposed: a single colony, a single colony followed
//! by 2-opt, two candidate-list variants (selectors 3 and 6, which share
//! one run path), a multi-colony best-of, and a multi-colony best-of
//! followed by 2-opt. Single-colony runs keep an evaporation daemon
//! alive for the whole pass sequence; multi-colony runs build `m`
//! independent colonies with fresh visit counters and keep the one whose
//! committed routes travel the smallest total distance.

use crate::colony::candidates::CandidateListBuilder;
use crate::colony::construction::{run_candidate_pass, run_pheromone_pass};
use crate::colony::pheromone::EvaporationDaemon;
use crate::colony::two_opt;
use crate::colony::Colony;
use crate::config::SolverParams;
use crate::instance::VrpInstance;
use crate::solution::Solution;
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

/// Amount added to every off-diagonal pheromone entry per daemon sweep
const EVAPORATION_DELTA: f64 = 0.2;

/// The six colony orchestration strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// (1) Single ant colony
    SingleColony,
    /// (2) Single ant colony followed by 2-opt
    SingleColonyTwoOpt,
    /// (3) Single colony restricted to candidate lists
    CandidateLists { length: usize },
    /// (4) Multiple colonies, best kept
    MultiColony,
    /// (5) Multiple colonies followed by 2-opt, best kept
    MultiColonyTwoOpt,
    /// (6) Candidate-list run under the alternate selector
    CandidateListsRestricted { length: usize },
}

impl Strategy {
    /// Map a numeric selector (1..=6) to a strategy. Selectors 3 and 6
    /// require a positive candidate-list length.
    pub fn from_selector(selector: u32, candidate_length: Option<usize>) -> Result<Self, String> {
        let require_length = || -> Result<usize, String> {
            match candidate_length {
                Some(length) if length > 0 => Ok(length),
                _ => Err("No valid candidate-list length was provided".to_string()),
            }
        };

        match selector {
            1 => Ok(Strategy::SingleColony),
            2 => Ok(Strategy::SingleColonyTwoOpt),
            3 => Ok(Strategy::CandidateLists { length: require_length()? }),
            4 => Ok(Strategy::MultiColony),
            5 => Ok(Strategy::MultiColonyTwoOpt),
            6 => Ok(Strategy::CandidateListsRestricted { length: require_length()? }),
            other => Err(format!("Invalid strategy selector: {}", other)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::SingleColony => "single colony",
            Strategy::SingleColonyTwoOpt => "single colony + 2-opt",
            Strategy::CandidateLists { .. } => "single colony + candidate lists",
            Strategy::MultiColony => "multiple colonies",
            Strategy::MultiColonyTwoOpt => "multiple colonies + 2-opt",
            Strategy::CandidateListsRestricted { .. } => "candidate-list restricted",
        }
    }
}

/// The solving engine: one instance, one parameter set, one seeded RNG.
pub struct VrpSolver {
    instance: VrpInstance,
    params: SolverParams,
    rng: ChaCha8Rng,
}

impl VrpSolver {
    pub fn new(instance: VrpInstance, params: SolverParams, seed: u64) -> Self {
        VrpSolver {
            instance,
            params,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn instance(&self) -> &VrpInstance {
        &self.instance
    }

    /// Run the selected strategy to exhaustion and report the plan
    pub fn solve(&mut self, strategy: Strategy) -> Solution {
        let start = Instant::now();

        let (routes, passes) = match strategy {
            Strategy::SingleColony => self.run_single_colony(),
            Strategy::SingleColonyTwoOpt => {
                let (mut routes, passes) = self.run_single_colony();
                two_opt::improve_all(&self.instance, &mut routes);
                (routes, passes)
            }
            Strategy::CandidateLists { length }
            | Strategy::CandidateListsRestricted { length } => self.run_candidate_colony(length),
            Strategy::MultiColony => self.run_multi_colony(),
            Strategy::MultiColonyTwoOpt => {
                let (mut routes, passes) = self.run_multi_colony();
                two_opt::improve_all(&self.instance, &mut routes);
                (routes, passes)
            }
        };

        let mut solution = Solution::from_stop_lists(&self.instance, routes, strategy.name());
        solution.passes = passes;
        solution.computation_time = start.elapsed().as_secs_f64();
        solution
    }

    /// One colony, pheromone-biased construction, evaporation daemon
    /// alive for the whole pass sequence
    fn run_single_colony(&mut self) -> (Vec<Vec<usize>>, usize) {
        let mut colony = Colony::new(&self.instance, &self.params);
        let daemon = EvaporationDaemon::start(colony.pheromone.tau_handle(), EVAPORATION_DELTA);
        let mut passes = 0;

        loop {
            let route = run_pheromone_pass(&self.instance, &self.params, &mut colony, &mut self.rng);
            let distance = self.instance.route_distance(&route);
            colony.pheromone.global_update(&route, distance, self.params.alpha);
            colony.routes.push(route);
            colony.reset_ants(self.params.capacity);
            passes += 1;

            if colony.all_visited() {
                break;
            }
        }

        daemon.stop();
        info!("single colony finished after {} passes", passes);
        (colony.routes, passes)
    }

    /// One colony, construction narrowed to each node's candidate list
    fn run_candidate_colony(&mut self, length: usize) -> (Vec<Vec<usize>>, usize) {
        CandidateListBuilder::new(length).assign(&mut self.instance);

        let mut colony = Colony::new(&self.instance, &self.params);
        let mut passes = 0;

        loop {
            let route = run_candidate_pass(&self.instance, &mut colony, &mut self.rng);
            colony.routes.push(route);
            colony.reset_ants(self.params.capacity);
            passes += 1;

            if colony.all_visited() {
                break;
            }
        }

        info!("candidate-list colony finished after {} passes", passes);
        (colony.routes, passes)
    }

    /// `m` independent colonies run sequentially, each with fresh
    /// counters; the smallest total distance wins, earliest on a tie
    fn run_multi_colony(&mut self) -> (Vec<Vec<usize>>, usize) {
        let mut best: Option<(i64, Vec<Vec<usize>>)> = None;
        let mut total_passes = 0;

        for index in 0..self.params.m {
            let (routes, passes) = self.run_single_colony();
            total_passes += passes;

            let total: i64 = routes
                .iter()
                .map(|route| self.instance.route_distance(route))
                .sum();
            info!("colony {} total distance {}", index, total);

            match &best {
                Some((best_total, _)) if total >= *best_total => {}
                _ => best = Some((total, routes)),
            }
        }

        let (_, routes) = best.unwrap_or((0, Vec::new()));
        (routes, total_passes)
    }
}
