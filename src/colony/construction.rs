//! Round-robin route construction.
//!
//! Every non-finished ant attempts exactly one move per round, under one
//! of two policy families: the candidate-list rules (nearest-neighbor
//! restriction, with a randomized first departure from the depot) or the
//! pheromone-biased rules (an exploitative argmax and a probabilistic
//! first-fit, dispatched by the q0 draw). A round in which no node
//! qualifies forces the ant back to the depot and finishes its route.
//!
//! After all ants finish, the pass commits the best completed route:
//! maximum served demand first, then minimum distance, first found on a
//! tie. Committing increments the visit counters of every node on the
//! route, which excludes those customers from all later construction.

use crate::config::SolverParams;
use crate::instance::VrpInstance;
use super::ant::Ant;
use super::pheromone::PheromoneField;
use super::Colony;
use log::debug;
use ordered_float::OrderedFloat;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Candidate rule at the depot: on the colony's very first departure pick
/// a uniformly random depot candidate, afterwards the first unvisited one;
/// fall back to the full distance-sorted list when no candidate qualifies.
fn select_from_depot_candidates(
    instance: &VrpInstance,
    visits: &[u32],
    rng: &mut ChaCha8Rng,
) -> Option<usize> {
    let candidates = &instance.nodes[0].candidates;

    let mut next = if visits[0] == 0 {
        if candidates.is_empty() {
            None
        } else {
            Some(candidates[rng.gen_range(0..candidates.len())])
        }
    } else {
        candidates.iter().copied().find(|&j| visits[j] == 0)
    };

    if next.is_none() {
        next = instance.sorted_neighbors[0]
            .iter()
            .copied()
            .find(|&j| visits[j] == 0);
    }

    next
}

/// Candidate rule at a customer: the first candidate that is unvisited,
/// not yet on this ant's route and within remaining capacity.
fn select_from_customer_candidates(
    instance: &VrpInstance,
    visits: &[u32],
    ant: &Ant,
) -> Option<usize> {
    instance.nodes[ant.current]
        .candidates
        .iter()
        .copied()
        .find(|&j| {
            visits[j] == 0 && !ant.remembers(j) && instance.nodes[j].demand <= ant.capacity
        })
}

/// Exploitative rule: among eligible customers, maximize
/// `tau[i][u] * (1 / distance)^beta`.
fn select_exploitative(
    instance: &VrpInstance,
    params: &SolverParams,
    pheromone: &PheromoneField,
    visits: &[u32],
    ant: &Ant,
) -> Option<usize> {
    let i = ant.current;

    pheromone.with_tau(|tau| {
        (1..instance.dimension)
            .filter(|&u| {
                visits[u] == 0 && !ant.remembers(u) && instance.nodes[u].demand <= ant.capacity
            })
            .map(|u| {
                let eta = 1.0 / instance.distance(i, u) as f64;
                (u, tau[i][u] * eta.powf(params.beta))
            })
            .filter(|&(_, weight)| weight > 0.0)
            .max_by_key(|&(_, weight)| OrderedFloat(weight))
            .map(|(u, _)| u)
    })
}

/// Probabilistic rule: normalize the pheromone-distance weights over all
/// customers outside the ant's memory, then return the first customer in
/// catalog order with nonzero probability and feasible demand.
fn select_probabilistic(
    instance: &VrpInstance,
    params: &SolverParams,
    pheromone: &PheromoneField,
    visits: &[u32],
    ant: &Ant,
) -> Option<usize> {
    let i = ant.current;

    pheromone.with_tau(|tau| {
        let sum: f64 = (1..instance.dimension)
            .filter(|&u| !ant.remembers(u))
            .map(|u| {
                let eta = 1.0 / instance.distance(i, u) as f64;
                tau[i][u] * eta.powf(params.beta)
            })
            .sum();
        if sum <= 0.0 {
            return None;
        }

        for j in 1..instance.dimension {
            if visits[j] != 0 || ant.remembers(j) {
                continue;
            }
            let eta = 1.0 / instance.distance(i, j) as f64;
            let probability = tau[i][j] * eta.powf(params.beta) / sum;
            if probability != 0.0 && instance.nodes[j].demand <= ant.capacity {
                return Some(j);
            }
        }

        None
    })
}

/// Pheromone-biased dispatch. The selector is drawn from {0, 1} and
/// compared against q0, reproducing the reference coin flip literally.
fn select_pheromone_biased(
    instance: &VrpInstance,
    params: &SolverParams,
    pheromone: &PheromoneField,
    visits: &[u32],
    ant: &Ant,
    rng: &mut ChaCha8Rng,
) -> Option<usize> {
    let q = rng.gen_range(0..2u32);

    if f64::from(q) <= params.q0 {
        select_exploitative(instance, params, pheromone, visits, ant)
    } else {
        select_probabilistic(instance, params, pheromone, visits, ant)
    }
}

/// Apply one selection outcome to an ant: move and consume demand, force
/// the depot return when capacity is exhausted or nothing qualified.
fn step_ant(instance: &VrpInstance, ant: &mut Ant, choice: Option<usize>) {
    match choice {
        Some(node) => {
            ant.advance(node, instance.nodes[node].demand);
            if ant.capacity == 0 {
                ant.force_return(0);
            }
        }
        None => ant.force_return(0),
    }
}

/// Deduplicate the finished memories and pick the pass's best route:
/// maximum served demand, then minimum distance, first found on a tie.
fn best_route(instance: &VrpInstance, ants: &[Ant]) -> Vec<usize> {
    let mut routes: Vec<&Vec<usize>> = Vec::new();
    for ant in ants {
        if !routes.contains(&&ant.memory) {
            routes.push(&ant.memory);
        }
    }

    let max_demand = routes
        .iter()
        .map(|route| instance.route_demand(route))
        .max()
        .unwrap_or(0);

    let mut best: Option<(&Vec<usize>, i64)> = None;
    for &route in &routes {
        if instance.route_demand(route) != max_demand {
            continue;
        }
        let distance = instance.route_distance(route);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((route, distance)),
        }
    }

    best.map(|(route, _)| route.clone())
        .unwrap_or_else(|| vec![0, 0])
}

fn commit_visits(visits: &mut [u32], route: &[usize]) {
    for &node in route {
        visits[node] += 1;
    }
}

/// Run one full candidate-list pass: all ants to completion, then commit
/// the best route. Returns the committed traversal.
pub fn run_candidate_pass(
    instance: &VrpInstance,
    colony: &mut Colony,
    rng: &mut ChaCha8Rng,
) -> Vec<usize> {
    while colony.ants.iter().any(|ant| !ant.finished) {
        for idx in 0..colony.ants.len() {
            if colony.ants[idx].finished {
                continue;
            }

            let choice = if colony.ants[idx].current == 0 {
                select_from_depot_candidates(instance, &colony.visits, rng)
            } else {
                select_from_customer_candidates(instance, &colony.visits, &colony.ants[idx])
            };
            step_ant(instance, &mut colony.ants[idx], choice);
        }
    }

    let best = best_route(instance, &colony.ants);
    commit_visits(&mut colony.visits, &best);
    debug!(
        "candidate pass committed route of demand {} / distance {}",
        instance.route_demand(&best),
        instance.route_distance(&best)
    );

    best
}

/// Run one full pheromone-biased pass: all ants to completion, per-ant
/// edge flagging and local pheromone update, then commit the best route.
pub fn run_pheromone_pass(
    instance: &VrpInstance,
    params: &SolverParams,
    colony: &mut Colony,
    rng: &mut ChaCha8Rng,
) -> Vec<usize> {
    while colony.ants.iter().any(|ant| !ant.finished) {
        for idx in 0..colony.ants.len() {
            if colony.ants[idx].finished {
                continue;
            }

            let choice = select_pheromone_biased(
                instance,
                params,
                &colony.pheromone,
                &colony.visits,
                &colony.ants[idx],
                rng,
            );
            step_ant(instance, &mut colony.ants[idx], choice);
        }
    }

    // Flag every finished route's edges, sweeping the local update over
    // the accumulated flags once per ant
    for idx in 0..colony.ants.len() {
        let memory = colony.ants[idx].memory.clone();
        colony.pheromone.mark_route(&memory);
        colony.pheromone.local_update(params.alpha);
    }

    let best = best_route(instance, &colony.ants);
    commit_visits(&mut colony.visits, &best);
    debug!(
        "pheromone pass committed route of demand {} / distance {}",
        instance.route_demand(&best),
        instance.route_distance(&best)
    );

    best
}
