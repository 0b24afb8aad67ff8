//! Colony model: shared pheromone state, the ant roster and the
//! construction machinery operating on them.

pub mod ant;
pub mod candidates;
pub mod construction;
pub mod pheromone;
pub mod two_opt;

use crate::config::SolverParams;
use crate::instance::VrpInstance;
use self::ant::Ant;
use self::pheromone::PheromoneField;

/// One ant colony: its pheromone field, its roster of ants, the routes it
/// has committed so far and its per-node visit counters.
pub struct Colony {
    pub pheromone: PheromoneField,
    pub ants: Vec<Ant>,
    /// Committed traversals, in commitment order (catalog positions)
    pub routes: Vec<Vec<usize>>,
    /// Per catalog position: how many committed routes include the node.
    /// Once nonzero the node is excluded from further construction.
    pub visits: Vec<u32>,
}

impl Colony {
    pub fn new(instance: &VrpInstance, params: &SolverParams) -> Self {
        let ants = (0..params.m)
            .map(|i| Ant::new(i, params.capacity, 0))
            .collect();

        Colony {
            pheromone: PheromoneField::new(instance.dimension, params.tau0),
            ants,
            routes: Vec::new(),
            visits: vec![0; instance.dimension],
        }
    }

    /// Put every ant back at the depot with full capacity
    pub fn reset_ants(&mut self, capacity: i64) {
        for ant in &mut self.ants {
            ant.reset(capacity, 0);
        }
    }

    /// Construction is exhausted once every counter is nonzero
    pub fn all_visited(&self) -> bool {
        self.visits.iter().all(|&count| count != 0)
    }

    /// Total distance of all committed routes
    pub fn total_distance(&self, instance: &VrpInstance) -> i64 {
        self.routes
            .iter()
            .map(|route| instance.route_distance(route))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Node;

    fn instance() -> VrpInstance {
        let nodes = vec![
            Node::new(1, "depot", "depot", 0),
            Node::new(2, "b", "b", 3),
            Node::new(3, "c", "c", 5),
        ];
        let matrix = vec![
            vec![0, 4, 6],
            vec![4, 0, 2],
            vec![6, 2, 0],
        ];
        VrpInstance::from_parts("colony", nodes, matrix).unwrap()
    }

    #[test]
    fn test_colony_assembly() {
        let params = SolverParams { m: 3, capacity: 10, ..Default::default() };
        let colony = Colony::new(&instance(), &params);

        assert_eq!(colony.ants.len(), 3);
        assert!(colony.ants.iter().all(|ant| ant.capacity == 10 && ant.current == 0));
        assert_eq!(colony.visits, vec![0, 0, 0]);
        assert!(!colony.all_visited());
        assert!(colony.pheromone.is_symmetric());
    }

    #[test]
    fn test_reset_ants_between_rounds() {
        let params = SolverParams { m: 2, capacity: 10, ..Default::default() };
        let mut colony = Colony::new(&instance(), &params);

        colony.ants[0].advance(1, 3);
        colony.ants[0].force_return(0);
        colony.reset_ants(params.capacity);

        assert!(colony.ants.iter().all(|ant| !ant.finished && ant.memory == vec![0]));
    }

    #[test]
    fn test_total_distance_sums_committed_routes() {
        let params = SolverParams::default();
        let mut colony = Colony::new(&instance(), &params);
        colony.routes.push(vec![0, 1, 0]);
        colony.routes.push(vec![0, 2, 0]);

        assert_eq!(colony.total_distance(&instance()), 8 + 12);
    }
}
