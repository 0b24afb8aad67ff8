//! Solution representation for the ACO-VRP solver.
//!
//! A solution is an ordered set of routes, each a depot-bracketed node
//! sequence with its served demand and traveled distance, plus totals
//! across the whole plan.

use crate::instance::VrpInstance;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One vehicle round-trip from the depot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    /// Visited nodes as external ids, starting and ending at the depot
    pub node_ids: Vec<usize>,
    /// Sum of member demands
    pub demand: i64,
    /// Total traveled distance
    pub distance: i64,
    /// Visited nodes as catalog positions (internal form of `node_ids`)
    #[serde(skip)]
    pub stops: Vec<usize>,
}

impl Route {
    /// Build a route record from a committed traversal in catalog positions
    pub fn from_stops(instance: &VrpInstance, stops: Vec<usize>) -> Self {
        let node_ids = stops.iter().map(|&i| instance.nodes[i].id).collect();
        let demand = instance.route_demand(&stops);
        let distance = instance.route_distance(&stops);

        Route {
            node_ids,
            demand,
            distance,
            stops,
        }
    }
}

/// A complete routing plan produced by one solver run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Committed routes, in commitment order
    pub routes: Vec<Route>,
    /// Distance traveled across all routes
    pub total_distance: i64,
    /// Demand served across all routes
    pub total_demand: i64,
    /// Strategy that produced this solution
    pub strategy: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of construction passes run
    pub passes: usize,
}

impl Solution {
    /// Assemble a solution from committed traversals in catalog positions
    pub fn from_stop_lists(instance: &VrpInstance, stop_lists: Vec<Vec<usize>>, strategy: &str) -> Self {
        let routes: Vec<Route> = stop_lists
            .into_iter()
            .map(|stops| Route::from_stops(instance, stops))
            .collect();
        let total_distance = routes.iter().map(|route| route.distance).sum();
        let total_demand = routes.iter().map(|route| route.demand).sum();

        Solution {
            routes,
            total_distance,
            total_demand,
            strategy: strategy.to_string(),
            computation_time: 0.0,
            passes: 0,
        }
    }

    /// Check that every customer appears in exactly one route and each
    /// route is a depot-bracketed trip within capacity.
    pub fn is_complete(&self, instance: &VrpInstance, capacity: i64) -> bool {
        let depot_id = instance.nodes[0].id;
        let mut served: HashSet<usize> = HashSet::new();

        for route in &self.routes {
            if route.node_ids.first() != Some(&depot_id) || route.node_ids.last() != Some(&depot_id) {
                return false;
            }
            if route.demand > capacity {
                return false;
            }
            for &id in &route.node_ids {
                if id == depot_id {
                    continue;
                }
                if !served.insert(id) {
                    return false;
                }
            }
        }

        served.len() == instance.num_customers()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Best routes found ({}):", self.strategy)?;
        writeln!(f)?;

        for (i, route) in self.routes.iter().enumerate() {
            writeln!(f, "Vehicle {}:", i + 1)?;
            writeln!(f, "  Route: {:?}", route.node_ids)?;
            writeln!(f, "  Served demand: {}", route.demand)?;
            writeln!(f, "  Traveled distance: {}", route.distance)?;
            writeln!(f)?;
        }

        writeln!(f, "Total traveled distance: {}", self.total_distance)?;
        writeln!(f, "Total served demand: {}", self.total_demand)?;
        writeln!(f, "Passes: {}", self.passes)?;
        writeln!(f, "Time: {:.4}s", self.computation_time)
    }
}
