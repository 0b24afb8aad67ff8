//! Module for parsing and representing CVRP instances.
//!
//! An instance file carries a header (`NAME:`, `DIMENSION:`), a
//! `NODE_SECTION` of `id city state demand` rows and an
//! `EDGE_WEIGHT_SECTION` holding the full symmetric integer distance
//! matrix in node order. The node with demand 0 is the depot; it is
//! rotated to catalog position 0 when the instance is loaded.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use serde::{Deserialize, Serialize};

/// A location in the working set: the depot or one customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// External identifier (stable across catalog reordering)
    pub id: usize,
    /// City name
    pub city: String,
    /// State name
    pub state: String,
    /// Demand in load units; the depot has demand 0
    pub demand: i64,
    /// Whether this node is the depot
    pub is_depot: bool,
    /// Nearest-neighbor restriction, as catalog indices.
    /// Empty until the candidate list builder runs.
    #[serde(skip)]
    pub candidates: Vec<usize>,
}

impl Node {
    pub fn new(id: usize, city: &str, state: &str, demand: i64) -> Self {
        Node {
            id,
            city: city.to_string(),
            state: state.to_string(),
            demand,
            is_depot: demand == 0,
            candidates: Vec::new(),
        }
    }
}

/// A complete CVRP instance: the node catalog and pairwise distances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VrpInstance {
    /// Name of the instance
    pub name: String,
    /// Number of nodes (depot included)
    pub dimension: usize,
    /// Catalog of nodes; index 0 is always the depot
    pub nodes: Vec<Node>,
    /// Symmetric integer distance matrix, indexed by catalog position
    #[serde(skip)]
    pub distance_matrix: Vec<Vec<i64>>,
    /// Per node: the other catalog indices ordered ascending by distance.
    /// Ties keep the catalog order (stable sort).
    #[serde(skip)]
    pub sorted_neighbors: Vec<Vec<usize>>,
}

impl VrpInstance {
    /// Assemble an instance from node records and a full distance matrix,
    /// the shape a data-access collaborator hands over. Rotates the depot
    /// to catalog position 0 and precomputes the neighbor orderings.
    pub fn from_parts(name: &str, mut nodes: Vec<Node>, mut matrix: Vec<Vec<i64>>) -> Result<Self, String> {
        let n = nodes.len();
        if n < 2 {
            return Err("Instance needs a depot and at least one customer".to_string());
        }
        if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
            return Err(format!("Distance matrix must be {}x{}", n, n));
        }
        for i in 0..n {
            for j in 0..n {
                if matrix[i][j] != matrix[j][i] {
                    return Err(format!("Distance matrix is not symmetric at ({}, {})", i, j));
                }
            }
        }

        let depot_pos = nodes
            .iter()
            .position(|node| node.demand == 0)
            .ok_or_else(|| "Instance has no depot (no node with demand 0)".to_string())?;
        if nodes.iter().filter(|node| node.demand == 0).count() > 1 {
            return Err("Instance has more than one node with demand 0".to_string());
        }
        if nodes.iter().any(|node| node.demand < 0) {
            return Err("Customer demands must be nonnegative".to_string());
        }

        // Move the depot to the front, keeping the matrix consistent
        if depot_pos != 0 {
            nodes.swap(0, depot_pos);
            matrix.swap(0, depot_pos);
            for row in matrix.iter_mut() {
                row.swap(0, depot_pos);
            }
        }
        nodes[0].is_depot = true;

        let sorted_neighbors = Self::compute_sorted_neighbors(&matrix);

        Ok(VrpInstance {
            name: name.to_string(),
            dimension: n,
            nodes,
            distance_matrix: matrix,
            sorted_neighbors,
        })
    }

    /// Parse an instance from a sectioned text file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let file = File::open(&path)
            .map_err(|e| format!("Cannot open file: {}", e))?;
        let reader = BufReader::new(file);

        let mut name = String::new();
        let mut dimension = 0usize;
        let mut nodes: Vec<Node> = Vec::new();
        let mut matrix: Vec<Vec<i64>> = Vec::new();

        let mut section = String::new();

        for line in reader.lines() {
            let line = line.map_err(|e| format!("Read error: {}", e))?;
            let line = line.trim();

            if line.is_empty() || line == "EOF" {
                continue;
            }

            if line.starts_with("NAME:") {
                name = line.replace("NAME:", "").trim().to_string();
                continue;
            }
            if line.starts_with("DIMENSION:") {
                dimension = line.replace("DIMENSION:", "").trim()
                    .parse().map_err(|_| "Invalid dimension")?;
                continue;
            }

            if line.starts_with("NODE_SECTION") {
                section = "nodes".to_string();
                continue;
            }
            if line.starts_with("EDGE_WEIGHT_SECTION") {
                section = "weights".to_string();
                continue;
            }

            match section.as_str() {
                "nodes" => {
                    let parts: Vec<&str> = line.split_whitespace().collect();
                    if parts.len() >= 4 {
                        let id: usize = parts[0].parse().map_err(|_| "Invalid node id")?;
                        let demand: i64 = parts[3].parse().map_err(|_| "Invalid demand")?;
                        nodes.push(Node::new(id, parts[1], parts[2], demand));
                    }
                }
                "weights" => {
                    let row: Result<Vec<i64>, _> = line
                        .split_whitespace()
                        .map(|value| value.parse::<i64>())
                        .collect();
                    matrix.push(row.map_err(|_| "Invalid distance value")?);
                }
                _ => {}
            }
        }

        if dimension != 0 && dimension != nodes.len() {
            return Err(format!(
                "DIMENSION is {} but NODE_SECTION lists {} nodes",
                dimension,
                nodes.len()
            ));
        }

        Self::from_parts(&name, nodes, matrix)
    }

    fn compute_sorted_neighbors(matrix: &[Vec<i64>]) -> Vec<Vec<usize>> {
        let n = matrix.len();
        let mut ordering = Vec::with_capacity(n);

        for i in 0..n {
            let mut neighbors: Vec<usize> = (0..n).filter(|&j| j != i).collect();
            neighbors.sort_by_key(|&j| matrix[i][j]);
            ordering.push(neighbors);
        }

        ordering
    }

    /// Distance between two catalog positions
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> i64 {
        self.distance_matrix[i][j]
    }

    /// Catalog position of the node with the given external id
    pub fn index_of(&self, id: usize) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    /// Number of customer nodes (depot excluded)
    pub fn num_customers(&self) -> usize {
        self.dimension - 1
    }

    /// Sum of all customer demands
    pub fn total_demand(&self) -> i64 {
        self.nodes.iter().map(|node| node.demand).sum()
    }

    /// Total distance of a route given as catalog positions.
    /// Routes are depot-bracketed explicitly, so there is no wrap-around arc.
    pub fn route_distance(&self, route: &[usize]) -> i64 {
        route
            .windows(2)
            .map(|pair| self.distance(pair[0], pair[1]))
            .sum()
    }

    /// Total demand served by a route given as catalog positions
    pub fn route_demand(&self, route: &[usize]) -> i64 {
        route.iter().map(|&i| self.nodes[i].demand).sum()
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let demands: Vec<i64> = self.nodes.iter()
            .filter(|node| !node.is_depot)
            .map(|node| node.demand)
            .collect();
        let avg_demand = demands.iter().sum::<i64>() as f64 / demands.len() as f64;
        let max_demand = demands.iter().copied().max().unwrap_or(0);
        let min_demand = demands.iter().copied().min().unwrap_or(0);

        let mut distances: Vec<i64> = Vec::new();
        for i in 0..self.dimension {
            for j in i + 1..self.dimension {
                distances.push(self.distance(i, j));
            }
        }
        let avg_distance = distances.iter().sum::<i64>() as f64 / distances.len() as f64;
        let max_distance = distances.iter().copied().max().unwrap_or(0);
        let min_distance = distances.iter().copied().min().unwrap_or(0);

        InstanceStatistics {
            name: self.name.clone(),
            dimension: self.dimension,
            total_demand: self.total_demand(),
            min_demand,
            avg_demand,
            max_demand,
            min_distance,
            avg_distance,
            max_distance,
        }
    }
}

/// Statistics about a CVRP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub total_demand: i64,
    pub min_demand: i64,
    pub avg_demand: f64,
    pub max_demand: i64,
    pub min_distance: i64,
    pub avg_distance: f64,
    pub max_distance: i64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Nodes: {} (1 depot + {} customers)", self.dimension, self.dimension - 1)?;
        writeln!(f, "  Total demand: {}", self.total_demand)?;
        writeln!(f, "  Demand: min {} / avg {:.2} / max {}", self.min_demand, self.avg_demand, self.max_demand)?;
        writeln!(f, "  Distance: min {} / avg {:.2} / max {}", self.min_distance, self.avg_distance, self.max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(values: &[&[i64]]) -> Vec<Vec<i64>> {
        values.iter().map(|row| row.to_vec()).collect()
    }

    #[test]
    fn test_depot_rotated_to_front() {
        let nodes = vec![
            Node::new(7, "Puebla", "Puebla", 4),
            Node::new(1, "Toluca", "Mexico", 0),
            Node::new(3, "Leon", "Guanajuato", 2),
        ];
        let matrix = square(&[
            &[0, 5, 9],
            &[5, 0, 3],
            &[9, 3, 0],
        ]);

        let instance = VrpInstance::from_parts("rotate", nodes, matrix).unwrap();

        assert!(instance.nodes[0].is_depot);
        assert_eq!(instance.nodes[0].id, 1);
        // Distances follow the depot to its new position
        assert_eq!(instance.distance(0, 1), 5);
        assert_eq!(instance.distance(0, 2), 3);
        assert_eq!(instance.distance(1, 2), 9);
    }

    #[test]
    fn test_rejects_asymmetric_matrix() {
        let nodes = vec![
            Node::new(1, "a", "a", 0),
            Node::new(2, "b", "b", 3),
        ];
        let matrix = square(&[
            &[0, 4],
            &[5, 0],
        ]);

        assert!(VrpInstance::from_parts("bad", nodes, matrix).is_err());
    }

    #[test]
    fn test_rejects_missing_depot() {
        let nodes = vec![
            Node::new(1, "a", "a", 2),
            Node::new(2, "b", "b", 3),
        ];
        let matrix = square(&[
            &[0, 4],
            &[4, 0],
        ]);

        assert!(VrpInstance::from_parts("bad", nodes, matrix).is_err());
    }

    #[test]
    fn test_sorted_neighbors_stable_on_ties() {
        let nodes = vec![
            Node::new(1, "a", "a", 0),
            Node::new(2, "b", "b", 1),
            Node::new(3, "c", "c", 1),
            Node::new(4, "d", "d", 1),
        ];
        let matrix = square(&[
            &[0, 7, 7, 2],
            &[7, 0, 1, 4],
            &[7, 1, 0, 4],
            &[2, 4, 4, 0],
        ]);

        let instance = VrpInstance::from_parts("ties", nodes, matrix).unwrap();

        // Equal distances (indices 1 and 2 from the depot) keep catalog order
        assert_eq!(instance.sorted_neighbors[0], vec![3, 1, 2]);
        assert_eq!(instance.sorted_neighbors[3], vec![0, 1, 2]);
    }

    #[test]
    fn test_route_distance_and_demand() {
        let nodes = vec![
            Node::new(1, "a", "a", 0),
            Node::new(2, "b", "b", 3),
            Node::new(3, "c", "c", 5),
        ];
        let matrix = square(&[
            &[0, 4, 6],
            &[4, 0, 2],
            &[6, 2, 0],
        ]);

        let instance = VrpInstance::from_parts("routes", nodes, matrix).unwrap();

        assert_eq!(instance.route_distance(&[0, 1, 2, 0]), 4 + 2 + 6);
        assert_eq!(instance.route_demand(&[0, 1, 2, 0]), 8);
        assert_eq!(instance.route_distance(&[0, 0]), 0);
    }

    #[test]
    fn test_from_file_roundtrip() {
        let dir = std::env::temp_dir().join("aco_vrp_instance_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("small.vrp");
        std::fs::write(
            &path,
            "NAME: small\n\
             DIMENSION: 3\n\
             NODE_SECTION\n\
             1 Toluca Mexico 0\n\
             2 Leon Guanajuato 4\n\
             3 Puebla Puebla 6\n\
             EDGE_WEIGHT_SECTION\n\
             0 3 8\n\
             3 0 5\n\
             8 5 0\n\
             EOF\n",
        )
        .unwrap();

        let instance = VrpInstance::from_file(&path).unwrap();
        assert_eq!(instance.name, "small");
        assert_eq!(instance.dimension, 3);
        assert_eq!(instance.total_demand(), 10);
        assert_eq!(instance.distance(1, 2), 5);
        assert!(instance.nodes[0].is_depot);
    }
}
