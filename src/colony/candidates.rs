//! Candidate list construction.
//!
//! For every node the builder keeps the K nearest other nodes, excluding
//! the depot, in ascending distance order. The underlying ordering is the
//! catalog's stable distance sort, so equal distances keep catalog order.

use crate::instance::VrpInstance;

/// Builds the nearest-K candidate list of every node.
pub struct CandidateListBuilder {
    length: usize,
}

impl CandidateListBuilder {
    pub fn new(length: usize) -> Self {
        CandidateListBuilder { length }
    }

    /// Assign each node its candidate list, set once per solve
    pub fn assign(&self, instance: &mut VrpInstance) {
        let lists: Vec<Vec<usize>> = (0..instance.dimension)
            .map(|i| {
                instance.sorted_neighbors[i]
                    .iter()
                    .copied()
                    .filter(|&j| j != 0)
                    .take(self.length)
                    .collect()
            })
            .collect();

        for (node, candidates) in instance.nodes.iter_mut().zip(lists) {
            node.candidates = candidates;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Node;

    fn five_node_instance() -> VrpInstance {
        let nodes = vec![
            Node::new(1, "depot", "depot", 0),
            Node::new(2, "b", "b", 3),
            Node::new(3, "c", "c", 4),
            Node::new(4, "d", "d", 2),
            Node::new(5, "e", "e", 5),
        ];
        let matrix = vec![
            vec![0, 2, 9, 5, 7],
            vec![2, 0, 4, 8, 6],
            vec![9, 4, 0, 3, 1],
            vec![5, 8, 3, 0, 2],
            vec![7, 6, 1, 2, 0],
        ];
        VrpInstance::from_parts("five", nodes, matrix).unwrap()
    }

    #[test]
    fn test_nearest_k_excluding_depot() {
        let mut instance = five_node_instance();
        CandidateListBuilder::new(2).assign(&mut instance);

        // Depot candidates: nearest customers, never the depot itself
        assert_eq!(instance.nodes[0].candidates, vec![1, 3]);
        // Node 1 is nearest to the depot (distance 2), which is skipped
        assert_eq!(instance.nodes[1].candidates, vec![2, 4]);
        assert_eq!(instance.nodes[2].candidates, vec![4, 3]);
    }

    #[test]
    fn test_list_shorter_than_k_when_few_customers() {
        let mut instance = five_node_instance();
        CandidateListBuilder::new(10).assign(&mut instance);

        // At most dimension - 2 entries for a customer (no self, no depot)
        assert_eq!(instance.nodes[1].candidates.len(), 3);
        assert_eq!(instance.nodes[0].candidates.len(), 4);
        assert!(instance.nodes[1].candidates.iter().all(|&j| j != 0 && j != 1));
    }

    #[test]
    fn test_assignment_is_deterministic() {
        let mut first = five_node_instance();
        let mut second = five_node_instance();
        CandidateListBuilder::new(3).assign(&mut first);
        CandidateListBuilder::new(3).assign(&mut second);

        for (a, b) in first.nodes.iter().zip(second.nodes.iter()) {
            assert_eq!(a.candidates, b.candidates);
        }
    }
}
