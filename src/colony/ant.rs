//! A single constructive agent.

/// One ant: remaining capacity, current position, the ordered path taken
/// so far and a finished flag. All positions are catalog indices.
#[derive(Debug, Clone)]
pub struct Ant {
    pub id: usize,
    /// Remaining load capacity
    pub capacity: i64,
    /// Current catalog position
    pub current: usize,
    /// Ordered nodes visited so far, depot included
    pub memory: Vec<usize>,
    /// Whether the route is complete
    pub finished: bool,
}

impl Ant {
    pub fn new(id: usize, capacity: i64, depot: usize) -> Self {
        Ant {
            id,
            capacity,
            current: depot,
            memory: vec![depot],
            finished: false,
        }
    }

    /// Move to a node, recording it and consuming its demand
    pub fn advance(&mut self, node: usize, demand: i64) {
        self.current = node;
        self.memory.push(node);
        self.capacity -= demand;
    }

    /// Send the ant back to the depot and mark its route complete
    pub fn force_return(&mut self, depot: usize) {
        self.current = depot;
        self.memory.push(depot);
        self.finished = true;
    }

    /// Whether the node is already part of this ant's route
    pub fn remembers(&self, node: usize) -> bool {
        self.memory.contains(&node)
    }

    /// Restore initial state for the next construction round
    pub fn reset(&mut self, capacity: i64, depot: usize) {
        self.capacity = capacity;
        self.current = depot;
        self.memory = vec![depot];
        self.finished = false;
    }
}
