use std::cmp::Ordering;

use petgraph::graph::NodeIndex;

/// Frontier entry. `seq` records push order so equal costs pop first-in,
/// first-out.
#[derive(Copy, Clone, Debug)]
pub(super) struct State {
    pub(super) cost: f64,
    pub(super) seq: usize,
    pub(super) node: NodeIndex,
}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost (reversed from standard Rust BinaryHeap)
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

#[cfg(test)]
mod tests {
    use std::collections::BinaryHeap;

    use super::*;

    #[test]
    fn heap_pops_cheapest_then_oldest() {
        let mut heap = BinaryHeap::new();
        heap.push(State { cost: 5.0, seq: 0, node: NodeIndex::new(0) });
        heap.push(State { cost: 1.0, seq: 1, node: NodeIndex::new(1) });
        heap.push(State { cost: 1.0, seq: 2, node: NodeIndex::new(2) });
        heap.push(State { cost: 3.0, seq: 3, node: NodeIndex::new(3) });

        let order: Vec<_> = std::iter::from_fn(|| heap.pop())
            .map(|s| s.node.index())
            .collect();
        assert_eq!(order, vec![1, 2, 3, 0]);
    }
}
