use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;

use crate::graph::{NodeId, SpatialGraph};

/// Lowest-cost route between two graph nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortestPath {
    pub distance: f64,
    /// Nodes from start to goal, both inclusive.
    pub nodes: Vec<NodeId>,
}

/// Run Dijkstra's algorithm between `start` and `goal`.
///
/// Returns `None` when `goal` lies in a different connected component, or
/// when either node is not part of `graph`. The graph is never mutated.
pub fn shortest_path(graph: &SpatialGraph, start: NodeId, goal: NodeId) -> Option<ShortestPath> {
    let count = graph.node_count();
    if start.index() >= count || goal.index() >= count {
        return None;
    }

    let mut distances = vec![f64::INFINITY; count];
    let mut parents: Vec<Option<NodeId>> = vec![None; count];
    let mut queue = BinaryHeap::new();

    distances[start.index()] = 0.0;
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        let current_distance = distances[entry.node.index()];
        if entry.cost.0 > current_distance {
            continue;
        }

        if entry.node == goal {
            return Some(ShortestPath {
                distance: current_distance,
                nodes: reconstruct_path(&parents, start, goal),
            });
        }

        for edge in graph.neighbours(entry.node) {
            let next = edge.target;
            let next_cost = current_distance + edge.distance;
            if next_cost < distances[next.index()] {
                distances[next.index()] = next_cost;
                parents[next.index()] = Some(entry.node);
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    None
}

fn reconstruct_path(parents: &[Option<NodeId>], start: NodeId, goal: NodeId) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents[node.index()];
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: NodeId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
