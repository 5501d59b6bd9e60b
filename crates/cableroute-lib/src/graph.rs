use std::collections::{HashMap, VecDeque};

use serde::Serialize;
use tracing::debug;

use crate::geometry::{Point2D, SnapKey, DEGENERATE_LENGTH};
use crate::path::ShortestPath;

/// Index of a node within a [`SpatialGraph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Node of the network graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub key: SnapKey,
    /// Coordinate of the first raw endpoint observed for `key`.
    pub position: Point2D,
}

/// Undirected edge stored once per direction in the adjacency list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: NodeId,
    pub distance: f64,
}

/// Summary counters used by diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub components: usize,
}

/// Tolerance-snapped, undirected, weighted graph built from raw line segments.
///
/// Construction (`add_segment`) needs `&mut self`; every query takes `&self`,
/// so a finished graph can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct SpatialGraph {
    tolerance: f64,
    nodes: Vec<GraphNode>,
    lookup: HashMap<SnapKey, NodeId>,
    adjacency: Vec<Vec<Edge>>,
}

impl SpatialGraph {
    /// Create an empty graph. `tolerance` is the snap quantization step and
    /// must be strictly positive (enforced by config validation).
    pub fn new(tolerance: f64) -> Self {
        debug!(tolerance, "initialising spatial graph");
        Self {
            tolerance,
            nodes: Vec::new(),
            lookup: HashMap::new(),
            adjacency: Vec::new(),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Insert a physical line segment.
    ///
    /// Returns `false` (and leaves the graph untouched) when the segment is
    /// shorter than [`DEGENERATE_LENGTH`]. Repeated inserts add parallel edges.
    pub fn add_segment(&mut self, p1: Point2D, p2: Point2D) -> bool {
        let length = p1.distance_to(&p2);
        if length < DEGENERATE_LENGTH {
            debug!(?p1, ?p2, "dropping degenerate segment");
            return false;
        }

        let a = self.intern(p1);
        let b = self.intern(p2);
        self.adjacency[a.0].push(Edge {
            target: b,
            distance: length,
        });
        self.adjacency[b.0].push(Edge {
            target: a,
            distance: length,
        });
        true
    }

    fn intern(&mut self, point: Point2D) -> NodeId {
        let key = SnapKey::from_point(&point, self.tolerance);
        if let Some(&id) = self.lookup.get(&key) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        debug!(cell = %key.canonical(self.tolerance), position = %point, "new network node");
        self.nodes.push(GraphNode {
            key,
            position: point,
        });
        self.adjacency.push(Vec::new());
        self.lookup.insert(key, id);
        id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges, parallel edges included.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.0)
    }

    /// Stored real position of a node.
    pub fn position(&self, id: NodeId) -> Option<Point2D> {
        self.node(id).map(|node| node.position)
    }

    /// Node whose snap key matches the key of `point` exactly.
    pub fn node_for_point(&self, point: &Point2D) -> Option<NodeId> {
        let key = SnapKey::from_point(point, self.tolerance);
        self.lookup.get(&key).copied()
    }

    /// Iterate over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &GraphNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Return the neighbours for a given node.
    pub fn neighbours(&self, node: NodeId) -> &[Edge] {
        self.adjacency
            .get(node.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Nearest node to `point` within `max_radius` (inclusive), with its distance.
    ///
    /// Linear scan in insertion order; the first of several equidistant
    /// candidates wins.
    pub fn find_nearest_node(&self, point: &Point2D, max_radius: f64) -> Option<(NodeId, f64)> {
        let mut best: Option<(NodeId, f64)> = None;
        for (id, node) in self.nodes() {
            if point.outside_box(&node.position, max_radius) {
                continue;
            }
            let distance = point.distance_to(&node.position);
            if distance > max_radius {
                continue;
            }
            if best.map_or(true, |(_, current)| distance < current) {
                best = Some((id, distance));
            }
        }

        if best.is_none() {
            debug!(?point, max_radius, "no graph node within radius");
        }
        best
    }

    /// Map a shortest path onto the stored node positions.
    pub fn path_points(&self, path: &ShortestPath) -> Vec<Point2D> {
        path.nodes
            .iter()
            .filter_map(|&id| self.position(id))
            .collect()
    }

    /// Count connected components ("islands").
    pub fn component_count(&self) -> usize {
        let mut seen = vec![false; self.nodes.len()];
        let mut components = 0;
        let mut queue = VecDeque::new();

        for start in 0..self.nodes.len() {
            if seen[start] {
                continue;
            }
            components += 1;
            seen[start] = true;
            queue.push_back(start);
            while let Some(current) = queue.pop_front() {
                for edge in &self.adjacency[current] {
                    let next = edge.target.0;
                    if !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        components
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.node_count(),
            edges: self.edge_count(),
            components: self.component_count(),
        }
    }
}
