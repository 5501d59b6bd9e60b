//! Drawing snapshot consumed by a run.
//!
//! A snapshot is the JSON export of the entities a drawing reader extracted:
//! network polylines, equipment blocks, and the logical cable segments that
//! need a route. It is loaded fresh for every run.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Tolerances;
use crate::equipment::{Equipment, EquipmentIndex};
use crate::error::{Error, Result};
use crate::geometry::Polyline;
use crate::graph::SpatialGraph;
use crate::orchestrator::LogicalSegment;

/// Logical cable run as drawn, identified by its drawing handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentEntity {
    pub handle: String,
    pub vertices: Polyline,
}

/// Entities extracted from one drawing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawingSnapshot {
    #[serde(default)]
    pub network: Vec<Polyline>,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(default)]
    pub segments: Vec<SegmentEntity>,
}

/// Result of building the network graph from a snapshot.
#[derive(Debug, Clone)]
pub struct NetworkBuild {
    pub graph: SpatialGraph,
    /// Raw segments dropped because they were degenerate.
    pub dropped_segments: usize,
}

impl DrawingSnapshot {
    /// Load a snapshot from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading drawing snapshot");
        let file = fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a snapshot from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Build the network graph. Every consecutive vertex pair of every network
    /// polyline becomes one raw segment.
    pub fn build_graph(&self, tolerances: &Tolerances) -> NetworkBuild {
        let mut graph = SpatialGraph::new(tolerances.snap_tolerance);
        let mut dropped_segments = 0;
        for polyline in &self.network {
            for (a, b) in polyline.segments() {
                if !graph.add_segment(a, b) {
                    dropped_segments += 1;
                }
            }
        }

        info!(
            snap_tolerance = graph.tolerance(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dropped = dropped_segments,
            "network graph built"
        );
        NetworkBuild {
            graph,
            dropped_segments,
        }
    }

    pub fn equipment_index(&self) -> EquipmentIndex {
        EquipmentIndex::new(self.equipment.clone())
    }

    /// Logical segments to route, reduced to their first and last vertex.
    pub fn logical_segments(&self) -> Result<Vec<LogicalSegment>> {
        self.segments
            .iter()
            .map(|entity| {
                let (start, end) =
                    entity
                        .vertices
                        .endpoints()
                        .ok_or_else(|| Error::InputValidation {
                            message: format!(
                                "segment {} has fewer than two vertices",
                                entity.handle
                            ),
                        })?;
                debug!(
                    handle = %entity.handle,
                    drawn_length = entity.vertices.length(),
                    "logical segment"
                );
                Ok(LogicalSegment {
                    handle: entity.handle.clone(),
                    start,
                    end,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2D;

    const SNAPSHOT: &str = r#"{
        "network": [
            [[0, 0], [10, 0], [10, 10]],
            [[10, 10], [10, 10]]
        ],
        "equipment": [
            { "name": "X_BOX_P", "position": [0, 0], "layer": "EQUIPOS", "attributes": { "ID_NAME": "XB-01" } },
            { "name": "HBOX_3.5P", "position": [10, 10] }
        ],
        "segments": [
            { "handle": "1A2", "vertices": [[0.2, 0.1], [5, 5], [9.9, 10.2]] }
        ]
    }"#;

    #[test]
    fn builds_graph_from_polylines() {
        let snapshot = DrawingSnapshot::from_reader(SNAPSHOT.as_bytes()).expect("valid json");
        let build = snapshot.build_graph(&Tolerances::default());

        assert_eq!(build.graph.node_count(), 3);
        assert_eq!(build.graph.edge_count(), 2);
        assert_eq!(build.dropped_segments, 1);
    }

    #[test]
    fn equipment_attributes_are_kept() {
        let snapshot = DrawingSnapshot::from_reader(SNAPSHOT.as_bytes()).expect("valid json");
        let index = snapshot.equipment_index();
        assert_eq!(index.len(), 2);
        assert_eq!(index.records()[0].attributes["ID_NAME"], "XB-01");
        assert_eq!(index.records()[1].layer, "");
    }

    #[test]
    fn logical_segments_use_polyline_endpoints() {
        let snapshot = DrawingSnapshot::from_reader(SNAPSHOT.as_bytes()).expect("valid json");
        let segments = snapshot.logical_segments().expect("valid segments");
        assert_eq!(
            segments,
            vec![LogicalSegment {
                handle: "1A2".to_string(),
                start: Point2D::new(0.2, 0.1),
                end: Point2D::new(9.9, 10.2),
            }]
        );
    }

    #[test]
    fn extra_segment_fields_are_ignored() {
        let json = r#"{ "segments": [
            { "handle": "2B", "layer": "CABLES", "vertices": [[0, 0], [3, 4], [3, 8]] }
        ] }"#;
        let snapshot = DrawingSnapshot::from_reader(json.as_bytes()).expect("valid json");
        assert_eq!(snapshot.segments[0].vertices.length(), 9.0);
        let segments = snapshot.logical_segments().expect("valid segments");
        assert_eq!(segments[0].end, Point2D::new(3.0, 8.0));
    }

    #[test]
    fn single_vertex_segment_is_rejected() {
        let json = r#"{ "segments": [ { "handle": "FF", "vertices": [[1, 1]] } ] }"#;
        let snapshot = DrawingSnapshot::from_reader(json.as_bytes()).expect("valid json");
        let err = snapshot.logical_segments().expect_err("one vertex");
        assert!(err.to_string().contains("FF"));
    }
}
