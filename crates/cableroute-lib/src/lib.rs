//! Cable routing library entry points.
//!
//! This crate turns a drawing's network lines and equipment blocks into a
//! tolerance-snapped spatial graph, resolves each logical cable segment to a
//! network-following distance between two equipment records, and assigns a
//! catalog cable product and reserve by rule. Higher-level consumers (the
//! CLI) should only depend on the items exported here.
//!
//! Graphs and equipment indexes are built once per run and are read-only
//! afterwards; every per-segment computation is side-effect free.

#![deny(warnings)]

pub mod catalog;
pub mod config;
pub mod drawing;
pub mod equipment;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod orchestrator;
pub mod path;
pub mod report;
pub mod topology;

pub use catalog::{
    CableCatalogSelector, CableProduct, CableRule, CableSelection, ReserveStatus, UNKNOWN_GROUP,
};
pub use config::{default_config_path, EquipmentGroup, ReportConfig, RunConfig, Tolerances};
pub use drawing::{DrawingSnapshot, NetworkBuild, SegmentEntity};
pub use equipment::{Equipment, EquipmentIndex};
pub use error::{Error, Result};
pub use geometry::{Point2D, Polyline, SnapKey};
pub use graph::{Edge, GraphNode, GraphStats, NodeId, SpatialGraph};
pub use orchestrator::{BatchReport, LogicalSegment, RouteOrchestrator, SegmentOutcome, SegmentResult};
pub use path::{shortest_path, ShortestPath};
pub use report::{write_csv, write_csv_to_path, ReportRow, REPORT_HEADERS};
pub use topology::{DistanceBreakdown, RouteResult, SegmentEnd, TopologyError, TopologyResolver};
