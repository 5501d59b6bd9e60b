//! Endpoint-to-equipment resolution and network-following distance.
//!
//! For each logical segment the resolver:
//!
//! 1. snaps both raw endpoints to the nearest equipment (`equipment_snap_radius`),
//! 2. connects each equipment to its nearest network node (`network_access_radius`),
//! 3. routes between the two access nodes with Dijkstra,
//! 4. adds the two access spurs, dropping those below `ignore_access_below`.
//!
//! Failures are returned as [`TopologyError`] values scoped to the segment.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::Tolerances;
use crate::equipment::{Equipment, EquipmentIndex};
use crate::geometry::Point2D;
use crate::graph::{NodeId, SpatialGraph};
use crate::path::shortest_path;

/// Which end of a logical segment a failure relates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentEnd {
    Start,
    End,
}

impl fmt::Display for SegmentEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentEnd::Start => f.write_str("start"),
            SegmentEnd::End => f.write_str("end"),
        }
    }
}

/// Recoverable, segment-level resolution failure.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologyError {
    #[error("segment {segment}: no equipment within {radius} of the {end} point {point}")]
    NoEquipmentNearEndpoint {
        segment: String,
        end: SegmentEnd,
        point: Point2D,
        radius: f64,
    },

    #[error("segment {segment}: equipment {equipment} at the {end} is isolated from the network (no node within {radius})")]
    EquipmentIsolated {
        segment: String,
        end: SegmentEnd,
        equipment: String,
        position: Point2D,
        radius: f64,
    },

    #[error("segment {segment}: network disconnected between {origin} and {destination} (islands)")]
    NetworkDisconnected {
        segment: String,
        origin: String,
        destination: String,
        origin_position: Point2D,
    },
}

impl TopologyError {
    /// Identity of the failing segment.
    pub fn segment(&self) -> &str {
        match self {
            TopologyError::NoEquipmentNearEndpoint { segment, .. }
            | TopologyError::EquipmentIsolated { segment, .. }
            | TopologyError::NetworkDisconnected { segment, .. } => segment,
        }
    }

    /// Point an error-visualisation step should mark.
    pub fn marker_point(&self) -> Point2D {
        match self {
            TopologyError::NoEquipmentNearEndpoint { point, .. } => *point,
            TopologyError::EquipmentIsolated { position, .. } => *position,
            TopologyError::NetworkDisconnected {
                origin_position, ..
            } => *origin_position,
        }
    }

    /// Short machine-friendly reason code.
    pub fn code(&self) -> &'static str {
        match self {
            TopologyError::NoEquipmentNearEndpoint { .. } => "no_equipment_near_endpoint",
            TopologyError::EquipmentIsolated { .. } => "equipment_isolated",
            TopologyError::NetworkDisconnected { .. } => "network_disconnected",
        }
    }
}

/// Distance components of a resolved route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceBreakdown {
    /// Access spur at the origin after thresholding.
    pub origin_access: f64,
    pub network: f64,
    /// Access spur at the destination after thresholding.
    pub destination_access: f64,
}

impl DistanceBreakdown {
    pub fn total(&self) -> f64 {
        self.origin_access + self.network + self.destination_access
    }
}

impl fmt::Display for DistanceBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "access {:.2} + network {:.2} + access {:.2} = {:.2}",
            self.origin_access,
            self.network,
            self.destination_access,
            self.total()
        )
    }
}

/// Successful resolution of one logical segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub total_distance: f64,
    /// Origin equipment, network nodes, destination equipment.
    pub visualization_path: Vec<Point2D>,
    pub origin_name: String,
    pub destination_name: String,
    pub breakdown: DistanceBreakdown,
    pub diagnostic_breakdown: String,
}

/// Resolves logical segments against a frozen graph and equipment index.
#[derive(Debug, Clone, Copy)]
pub struct TopologyResolver<'a> {
    graph: &'a SpatialGraph,
    equipment: &'a EquipmentIndex,
    tolerances: Tolerances,
}

impl<'a> TopologyResolver<'a> {
    pub fn new(
        graph: &'a SpatialGraph,
        equipment: &'a EquipmentIndex,
        tolerances: Tolerances,
    ) -> Self {
        Self {
            graph,
            equipment,
            tolerances,
        }
    }

    /// Resolve the segment `segment` running from `start` to `end`.
    pub fn resolve(
        &self,
        segment: &str,
        start: Point2D,
        end: Point2D,
    ) -> Result<RouteResult, TopologyError> {
        let origin = self.snap_equipment(segment, SegmentEnd::Start, start)?;
        let destination = self.snap_equipment(segment, SegmentEnd::End, end)?;

        let (origin_node, origin_access) = self.access_node(segment, SegmentEnd::Start, origin)?;
        let (destination_node, destination_access) =
            self.access_node(segment, SegmentEnd::End, destination)?;

        let path = shortest_path(self.graph, origin_node, destination_node).ok_or_else(|| {
            TopologyError::NetworkDisconnected {
                segment: segment.to_string(),
                origin: origin.name.clone(),
                destination: destination.name.clone(),
                origin_position: origin.position,
            }
        })?;

        let breakdown = DistanceBreakdown {
            origin_access: self.threshold_access(origin_access),
            network: path.distance,
            destination_access: self.threshold_access(destination_access),
        };

        let mut visualization_path = Vec::with_capacity(path.nodes.len() + 2);
        visualization_path.push(origin.position);
        visualization_path.extend(self.graph.path_points(&path));
        visualization_path.push(destination.position);

        debug!(segment, %breakdown, "segment resolved");

        Ok(RouteResult {
            total_distance: breakdown.total(),
            visualization_path,
            origin_name: origin.name.clone(),
            destination_name: destination.name.clone(),
            breakdown,
            diagnostic_breakdown: breakdown.to_string(),
        })
    }

    fn snap_equipment(
        &self,
        segment: &str,
        end: SegmentEnd,
        point: Point2D,
    ) -> Result<&'a Equipment, TopologyError> {
        let radius = self.tolerances.equipment_snap_radius;
        self.equipment
            .find_nearest_equipment(&point, radius)
            .map(|(equipment, _)| equipment)
            .ok_or_else(|| TopologyError::NoEquipmentNearEndpoint {
                segment: segment.to_string(),
                end,
                point,
                radius,
            })
    }

    fn access_node(
        &self,
        segment: &str,
        end: SegmentEnd,
        equipment: &Equipment,
    ) -> Result<(NodeId, f64), TopologyError> {
        let radius = self.tolerances.network_access_radius;
        self.graph
            .find_nearest_node(&equipment.position, radius)
            .ok_or_else(|| TopologyError::EquipmentIsolated {
                segment: segment.to_string(),
                end,
                equipment: equipment.name.clone(),
                position: equipment.position,
                radius,
            })
    }

    fn threshold_access(&self, distance: f64) -> f64 {
        if distance < self.tolerances.ignore_access_below {
            if distance > 0.0 {
                debug!(distance, "ignoring short access spur");
            }
            0.0
        } else {
            distance
        }
    }
}
