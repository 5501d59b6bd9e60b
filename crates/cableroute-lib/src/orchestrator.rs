//! Batch driver: resolves every logical segment and assigns a cable.
//!
//! Each segment ends in exactly one [`SegmentOutcome`], either routed with a
//! cable selection or failed with a [`TopologyError`]. A missing catalog
//! product aborts the whole batch.

use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{CableCatalogSelector, CableSelection, ReserveStatus};
use crate::config::RunConfig;
use crate::equipment::EquipmentIndex;
use crate::error::Result;
use crate::geometry::Point2D;
use crate::graph::SpatialGraph;
use crate::topology::{RouteResult, TopologyError, TopologyResolver};

/// Logical cable segment to be routed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalSegment {
    pub handle: String,
    pub start: Point2D,
    pub end: Point2D,
}

impl LogicalSegment {
    pub fn new(handle: impl Into<String>, start: Point2D, end: Point2D) -> Self {
        Self {
            handle: handle.into(),
            start,
            end,
        }
    }
}

/// Result for a single segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SegmentResult {
    Routed {
        route: RouteResult,
        cable: CableSelection,
    },
    Failed {
        error: TopologyError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentOutcome {
    pub handle: String,
    pub result: SegmentResult,
}

impl SegmentOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self.result, SegmentResult::Routed { .. })
    }
}

/// Outcomes for a whole run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<SegmentOutcome>,
}

impl BatchReport {
    pub fn ok_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_ok()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.ok_count()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Drives the resolver and selector over a list of segments.
#[derive(Debug, Clone, Copy)]
pub struct RouteOrchestrator<'a> {
    resolver: TopologyResolver<'a>,
    selector: CableCatalogSelector<'a>,
}

impl<'a> RouteOrchestrator<'a> {
    pub fn new(
        graph: &'a SpatialGraph,
        equipment: &'a EquipmentIndex,
        config: &'a RunConfig,
    ) -> Self {
        Self {
            resolver: TopologyResolver::new(graph, equipment, config.tolerances),
            selector: CableCatalogSelector::new(config),
        }
    }

    /// Process a single segment.
    ///
    /// Topology failures become a failed outcome; only configuration errors
    /// are returned as `Err`.
    pub fn process(&self, segment: &LogicalSegment) -> Result<SegmentOutcome> {
        let result = match self
            .resolver
            .resolve(&segment.handle, segment.start, segment.end)
        {
            Ok(route) => {
                let cable = self.selector.select(
                    route.total_distance,
                    &route.origin_name,
                    &route.destination_name,
                )?;
                log_reserve(&segment.handle, &route, &cable);
                SegmentResult::Routed { route, cable }
            }
            Err(error) => {
                warn!(segment = %segment.handle, reason = error.code(), "{error}");
                SegmentResult::Failed { error }
            }
        };

        Ok(SegmentOutcome {
            handle: segment.handle.clone(),
            result,
        })
    }

    /// Process every segment in order.
    pub fn run(&self, segments: &[LogicalSegment]) -> Result<BatchReport> {
        info!(segments = segments.len(), "processing segments");
        let outcomes = segments
            .iter()
            .map(|segment| self.process(segment))
            .collect::<Result<Vec<_>>>()?;

        let report = BatchReport { outcomes };
        info!(
            ok = report.ok_count(),
            failed = report.failed_count(),
            "batch completed"
        );
        Ok(report)
    }
}

fn log_reserve(handle: &str, route: &RouteResult, cable: &CableSelection) {
    match cable.status {
        ReserveStatus::Sufficient => {}
        ReserveStatus::BelowMinimum => warn!(
            segment = handle,
            reserve = cable.reserve,
            "reserve below product minimum"
        ),
        ReserveStatus::Insufficient => warn!(
            segment = handle,
            distance = route.total_distance,
            cable = cable.length,
            "insufficient cable: short by {:.2}",
            -cable.reserve
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CableProduct;
    use crate::equipment::Equipment;
    use crate::error::Error;

    fn fixture() -> (SpatialGraph, EquipmentIndex, RunConfig) {
        let mut graph = SpatialGraph::new(0.1);
        graph.add_segment(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0));
        graph.add_segment(Point2D::new(10.0, 0.0), Point2D::new(10.0, 10.0));

        let equipment = EquipmentIndex::new(vec![
            Equipment::new("X_BOX_P", Point2D::new(0.0, 0.0)),
            Equipment::new("HBOX_3.5P", Point2D::new(10.0, 10.0)),
        ]);

        let mut config = RunConfig::default();
        config.catalog.insert(
            config.default_catalog_id.clone(),
            CableProduct {
                technical_name: "DROP 2H".to_string(),
                available_lengths: vec![25.0, 50.0],
                minimum_reserve: 5.0,
            },
        );
        (graph, equipment, config)
    }

    #[test]
    fn every_segment_yields_one_outcome() {
        let (graph, equipment, config) = fixture();
        let orchestrator = RouteOrchestrator::new(&graph, &equipment, &config);
        let segments = vec![
            LogicalSegment::new("A", Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0)),
            LogicalSegment::new("B", Point2D::new(0.0, 0.0), Point2D::new(60.0, 60.0)),
            LogicalSegment::new("C", Point2D::new(10.0, 10.0), Point2D::new(0.0, 0.0)),
        ];

        let report = orchestrator.run(&segments).expect("batch completes");
        assert_eq!(report.len(), 3);
        assert_eq!(report.ok_count(), 2);
        assert_eq!(report.failed_count(), 1);

        let handles: Vec<_> = report.outcomes.iter().map(|o| o.handle.as_str()).collect();
        assert_eq!(handles, vec!["A", "B", "C"]);

        match &report.outcomes[0].result {
            SegmentResult::Routed { route, cable } => {
                assert!((route.total_distance - 20.0).abs() < 1e-9);
                assert_eq!(cable.length, 25.0);
                assert!((cable.reserve - 5.0).abs() < 1e-9);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            report.outcomes[1].result,
            SegmentResult::Failed { .. }
        ));
    }

    #[test]
    fn missing_product_aborts_batch() {
        let (graph, equipment, mut config) = fixture();
        config.catalog.clear();
        let orchestrator = RouteOrchestrator::new(&graph, &equipment, &config);
        let segments = vec![LogicalSegment::new(
            "A",
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 10.0),
        )];

        let err = orchestrator.run(&segments).expect_err("no catalog");
        assert!(matches!(err, Error::MissingCableProduct { .. }));
    }

    #[test]
    fn failed_segments_do_not_need_a_product() {
        let (graph, equipment, mut config) = fixture();
        config.catalog.clear();
        let orchestrator = RouteOrchestrator::new(&graph, &equipment, &config);
        let segments = vec![LogicalSegment::new(
            "Z",
            Point2D::new(500.0, 0.0),
            Point2D::new(10.0, 10.0),
        )];

        let report = orchestrator.run(&segments).expect("topology failure only");
        assert_eq!(report.failed_count(), 1);
    }
}
