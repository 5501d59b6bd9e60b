//! Output formatting for batch results and diagnostics.
//!
//! Text renderers build strings so they can be tested without capturing
//! stdout; the command handlers decide where the text goes.

use std::collections::BTreeMap;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use cableroute_lib::{
    BatchReport, Point2D, ReportConfig, ReserveStatus, SegmentOutcome, SegmentResult,
};

use crate::terminal::ColorPalette;

/// Output style selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Network statistics plus the count of segments dropped while building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    pub nodes: usize,
    pub edges: usize,
    pub components: usize,
    pub dropped_segments: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestEquipment {
    pub name: String,
    pub position: Point2D,
    pub distance: f64,
    pub layer: String,
    /// Block attributes, sorted by tag.
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearestNode {
    pub position: Point2D,
    pub distance: f64,
}

/// Result of the `nearest` diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestSummary {
    pub point: Point2D,
    pub equipment_radius: f64,
    pub node_radius: f64,
    pub equipment: Option<NearestEquipment>,
    pub node: Option<NearestNode>,
}

/// Pretty-print any serialisable value to stdout.
///
/// # Errors
///
/// Returns an error if JSON serialization or writing fails.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

/// One or two lines describing a segment outcome.
pub fn format_outcome(outcome: &SegmentOutcome, report: &ReportConfig, p: ColorPalette) -> String {
    match &outcome.result {
        SegmentResult::Routed { route, cable } => {
            let badge = match cable.status {
                ReserveStatus::Sufficient => p.green,
                ReserveStatus::BelowMinimum => p.orange,
                ReserveStatus::Insufficient => p.red,
            };
            format!(
                "{} {}{}{} -> {}{}{} {:.2} m | {} {}[{}]{}\n    {}{} | layer {}{}",
                outcome.handle,
                p.white_bold,
                route.origin_name,
                p.reset,
                p.white_bold,
                route.destination_name,
                p.reset,
                route.total_distance,
                cable.label(route.total_distance),
                badge,
                cable.status.as_str(),
                p.reset,
                p.gray,
                route.diagnostic_breakdown,
                cable.target_layer(report),
                p.reset,
            )
        }
        SegmentResult::Failed { error } => format!(
            "{} {}[FAILED]{} {}",
            outcome.handle, p.red, p.reset, error
        ),
    }
}

/// Closing summary line for a batch.
pub fn format_batch_summary(batch: &BatchReport) -> String {
    format!(
        "{} segments: {} ok, {} failed",
        batch.len(),
        batch.ok_count(),
        batch.failed_count()
    )
}

pub fn render_batch_text(batch: &BatchReport, report: &ReportConfig, palette: ColorPalette) {
    for outcome in &batch.outcomes {
        println!("{}", format_outcome(outcome, report, palette));
    }
    println!("\n{}", format_batch_summary(batch));
}

pub fn format_network_summary(summary: &NetworkSummary) -> String {
    format!(
        "Nodes: {}\nEdges: {}\nComponents: {}\nDropped degenerate segments: {}",
        summary.nodes, summary.edges, summary.components, summary.dropped_segments
    )
}

pub fn format_inventory(counts: &BTreeMap<&str, usize>) -> String {
    if counts.is_empty() {
        return "No equipment found.".to_string();
    }
    let width = counts.keys().map(|name| name.len()).max().unwrap_or(0);
    let mut lines: Vec<String> = counts
        .iter()
        .map(|(name, count)| format!("{name:<width$}  {count}"))
        .collect();
    lines.push(format!("Total: {}", counts.values().sum::<usize>()));
    lines.join("\n")
}

pub fn format_nearest(summary: &NearestSummary) -> String {
    let equipment = match &summary.equipment {
        Some(found) => {
            let mut text = format!(
                "Nearest equipment: {} at {} ({:.2} away)",
                found.name, found.position, found.distance
            );
            if !found.layer.is_empty() {
                text.push_str(&format!("\n  layer {}", found.layer));
            }
            for (tag, value) in &found.attributes {
                text.push_str(&format!("\n  {tag} = {value}"));
            }
            text
        }
        None => format!(
            "Nearest equipment: none within {}",
            summary.equipment_radius
        ),
    };
    let node = match &summary.node {
        Some(found) => format!(
            "Nearest network node: {} ({:.2} away)",
            found.position, found.distance
        ),
        None => format!("Nearest network node: none within {}", summary.node_radius),
    };
    format!("Point {}\n{equipment}\n{node}", summary.point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cableroute_lib::{
        CableSelection, DistanceBreakdown, RouteResult, SegmentEnd, TopologyError,
    };

    fn routed(status: ReserveStatus, reserve: f64) -> SegmentOutcome {
        let breakdown = DistanceBreakdown {
            origin_access: 2.0,
            network: 180.0,
            destination_access: 0.0,
        };
        SegmentOutcome {
            handle: "1A0".to_string(),
            result: SegmentResult::Routed {
                route: RouteResult {
                    total_distance: 182.0,
                    visualization_path: vec![Point2D::new(0.0, 2.0), Point2D::new(180.0, 0.0)],
                    origin_name: "X_BOX_P".to_string(),
                    destination_name: "HBOX_3.5P".to_string(),
                    breakdown,
                    diagnostic_breakdown: breakdown.to_string(),
                },
                cable: CableSelection {
                    catalog_id: "mpo_300".to_string(),
                    technical_name: "MPO 12H".to_string(),
                    length: 200.0,
                    reserve,
                    origin_group: "xbox".to_string(),
                    destination_group: "hbox".to_string(),
                    status,
                },
            },
        }
    }

    #[test]
    fn routed_line_shows_label_status_and_layer() {
        let text = format_outcome(
            &routed(ReserveStatus::Sufficient, 18.0),
            &ReportConfig::default(),
            ColorPalette::plain(),
        );
        assert!(text.starts_with("1A0 X_BOX_P -> HBOX_3.5P 182.00 m"));
        assert!(text.contains("MPO 12H 200M | 182.0m | Res: 18.0m [OK]"));
        assert!(text.contains("access 2.00 + network 180.00 + access 0.00 = 182.00"));
        assert!(text.contains("layer CABLE PRECONECT MPO 12H SM (200M)"));
    }

    #[test]
    fn insufficient_reserve_is_red_when_colored() {
        let palette = ColorPalette::colored();
        let text = format_outcome(
            &routed(ReserveStatus::Insufficient, -80.0),
            &ReportConfig::default(),
            palette,
        );
        assert!(text.contains(&format!("{}[INSUFFICIENT]", palette.red)));
    }

    #[test]
    fn failed_line_carries_error_message() {
        let outcome = SegmentOutcome {
            handle: "1A7".to_string(),
            result: SegmentResult::Failed {
                error: TopologyError::NoEquipmentNearEndpoint {
                    segment: "1A7".to_string(),
                    end: SegmentEnd::Start,
                    point: Point2D::new(900.0, 900.0),
                    radius: 5.0,
                },
            },
        };
        let text = format_outcome(&outcome, &ReportConfig::default(), ColorPalette::plain());
        assert!(text.starts_with("1A7 [FAILED] segment 1A7"));
    }

    #[test]
    fn summary_counts_outcomes() {
        let batch = BatchReport {
            outcomes: vec![
                routed(ReserveStatus::Sufficient, 18.0),
                routed(ReserveStatus::BelowMinimum, 5.0),
            ],
        };
        assert_eq!(format_batch_summary(&batch), "2 segments: 2 ok, 0 failed");
    }

    #[test]
    fn inventory_is_aligned_and_totalled() {
        let mut counts = BTreeMap::new();
        counts.insert("FAT_FINAL_3.0_P", 2);
        counts.insert("HBOX_3.5P", 1);
        let text = format_inventory(&counts);
        assert_eq!(
            text,
            "FAT_FINAL_3.0_P  2\nHBOX_3.5P        1\nTotal: 3"
        );
        assert_eq!(format_inventory(&BTreeMap::new()), "No equipment found.");
    }

    #[test]
    fn nearest_reports_misses_with_radius() {
        let summary = NearestSummary {
            point: Point2D::new(1.0, 2.0),
            equipment_radius: 5.0,
            node_radius: 20.0,
            equipment: None,
            node: Some(NearestNode {
                position: Point2D::new(1.0, 0.0),
                distance: 2.0,
            }),
        };
        let text = format_nearest(&summary);
        assert!(text.contains("Nearest equipment: none within 5"));
        assert!(text.contains("Nearest network node: (1.00, 0.00) (2.00 away)"));
    }

    #[test]
    fn nearest_lists_layer_and_attributes() {
        let mut attributes = BTreeMap::new();
        attributes.insert("ID_NAME".to_string(), "XB-01".to_string());
        attributes.insert("CAPACITY".to_string(), "12".to_string());
        let summary = NearestSummary {
            point: Point2D::new(0.0, 0.0),
            equipment_radius: 5.0,
            node_radius: 20.0,
            equipment: Some(NearestEquipment {
                name: "X_BOX_P".to_string(),
                position: Point2D::new(0.0, 2.0),
                distance: 2.0,
                layer: "EQUIPMENT".to_string(),
                attributes,
            }),
            node: None,
        };
        let text = format_nearest(&summary);
        assert!(text.contains(
            "Nearest equipment: X_BOX_P at (0.00, 2.00) (2.00 away)\n  layer EQUIPMENT\n  CAPACITY = 12\n  ID_NAME = XB-01"
        ));
    }
}
