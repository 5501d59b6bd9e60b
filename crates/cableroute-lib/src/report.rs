use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::orchestrator::{BatchReport, SegmentOutcome, SegmentResult};

/// One CSV row per processed segment.
///
/// Numeric columns are left empty for failed segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub handle: String,
    pub origin: String,
    pub destination: String,
    pub route_length: Option<String>,
    pub assigned_cable: Option<String>,
    pub technical_name: String,
    pub reserve: Option<String>,
    pub status: String,
}

impl ReportRow {
    pub fn from_outcome(outcome: &SegmentOutcome) -> Self {
        match &outcome.result {
            SegmentResult::Routed { route, cable } => Self {
                handle: outcome.handle.clone(),
                origin: route.origin_name.clone(),
                destination: route.destination_name.clone(),
                route_length: Some(format!("{:.2}", route.total_distance)),
                assigned_cable: Some(cable.length.to_string()),
                technical_name: cable.technical_name.clone(),
                reserve: Some(format!("{:.2}", cable.reserve)),
                status: cable.status.as_str().to_string(),
            },
            SegmentResult::Failed { error } => Self {
                handle: outcome.handle.clone(),
                origin: String::new(),
                destination: String::new(),
                route_length: None,
                assigned_cable: None,
                technical_name: String::new(),
                reserve: None,
                status: format!("FAILED: {error}"),
            },
        }
    }
}

/// Column names, in [`ReportRow`] field order.
pub const REPORT_HEADERS: [&str; 8] = [
    "handle",
    "origin",
    "destination",
    "route_length",
    "assigned_cable",
    "technical_name",
    "reserve",
    "status",
];

/// Write the batch as CSV to `writer`. The header row is always written,
/// even for an empty batch.
pub fn write_csv<W: Write>(report: &BatchReport, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(REPORT_HEADERS)?;
    for outcome in &report.outcomes {
        csv_writer.serialize(ReportRow::from_outcome(outcome))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the batch as CSV to `path`, creating parent directories.
pub fn write_csv_to_path(report: &BatchReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_csv(report, file)?;
    info!(path = %path.display(), rows = report.len(), "report written");
    Ok(())
}
