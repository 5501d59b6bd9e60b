//! Route command handler: resolves every logical segment in a drawing and
//! assigns cables.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use cableroute_lib::{write_csv_to_path, RouteOrchestrator};

use crate::commands::{load_config, load_drawing};
use cableroute_cli::output::{render_batch_text, render_json, OutputFormat};
use cableroute_cli::terminal::ColorPalette;

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs<'a> {
    pub config: Option<&'a Path>,
    pub drawing: &'a Path,
    /// Optional CSV report destination.
    pub report: Option<&'a Path>,
    pub format: OutputFormat,
}

/// Handle the route subcommand.
///
/// Segment-level failures are reported but do not fail the command; only
/// configuration and input problems return an error.
pub fn handle_route_command(args: &RouteCommandArgs<'_>) -> Result<()> {
    let config = load_config(args.config)?;
    anyhow::ensure!(
        !config.catalog.is_empty(),
        "no cable catalog configured; pass --config with a file that defines `catalog`"
    );
    let drawing = load_drawing(args.drawing)?;

    let build = drawing.build_graph(&config.tolerances);
    let equipment = drawing.equipment_index();
    let segments = drawing
        .logical_segments()
        .with_context(|| format!("invalid cable segments in {}", args.drawing.display()))?;

    let batch = RouteOrchestrator::new(&build.graph, &equipment, &config)
        .run(&segments)
        .context("segment batch aborted")?;

    if let Some(path) = args.report {
        write_csv_to_path(&batch, path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    match args.format {
        OutputFormat::Json => render_json(&batch).context("failed to write JSON output")?,
        OutputFormat::Text => render_batch_text(&batch, &config.report, ColorPalette::detect()),
    }
    Ok(())
}
