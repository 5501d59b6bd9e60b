//! Graph statistics for a drawing's network layer.

use std::path::Path;

use anyhow::{Context, Result};

use crate::commands::{load_config, load_drawing};
use cableroute_cli::output::{format_network_summary, render_json, NetworkSummary, OutputFormat};

pub fn handle_graph_stats(
    config: Option<&Path>,
    drawing: &Path,
    format: OutputFormat,
) -> Result<()> {
    let config = load_config(config)?;
    let build = load_drawing(drawing)?.build_graph(&config.tolerances);
    let stats = build.graph.stats();
    let summary = NetworkSummary {
        nodes: stats.nodes,
        edges: stats.edges,
        components: stats.components,
        dropped_segments: build.dropped_segments,
    };

    match format {
        OutputFormat::Json => render_json(&summary).context("failed to write JSON output")?,
        OutputFormat::Text => println!("{}", format_network_summary(&summary)),
    }
    Ok(())
}
