//! Nearest equipment and network node to a point.

use std::path::Path;

use anyhow::{Context, Result};

use cableroute_lib::Point2D;

use crate::commands::{load_config, load_drawing};
use cableroute_cli::output::{
    format_nearest, render_json, NearestEquipment, NearestNode, NearestSummary, OutputFormat,
};

#[derive(Debug, Clone)]
pub struct NearestCommandArgs<'a> {
    pub config: Option<&'a Path>,
    pub drawing: &'a Path,
    pub point: Point2D,
    /// Overrides both the equipment snap radius and the network access radius.
    pub radius: Option<f64>,
    pub format: OutputFormat,
}

pub fn handle_nearest(args: &NearestCommandArgs<'_>) -> Result<()> {
    if let Some(radius) = args.radius {
        anyhow::ensure!(
            radius.is_finite() && radius > 0.0,
            "--radius must be a positive number, got {radius}"
        );
    }

    let config = load_config(args.config)?;
    let drawing = load_drawing(args.drawing)?;
    let build = drawing.build_graph(&config.tolerances);
    let index = drawing.equipment_index();

    let equipment_radius = args
        .radius
        .unwrap_or(config.tolerances.equipment_snap_radius);
    let node_radius = args
        .radius
        .unwrap_or(config.tolerances.network_access_radius);

    let equipment = index
        .find_nearest_equipment(&args.point, equipment_radius)
        .map(|(found, distance)| NearestEquipment {
            name: found.name.clone(),
            position: found.position,
            distance,
            layer: found.layer.clone(),
            attributes: found
                .attributes
                .iter()
                .map(|(tag, value)| (tag.clone(), value.clone()))
                .collect(),
        });
    let node = build
        .graph
        .find_nearest_node(&args.point, node_radius)
        .and_then(|(id, distance)| {
            build
                .graph
                .position(id)
                .map(|position| NearestNode { position, distance })
        });

    let summary = NearestSummary {
        point: args.point,
        equipment_radius,
        node_radius,
        equipment,
        node,
    };

    match args.format {
        OutputFormat::Json => render_json(&summary).context("failed to write JSON output")?,
        OutputFormat::Text => println!("{}", format_nearest(&summary)),
    }
    Ok(())
}
