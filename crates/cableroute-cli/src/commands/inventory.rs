//! Equipment inventory for a drawing.

use std::path::Path;

use anyhow::{Context, Result};

use crate::commands::load_drawing;
use cableroute_cli::output::{format_inventory, render_json, OutputFormat};

pub fn handle_inventory(drawing: &Path, format: OutputFormat) -> Result<()> {
    let index = load_drawing(drawing)?.equipment_index();
    let counts = index.inventory();

    match format {
        OutputFormat::Json => render_json(&counts).context("failed to write JSON output")?,
        OutputFormat::Text => println!("{}", format_inventory(&counts)),
    }
    Ok(())
}
