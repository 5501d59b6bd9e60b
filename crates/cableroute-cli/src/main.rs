mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cableroute_cli::output::OutputFormat;
use cableroute_lib::Point2D;

use commands::nearest::NearestCommandArgs;
use commands::route::RouteCommandArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Network-following cable routing and selection")]
struct Cli {
    /// Run configuration file (JSON). Defaults to the platform config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format for results.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Route every cable segment in a drawing and assign cable products.
    Route {
        /// Drawing snapshot (JSON).
        #[arg(long)]
        drawing: PathBuf,
        /// Write a CSV report to this path.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Report node, edge and component counts of the network.
    GraphStats {
        #[arg(long)]
        drawing: PathBuf,
    },
    /// Count equipment records by name.
    Inventory {
        #[arg(long)]
        drawing: PathBuf,
    },
    /// Find the nearest equipment and network node to a point.
    Nearest {
        #[arg(long)]
        drawing: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        /// Search radius overriding the configured tolerances.
        #[arg(long)]
        radius: Option<f64>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match &cli.command {
        Command::Route { drawing, report } => {
            commands::route::handle_route_command(&RouteCommandArgs {
                config,
                drawing,
                report: report.as_deref(),
                format: cli.format,
            })
        }
        Command::GraphStats { drawing } => {
            commands::graph::handle_graph_stats(config, drawing, cli.format)
        }
        Command::Inventory { drawing } => commands::inventory::handle_inventory(drawing, cli.format),
        Command::Nearest {
            drawing,
            x,
            y,
            radius,
        } => commands::nearest::handle_nearest(&NearestCommandArgs {
            config,
            drawing,
            point: Point2D::new(*x, *y),
            radius: *radius,
            format: cli.format,
        }),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
