//! Health Scatter - Responsive scatter chart viewer and exporter
//!
//! Opens an interactive window by default; `--svg`/`--png` render headless and exit.

use anyhow::{bail, Context, Result};
use clap::Parser;
use eframe::egui;
use env_logger::Env;
use health_scatter::charts::{export_png, export_svg, Viewport};
use health_scatter::config::ChartConfig;
use health_scatter::data::DataLoader;
use health_scatter::gui::ScatterApp;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "health-scatter", version, about = "Poverty vs. healthcare scatter chart")]
struct Cli {
    /// CSV dataset to chart
    data: Option<PathBuf>,

    /// JSON chart configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the chart as SVG and exit
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write the chart as PNG and exit
    #[arg(long)]
    png: Option<PathBuf>,

    /// Output size for exports, WIDTHxHEIGHT
    #[arg(long, default_value = "960x640")]
    size: Viewport,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ChartConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ChartConfig::default(),
    };

    if cli.svg.is_some() || cli.png.is_some() {
        return export(&cli, &config);
    }

    run_window(config, cli.data)
}

/// Headless rendering to the requested files.
fn export(cli: &Cli, config: &ChartConfig) -> Result<()> {
    let Some(data) = &cli.data else {
        bail!("a CSV dataset is required for --svg/--png");
    };
    let dataset = DataLoader::load_dataset(data, &config.columns)
        .with_context(|| format!("loading dataset {}", data.display()))?;

    if let Some(path) = &cli.svg {
        export_svg(&dataset.points, config, cli.size, path)
            .with_context(|| format!("exporting {}", path.display()))?;
    }
    if let Some(path) = &cli.png {
        export_png(&dataset.points, config, cli.size, path)
            .with_context(|| format!("exporting {}", path.display()))?;
    }
    Ok(())
}

fn run_window(config: ChartConfig, data: Option<PathBuf>) -> Result<()> {
    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Health Scatter"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Health Scatter",
        options,
        Box::new(move |cc| Ok(Box::new(ScatterApp::new(cc, config, data)))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {e}"))
}
