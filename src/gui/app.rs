//! Health Scatter Main Application
//! Main window with control panel and responsive chart viewer.

use crate::charts::{export_png, export_svg, Viewport};
use crate::config::ChartConfig;
use crate::data::{DataLoader, Dataset};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::stats::{Correlation, StatsCalculator};
use egui::SidePanel;
use polars::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;

/// Size used for exports made before the chart was ever shown.
const DEFAULT_EXPORT_VIEWPORT: Viewport = Viewport {
    width: 960.0,
    height: 640.0,
};

/// CSV loading result from background thread
enum LoadResult {
    Complete {
        df: DataFrame,
        path: PathBuf,
        columns: Vec<String>,
        row_count: usize,
    },
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ExportFormat {
    Svg,
    Png,
}

/// Main application window.
pub struct ScatterApp {
    loader: DataLoader,
    config: ChartConfig,
    dataset: Option<Dataset>,
    summary: Option<Correlation>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl ScatterApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: ChartConfig,
        initial_csv: Option<PathBuf>,
    ) -> Self {
        let mut app = Self {
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(&config),
            chart_viewer: ChartViewer::new(config.clone()),
            config,
            dataset: None,
            summary: None,
            load_rx: None,
            is_loading: false,
        };
        if let Some(path) = initial_csv {
            app.start_loading(path);
        }
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_loading(path);
        }
    }

    /// Load CSV in background thread
    fn start_loading(&mut self, path: PathBuf) {
        self.control_panel.settings.csv_path = Some(path.clone());
        self.control_panel.set_status("Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let result = match DataLoader::read_csv(&path) {
                Ok(df) => {
                    let columns: Vec<String> = df
                        .get_column_names()
                        .iter()
                        .map(|s| s.to_string())
                        .collect();
                    let row_count = df.height();
                    LoadResult::Complete {
                        df,
                        path,
                        columns,
                        row_count,
                    }
                }
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete {
                df,
                path,
                columns,
                row_count,
            }) => {
                log::info!("loaded {} rows from {}", row_count, path.display());
                self.loader.set_dataframe(df, path);
                self.control_panel.update_columns(columns);
                self.is_loading = false;
                self.rebuild_dataset();
            }
            Ok(LoadResult::Error(error)) => {
                log::error!("CSV load failed: {}", error);
                self.control_panel.set_status(&format!("Error: {}", error));
                self.is_loading = false;
            }
            Err(TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(TryRecvError::Disconnected) => {
                self.control_panel
                    .set_status("Error: CSV loader stopped unexpectedly");
                self.is_loading = false;
            }
        }
    }

    /// Validate the loaded frame with the current column mapping.
    fn rebuild_dataset(&mut self) {
        let mapping = self.control_panel.settings.mapping.clone();
        match self.loader.dataset(&mapping) {
            Ok(dataset) => {
                self.summary = StatsCalculator::summarize(&dataset.points);
                self.control_panel
                    .set_status(&format!("Loaded {} points", dataset.len()));
                self.control_panel.has_data = true;
                self.dataset = Some(dataset);
            }
            Err(e) => {
                self.control_panel.set_status(&format!("Error: {}", e));
                self.control_panel.has_data = false;
                self.summary = None;
                self.dataset = None;
            }
        }
        self.apply_settings();
    }

    /// Push control panel settings into the chart configuration.
    fn apply_settings(&mut self) {
        self.control_panel.settings.apply_to(&mut self.config);
        self.chart_viewer.set_config(self.config.clone());
    }

    fn handle_export(&mut self, format: ExportFormat) {
        let Some(dataset) = &self.dataset else {
            self.control_panel.set_status("No chart to export");
            return;
        };

        let (filter, extension) = match format {
            ExportFormat::Svg => ("SVG Image", "svg"),
            ExportFormat::Png => ("PNG Image", "png"),
        };

        // Ask user for output location
        let Some(path) = rfd::FileDialog::new()
            .add_filter(filter, &[extension])
            .set_file_name(format!("scatter.{}", extension))
            .save_file()
        else {
            return;
        };

        let viewport = self
            .chart_viewer
            .viewport()
            .unwrap_or(DEFAULT_EXPORT_VIEWPORT);

        let result = match format {
            ExportFormat::Svg => export_svg(&dataset.points, &self.config, viewport, &path),
            ExportFormat::Png => export_png(&dataset.points, &self.config, viewport, &path),
        };

        match result {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Exported {}", path.display()));
                if let Err(e) = open::that(&path) {
                    log::warn!("could not open {}: {}", path.display(), e);
                }
            }
            Err(e) => {
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for ScatterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, self.summary.as_ref());

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::MappingChanged => self.rebuild_dataset(),
                        ControlPanelAction::ConfigChanged => self.apply_settings(),
                        ControlPanelAction::ExportSvg => self.handle_export(ExportFormat::Svg),
                        ControlPanelAction::ExportPng => self.handle_export(ExportFormat::Png),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, self.dataset.as_ref());
        });
    }
}
