//! Control Panel Widget
//! Left side panel with data source, column mapping, chart options and export.

use crate::config::ChartConfig;
use crate::data::ColumnMapping;
use crate::stats::Correlation;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// User settings for the chart
#[derive(Clone)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub mapping: ColumnMapping,
    /// Start the horizontal axis at the data minimum instead of `x_floor`
    pub x_floor_from_data: bool,
    pub x_floor: f64,
    pub show_trend_line: bool,
}

impl UserSettings {
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            csv_path: None,
            mapping: config.columns.clone(),
            x_floor_from_data: config.x_floor.is_none(),
            x_floor: config.x_floor.unwrap_or(8.0),
            show_trend_line: config.show_trend_line,
        }
    }

    /// Copy the panel settings into a chart configuration.
    pub fn apply_to(&self, config: &mut ChartConfig) {
        config.columns = self.mapping.clone();
        config.x_floor = (!self.x_floor_from_data).then_some(self.x_floor);
        config.show_trend_line = self.show_trend_line;
    }
}

/// Left side control panel with file selection and chart options.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub columns: Vec<String>,
    pub status: String,
    pub has_data: bool,
}

impl ControlPanel {
    pub fn new(config: &ChartConfig) -> Self {
        Self {
            settings: UserSettings::from_config(config),
            columns: Vec::new(),
            status: "Ready".to_string(),
            has_data: false,
        }
    }

    /// Update available columns after CSV load. Mapped names missing from the file are kept
    /// so the validation error names them.
    pub fn update_columns(&mut self, columns: Vec<String>) {
        self.columns = columns;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, summary: Option<&Correlation>) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📈 Health Scatter")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Poverty vs. Healthcare")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Column Configuration Section =====
        ui.label(RichText::new("🔧 Column Configuration").size(14.0).strong());
        ui.add_space(8.0);

        let mut mapping_changed = false;
        {
            let columns = &self.columns;
            let mapping = &mut self.settings.mapping;
            mapping_changed |= column_picker(ui, "label_col", "Label Column:", columns, &mut mapping.label);
            mapping_changed |= column_picker(ui, "name_col", "Name Column:", columns, &mut mapping.name);
            mapping_changed |= column_picker(ui, "x_col", "X Column:", columns, &mut mapping.x);
            mapping_changed |= column_picker(ui, "y_col", "Y Column:", columns, &mut mapping.y);
        }
        if mapping_changed {
            action = ControlPanelAction::MappingChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Chart Options Section =====
        ui.label(RichText::new("⚙️ Chart Options").size(14.0).strong());
        ui.add_space(5.0);

        let mut config_changed = false;
        config_changed |= ui
            .checkbox(&mut self.settings.x_floor_from_data, "X axis starts at data minimum")
            .changed();
        ui.add_enabled_ui(!self.settings.x_floor_from_data, |ui| {
            ui.horizontal(|ui| {
                ui.label("X axis start:");
                config_changed |= ui
                    .add(egui::DragValue::new(&mut self.settings.x_floor).speed(0.5))
                    .changed();
            });
        });
        config_changed |= ui
            .checkbox(&mut self.settings.show_trend_line, "Show trend line")
            .changed();
        if config_changed && action == ControlPanelAction::None {
            action = ControlPanelAction::ConfigChanged;
        }

        if let Some(fit) = summary {
            ui.add_space(8.0);
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.label(RichText::new(format!("n = {}", fit.count)).size(12.0));
                    ui.label(RichText::new(format!("Pearson r = {:.3}", fit.r)).size(12.0));
                    ui.label(RichText::new(format!("R² = {:.3}", fit.r_squared())).size(12.0));
                    ui.label(
                        RichText::new(format!("y = {:.3}x + {:.3}", fit.slope, fit.intercept))
                            .size(12.0),
                    );
                });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.has_data, |ui| {
                let svg_button = egui::Button::new(RichText::new("💾 Export SVG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(svg_button).clicked() {
                    action = ControlPanelAction::ExportSvg;
                }

                ui.add_space(8.0);

                let png_button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(png_button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") || self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Aligned label + combo box over the loaded columns. Returns whether the selection changed.
fn column_picker(
    ui: &mut egui::Ui,
    id: &str,
    label: &str,
    columns: &[String],
    selected: &mut String,
) -> bool {
    let label_width = 110.0;
    let combo_width = 150.0;
    let mut changed = false;

    ui.horizontal(|ui| {
        ui.add_sized([label_width, 20.0], egui::Label::new(label));
        ComboBox::from_id_salt(id)
            .width(combo_width)
            .selected_text(selected.as_str())
            .show_ui(ui, |ui| {
                for col in columns {
                    if ui.selectable_label(*selected == *col, col).clicked() && *selected != *col {
                        *selected = col.clone();
                        changed = true;
                    }
                }
            });
    });
    ui.add_space(5.0);

    changed
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    MappingChanged,
    ConfigChanged,
    ExportSvg,
    ExportPng,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_config() {
        let mut config = ChartConfig::default();
        let mut settings = UserSettings::from_config(&config);
        assert!(!settings.x_floor_from_data);
        assert_eq!(settings.x_floor, 8.0);

        settings.x_floor_from_data = true;
        settings.show_trend_line = true;
        settings.mapping.x = "income".to_string();
        settings.apply_to(&mut config);

        assert_eq!(config.x_floor, None);
        assert!(config.show_trend_line);
        assert_eq!(config.columns.x, "income");
    }
}
