//! Chart Viewer Widget
//! Central panel that fills the available space with the scatter chart.
//! The chart is rebuilt whenever that space changes size.

use crate::charts::{ChartHost, Viewport};
use crate::config::ChartConfig;
use crate::data::Dataset;
use crate::gui::EguiSurface;
use egui::{Color32, Pos2, RichText, Sense, Shape, Stroke};

/// Responsive chart display with hover tooltips.
pub struct ChartViewer {
    host: ChartHost,
    /// Shapes of the current chart, repainted every frame
    shapes: Vec<Shape>,
    origin: Option<Pos2>,
    error: Option<String>,
}

impl ChartViewer {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            host: ChartHost::new(config),
            shapes: Vec::new(),
            origin: None,
            error: None,
        }
    }

    pub fn set_config(&mut self, config: ChartConfig) {
        self.host.set_config(config);
    }

    /// Size of the last rendered chart.
    pub fn viewport(&self) -> Option<Viewport> {
        self.host.viewport()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, dataset: Option<&Dataset>) {
        let Some(dataset) = dataset else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
        let rect = response.rect;
        let viewport = Viewport::new(rect.width() as f64, rect.height() as f64);

        if self.origin != Some(rect.min) {
            self.origin = Some(rect.min);
            self.host.invalidate();
        }

        if self.host.needs_render(viewport) {
            let text_color = ui.visuals().text_color();
            let mut surface = EguiSurface::new(painter.clone(), rect.min, text_color);
            match self.host.render(&dataset.points, viewport, &mut surface) {
                Ok(_) => {
                    self.shapes = surface.into_shapes();
                    self.error = None;
                }
                Err(e) => {
                    log::warn!("chart render failed: {}", e);
                    self.shapes.clear();
                    self.error = Some(e.to_string());
                }
            }
        }

        if let Some(error) = &self.error {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                error,
                egui::FontId::proportional(14.0),
                Color32::from_rgb(220, 53, 69),
            );
            return;
        }

        painter.extend(self.shapes.iter().cloned());

        let Some(chart) = self.host.chart_mut() else {
            return;
        };

        let margins = chart.layout().margins;
        let plot_origin = rect.min + egui::vec2(margins.left as f32, margins.top as f32);

        match response.hover_pos() {
            Some(pointer) => {
                let local = pointer - plot_origin;
                chart.hover_at(local.x as f64, local.y as f64);
            }
            None => chart.hover_leave(),
        }

        let Some(index) = chart.hovered() else {
            return;
        };
        let marker = &chart.markers()[index];
        let center = plot_origin + egui::vec2(marker.cx as f32, marker.cy as f32);
        painter.circle_stroke(
            center,
            marker.radius as f32,
            Stroke::new(2.0, ui.visuals().strong_text_color()),
        );

        let lines = marker.tooltip.lines.clone();
        response.on_hover_ui_at_pointer(|ui| {
            if let Some((title, rest)) = lines.split_first() {
                ui.label(RichText::new(title).strong());
                for line in rest {
                    ui.label(line);
                }
            }
        });
    }
}
