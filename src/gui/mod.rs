//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;
mod egui_surface;

pub use app::ScatterApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction, UserSettings};
pub use egui_surface::EguiSurface;
