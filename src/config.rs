//! Chart Configuration
//! Layout constants and styling, loadable from a JSON file.

use crate::data::ColumnMapping;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Upper bound on requested axis ticks.
pub const MAX_TICK_COUNT: usize = 1000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Space reserved around the plot area for axes and titles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 50.0,
            right: 50.0,
            bottom: 100.0,
            left: 60.0,
        }
    }
}

impl Margins {
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Everything a render pass needs besides the data and the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub margins: Margins,
    /// Lower bound of the horizontal domain; `None` derives it from the data minimum
    pub x_floor: Option<f64>,
    pub x_pad: f64,
    pub y_floor: f64,
    pub y_pad: f64,
    pub marker_radius: f64,
    pub marker_fill: String,
    pub marker_opacity: f64,
    /// Vertical shift of the marker label, to center it in the circle
    pub label_offset: f64,
    pub tick_font_px: f64,
    pub tick_count: usize,
    pub x_title: String,
    pub y_title: String,
    /// Measure captions used in tooltips
    pub x_caption: String,
    pub y_caption: String,
    /// Tooltip offset as [top, left], in pixels
    pub tooltip_offset: [f64; 2],
    pub show_trend_line: bool,
    pub columns: ColumnMapping,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            x_floor: Some(8.0),
            x_pad: 2.0,
            y_floor: 0.0,
            y_pad: 2.0,
            marker_radius: 17.0,
            marker_fill: "blue".to_string(),
            marker_opacity: 0.3,
            label_offset: 6.0,
            tick_font_px: 14.0,
            tick_count: 10,
            x_title: "In Poverty (%)".to_string(),
            y_title: "Lacks Healthcare (%)".to_string(),
            x_caption: "Poverty".to_string(),
            y_caption: "Healthcare".to_string(),
            tooltip_offset: [80.0, -60.0],
            show_trend_line: false,
            columns: ColumnMapping::default(),
        }
    }
}

impl ChartConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::info!("loaded chart config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.margins;
        if [m.top, m.right, m.bottom, m.left]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ConfigError::Invalid(
                "margins must be finite and non-negative".to_string(),
            ));
        }
        if !(self.marker_radius.is_finite() && self.marker_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "marker_radius must be positive, got {}",
                self.marker_radius
            )));
        }
        if !(0.0..=1.0).contains(&self.marker_opacity) {
            return Err(ConfigError::Invalid(format!(
                "marker_opacity must be within [0, 1], got {}",
                self.marker_opacity
            )));
        }
        if !(1..=MAX_TICK_COUNT).contains(&self.tick_count) {
            return Err(ConfigError::Invalid(format!(
                "tick_count must be within [1, {}], got {}",
                MAX_TICK_COUNT, self.tick_count
            )));
        }
        Ok(())
    }
}
