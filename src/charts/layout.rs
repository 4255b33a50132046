//! Chart Layout
//! Plot-area dimensions, scale domains and marker placement for one viewport.

use crate::charts::surface::{
    Axis, AxisOrientation, AxisTitle, Marker, MarkerStyle, TextAnchor, TextLabel, Tooltip,
    TrendSegment,
};
use crate::charts::LinearScale;
use crate::config::{ChartConfig, Margins};
use crate::data::DataPoint;
use crate::stats::Correlation;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("No data points to plot")]
    EmptyDataset,
    #[error("Viewport {width}x{height} leaves no room for the plot area")]
    ViewportTooSmall { width: f64, height: f64 },
}

/// Largest accepted width or height, in pixels.
pub const MAX_DIMENSION: u32 = 16_384;

/// Total drawing size, margins included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Viewport {
    type Err = String;

    /// Parses `WIDTHxHEIGHT`, e.g. `800x600`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
        let parse = |v: &str| -> Result<u32, String> {
            let n = v
                .trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid dimension '{}': {}", v, e))?;
            if n > MAX_DIMENSION {
                return Err(format!("dimension {} exceeds {}", n, MAX_DIMENSION));
            }
            Ok(n)
        };
        Ok(Self::new(parse(w)? as f64, parse(h)? as f64))
    }
}

/// Geometry of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub viewport: Viewport,
    pub margins: Margins,
    pub plot_width: f64,
    pub plot_height: f64,
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
}

impl ChartLayout {
    /// Compute plot size and both scales from the data bounds.
    pub fn compute(
        points: &[DataPoint],
        viewport: Viewport,
        config: &ChartConfig,
    ) -> Result<Self, LayoutError> {
        if points.is_empty() {
            return Err(LayoutError::EmptyDataset);
        }

        let margins = config.margins;
        let plot_width = viewport.width - margins.horizontal();
        let plot_height = viewport.height - margins.vertical();
        if !(plot_width > 0.0 && plot_height > 0.0) {
            return Err(LayoutError::ViewportTooSmall {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let x_max = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let y_max = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let x_floor = config
            .x_floor
            .unwrap_or_else(|| points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min));

        let x_scale = LinearScale::new((x_floor, x_max + config.x_pad), (0.0, plot_width));
        let y_scale = LinearScale::new(
            (config.y_floor, y_max + config.y_pad),
            (plot_height, 0.0),
        );

        Ok(Self {
            viewport,
            margins,
            plot_width,
            plot_height,
            x_scale,
            y_scale,
        })
    }

    /// Pixel centre of a point inside the plot area.
    pub fn position(&self, point: &DataPoint) -> (f64, f64) {
        (self.x_scale.apply(point.x), self.y_scale.apply(point.y))
    }

    pub fn x_axis(&self, config: &ChartConfig) -> Axis {
        Axis::new(
            AxisOrientation::Bottom,
            self.x_scale,
            (0.0, self.plot_height),
            config.tick_count,
            config.tick_font_px,
        )
    }

    pub fn y_axis(&self, config: &ChartConfig) -> Axis {
        Axis::new(
            AxisOrientation::Left,
            self.y_scale,
            (0.0, 0.0),
            config.tick_count,
            config.tick_font_px,
        )
    }

    pub fn marker(&self, index: usize, point: &DataPoint, config: &ChartConfig) -> Marker {
        let (cx, cy) = self.position(point);
        Marker {
            index,
            label: point.label.clone(),
            name: point.name.clone(),
            cx,
            cy,
            radius: config.marker_radius,
            tooltip: Tooltip {
                lines: vec![
                    point.name.clone(),
                    format!("{}: {}", config.y_caption, point.y),
                    format!("{}: {}", config.x_caption, point.x),
                ],
                offset: config.tooltip_offset,
            },
        }
    }

    pub fn marker_label(marker: &Marker, config: &ChartConfig) -> TextLabel {
        TextLabel {
            text: marker.label.clone(),
            x: marker.cx,
            y: marker.cy + config.label_offset,
            anchor: TextAnchor::Middle,
        }
    }

    pub fn marker_style(config: &ChartConfig) -> MarkerStyle {
        MarkerStyle {
            radius: config.marker_radius,
            fill: config.marker_fill.clone(),
            opacity: config.marker_opacity,
        }
    }

    /// Vertical title rotated -90°, then the horizontal title below the x axis.
    pub fn axis_titles(&self, config: &ChartConfig) -> [AxisTitle; 2] {
        [
            AxisTitle {
                text: config.y_title.clone(),
                x: -self.plot_height / 2.0 - 60.0,
                y: -self.margins.left,
                rotation: -90.0,
                dy_em: 1.0,
            },
            AxisTitle {
                text: config.x_title.clone(),
                x: self.plot_width / 2.0,
                y: self.plot_height + 50.0,
                rotation: 0.0,
                dy_em: 0.0,
            },
        ]
    }

    /// The fitted line across the horizontal domain.
    pub fn trend_segment(&self, fit: &Correlation) -> TrendSegment {
        let (x0, x1) = self.x_scale.domain();
        TrendSegment {
            x1: self.x_scale.apply(x0),
            y1: self.y_scale.apply(fit.predict(x0)),
            x2: self.x_scale.apply(x1),
            y2: self.y_scale.apply(fit.predict(x1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alabama() -> Vec<DataPoint> {
        vec![DataPoint::new("AL", "Alabama", 18.1, 11.7)]
    }

    #[test]
    fn plot_area_subtracts_margins() {
        let layout =
            ChartLayout::compute(&alabama(), Viewport::new(800.0, 600.0), &ChartConfig::default())
                .unwrap();
        assert_eq!(layout.plot_width, 690.0);
        assert_eq!(layout.plot_height, 450.0);
    }

    #[test]
    fn domains_follow_data_and_padding() {
        let layout =
            ChartLayout::compute(&alabama(), Viewport::new(800.0, 600.0), &ChartConfig::default())
                .unwrap();
        let (x0, x1) = layout.x_scale.domain();
        assert_eq!(x0, 8.0);
        assert!((x1 - 20.1).abs() < 1e-12);
        let (y0, y1) = layout.y_scale.domain();
        assert_eq!(y0, 0.0);
        assert!((y1 - 13.7).abs() < 1e-12);
        assert_eq!(layout.y_scale.range(), (450.0, 0.0));
    }

    #[test]
    fn floor_can_come_from_data() {
        let config = ChartConfig {
            x_floor: None,
            ..ChartConfig::default()
        };
        let points = vec![
            DataPoint::new("AL", "Alabama", 18.1, 11.7),
            DataPoint::new("ND", "North Dakota", 11.1, 8.4),
        ];
        let layout = ChartLayout::compute(&points, Viewport::new(800.0, 600.0), &config).unwrap();
        assert_eq!(layout.x_scale.domain().0, 11.1);
        assert_eq!(layout.position(&points[1]).0, 0.0);
    }

    #[test]
    fn tooltip_lists_name_then_measures() {
        let config = ChartConfig::default();
        let points = alabama();
        let layout = ChartLayout::compute(&points, Viewport::new(800.0, 600.0), &config).unwrap();
        let marker = layout.marker(0, &points[0], &config);
        assert_eq!(
            marker.tooltip.html(),
            "Alabama<br>Healthcare: 11.7<br>Poverty: 18.1"
        );
        let label = ChartLayout::marker_label(&marker, &config);
        assert_eq!(label.y, marker.cy + 6.0);
        assert_eq!(label.text, "AL");
    }

    #[test]
    fn rejects_tiny_viewport_and_empty_data() {
        let config = ChartConfig::default();
        assert_eq!(
            ChartLayout::compute(&alabama(), Viewport::new(100.0, 140.0), &config),
            Err(LayoutError::ViewportTooSmall {
                width: 100.0,
                height: 140.0
            })
        );
        assert_eq!(
            ChartLayout::compute(&[], Viewport::new(800.0, 600.0), &config),
            Err(LayoutError::EmptyDataset)
        );
    }

    #[test]
    fn viewport_parses_from_text() {
        assert_eq!("1200x800".parse::<Viewport>(), Ok(Viewport::new(1200.0, 800.0)));
        assert!("1200".parse::<Viewport>().is_err());
        assert!("ax3".parse::<Viewport>().is_err());
        assert!("40000x40000".parse::<Viewport>().is_err());
        assert!("16384x16384".parse::<Viewport>().is_ok());
    }
}
