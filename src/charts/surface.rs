//! Drawing Surface
//! Scene primitives handed to rendering backends, and the trait they implement.
//!
//! All coordinates are plot-area coordinates: the origin is the top-left corner
//! of the plot, inside the margins. Backends apply the margin translation.

use crate::charts::layout::ChartLayout;
use crate::charts::LinearScale;
use std::fmt;

/// Which side of the plot an axis sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrientation {
    Bottom,
    Left,
}

/// One tick: data value, pixel position along the axis, and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub position: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub orientation: AxisOrientation,
    pub scale: LinearScale,
    /// Translation of the axis line inside the plot area
    pub offset: (f64, f64),
    pub ticks: Vec<Tick>,
    pub font_px: f64,
}

impl Axis {
    pub const TICK_SIZE: f64 = 6.0;
    pub const TICK_PADDING: f64 = 3.0;

    pub fn new(
        orientation: AxisOrientation,
        scale: LinearScale,
        offset: (f64, f64),
        tick_count: usize,
        font_px: f64,
    ) -> Self {
        let step = scale.tick_step(tick_count);
        let ticks = scale
            .ticks(tick_count)
            .into_iter()
            .map(|value| Tick {
                value,
                position: scale.apply(value),
                text: LinearScale::format_tick(value, step),
            })
            .collect();
        Self {
            orientation,
            scale,
            offset,
            ticks,
            font_px,
        }
    }

    /// Pixel extent of the axis line, in range order.
    pub fn extent(&self) -> (f64, f64) {
        let (r0, r1) = self.scale.range();
        (r0.min(r1), r0.max(r1))
    }
}

/// Hover text for one point.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub lines: Vec<String>,
    /// Panel offset from the marker centre as [top, left]
    pub offset: [f64; 2],
}

impl Tooltip {
    pub fn title(&self) -> &str {
        self.lines.first().map(String::as_str).unwrap_or_default()
    }

    /// The panel contents with `<br>` line breaks.
    pub fn html(&self) -> String {
        self.lines.join("<br>")
    }
}

/// Circle for one data point, in plot-area pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub index: usize,
    pub label: String,
    pub name: String,
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub tooltip: Tooltip,
}

impl Marker {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.cx;
        let dy = y - self.cy;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill: String,
    pub opacity: f64,
}

impl MarkerStyle {
    /// Fill color as RGB; unknown names fall back to blue.
    pub fn rgb(&self) -> (u8, u8, u8) {
        parse_color(&self.fill).unwrap_or((0, 0, 255))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// Text centred on a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
}

/// Axis caption. `x`/`y` are expressed in the frame rotated by `rotation` degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTitle {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    /// Extra shift along the rotated y axis, in em
    pub dy_em: f64,
}

impl AxisTitle {
    /// Where the text starts, in unrotated plot-area coordinates.
    pub fn anchor_point(&self, font_px: f64) -> (f64, f64) {
        let y = self.y + self.dy_em * font_px;
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        (self.x * cos - y * sin, self.x * sin + y * cos)
    }
}

/// Straight line in plot-area pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// A backend the chart renderer can draw into.
pub trait DrawingSurface {
    type Error: fmt::Display;

    /// Start a new chart for this layout, replacing anything drawn before.
    fn begin(&mut self, layout: &ChartLayout) -> Result<(), Self::Error>;

    fn draw_axis(&mut self, axis: &Axis) -> Result<(), Self::Error>;

    fn draw_marker(&mut self, marker: &Marker, style: &MarkerStyle) -> Result<(), Self::Error>;

    fn draw_label(&mut self, label: &TextLabel) -> Result<(), Self::Error>;

    fn draw_axis_title(&mut self, title: &AxisTitle) -> Result<(), Self::Error>;

    /// Attach the marker's hover tooltip. Static backends have nothing to attach.
    fn draw_tooltip(&mut self, _marker: &Marker) -> Result<(), Self::Error> {
        Ok(())
    }

    fn draw_trend_line(&mut self, _segment: &TrendSegment) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called once after everything has been drawn.
    fn finish(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Drop the current chart entirely.
    fn clear(&mut self);
}

/// CSS color names used by the chart, or `#rrggbb`.
pub fn parse_color(value: &str) -> Option<(u8, u8, u8)> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some((channel(0)?, channel(2)?, channel(4)?));
    }
    let rgb = match value.to_ascii_lowercase().as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "blue" => (0, 0, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "gray" | "grey" => (128, 128, 128),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "steelblue" => (70, 130, 180),
        "lightblue" => (173, 216, 230),
        _ => return None,
    };
    Some(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotated_title_lands_left_of_plot() {
        let title = AxisTitle {
            text: "Lacks Healthcare (%)".to_string(),
            x: -225.0 - 60.0,
            y: -60.0,
            rotation: -90.0,
            dy_em: 1.0,
        };
        let (x, y) = title.anchor_point(16.0);
        assert!((x - -44.0).abs() < 1e-9);
        assert!((y - 285.0).abs() < 1e-9);
    }

    #[test]
    fn marker_hit_area_is_the_circle() {
        let marker = Marker {
            index: 0,
            label: "AL".to_string(),
            name: "Alabama".to_string(),
            cx: 100.0,
            cy: 100.0,
            radius: 17.0,
            tooltip: Tooltip {
                lines: vec!["Alabama".to_string()],
                offset: [80.0, -60.0],
            },
        };
        assert!(marker.contains(110.0, 110.0));
        assert!(!marker.contains(113.0, 113.0));
    }

    #[test]
    fn parses_names_and_hex() {
        assert_eq!(parse_color("blue"), Some((0, 0, 255)));
        assert_eq!(parse_color("#4682b4"), Some((70, 130, 180)));
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }
}
