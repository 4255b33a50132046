//! SVG Chart Export
//! Writes the chart as a standalone SVG document. Each point is a `<g class="marker">`
//! holding its circle, label and a tooltip panel that CSS reveals on hover.

use crate::charts::layout::{ChartLayout, Viewport};
use crate::charts::surface::{
    Axis, AxisOrientation, AxisTitle, DrawingSurface, Marker, MarkerStyle, TextAnchor, TextLabel,
    TrendSegment,
};
use crate::charts::{ChartRenderer, ExportError};
use crate::config::ChartConfig;
use crate::data::DataPoint;
use quick_xml::escape::escape;
use std::fmt::{self, Write};
use std::fs;
use std::path::Path;

const STYLE: &str = ".marker .tooltip { visibility: hidden; pointer-events: none; }\n\
.marker:hover .tooltip { visibility: visible; }\n\
.tooltip rect { fill: black; fill-opacity: 0.8; }\n\
.tooltip text { fill: white; font: 12px sans-serif; }\n\
.axisText { font: 16px sans-serif; }";

const TOOLTIP_LINE_HEIGHT: f64 = 16.0;
const TOOLTIP_CHAR_WIDTH: f64 = 7.0;
const TOOLTIP_PADDING: f64 = 8.0;

/// Accumulates one SVG document.
#[derive(Default)]
pub struct SvgSurface {
    svg: String,
    /// The marker group stays open until something else is drawn
    marker_open: bool,
    finished: bool,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The finished document, or an empty string if nothing was rendered.
    pub fn document(&self) -> &str {
        &self.svg
    }

    pub fn into_document(self) -> String {
        self.svg
    }

    fn close_marker(&mut self) -> fmt::Result {
        if self.marker_open {
            writeln!(self.svg, "    </g>")?;
            self.marker_open = false;
        }
        Ok(())
    }

    fn write_bottom_axis(&mut self, axis: &Axis) -> fmt::Result {
        let (start, end) = axis.extent();
        let size = Axis::TICK_SIZE;
        writeln!(
            self.svg,
            "    <g class=\"axis\" style=\"font: {}px sans-serif\" transform=\"translate({}, {})\" fill=\"none\" text-anchor=\"middle\">",
            axis.font_px, axis.offset.0, axis.offset.1
        )?;
        writeln!(
            self.svg,
            "      <path class=\"domain\" stroke=\"currentColor\" d=\"M{},{}V0H{}V{}\"/>",
            start, size, end, size
        )?;
        for tick in &axis.ticks {
            writeln!(
                self.svg,
                "      <g class=\"tick\" transform=\"translate({}, 0)\"><line stroke=\"currentColor\" y2=\"{}\"/><text fill=\"currentColor\" y=\"{}\" dy=\"0.71em\">{}</text></g>",
                tick.position,
                size,
                size + Axis::TICK_PADDING,
                escape(&tick.text)
            )?;
        }
        writeln!(self.svg, "    </g>")
    }

    fn write_left_axis(&mut self, axis: &Axis) -> fmt::Result {
        let (start, end) = axis.extent();
        let size = Axis::TICK_SIZE;
        writeln!(
            self.svg,
            "    <g class=\"axis\" style=\"font: {}px sans-serif\" transform=\"translate({}, {})\" fill=\"none\" text-anchor=\"end\">",
            axis.font_px, axis.offset.0, axis.offset.1
        )?;
        writeln!(
            self.svg,
            "      <path class=\"domain\" stroke=\"currentColor\" d=\"M{},{}H0V{}H{}\"/>",
            -size, start, end, -size
        )?;
        for tick in &axis.ticks {
            writeln!(
                self.svg,
                "      <g class=\"tick\" transform=\"translate(0, {})\"><line stroke=\"currentColor\" x2=\"{}\"/><text fill=\"currentColor\" x=\"{}\" dy=\"0.32em\">{}</text></g>",
                tick.position,
                -size,
                -(size + Axis::TICK_PADDING),
                escape(&tick.text)
            )?;
        }
        writeln!(self.svg, "    </g>")
    }

    fn write_tooltip(&mut self, marker: &Marker) -> fmt::Result {
        let tooltip = &marker.tooltip;
        let [top, left] = tooltip.offset;
        let widest = tooltip
            .lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        let width = widest as f64 * TOOLTIP_CHAR_WIDTH + 2.0 * TOOLTIP_PADDING;
        let height = tooltip.lines.len() as f64 * TOOLTIP_LINE_HEIGHT + TOOLTIP_PADDING;

        // Offset is added to the marker centre, top then left
        let x = marker.cx + left;
        let y = marker.cy + top;

        writeln!(
            self.svg,
            "      <g class=\"tooltip\" transform=\"translate({}, {})\">",
            x, y
        )?;
        writeln!(
            self.svg,
            "        <rect width=\"{}\" height=\"{}\" rx=\"4\"/>",
            width, height
        )?;
        write!(self.svg, "        <text x=\"{}\" y=\"{}\">", TOOLTIP_PADDING, 0)?;
        for line in &tooltip.lines {
            write!(
                self.svg,
                "<tspan x=\"{}\" dy=\"{}\">{}</tspan>",
                TOOLTIP_PADDING,
                TOOLTIP_LINE_HEIGHT,
                escape(line)
            )?;
        }
        writeln!(self.svg, "</text>")?;
        writeln!(self.svg, "      </g>")
    }
}

impl DrawingSurface for SvgSurface {
    type Error = fmt::Error;

    fn begin(&mut self, layout: &ChartLayout) -> fmt::Result {
        self.clear();

        writeln!(
            self.svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            layout.viewport.width, layout.viewport.height
        )?;
        writeln!(self.svg, "  <style>\n{}\n  </style>", STYLE)?;
        writeln!(
            self.svg,
            "  <g transform=\"translate({}, {})\">",
            layout.margins.left, layout.margins.top
        )
    }

    fn draw_axis(&mut self, axis: &Axis) -> fmt::Result {
        self.close_marker()?;
        match axis.orientation {
            AxisOrientation::Bottom => self.write_bottom_axis(axis),
            AxisOrientation::Left => self.write_left_axis(axis),
        }
    }

    fn draw_marker(&mut self, marker: &Marker, style: &MarkerStyle) -> fmt::Result {
        self.close_marker()?;
        writeln!(
            self.svg,
            "    <g class=\"marker\" data-label=\"{}\">",
            escape(&marker.label)
        )?;
        writeln!(
            self.svg,
            "      <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" opacity=\"{}\"/>",
            marker.cx,
            marker.cy,
            style.radius,
            escape(&style.fill),
            style.opacity
        )?;
        self.marker_open = true;
        Ok(())
    }

    fn draw_label(&mut self, label: &TextLabel) -> fmt::Result {
        let anchor = match label.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        };
        let indent = if self.marker_open { "      " } else { "    " };
        writeln!(
            self.svg,
            "{}<text text-anchor=\"{}\" x=\"{}\" y=\"{}\">{}</text>",
            indent,
            anchor,
            label.x,
            label.y,
            escape(&label.text)
        )
    }

    fn draw_axis_title(&mut self, title: &AxisTitle) -> fmt::Result {
        self.close_marker()?;
        if title.rotation != 0.0 {
            writeln!(
                self.svg,
                "    <text transform=\"rotate({})\" x=\"{}\" y=\"{}\" dy=\"{}em\" class=\"axisText\">{}</text>",
                title.rotation,
                title.x,
                title.y,
                title.dy_em,
                escape(&title.text)
            )
        } else {
            writeln!(
                self.svg,
                "    <text transform=\"translate({}, {})\" class=\"axisText\">{}</text>",
                title.x,
                title.y,
                escape(&title.text)
            )
        }
    }

    fn draw_tooltip(&mut self, marker: &Marker) -> fmt::Result {
        if !self.marker_open {
            return Ok(());
        }
        self.write_tooltip(marker)
    }

    fn draw_trend_line(&mut self, segment: &TrendSegment) -> fmt::Result {
        self.close_marker()?;
        writeln!(
            self.svg,
            "    <line class=\"trend\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"crimson\" stroke-width=\"2\" stroke-dasharray=\"6 4\"/>",
            segment.x1, segment.y1, segment.x2, segment.y2
        )
    }

    fn finish(&mut self) -> fmt::Result {
        if self.finished {
            return Ok(());
        }
        self.close_marker()?;
        writeln!(self.svg, "  </g>")?;
        writeln!(self.svg, "</svg>")?;
        self.finished = true;
        Ok(())
    }

    fn clear(&mut self) {
        self.svg.clear();
        self.marker_open = false;
        self.finished = false;
    }
}

/// Render the chart to an SVG string.
pub fn render_svg(
    points: &[DataPoint],
    config: &ChartConfig,
    viewport: Viewport,
) -> Result<String, ExportError> {
    let renderer = ChartRenderer::new(config.clone());
    let mut surface = SvgSurface::new();
    renderer.render(points, viewport, &mut surface)?;
    Ok(surface.into_document())
}

/// Render the chart and write it to `path`.
pub fn export_svg(
    points: &[DataPoint],
    config: &ChartConfig,
    viewport: Viewport,
    path: &Path,
) -> Result<(), ExportError> {
    let svg = render_svg(points, config, viewport)?;
    fs::write(path, svg).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("exported SVG chart ({}) to {}", viewport, path.display());
    Ok(())
}
