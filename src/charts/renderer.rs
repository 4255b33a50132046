//! Chart Renderer
//! Builds the scatter chart into any `DrawingSurface`.
//!
//! Render order:
//! 1. Bottom and left axes
//! 2. One marker per point: circle, centered label, hover tooltip
//! 3. Optional trend line
//! 4. Axis titles
//!
//! Every render starts from nothing. `ChartHost` owns the current chart and
//! tears it down before building the next one, so two charts never coexist.

use crate::charts::layout::{ChartLayout, LayoutError, Viewport};
use crate::charts::surface::{DrawingSurface, Marker, Tooltip};
use crate::config::ChartConfig;
use crate::data::DataPoint;
use crate::stats::StatsCalculator;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("Drawing failed: {0}")]
    Surface(String),
}

fn surface_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Surface(e.to_string())
}

pub struct ChartRenderer {
    config: ChartConfig,
}

impl ChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn set_config(&mut self, config: ChartConfig) {
        self.config = config;
    }

    /// Draw a complete chart for `viewport` and return the handle describing it.
    pub fn render<S: DrawingSurface>(
        &self,
        points: &[DataPoint],
        viewport: Viewport,
        surface: &mut S,
    ) -> Result<RenderedChart, RenderError> {
        let config = &self.config;
        let layout = ChartLayout::compute(points, viewport, config)?;

        surface.begin(&layout).map_err(surface_error)?;
        surface.draw_axis(&layout.x_axis(config)).map_err(surface_error)?;
        surface.draw_axis(&layout.y_axis(config)).map_err(surface_error)?;

        let style = ChartLayout::marker_style(config);
        let markers: Vec<Marker> = points
            .iter()
            .enumerate()
            .map(|(i, point)| layout.marker(i, point, config))
            .collect();

        for marker in &markers {
            surface.draw_marker(marker, &style).map_err(surface_error)?;
            surface
                .draw_label(&ChartLayout::marker_label(marker, config))
                .map_err(surface_error)?;
            surface.draw_tooltip(marker).map_err(surface_error)?;
        }

        if config.show_trend_line {
            if let Some(fit) = StatsCalculator::summarize(points) {
                surface
                    .draw_trend_line(&layout.trend_segment(&fit))
                    .map_err(surface_error)?;
            }
        }

        for title in layout.axis_titles(config).iter() {
            surface.draw_axis_title(title).map_err(surface_error)?;
        }
        surface.finish().map_err(surface_error)?;

        log::debug!(
            "rendered {} markers at {} (plot {}x{})",
            markers.len(),
            viewport,
            layout.plot_width,
            layout.plot_height
        );

        Ok(RenderedChart {
            layout,
            markers,
            hovered: None,
        })
    }
}

/// Handle to one rendered chart. Dropping or tearing it down discards the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    layout: ChartLayout,
    markers: Vec<Marker>,
    hovered: Option<usize>,
}

impl RenderedChart {
    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Topmost marker under a plot-area point. Later markers are drawn on top.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.markers
            .iter()
            .rev()
            .find(|m| m.contains(x, y))
            .map(|m| m.index)
    }

    /// Show the tooltip of `index`, hiding any other.
    pub fn hover_enter(&mut self, index: usize) -> Option<&Tooltip> {
        if index >= self.markers.len() {
            return None;
        }
        self.hovered = Some(index);
        Some(&self.markers[index].tooltip)
    }

    pub fn hover_leave(&mut self) {
        self.hovered = None;
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// The single visible tooltip, if any.
    pub fn visible_tooltip(&self) -> Option<&Tooltip> {
        self.hovered
            .and_then(|i| self.markers.get(i))
            .map(|m| &m.tooltip)
    }

    /// Move the hover to whatever is under the pointer, or clear it.
    pub fn hover_at(&mut self, x: f64, y: f64) -> Option<&Tooltip> {
        match self.hit_test(x, y) {
            Some(index) => self.hover_enter(index),
            None => {
                self.hover_leave();
                None
            }
        }
    }

    pub fn teardown(self) {
        log::debug!("tearing down chart with {} markers", self.markers.len());
    }
}

/// Owns at most one rendered chart and rebuilds it when the viewport changes.
pub struct ChartHost {
    renderer: ChartRenderer,
    chart: Option<RenderedChart>,
    viewport: Option<Viewport>,
    render_count: usize,
}

impl ChartHost {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            renderer: ChartRenderer::new(config),
            chart: None,
            viewport: None,
            render_count: 0,
        }
    }

    /// Replace the configuration; the next `resize` rebuilds the chart.
    pub fn set_config(&mut self, config: ChartConfig) {
        self.renderer.set_config(config);
        self.invalidate();
    }

    /// Forget the last viewport so the next `resize` renders again.
    pub fn invalidate(&mut self) {
        self.viewport = None;
    }

    pub fn chart(&self) -> Option<&RenderedChart> {
        self.chart.as_ref()
    }

    pub fn chart_mut(&mut self) -> Option<&mut RenderedChart> {
        self.chart.as_mut()
    }

    pub fn is_rendered(&self) -> bool {
        self.chart.is_some()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn render_count(&self) -> usize {
        self.render_count
    }

    /// Whether `viewport` differs from what was last rendered.
    pub fn needs_render(&self, viewport: Viewport) -> bool {
        self.viewport != Some(viewport)
    }

    /// Tear down the current chart, then build a new one.
    pub fn render<S: DrawingSurface>(
        &mut self,
        points: &[DataPoint],
        viewport: Viewport,
        surface: &mut S,
    ) -> Result<&RenderedChart, RenderError> {
        self.teardown(surface);
        // Remembered even on failure so a bad size is not retried every frame
        self.viewport = Some(viewport);

        let chart = self.renderer.render(points, viewport, surface)?;
        self.render_count += 1;
        Ok(self.chart.insert(chart))
    }

    /// Re-render only if the viewport changed. Returns whether a render happened.
    pub fn resize<S: DrawingSurface>(
        &mut self,
        points: &[DataPoint],
        viewport: Viewport,
        surface: &mut S,
    ) -> Result<bool, RenderError> {
        if !self.needs_render(viewport) {
            return Ok(false);
        }
        self.render(points, viewport, surface)?;
        Ok(true)
    }

    pub fn teardown<S: DrawingSurface>(&mut self, surface: &mut S) {
        if let Some(chart) = self.chart.take() {
            chart.teardown();
        }
        surface.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::surface::{Axis, AxisTitle, MarkerStyle, TextLabel, TrendSegment};
    use std::convert::Infallible;

    /// Records what the renderer asked for.
    #[derive(Default)]
    struct RecordingSurface {
        roots: usize,
        axes: usize,
        circles: Vec<(f64, f64)>,
        labels: Vec<String>,
        tooltips: usize,
        titles: Vec<String>,
        trend: Option<TrendSegment>,
        clears: usize,
    }

    impl DrawingSurface for RecordingSurface {
        type Error = Infallible;

        fn begin(&mut self, _layout: &ChartLayout) -> Result<(), Infallible> {
            self.roots += 1;
            Ok(())
        }

        fn draw_axis(&mut self, _axis: &Axis) -> Result<(), Infallible> {
            self.axes += 1;
            Ok(())
        }

        fn draw_marker(&mut self, marker: &Marker, _style: &MarkerStyle) -> Result<(), Infallible> {
            self.circles.push((marker.cx, marker.cy));
            Ok(())
        }

        fn draw_label(&mut self, label: &TextLabel) -> Result<(), Infallible> {
            self.labels.push(label.text.clone());
            Ok(())
        }

        fn draw_axis_title(&mut self, title: &AxisTitle) -> Result<(), Infallible> {
            self.titles.push(title.text.clone());
            Ok(())
        }

        fn draw_tooltip(&mut self, _marker: &Marker) -> Result<(), Infallible> {
            self.tooltips += 1;
            Ok(())
        }

        fn draw_trend_line(&mut self, segment: &TrendSegment) -> Result<(), Infallible> {
            self.trend = Some(*segment);
            Ok(())
        }

        fn clear(&mut self) {
            *self = Self {
                clears: self.clears + 1,
                ..Self::default()
            };
        }
    }

    fn states() -> Vec<DataPoint> {
        vec![
            DataPoint::new("AL", "Alabama", 18.1, 11.7),
            DataPoint::new("AK", "Alaska", 10.9, 15.9),
            DataPoint::new("AZ", "Arizona", 17.8, 14.7),
        ]
    }

    #[test]
    fn one_marker_and_label_per_row() {
        let renderer = ChartRenderer::new(ChartConfig::default());
        let mut surface = RecordingSurface::default();
        let chart = renderer
            .render(&states(), Viewport::new(800.0, 600.0), &mut surface)
            .unwrap();

        assert_eq!(chart.len(), 3);
        assert_eq!(surface.circles.len(), 3);
        assert_eq!(surface.labels, vec!["AL", "AK", "AZ"]);
        assert_eq!(surface.tooltips, 3);
        assert_eq!(surface.axes, 2);
        assert_eq!(surface.titles, vec!["Lacks Healthcare (%)", "In Poverty (%)"]);
        assert!(surface.trend.is_none());
    }

    #[test]
    fn markers_sit_on_the_scales() {
        let renderer = ChartRenderer::new(ChartConfig::default());
        let mut surface = RecordingSurface::default();
        let points = states();
        let chart = renderer
            .render(&points, Viewport::new(800.0, 600.0), &mut surface)
            .unwrap();

        let layout = chart.layout();
        for (marker, point) in chart.markers().iter().zip(&points) {
            assert_eq!(marker.cx, layout.x_scale.apply(point.x));
            assert_eq!(marker.cy, layout.y_scale.apply(point.y));
        }
    }

    #[test]
    fn hover_shows_exactly_one_tooltip() {
        let renderer = ChartRenderer::new(ChartConfig::default());
        let mut surface = RecordingSurface::default();
        let mut chart = renderer
            .render(&states(), Viewport::new(800.0, 600.0), &mut surface)
            .unwrap();

        assert!(chart.visible_tooltip().is_none());
        let tip = chart.hover_enter(0).unwrap();
        assert_eq!(tip.html(), "Alabama<br>Healthcare: 11.7<br>Poverty: 18.1");

        chart.hover_enter(1);
        assert_eq!(chart.hovered(), Some(1));
        assert_eq!(chart.visible_tooltip().unwrap().title(), "Alaska");

        chart.hover_leave();
        assert!(chart.visible_tooltip().is_none());
        assert!(chart.hover_enter(10).is_none());
    }

    #[test]
    fn hover_at_uses_hit_test() {
        let renderer = ChartRenderer::new(ChartConfig::default());
        let mut surface = RecordingSurface::default();
        let mut chart = renderer
            .render(&states(), Viewport::new(800.0, 600.0), &mut surface)
            .unwrap();

        let (cx, cy) = (chart.markers()[1].cx, chart.markers()[1].cy);
        assert_eq!(chart.hover_at(cx + 3.0, cy - 3.0).map(Tooltip::title), Some("Alaska"));
        assert!(chart.hover_at(-500.0, -500.0).is_none());
        assert!(chart.visible_tooltip().is_none());
    }

    #[test]
    fn host_tears_down_before_each_render() {
        let mut host = ChartHost::new(ChartConfig::default());
        let mut surface = RecordingSurface::default();
        let points = states();

        host.render(&points, Viewport::new(800.0, 600.0), &mut surface).unwrap();
        assert_eq!(surface.roots, 1);

        let rendered = host.resize(&points, Viewport::new(1200.0, 800.0), &mut surface).unwrap();
        assert!(rendered);
        // The surface was cleared, so only the new chart is present
        assert_eq!(surface.roots, 1);
        assert_eq!(surface.clears, 2);
        assert_eq!(surface.circles.len(), 3);
        assert_eq!(host.render_count(), 2);

        let rendered = host.resize(&points, Viewport::new(1200.0, 800.0), &mut surface).unwrap();
        assert!(!rendered);
        assert_eq!(host.render_count(), 2);
    }

    #[test]
    fn failed_render_leaves_no_chart() {
        let mut host = ChartHost::new(ChartConfig::default());
        let mut surface = RecordingSurface::default();
        let points = states();

        host.render(&points, Viewport::new(800.0, 600.0), &mut surface).unwrap();
        let err = host
            .render(&points, Viewport::new(50.0, 50.0), &mut surface)
            .unwrap_err();
        assert!(matches!(err, RenderError::Layout(LayoutError::ViewportTooSmall { .. })));
        assert!(!host.is_rendered());
        assert_eq!(surface.roots, 0);
        assert!(!host.needs_render(Viewport::new(50.0, 50.0)));
    }

    #[test]
    fn resize_keeps_order_and_scales_positions() {
        let mut host = ChartHost::new(ChartConfig::default());
        let mut surface = RecordingSurface::default();
        let points = states();

        let small: Vec<Marker> = host
            .render(&points, Viewport::new(800.0, 600.0), &mut surface)
            .unwrap()
            .markers()
            .to_vec();
        let large: Vec<Marker> = host
            .render(&points, Viewport::new(1200.0, 800.0), &mut surface)
            .unwrap()
            .markers()
            .to_vec();

        // Plot widths 690 -> 1090, heights 450 -> 650
        for (a, b) in small.iter().zip(&large) {
            assert!((b.cx - a.cx * 1090.0 / 690.0).abs() < 1e-9);
            assert!((b.cy - a.cy * 650.0 / 450.0).abs() < 1e-9);
        }
        // Alaska has the lowest poverty rate and stays leftmost
        assert!(large[1].cx < large[2].cx && large[2].cx < large[0].cx);
    }

    #[test]
    fn trend_line_is_optional() {
        let config = ChartConfig {
            show_trend_line: true,
            ..ChartConfig::default()
        };
        let renderer = ChartRenderer::new(config);
        let mut surface = RecordingSurface::default();
        renderer
            .render(&states(), Viewport::new(800.0, 600.0), &mut surface)
            .unwrap();
        let segment = surface.trend.unwrap();
        assert_eq!(segment.x1, 0.0);
        assert_eq!(segment.x2, 690.0);
    }
}
