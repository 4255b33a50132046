//! Bitmap Chart Export
//! Draws the chart with plotters into an RGB buffer and encodes it as PNG.
//! Tooltips are interactive only, so the static image has none.

use crate::charts::layout::{ChartLayout, Viewport, MAX_DIMENSION};
use crate::charts::surface::{
    Axis, AxisOrientation, AxisTitle, DrawingSurface, Marker, MarkerStyle, TextAnchor, TextLabel,
    TrendSegment,
};
use crate::charts::{ChartRenderer, ExportError};
use crate::config::{ChartConfig, Margins};
use crate::data::DataPoint;
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::io::Cursor;
use std::path::Path;

const FONT: &str = "sans-serif";
const TITLE_FONT_PX: f64 = 16.0;
const TREND_COLOR: RGBColor = RGBColor(220, 20, 60);

/// Plotters drawing area with the chart margins applied.
pub struct BitmapSurface<'a, DB: DrawingBackend> {
    root: &'a DrawingArea<DB, Shift>,
    margins: Margins,
}

impl<'a, DB: DrawingBackend> BitmapSurface<'a, DB> {
    pub fn new(root: &'a DrawingArea<DB, Shift>) -> Self {
        Self {
            root,
            margins: Margins::default(),
        }
    }

    /// Plot-area coordinates to backend pixels.
    fn pixel(&self, x: f64, y: f64) -> (i32, i32) {
        (
            (x + self.margins.left).round() as i32,
            (y + self.margins.top).round() as i32,
        )
    }

    fn line(&self, from: (f64, f64), to: (f64, f64), style: ShapeStyle) -> Result<(), ExportError> {
        let path = PathElement::new(vec![self.pixel(from.0, from.1), self.pixel(to.0, to.1)], style);
        self.root.draw(&path).map_err(draw_error)
    }

    fn text(
        &self,
        text: &str,
        at: (f64, f64),
        font_px: f64,
        pos: Pos,
    ) -> Result<(), ExportError> {
        let style = (FONT, font_px).into_font().color(&BLACK).pos(pos);
        self.root
            .draw(&Text::new(text.to_string(), self.pixel(at.0, at.1), style))
            .map_err(draw_error)
    }
}

fn draw_error<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Draw(e.to_string())
}

impl<DB: DrawingBackend> DrawingSurface for BitmapSurface<'_, DB> {
    type Error = ExportError;

    fn begin(&mut self, layout: &ChartLayout) -> Result<(), ExportError> {
        self.margins = layout.margins;
        self.root.fill(&WHITE).map_err(draw_error)
    }

    fn draw_axis(&mut self, axis: &Axis) -> Result<(), ExportError> {
        let (start, end) = axis.extent();
        let (ox, oy) = axis.offset;
        let size = Axis::TICK_SIZE;
        let gap = size + Axis::TICK_PADDING;
        let stroke = BLACK.stroke_width(1);

        match axis.orientation {
            AxisOrientation::Bottom => {
                self.line((ox + start, oy), (ox + end, oy), stroke)?;
                for tick in &axis.ticks {
                    let x = ox + tick.position;
                    self.line((x, oy), (x, oy + size), stroke)?;
                    self.text(
                        &tick.text,
                        (x, oy + gap),
                        axis.font_px,
                        Pos::new(HPos::Center, VPos::Top),
                    )?;
                }
            }
            AxisOrientation::Left => {
                self.line((ox, oy + start), (ox, oy + end), stroke)?;
                for tick in &axis.ticks {
                    let y = oy + tick.position;
                    self.line((ox - size, y), (ox, y), stroke)?;
                    self.text(
                        &tick.text,
                        (ox - gap, y),
                        axis.font_px,
                        Pos::new(HPos::Right, VPos::Center),
                    )?;
                }
            }
        }
        Ok(())
    }

    fn draw_marker(&mut self, marker: &Marker, style: &MarkerStyle) -> Result<(), ExportError> {
        let (r, g, b) = style.rgb();
        let fill = RGBColor(r, g, b).mix(style.opacity).filled();
        let circle = Circle::new(
            self.pixel(marker.cx, marker.cy),
            style.radius.round() as i32,
            fill,
        );
        self.root.draw(&circle).map_err(draw_error)
    }

    fn draw_label(&mut self, label: &TextLabel) -> Result<(), ExportError> {
        let h = match label.anchor {
            TextAnchor::Start => HPos::Left,
            TextAnchor::Middle => HPos::Center,
            TextAnchor::End => HPos::Right,
        };
        // SVG text sits on its baseline
        self.text(&label.text, (label.x, label.y), 14.0, Pos::new(h, VPos::Bottom))
    }

    fn draw_axis_title(&mut self, title: &AxisTitle) -> Result<(), ExportError> {
        let (x, y) = title.anchor_point(TITLE_FONT_PX);
        let (px, py) = self.pixel(x, y);
        let font = if title.rotation != 0.0 {
            (FONT, TITLE_FONT_PX)
                .into_font()
                .transform(FontTransform::Rotate270)
        } else {
            (FONT, TITLE_FONT_PX).into_font()
        };
        let style = font.color(&BLACK);
        self.root
            .draw(&Text::new(title.text.clone(), (px, py), style))
            .map_err(draw_error)
    }

    fn draw_trend_line(&mut self, segment: &TrendSegment) -> Result<(), ExportError> {
        self.line(
            (segment.x1, segment.y1),
            (segment.x2, segment.y2),
            TREND_COLOR.stroke_width(2),
        )
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        self.root.present().map_err(draw_error)
    }

    fn clear(&mut self) {
        // Nothing retained; the next `begin` repaints the whole area
    }
}

/// Render the chart into PNG bytes.
pub fn render_png_bytes(
    points: &[DataPoint],
    config: &ChartConfig,
    viewport: Viewport,
) -> Result<Vec<u8>, ExportError> {
    let limit = f64::from(MAX_DIMENSION);
    if !(viewport.width <= limit && viewport.height <= limit) {
        return Err(ExportError::Draw(format!("image too large: {}", viewport)));
    }
    let width = viewport.width.max(1.0).round() as u32;
    let height = viewport.height.max(1.0).round() as u32;
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| ExportError::Draw(format!("image too large: {}", viewport)))?;
    let mut buffer = vec![0u8; len];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        let mut surface = BitmapSurface::new(&root);
        ChartRenderer::new(config.clone()).render(points, viewport, &mut surface)?;
    }

    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ExportError::Draw("pixel buffer size mismatch".to_string()))?;
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Render the chart and write it to `path` as PNG.
pub fn export_png(
    points: &[DataPoint],
    config: &ChartConfig,
    viewport: Viewport,
    path: &Path,
) -> Result<(), ExportError> {
    let bytes = render_png_bytes(points, config, viewport)?;
    fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("exported PNG chart ({}) to {}", viewport, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_is_painted_translucent() {
        let (width, height) = (200u32, 200u32);
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).unwrap();
            let mut surface = BitmapSurface::new(&root);
            let marker = Marker {
                index: 0,
                label: "AL".to_string(),
                name: "Alabama".to_string(),
                cx: 40.0,
                cy: 40.0,
                radius: 17.0,
                tooltip: crate::charts::Tooltip {
                    lines: Vec::new(),
                    offset: [0.0, 0.0],
                },
            };
            let style = MarkerStyle {
                radius: 17.0,
                fill: "blue".to_string(),
                opacity: 0.3,
            };
            surface.draw_marker(&marker, &style).unwrap();
            surface.finish().unwrap();
        }

        // Default margins put the centre at (100, 90)
        let idx = ((90 * width + 100) * 3) as usize;
        let (r, g, b) = (buffer[idx], buffer[idx + 1], buffer[idx + 2]);
        assert_eq!(b, 255);
        assert!(r > 150 && r < 200, "red channel {r}");
        assert_eq!(r, g);

        // Outside the circle stays white
        let idx = ((10 * width + 10) * 3) as usize;
        assert_eq!(&buffer[idx..idx + 3], &[255, 255, 255]);
    }

    fn states() -> Vec<DataPoint> {
        vec![
            DataPoint::new("AL", "Alabama", 18.1, 11.7),
            DataPoint::new("AK", "Alaska", 10.9, 15.9),
            DataPoint::new("AZ", "Arizona", 17.8, 17.1),
        ]
    }

    #[test]
    fn png_matches_viewport() {
        let bytes =
            render_png_bytes(&states(), &ChartConfig::default(), Viewport::new(640.0, 480.0))
                .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (640, 480));

        // Inside the marker, right of its label, is tinted blue over white
        let layout = ChartLayout::compute(
            &states(),
            Viewport::new(640.0, 480.0),
            &ChartConfig::default(),
        )
        .unwrap();
        let (cx, cy) = layout.position(&states()[1]);
        let rgb = decoded.to_rgb8();
        let pixel = rgb.get_pixel(
            (cx + 12.0 + layout.margins.left).round() as u32,
            (cy + layout.margins.top).round() as u32,
        );
        assert_eq!(pixel[2], 255);
        assert!(pixel[0] < 255);
    }

    #[test]
    fn oversized_image_is_rejected() {
        let result = render_png_bytes(
            &states(),
            &ChartConfig::default(),
            Viewport::new(40000.0, 40000.0),
        );
        assert!(matches!(result, Err(ExportError::Draw(_))));
    }

    #[test]
    fn export_writes_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        export_png(&states(), &ChartConfig::default(), Viewport::new(400.0, 300.0), &path).unwrap();

        let written = fs::read(&path).unwrap();
        assert_eq!(&written[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&written).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (400, 300));
    }
}
