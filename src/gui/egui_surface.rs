//! egui Drawing Surface
//! Turns the chart scene into egui shapes, cached by the viewer between resizes.

use crate::charts::{
    Axis, AxisOrientation, AxisTitle, ChartLayout, DrawingSurface, Marker, MarkerStyle,
    TextAnchor, TextLabel, TrendSegment,
};
use egui::epaint::TextShape;
use egui::{Align2, Color32, FontId, Painter, Pos2, Shape, Stroke};
use std::convert::Infallible;

const TITLE_FONT_PX: f32 = 16.0;
const LABEL_FONT_PX: f32 = 14.0;
const TREND_COLOR: Color32 = Color32::from_rgb(220, 20, 60);

pub struct EguiSurface {
    painter: Painter,
    /// Top-left of the allocated chart rect
    origin: Pos2,
    /// Top-left of the plot area, margins applied
    plot_origin: Pos2,
    text_color: Color32,
    shapes: Vec<Shape>,
}

impl EguiSurface {
    pub fn new(painter: Painter, origin: Pos2, text_color: Color32) -> Self {
        Self {
            painter,
            origin,
            plot_origin: origin,
            text_color,
            shapes: Vec::new(),
        }
    }

    pub fn into_shapes(self) -> Vec<Shape> {
        self.shapes
    }

    fn pos(&self, x: f64, y: f64) -> Pos2 {
        Pos2::new(self.plot_origin.x + x as f32, self.plot_origin.y + y as f32)
    }

    fn text(&mut self, text: &str, at: Pos2, align: Align2, font_px: f32) {
        let galley = self
            .painter
            .layout_no_wrap(text.to_string(), FontId::proportional(font_px), self.text_color);
        let rect = align.anchor_size(at, galley.size());
        self.shapes
            .push(Shape::galley(rect.min, galley, self.text_color));
    }
}

impl DrawingSurface for EguiSurface {
    type Error = Infallible;

    fn begin(&mut self, layout: &ChartLayout) -> Result<(), Infallible> {
        self.shapes.clear();
        self.plot_origin = Pos2::new(
            self.origin.x + layout.margins.left as f32,
            self.origin.y + layout.margins.top as f32,
        );
        Ok(())
    }

    fn draw_axis(&mut self, axis: &Axis) -> Result<(), Infallible> {
        let (start, end) = axis.extent();
        let (ox, oy) = axis.offset;
        let size = Axis::TICK_SIZE;
        let gap = size + Axis::TICK_PADDING;
        let stroke = Stroke::new(1.0, self.text_color);
        let font_px = axis.font_px as f32;

        match axis.orientation {
            AxisOrientation::Bottom => {
                let line = [self.pos(ox + start, oy), self.pos(ox + end, oy)];
                self.shapes.push(Shape::line_segment(line, stroke));
                for tick in &axis.ticks {
                    let x = ox + tick.position;
                    let line = [self.pos(x, oy), self.pos(x, oy + size)];
                    self.shapes.push(Shape::line_segment(line, stroke));
                    let at = self.pos(x, oy + gap);
                    self.text(&tick.text, at, Align2::CENTER_TOP, font_px);
                }
            }
            AxisOrientation::Left => {
                let line = [self.pos(ox, oy + start), self.pos(ox, oy + end)];
                self.shapes.push(Shape::line_segment(line, stroke));
                for tick in &axis.ticks {
                    let y = oy + tick.position;
                    let line = [self.pos(ox - size, y), self.pos(ox, y)];
                    self.shapes.push(Shape::line_segment(line, stroke));
                    let at = self.pos(ox - gap, y);
                    self.text(&tick.text, at, Align2::RIGHT_CENTER, font_px);
                }
            }
        }
        Ok(())
    }

    fn draw_marker(&mut self, marker: &Marker, style: &MarkerStyle) -> Result<(), Infallible> {
        let (r, g, b) = style.rgb();
        let alpha = (style.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let fill = Color32::from_rgba_unmultiplied(r, g, b, alpha);
        self.shapes.push(Shape::circle_filled(
            self.pos(marker.cx, marker.cy),
            style.radius as f32,
            fill,
        ));
        Ok(())
    }

    fn draw_label(&mut self, label: &TextLabel) -> Result<(), Infallible> {
        let align = match label.anchor {
            TextAnchor::Start => Align2::LEFT_BOTTOM,
            TextAnchor::Middle => Align2::CENTER_BOTTOM,
            TextAnchor::End => Align2::RIGHT_BOTTOM,
        };
        let at = self.pos(label.x, label.y);
        self.text(&label.text, at, align, LABEL_FONT_PX);
        Ok(())
    }

    fn draw_axis_title(&mut self, title: &AxisTitle) -> Result<(), Infallible> {
        let (x, y) = title.anchor_point(TITLE_FONT_PX as f64);
        let at = self.pos(x, y);
        if title.rotation == 0.0 {
            self.text(&title.text, at, Align2::LEFT_BOTTOM, TITLE_FONT_PX);
            return Ok(());
        }

        let galley = self.painter.layout_no_wrap(
            title.text.clone(),
            FontId::proportional(TITLE_FONT_PX),
            self.text_color,
        );
        let angle = (title.rotation as f32).to_radians();
        // Rotate about the text start so it reads bottom to top
        let shape = TextShape::new(at, galley, self.text_color).with_angle(angle);
        self.shapes.push(Shape::Text(shape));
        Ok(())
    }

    fn draw_trend_line(&mut self, segment: &TrendSegment) -> Result<(), Infallible> {
        let points = [
            self.pos(segment.x1, segment.y1),
            self.pos(segment.x2, segment.y2),
        ];
        self.shapes.extend(Shape::dashed_line(
            &points,
            Stroke::new(2.0, TREND_COLOR),
            6.0,
            4.0,
        ));
        Ok(())
    }

    fn clear(&mut self) {
        self.shapes.clear();
    }
}
