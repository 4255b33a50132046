//! Charts module - Scatter chart layout and rendering backends

mod bitmap;
mod layout;
mod renderer;
mod scale;
mod surface;
mod svg;

use thiserror::Error;

pub use bitmap::{export_png, render_png_bytes, BitmapSurface};
pub use layout::{ChartLayout, LayoutError, Viewport, MAX_DIMENSION};
pub use renderer::{ChartHost, ChartRenderer, RenderError, RenderedChart};
pub use scale::LinearScale;
pub use surface::{
    parse_color, Axis, AxisOrientation, AxisTitle, DrawingSurface, Marker, MarkerStyle,
    TextAnchor, TextLabel, Tick, Tooltip, TrendSegment,
};
pub use svg::{export_svg, render_svg, SvgSurface};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("Drawing failed: {0}")]
    Draw(String),
}
