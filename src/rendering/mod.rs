//! Renderer adapters over the layout engine
//!
//! Every surface goes through [`paint::paint_commands`], so vector and
//! raster output always agree on positions and sizes.

pub mod paint;
#[cfg(feature = "raster")]
pub mod raster;
pub mod svg;

use std::fmt;
use std::str::FromStr;

use crate::layout::{Label, RenderModel};
use crate::{Error, Result};
pub use paint::{PaintCommand, Theme};

/// Output selector for image surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
    /// The render model itself, for clients that draw their own shapes
    Json,
}

impl OutputFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Svg => "image/svg+xml",
            OutputFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            "json" => Ok(OutputFormat::Json),
            _ => Err(Error::InvalidParameter { name: "format".into(), value: s.to_string() }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Encoded output for one request.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub body: Vec<u8>,
    /// Drawn inline for SVG, carried alongside for PNG
    pub label: Label,
}

impl Rendered {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Encode a model in the requested format.
pub fn render(model: &RenderModel, theme: &Theme, format: OutputFormat) -> Result<Rendered> {
    let body = match format {
        #[cfg(feature = "raster")]
        OutputFormat::Png => raster::render_png(model, theme)?,
        #[cfg(not(feature = "raster"))]
        OutputFormat::Png => {
            return Err(Error::RenderError("PNG output requires the `raster` feature".into()))
        }
        OutputFormat::Svg => svg::render_svg(model, theme).into_bytes(),
        OutputFormat::Json => serde_json::to_vec(model)?,
    };

    Ok(Rendered {
        format,
        width: model.geometry.canvas_w.round() as u32,
        height: model.geometry.canvas_h.round() as u32,
        body,
        label: model.label,
    })
}
