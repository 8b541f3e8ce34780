//! Year-progress dot calendar
//!
//! Renders the current year as a grid of dots, one per day, with past days
//! crossed out, today highlighted and a "days left / percent elapsed" label.
//! A single pure layout engine ([`layout`]) feeds every surface: PNG, SVG and
//! the JSON model used by interactive clients.
//!
//! # Features
//!
//! - **raster** (default): PNG output via `image` + `imageproc`
//! - **server** (default): `tiny_http` surfaces for the dynamic and
//!   configurable image endpoints
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use yeardots::{build_render_model, render, OutputFormat, Theme};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let now = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let model = build_render_model(now, 390.0, 844.0)?;
//! assert_eq!(model.drawables.len(), 365);
//!
//! let svg = render(&model, &Theme::dark(), OutputFormat::Svg)?;
//! assert!(svg.label.text().contains("days left"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod params;
pub mod rendering;

// Async worker-pool façade over the renderer
pub mod async_api;

// HTTP surfaces
#[cfg(feature = "server")]
pub mod server;

pub use async_api::{AsyncRenderer, RenderRequest};
pub use config::{ParamPolicy, ServiceConfig};
pub use error::{Error, Result};
pub use layout::{build_render_model, DotKind, RenderModel};
pub use params::RenderParams;
pub use rendering::{render, OutputFormat, Rendered, Theme};

use serde::Serialize;

/// Canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 390,
            height: 844,
        }
    }
}

/// Build the model for `params` and encode it.
pub fn render_params(params: &RenderParams) -> Result<Rendered> {
    let model = build_render_model(
        params.now,
        params.canvas.width as f64,
        params.canvas.height as f64,
    )?;
    render(&model, &params.theme, params.format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_canvas() {
        let canvas = Canvas::default();
        assert_eq!(canvas.width, 390);
        assert_eq!(canvas.height, 844);
    }

    #[test]
    fn render_params_uses_requested_format() {
        let params = RenderParams::from_pairs(
            [("date", "2025-03-01"), ("format", "svg"), ("width", "200"), ("height", "400")],
            &ServiceConfig::default(),
            chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
        )
        .unwrap();
        let out = render_params(&params).unwrap();
        assert_eq!(out.format, OutputFormat::Svg);
        assert_eq!((out.width, out.height), (200, 400));
    }
}
