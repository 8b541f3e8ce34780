//! PNG rasterizer backed by `image` and `imageproc`

use std::io::Cursor;

use image::{ImageFormat, Rgba as Pixel, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

use super::paint::{paint_commands, PaintCommand, Rgba, Theme};
use crate::layout::RenderModel;
use crate::{Error, Result};

/// Largest RGBA buffer the rasterizer will allocate (256 MiB).
pub const MAX_RASTER_BYTES: u64 = 256 * 1024 * 1024;

/// Pixel dimensions of the buffer for a canvas, rejecting sizes whose RGBA
/// buffer would exceed [`MAX_RASTER_BYTES`].
fn raster_size(canvas_w: f64, canvas_h: f64) -> Result<(u32, u32)> {
    let invalid = || Error::InvalidCanvasSize { width: canvas_w, height: canvas_h };
    let (w, h) = (canvas_w.round(), canvas_h.round());
    if !(w >= 1.0 && h >= 1.0 && w <= u32::MAX as f64 && h <= u32::MAX as f64) {
        return Err(invalid());
    }
    let (width, height) = (w as u32, h as u32);
    let bytes = (width as u64)
        .checked_mul(height as u64)
        .and_then(|px| px.checked_mul(4))
        .ok_or_else(invalid)?;
    if bytes > MAX_RASTER_BYTES {
        return Err(invalid());
    }
    Ok((width, height))
}

fn px(rgba: Rgba) -> Pixel<u8> {
    Pixel([rgba.0, rgba.1, rgba.2, rgba.3])
}

fn fill_rounded_rect(img: &mut RgbaImage, x: f64, y: f64, w: f64, h: f64, radius: f64, color: Pixel<u8>) {
    let r = radius.max(0.0).min(w / 2.0).min(h / 2.0);
    let (x0, y0) = (x.round() as i32, y.round() as i32);
    let (w, h, r) = (w.round() as i32, h.round() as i32, r.round() as i32);
    if w <= 0 || h <= 0 {
        return;
    }

    if w > 2 * r {
        draw_filled_rect_mut(img, Rect::at(x0 + r, y0).of_size((w - 2 * r) as u32, h as u32), color);
    }
    if h > 2 * r && r > 0 {
        draw_filled_rect_mut(img, Rect::at(x0, y0 + r).of_size(r as u32, (h - 2 * r) as u32), color);
        draw_filled_rect_mut(img, Rect::at(x0 + w - r, y0 + r).of_size(r as u32, (h - 2 * r) as u32), color);
    }
    if r > 0 {
        for (cx, cy) in [
            (x0 + r, y0 + r),
            (x0 + w - r - 1, y0 + r),
            (x0 + r, y0 + h - r - 1),
            (x0 + w - r - 1, y0 + h - r - 1),
        ] {
            draw_filled_circle_mut(img, (cx, cy), r, color);
        }
    }
}

/// Thick segment as a quad. Degenerate quads are skipped.
fn stroke_segment(img: &mut RgbaImage, from: (f64, f64), to: (f64, f64), width: f64, color: Pixel<u8>) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 || width <= 0.0 {
        return;
    }
    let (nx, ny) = (-dy / len * width / 2.0, dx / len * width / 2.0);
    let corners = [
        (from.0 + nx, from.1 + ny),
        (to.0 + nx, to.1 + ny),
        (to.0 - nx, to.1 - ny),
        (from.0 - nx, from.1 - ny),
    ];
    let poly: Vec<Point<i32>> = corners
        .iter()
        .map(|(x, y)| Point::new(x.round() as i32, y.round() as i32))
        .collect();
    if poly.first() == poly.last() || poly.windows(2).all(|p| p[0] == p[1]) {
        return;
    }
    draw_polygon_mut(img, &poly, color);
}

/// Rasterize the model into an RGBA buffer.
///
/// Text commands are skipped; the label travels separately with the PNG.
pub fn rasterize(model: &RenderModel, theme: &Theme) -> Result<RgbaImage> {
    let g = &model.geometry;
    let (width, height) = raster_size(g.canvas_w, g.canvas_h)?;

    let mut img = RgbaImage::new(width, height);
    for cmd in paint_commands(model, theme, false) {
        match cmd {
            PaintCommand::Fill { rgba } => {
                for p in img.pixels_mut() {
                    *p = px(rgba);
                }
            }
            PaintCommand::RoundedRect { x, y, width, height, radius, rgba } => {
                fill_rounded_rect(&mut img, x, y, width, height, radius, px(rgba));
            }
            PaintCommand::Circle { cx, cy, radius, rgba } => {
                let r = (radius.round() as i32).max(1);
                draw_filled_circle_mut(&mut img, (cx.round() as i32, cy.round() as i32), r, px(rgba));
            }
            PaintCommand::Cross { cx, cy, size, stroke, rgba } => {
                let h = size / 2.0;
                let stroke = stroke.max(1.0);
                stroke_segment(&mut img, (cx - h, cy - h), (cx + h, cy + h), stroke, px(rgba));
                stroke_segment(&mut img, (cx + h, cy - h), (cx - h, cy + h), stroke, px(rgba));
            }
            PaintCommand::Text { .. } => {
                log::debug!("raster output skips text commands");
            }
        }
    }
    Ok(img)
}

/// Rasterize and encode as PNG bytes.
pub fn render_png(model: &RenderModel, theme: &Theme) -> Result<Vec<u8>> {
    let img = rasterize(model, theme)?;
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| Error::EncodeError(e.to_string()))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::build_render_model;
    use chrono::NaiveDate;

    fn model(w: f64, h: f64) -> RenderModel {
        let now = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        build_render_model(now, w, h).unwrap()
    }

    #[test]
    fn raster_has_canvas_dimensions() {
        let img = rasterize(&model(390.0, 844.0), &Theme::dark()).unwrap();
        assert_eq!(img.width(), 390);
        assert_eq!(img.height(), 844);
        // Top-left corner lies outside the card
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn today_pixel_uses_accent() {
        let m = model(780.0, 1688.0);
        let theme = Theme::dark();
        let img = rasterize(&m, &theme).unwrap();
        let today = m.today().unwrap();
        let p = img.get_pixel(today.center_x.round() as u32, today.center_y.round() as u32);
        let (r, g, b, a) = theme.today;
        assert_eq!(p.0, [r, g, b, a]);
    }

    #[test]
    fn oversized_canvas_is_rejected_before_allocating() {
        let huge = model(1e12, 1e12);
        let err = render_png(&huge, &Theme::dark()).unwrap_err();
        assert!(matches!(err, Error::InvalidCanvasSize { .. }));
        assert!(err.is_client_error());

        // Fits in u32 but not under the byte cap
        assert!(rasterize(&model(20_000.0, 20_000.0), &Theme::dark()).is_err());
    }

    #[test]
    fn raster_size_limits() {
        assert_eq!(raster_size(4096.0, 4096.0).unwrap(), (4096, 4096));
        assert!(raster_size(0.2, 100.0).is_err());
        assert!(raster_size(5e9, 1.0).is_err());
        assert!(raster_size(8192.0, 8193.0).is_err());
    }

    #[test]
    fn png_signature() {
        let bytes = render_png(&model(120.0, 260.0), &Theme::light()).unwrap();
        assert_eq!(&bytes[0..8], b"\x89PNG\r\n\x1a\n");
    }
}
