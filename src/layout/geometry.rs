//! Pixel geometry shared by every surface

use serde::Serialize;

use super::grid::GRID_COLUMNS;
use crate::{Error, Result};

/// Card width as a fraction of canvas width.
pub const CARD_WIDTH_RATIO: f64 = 0.75;
/// Card height as a fraction of canvas height.
pub const CARD_HEIGHT_RATIO: f64 = 0.48;
/// Card top edge as a fraction of canvas height.
pub const CARD_TOP_RATIO: f64 = 0.35;
/// Padding and corner radius as a fraction of the card's shorter side.
pub const PADDING_RATIO: f64 = 0.04;
/// Divisor balancing gap against dot size.
pub const GAP_DIVISOR: f64 = 4.0;
/// Dot diameter relative to the gap.
pub const DOT_TO_GAP: f64 = 1.5;

/// Resolved pixel geometry for one render request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasGeometry {
    pub canvas_w: f64,
    pub canvas_h: f64,
    pub card_w: f64,
    pub card_h: f64,
    pub card_left: f64,
    pub card_top: f64,
    pub padding: f64,
    pub border_radius: f64,
    pub rows: u32,
    pub cols: u32,
    pub cell_w: f64,
    pub cell_h: f64,
    pub gap: f64,
    pub dot_size: f64,
}

/// Compute card and cell geometry for a `canvas_w` x `canvas_h` canvas.
///
/// Identical inputs always produce bit-identical output. The gap is the same
/// on both axes so the two half-weeks stay visually aligned.
pub fn resolve_geometry(canvas_w: f64, canvas_h: f64, rows: u32) -> Result<CanvasGeometry> {
    if !(canvas_w.is_finite() && canvas_h.is_finite() && canvas_w > 0.0 && canvas_h > 0.0) {
        return Err(Error::InvalidCanvasSize { width: canvas_w, height: canvas_h });
    }
    if rows == 0 {
        return Err(Error::RenderError("grid has no rows".into()));
    }

    let cols = GRID_COLUMNS;
    let card_w = canvas_w * CARD_WIDTH_RATIO;
    let card_h = canvas_h * CARD_HEIGHT_RATIO;
    let padding = card_w.min(card_h) * PADDING_RATIO;

    let available_w = card_w - 2.0 * padding;
    let available_h = card_h - 2.0 * padding;

    let gap = (available_w / (cols as f64 * GAP_DIVISOR))
        .min(available_h / (rows as f64 * GAP_DIVISOR));

    Ok(CanvasGeometry {
        canvas_w,
        canvas_h,
        card_w,
        card_h,
        card_left: (canvas_w - card_w) / 2.0,
        card_top: canvas_h * CARD_TOP_RATIO,
        padding,
        border_radius: padding,
        rows,
        cols,
        cell_w: available_w / cols as f64,
        cell_h: available_h / rows as f64,
        gap,
        dot_size: gap * DOT_TO_GAP,
    })
}

impl CanvasGeometry {
    /// Pixel center of the cell at `(row, col)`.
    pub fn cell_center(&self, row: u32, col: u32) -> (f64, f64) {
        let x = self.card_left + self.padding + col as f64 * self.cell_w + self.cell_w / 2.0;
        let y = self.card_top + self.padding + row as f64 * self.cell_h + self.cell_h / 2.0;
        (x, y)
    }
}
