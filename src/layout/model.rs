//! Assembly of the renderer-agnostic model

use chrono::NaiveDateTime;
use serde::Serialize;

use super::classify::DotKind;
use super::geometry::{resolve_geometry, CanvasGeometry};
use super::grid::GridLayout;
use super::temporal::{compute_temporal, Temporal};
use crate::Result;

/// One shape to draw, centered in its cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Drawable {
    pub day_index: u32,
    pub center_x: f64,
    pub center_y: f64,
    pub kind: DotKind,
    /// Diameter for dots, span for crosses
    pub size: f64,
}

/// Summary text shown under the card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Label {
    pub days_left: u32,
    /// Rounded to one decimal place
    pub percent_elapsed: f64,
}

impl Label {
    pub fn new(temporal: &Temporal) -> Self {
        // Clamps at zero on the last day of the year
        let days_left = temporal
            .total_days
            .saturating_sub(temporal.elapsed_days)
            .saturating_sub(1);
        let pct = temporal.elapsed_days as f64 / temporal.total_days as f64 * 100.0;
        Self {
            days_left,
            percent_elapsed: (pct * 10.0).round() / 10.0,
        }
    }

    pub fn text(&self) -> String {
        let unit = if self.days_left == 1 { "day" } else { "days" };
        format!("{} {} left · {:.1}%", self.days_left, unit, self.percent_elapsed)
    }
}

/// Everything a surface needs to draw the year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    pub temporal: Temporal,
    pub grid: GridLayout,
    pub geometry: CanvasGeometry,
    pub drawables: Vec<Drawable>,
    pub label: Label,
}

/// Build the render model for `now` on a `canvas_w` x `canvas_h` canvas.
pub fn build_render_model(now: NaiveDateTime, canvas_w: f64, canvas_h: f64) -> Result<RenderModel> {
    let temporal = compute_temporal(now)?;
    let grid = GridLayout::new(temporal.total_days, temporal.weekday_offset);
    let geometry = resolve_geometry(canvas_w, canvas_h, grid.rows)?;

    let drawables = grid
        .day_cells()
        .filter_map(|cell| {
            let day_index = cell.slot.day_index()?;
            let kind = DotKind::classify(day_index, temporal.elapsed_days);
            let (center_x, center_y) = geometry.cell_center(cell.row, cell.col);
            Some(Drawable {
                day_index,
                center_x,
                center_y,
                kind,
                size: geometry.dot_size * kind.size_factor(),
            })
        })
        .collect();

    Ok(RenderModel {
        temporal,
        grid,
        geometry,
        drawables,
        label: Label::new(&temporal),
    })
}

impl RenderModel {
    pub fn today(&self) -> Option<&Drawable> {
        self.drawables.iter().find(|d| d.kind == DotKind::Today)
    }

    pub fn count(&self, kind: DotKind) -> usize {
        self.drawables.iter().filter(|d| d.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(9, 30, 0).unwrap()
    }

    #[test]
    fn one_drawable_per_day() {
        let model = build_render_model(at(2025, 3, 14), 390.0, 844.0).unwrap();
        assert_eq!(model.drawables.len(), 365);
        assert_eq!(model.count(DotKind::Today), 1);
        assert_eq!(model.count(DotKind::Past), model.temporal.elapsed_days as usize);
    }

    #[test]
    fn today_dot_is_enlarged() {
        let model = build_render_model(at(2025, 3, 14), 390.0, 844.0).unwrap();
        let today = model.today().unwrap();
        assert!((today.size - model.geometry.dot_size * 1.8).abs() < 1e-9);
        let future = model.drawables.last().unwrap();
        assert_eq!(future.kind, DotKind::Future);
        assert_eq!(future.size, model.geometry.dot_size);
    }

    #[test]
    fn label_text() {
        let model = build_render_model(at(2025, 1, 1), 390.0, 844.0).unwrap();
        assert_eq!(model.label.days_left, 364);
        assert_eq!(model.label.text(), "364 days left · 0.0%");

        let last = build_render_model(at(2025, 12, 30), 390.0, 844.0).unwrap();
        assert_eq!(last.label.text(), "1 day left · 99.5%");
    }

    #[test]
    fn invalid_canvas_yields_no_model() {
        assert!(build_render_model(at(2025, 1, 1), 0.0, 844.0).is_err());
    }
}
