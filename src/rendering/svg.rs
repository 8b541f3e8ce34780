//! Vector markup output with the label inline

use std::fmt::Write;

use super::paint::{paint_commands, PaintCommand, Rgba, Theme};
use crate::layout::RenderModel;

fn color(rgba: Rgba) -> String {
    let (r, g, b, a) = rgba;
    if a == 255 {
        format!("#{r:02x}{g:02x}{b:02x}")
    } else {
        format!("rgba({r},{g},{b},{:.3})", a as f64 / 255.0)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Render the model as a standalone SVG document.
pub fn render_svg(model: &RenderModel, theme: &Theme) -> String {
    let g = &model.geometry;
    let mut out = String::new();
    // fmt::Write into a String cannot fail
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = g.canvas_w,
        h = g.canvas_h
    );

    for cmd in paint_commands(model, theme, true) {
        let _ = match cmd {
            PaintCommand::Fill { rgba } => writeln!(
                out,
                r#"<rect width="100%" height="100%" fill="{}"/>"#,
                color(rgba)
            ),
            PaintCommand::RoundedRect { x, y, width, height, radius, rgba } => writeln!(
                out,
                r#"<rect x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}" rx="{radius:.2}" fill="{}"/>"#,
                color(rgba)
            ),
            PaintCommand::Circle { cx, cy, radius, rgba } => writeln!(
                out,
                r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{radius:.2}" fill="{}"/>"#,
                color(rgba)
            ),
            PaintCommand::Cross { cx, cy, size, stroke, rgba } => {
                let h = size / 2.0;
                writeln!(
                    out,
                    r#"<path d="M{:.2} {:.2}L{:.2} {:.2}M{:.2} {:.2}L{:.2} {:.2}" stroke="{}" stroke-width="{stroke:.2}" stroke-linecap="round"/>"#,
                    cx - h, cy - h, cx + h, cy + h,
                    cx + h, cy - h, cx - h, cy + h,
                    color(rgba)
                )
            }
            PaintCommand::Text { x, y, size, text, rgba } => writeln!(
                out,
                r#"<text x="{x:.2}" y="{y:.2}" font-size="{size:.2}" font-family="-apple-system, Helvetica, Arial, sans-serif" text-anchor="middle" fill="{}">{}</text>"#,
                color(rgba),
                escape(&text)
            ),
        };
    }

    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::build_render_model;
    use chrono::NaiveDate;

    #[test]
    fn svg_has_one_shape_per_day_and_label() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let model = build_render_model(now, 390.0, 844.0).unwrap();
        let svg = render_svg(&model, &Theme::dark());

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        let circles = svg.matches("<circle").count();
        let crosses = svg.matches("<path").count();
        assert_eq!(circles + crosses, 366);
        assert_eq!(crosses, model.temporal.elapsed_days as usize);
        assert!(svg.contains(&model.label.text()));
        assert!(svg.contains("#ff9f0a"));
    }

    #[test]
    fn color_formats() {
        assert_eq!(color((255, 0, 16, 255)), "#ff0010");
        assert_eq!(color((0, 0, 0, 0)), "rgba(0,0,0,0.000)");
        assert_eq!(escape("a<b&c"), "a&lt;b&amp;c");
    }
}
