#![cfg(feature = "raster")]

use chrono::NaiveDate;
use yeardots::rendering::raster::rasterize;
use yeardots::{build_render_model, render, OutputFormat, Theme};

fn model() -> yeardots::RenderModel {
    let now = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap().and_hms_opt(7, 0, 0).unwrap();
    build_render_model(now, 390.0, 844.0).unwrap()
}

#[test]
fn png_decodes_with_expected_colors() {
    let theme = Theme::dark();
    let out = render(&model(), &theme, OutputFormat::Png).unwrap();
    assert_eq!(&out.body[0..8], b"\x89PNG\r\n\x1a\n");

    let img = image::load_from_memory(&out.body).expect("decode").to_rgba8();
    assert_eq!((img.width(), img.height()), (390, 844));

    let to_px = |c: (u8, u8, u8, u8)| [c.0, c.1, c.2, c.3];
    let mut found_card = false;
    let mut found_today = false;
    let mut found_future = false;
    for p in img.pixels() {
        found_card |= p.0 == to_px(theme.card);
        found_today |= p.0 == to_px(theme.today);
        found_future |= p.0 == to_px(theme.future);
    }
    assert!(found_card, "expected card pixels");
    assert!(found_today, "expected accent pixels for today");
    assert!(found_future, "expected future dot pixels");
}

#[test]
fn svg_and_png_share_geometry() {
    let m = model();
    let theme = Theme::light();
    let svg = String::from_utf8(render(&m, &theme, OutputFormat::Svg).unwrap().body).unwrap();
    let img = rasterize(&m, &theme).unwrap();

    // Every future dot center in the SVG is painted with the future color in the raster
    let (r, g, b, a) = theme.future;
    for d in m.drawables.iter().filter(|d| d.kind == yeardots::DotKind::Future) {
        let needle = format!(r#"cx="{:.2}" cy="{:.2}""#, d.center_x, d.center_y);
        assert!(svg.contains(&needle), "missing {needle}");
        let p = img.get_pixel(d.center_x.round() as u32, d.center_y.round() as u32);
        assert_eq!(p.0, [r, g, b, a]);
    }
}

#[test]
fn label_is_inline_only_in_svg() {
    let m = model();
    let svg = render(&m, &Theme::dark(), OutputFormat::Svg).unwrap();
    let png = render(&m, &Theme::dark(), OutputFormat::Png).unwrap();
    assert!(String::from_utf8(svg.body).unwrap().contains("<text"));
    assert_eq!(png.label, svg.label);
    assert_eq!(png.label.days_left, 225);
}
