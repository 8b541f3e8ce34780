use chrono::NaiveDate;
use yeardots::{AsyncRenderer, Canvas, OutputFormat, RenderRequest};

#[tokio::test]
async fn render_many_keeps_request_order() {
    let renderer = AsyncRenderer::new(3).expect("renderer");
    let requests: Vec<_> = (1..=6)
        .map(|m| {
            let now = NaiveDate::from_ymd_opt(2025, m, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
            RenderRequest::new(now, Canvas::default(), OutputFormat::Json)
        })
        .collect();

    let results = renderer.render_many(requests).await;
    assert_eq!(results.len(), 6);
    let mut last_left = u32::MAX;
    for r in results {
        let out = r.expect("render");
        assert!(out.label.days_left < last_left);
        last_left = out.label.days_left;
    }
    renderer.shutdown();
}

#[tokio::test]
async fn mixed_formats_render_concurrently() {
    let renderer = AsyncRenderer::new(2).expect("renderer");
    let now = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_opt(12, 0, 0).unwrap();
    let canvas = Canvas { width: 200, height: 430 };
    let results = renderer
        .render_many(vec![
            RenderRequest::new(now, canvas, OutputFormat::Svg),
            RenderRequest::new(now, canvas, OutputFormat::Png),
            RenderRequest::new(now, Canvas { width: 0, height: 0 }, OutputFormat::Png),
        ])
        .await;

    assert_eq!(results[0].as_ref().unwrap().content_type(), "image/svg+xml");
    assert_eq!(results[1].as_ref().unwrap().content_type(), "image/png");
    assert!(results[2].as_ref().unwrap_err().is_client_error());
    assert_eq!(renderer.workers(), 2);
}
