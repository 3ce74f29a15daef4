//! Integration tests for chart rendering: decoded payloads through the
//! transform into final SVG markup.
//!
//! Scale and path unit tests live in `src/chart`. These tests check what a
//! reader of the finished document would see: sizing, tick labels, captions,
//! and how the markup evolves across redraws.

use reqmeter::chart::{ChartRenderer, SurfaceSize};
use reqmeter::client::protocol::SeriesBundle;
use reqmeter::series::transform;
use reqmeter::widget::scaffold::Scaffold;

fn decode(body: &str) -> SeriesBundle {
    serde_json::from_str(body).expect("bundle should decode")
}

fn render(body: &str, surface: SurfaceSize) -> Option<String> {
    let series = transform(&decode(body)).expect("plottable");
    let mut renderer = ChartRenderer::new();
    renderer.draw(&series.points, &series.domain, surface);
    renderer.svg()
}

// ---------------------------------------------------------------------------
// Document structure
// ---------------------------------------------------------------------------

#[test]
fn week_of_daily_samples_renders_daily_ticks() {
    let body = r#"{"time":[86400,172800,259200,345600,432000,518400,604800],
                   "request_count":[4,10,2,7,5,9,3]}"#;
    let svg = render(body, SurfaceSize::new(700.0, 300.0)).expect("rendered");

    // Outer size = surface plus margins (100 left, 5 top, 45 bottom).
    assert!(svg.contains("width=\"800\""));
    assert!(svg.contains("height=\"350\""));
    assert!(svg.contains("translate(100,5)"));

    // One tick per day across the 1970-01-02 .. 1970-01-08 window.
    assert!(svg.contains(">Jan 02<"));
    assert!(svg.contains(">Jan 08<"));

    // Value axis: max 10 rounds to ticks 0 / 5 / 10.
    assert!(svg.contains(">10<"));

    // The area closes along the baseline.
    assert!(svg.contains("300Z"));

    assert!(svg.contains(">Requests<"));
    assert!(svg.contains(">Day<"));
}

#[test]
fn counts_in_thousands_use_si_labels() {
    let body = r#"{"time":[86400,172800,259200],"request_count":[4000,12000,6000]}"#;
    let svg = render(body, SurfaceSize::new(700.0, 300.0)).expect("rendered");

    assert!(svg.contains(">5k<"));
    assert!(svg.contains(">10k<"));
}

#[test]
fn degenerate_surface_renders_nothing() {
    let svg = render(
        r#"{"time":[1000],"request_count":[1]}"#,
        SurfaceSize::new(0.0, 300.0),
    );
    assert!(svg.is_none());
}

// ---------------------------------------------------------------------------
// Redraw behavior
// ---------------------------------------------------------------------------

#[test]
fn identical_input_renders_identical_markup() {
    let body = r#"{"time":[86400,172800],"request_count":[5,2]}"#;
    let surface = SurfaceSize::new(700.0, 300.0);
    assert_eq!(render(body, surface), render(body, surface));
}

#[test]
fn redraw_with_new_data_updates_markup() {
    let surface = SurfaceSize::new(700.0, 300.0);
    let mut renderer = ChartRenderer::new();

    let first =
        transform(&decode(r#"{"time":[86400,172800],"request_count":[5,2]}"#)).expect("plottable");
    renderer.draw(&first.points, &first.domain, surface);
    let before = renderer.svg().expect("rendered");
    assert!(before.contains(">4<"), "max 5 ticks at 0/2/4");

    let second = transform(&decode(
        r#"{"time":[86400,172800],"request_count":[12000,9000]}"#,
    ))
    .expect("plottable");
    renderer.draw(&second.points, &second.domain, surface);
    let after = renderer.svg().expect("rendered");
    assert!(after.contains(">10k<"));
    assert_ne!(before, after);
}

// ---------------------------------------------------------------------------
// Page embedding
// ---------------------------------------------------------------------------

#[test]
fn scaffold_page_embeds_rendered_chart() {
    let surface = SurfaceSize::new(700.0, 300.0);
    let series =
        transform(&decode(r#"{"time":[86400,172800],"request_count":[5,2]}"#)).expect("plottable");

    let mut scaffold = Scaffold::new(surface);
    let mut renderer = ChartRenderer::new();
    renderer.draw(&series.points, &series.domain, surface);
    scaffold.chart.visible = true;
    scaffold.chart.markup = renderer.svg();

    let page = scaffold.page_html();
    assert!(page.contains("<!DOCTYPE html>"));
    assert!(page.contains("Server Request Data"));
    assert!(page.contains("<svg"));
}
