//! Chart rendering: scales, axes, area and line geometry as SVG.
//!
//! A [`ChartRenderer`] starts uninitialized and mounts its drawing
//! primitives on the first draw against a usable surface. The mounted
//! [`ChartHandles`] persist for the widget's lifetime; every
//! [`draw`](ChartRenderer::draw) after that mutates their domains, tick sets
//! and path data in place. Each draw is a full recompute from the inputs —
//! drawing the same series twice produces byte-identical geometry.

pub mod scale;
pub mod svg;

use std::fmt::Write as _;

use log::warn;

use crate::series::{ChartDomain, PlotPoint};
use scale::{LinearScale, TimeScale};

/// Most ticks the x axis will render.
pub const X_TICK_COUNT: usize = 7;
/// Most ticks the y axis will render.
pub const Y_TICK_COUNT: usize = 5;

// Margins around the drawing area. The left margin leaves room for the
// value labels and the rotated axis caption, the bottom one for date labels.
const MARGIN_TOP: f64 = 5.0;
const MARGIN_RIGHT: f64 = 0.0;
const MARGIN_BOTTOM: f64 = 45.0;
const MARGIN_LEFT: f64 = 100.0;

const Y_AXIS_CAPTION: &str = "Requests";
const X_AXIS_CAPTION: &str = "Day";

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// The drawing area the host grants the chart, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A surface with no usable extent. Drawing on one would produce NaN
    /// scales, so the renderer refuses it.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// The chart's drawing state machine: uninitialized until the first usable
/// draw, mounted from then on.
#[derive(Debug, Default)]
pub struct ChartRenderer {
    handles: Option<ChartHandles>,
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.handles.is_some()
    }

    /// Draw (or redraw) the series.
    ///
    /// A degenerate surface makes this a no-op: no mounting happens, and
    /// previously drawn geometry stays untouched. The first usable draw
    /// mounts the handles against the surface size; later draws keep the
    /// mounted size and only update domains, ticks and paths.
    pub fn draw(&mut self, points: &[PlotPoint], domain: &ChartDomain, surface: SurfaceSize) {
        if surface.is_degenerate() {
            warn!(
                "chart surface is {}x{}, skipping draw",
                surface.width, surface.height
            );
            return;
        }

        let handles = self
            .handles
            .get_or_insert_with(|| ChartHandles::mount(surface));
        handles.redraw(points, domain);
    }

    /// The current geometry as a standalone `<svg>` document, or `None`
    /// while uninitialized.
    pub fn svg(&self) -> Option<String> {
        self.handles.as_ref().map(ChartHandles::to_svg)
    }
}

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// The persistent drawing primitives, created once per widget instance.
#[derive(Debug)]
pub struct ChartHandles {
    x: TimeScale,
    y: LinearScale,
    x_ticks: Vec<(f64, String)>,
    y_ticks: Vec<(f64, String)>,
    area_d: String,
    line_d: String,
    width: f64,
    height: f64,
}

impl ChartHandles {
    /// Create the scales and empty geometry for a surface.
    fn mount(surface: SurfaceSize) -> Self {
        Self {
            x: TimeScale::new((0.0, surface.width)),
            y: LinearScale::new((surface.height, 0.0)),
            x_ticks: Vec::new(),
            y_ticks: Vec::new(),
            area_d: String::new(),
            line_d: String::new(),
            width: surface.width,
            height: surface.height,
        }
    }

    /// Recompute every piece of geometry from the given series.
    fn redraw(&mut self, points: &[PlotPoint], domain: &ChartDomain) {
        self.x.set_domain(domain.start_date, domain.end_date);
        self.y.set_domain(0.0, domain.max_value);
        self.y.nice();

        let interval = self.x.tick_interval_for(X_TICK_COUNT);
        self.x_ticks = self
            .x
            .ticks(X_TICK_COUNT)
            .into_iter()
            .map(|t| (self.x.scale(t), scale::time_label(t, interval)))
            .collect();
        self.y_ticks = self
            .y
            .ticks(Y_TICK_COUNT)
            .into_iter()
            .map(|v| (self.y.scale(v), scale::si_format(v)))
            .collect();

        let scaled: Vec<(f64, f64)> = points
            .iter()
            .map(|p| (self.x.scale(p.date), self.y.scale(p.value)))
            .collect();
        self.area_d = svg::area_path(&scaled, self.height);
        self.line_d = svg::line_path(&scaled);
    }

    /// Serialize the current geometry as a complete SVG document.
    ///
    /// Element order matters for paint order: area fill first, axes above
    /// it, the line on top.
    fn to_svg(&self) -> String {
        let outer_width = self.width + MARGIN_LEFT + MARGIN_RIGHT;
        let outer_height = self.height + MARGIN_TOP + MARGIN_BOTTOM;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{outer_width}\" height=\"{outer_height}\" \
viewBox=\"0 0 {outer_width} {outer_height}\">"
        );
        let _ = writeln!(
            out,
            "<g transform=\"translate({MARGIN_LEFT},{MARGIN_TOP})\">"
        );

        let _ = writeln!(out, "<path class=\"area\" d=\"{}\"/>", self.area_d);

        let _ = writeln!(
            out,
            "<g class=\"x axis\" transform=\"translate(0,{})\">",
            self.height
        );
        out.push_str(&svg::axis_bottom(&self.x_ticks, self.width));
        let _ = writeln!(
            out,
            "<text class=\"caption\" x=\"{}\" y=\"40\" text-anchor=\"middle\">{}</text>",
            self.width / 2.0,
            X_AXIS_CAPTION
        );
        let _ = writeln!(out, "</g>");

        let _ = writeln!(out, "<g class=\"y axis\">");
        out.push_str(&svg::axis_left(&self.y_ticks, self.height));
        let _ = writeln!(
            out,
            "<text class=\"caption\" transform=\"rotate(-90)\" y=\"-60\" x=\"{}\" \
text-anchor=\"middle\">{}</text>",
            -self.height / 2.0,
            Y_AXIS_CAPTION
        );
        let _ = writeln!(out, "</g>");

        let _ = writeln!(out, "<path class=\"line\" d=\"{}\"/>", self.line_d);
        let _ = writeln!(out, "</g>");
        out.push_str("</svg>\n");
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_series() -> (Vec<PlotPoint>, ChartDomain) {
        let points = vec![
            PlotPoint { date: 1_000_000, value: 5.0 },
            PlotPoint { date: 2_000_000, value: 10.0 },
            PlotPoint { date: 3_000_000, value: 0.0 },
        ];
        let domain = ChartDomain {
            start_date: 1_000_000,
            end_date: 3_000_000,
            max_value: 10.0,
        };
        (points, domain)
    }

    #[test]
    fn renderer_starts_uninitialized() {
        let renderer = ChartRenderer::new();
        assert!(!renderer.is_mounted());
        assert!(renderer.svg().is_none());
    }

    #[test]
    fn first_draw_mounts() {
        let (points, domain) = sample_series();
        let mut renderer = ChartRenderer::new();
        renderer.draw(&points, &domain, SurfaceSize::new(700.0, 300.0));
        assert!(renderer.is_mounted());
        assert!(renderer.svg().is_some());
    }

    #[test]
    fn degenerate_surface_is_a_no_op() {
        let (points, domain) = sample_series();
        let mut renderer = ChartRenderer::new();

        renderer.draw(&points, &domain, SurfaceSize::new(0.0, 300.0));
        assert!(!renderer.is_mounted());
        renderer.draw(&points, &domain, SurfaceSize::new(700.0, 0.0));
        assert!(!renderer.is_mounted());
        assert!(renderer.svg().is_none());
    }

    #[test]
    fn degenerate_redraw_keeps_previous_geometry() {
        let (points, domain) = sample_series();
        let mut renderer = ChartRenderer::new();
        renderer.draw(&points, &domain, SurfaceSize::new(700.0, 300.0));
        let before = renderer.svg().unwrap();

        renderer.draw(&points, &domain, SurfaceSize::new(0.0, 0.0));
        assert_eq!(renderer.svg().unwrap(), before);
    }

    #[test]
    fn redraw_is_idempotent() {
        let (points, domain) = sample_series();
        let mut renderer = ChartRenderer::new();
        let surface = SurfaceSize::new(700.0, 300.0);

        renderer.draw(&points, &domain, surface);
        let first = renderer.svg().unwrap();
        renderer.draw(&points, &domain, surface);
        let second = renderer.svg().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn svg_has_area_axes_and_line() {
        let (points, domain) = sample_series();
        let mut renderer = ChartRenderer::new();
        renderer.draw(&points, &domain, SurfaceSize::new(700.0, 300.0));
        let markup = renderer.svg().unwrap();

        assert!(markup.contains("class=\"area\""));
        assert!(markup.contains("class=\"line\""));
        assert!(markup.contains("class=\"x axis\""));
        assert!(markup.contains("class=\"y axis\""));
        assert!(markup.contains(">Requests</text>"));
        assert!(markup.contains(">Day</text>"));
        // Outer size includes the margins.
        assert!(markup.contains("width=\"800\""));
        assert!(markup.contains("height=\"350\""));
    }

    #[test]
    fn area_closes_at_the_surface_baseline() {
        let (points, domain) = sample_series();
        let mut renderer = ChartRenderer::new();
        renderer.draw(&points, &domain, SurfaceSize::new(700.0, 300.0));
        let markup = renderer.svg().unwrap();

        // The area path drops to y = height (300) before closing.
        assert!(markup.contains(",300L0,300Z"));
    }

    #[test]
    fn y_ticks_span_the_nice_domain() {
        let (points, domain) = sample_series();
        let mut renderer = ChartRenderer::new();
        renderer.draw(&points, &domain, SurfaceSize::new(700.0, 300.0));
        let handles = renderer.handles.as_ref().unwrap();

        // Domain [0, 10] with at most 5 ticks: 0, 5, 10.
        let labels: Vec<&str> = handles.y_ticks.iter().map(|(_, l)| l.as_str()).collect();
        assert_eq!(labels, vec!["0", "5", "10"]);
        // Value 0 sits at the bottom of the range.
        assert_eq!(handles.y_ticks[0].0, 300.0);
        assert_eq!(handles.y_ticks[2].0, 0.0);
    }

    #[test]
    fn mounted_size_survives_later_surface_values() {
        let (points, domain) = sample_series();
        let mut renderer = ChartRenderer::new();
        renderer.draw(&points, &domain, SurfaceSize::new(700.0, 300.0));
        renderer.draw(&points, &domain, SurfaceSize::new(900.0, 500.0));

        let handles = renderer.handles.as_ref().unwrap();
        assert_eq!(handles.width, 700.0);
        assert_eq!(handles.height, 300.0);
    }

    #[test]
    fn zero_max_value_draws_a_flat_line_at_the_baseline() {
        let points = vec![
            PlotPoint { date: 1_000_000, value: 0.0 },
            PlotPoint { date: 2_000_000, value: 0.0 },
        ];
        let domain = ChartDomain {
            start_date: 1_000_000,
            end_date: 2_000_000,
            max_value: 0.0,
        };
        let mut renderer = ChartRenderer::new();
        renderer.draw(&points, &domain, SurfaceSize::new(700.0, 300.0));
        let handles = renderer.handles.as_ref().unwrap();

        assert_eq!(handles.line_d, "M0,300L700,300");
    }
}
