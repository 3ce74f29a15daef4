//! SVG markup builders for the chart.
//!
//! Pure string assembly: paths for the area fill and the line, tick groups
//! for both axes, and the outer document frame. Callers pass already-scaled
//! pixel coordinates; nothing here knows about domains or data.

use std::fmt::Write as _;

// Tick mark geometry, matching the classic bottom/left axis layout.
const TICK_SIZE: f64 = 6.0;
const TICK_TEXT_PAD: f64 = 9.0;

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Path data for the filled area under a series.
///
/// Runs along the top of the series, drops to `baseline` under the last
/// point, returns along the baseline and closes. Empty input yields an
/// empty string (a path with no data renders nothing).
pub fn area_path(points: &[(f64, f64)], baseline: f64) -> String {
    if points.is_empty() {
        return String::new();
    }

    let mut d = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        let op = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{op}{},{}", num(*x), num(*y));
    }
    let first_x = points[0].0;
    let last_x = points[points.len() - 1].0;
    let _ = write!(
        d,
        "L{},{}L{},{}Z",
        num(last_x),
        num(baseline),
        num(first_x),
        num(baseline)
    );
    d
}

/// Path data for the series line: a point-to-point polyline.
pub fn line_path(points: &[(f64, f64)]) -> String {
    let mut d = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        let op = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{op}{},{}", num(*x), num(*y));
    }
    d
}

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

/// A bottom-oriented axis: tick marks below the domain line, labels under
/// the marks. `ticks` are `(x position, label)` pairs; `width` is the length
/// of the domain line.
pub fn axis_bottom(ticks: &[(f64, String)], width: f64) -> String {
    let mut out = String::new();
    for (x, label) in ticks {
        let _ = writeln!(
            out,
            "<g class=\"tick\" transform=\"translate({},0)\"><line y2=\"{}\"/>\
<text y=\"{}\" dy=\".71em\" text-anchor=\"middle\">{}</text></g>",
            num(*x),
            num(TICK_SIZE),
            num(TICK_TEXT_PAD),
            escape(label)
        );
    }
    let _ = writeln!(out, "<path class=\"domain\" d=\"M0,0H{}\"/>", num(width));
    out
}

/// A left-oriented axis: tick marks to the left of the domain line, labels
/// beside them. `ticks` are `(y position, label)` pairs; `height` is the
/// length of the domain line.
pub fn axis_left(ticks: &[(f64, String)], height: f64) -> String {
    let mut out = String::new();
    for (y, label) in ticks {
        let _ = writeln!(
            out,
            "<g class=\"tick\" transform=\"translate(0,{})\"><line x2=\"-{}\"/>\
<text x=\"-{}\" dy=\".32em\" text-anchor=\"end\">{}</text></g>",
            num(*y),
            num(TICK_SIZE),
            num(TICK_TEXT_PAD),
            escape(label)
        );
    }
    let _ = writeln!(out, "<path class=\"domain\" d=\"M0,0V{}\"/>", num(height));
    out
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Format a pixel coordinate: two decimals, trailing zeros trimmed.
fn num(value: f64) -> String {
    let mut text = format!("{value:.2}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    // Avoid the "-0" artifact from tiny negative rounding.
    if text == "-0" { "0".to_string() } else { text }
}

/// Escape text content for embedding in SVG.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_path_is_a_polyline() {
        let d = line_path(&[(0.0, 10.0), (50.0, 20.0), (100.0, 5.0)]);
        assert_eq!(d, "M0,10L50,20L100,5");
    }

    #[test]
    fn area_path_closes_at_the_baseline() {
        let d = area_path(&[(0.0, 10.0), (100.0, 5.0)], 300.0);
        assert_eq!(d, "M0,10L100,5L100,300L0,300Z");
    }

    #[test]
    fn empty_paths_are_empty_strings() {
        assert_eq!(line_path(&[]), "");
        assert_eq!(area_path(&[], 300.0), "");
    }

    #[test]
    fn single_point_area_still_closes() {
        let d = area_path(&[(40.0, 10.0)], 300.0);
        assert_eq!(d, "M40,10L40,300L40,300Z");
    }

    #[test]
    fn coordinates_are_trimmed() {
        let d = line_path(&[(0.333333, 10.5), (99.999, 20.0)]);
        assert_eq!(d, "M0.33,10.5L100,20");
    }

    #[test]
    fn bottom_axis_has_ticks_and_domain() {
        let ticks = vec![(0.0, "Apr 01".to_string()), (350.0, "Apr 02".to_string())];
        let markup = axis_bottom(&ticks, 700.0);
        assert!(markup.contains("translate(0,0)"));
        assert!(markup.contains("translate(350,0)"));
        assert!(markup.contains(">Apr 01</text>"));
        assert!(markup.contains("M0,0H700"));
    }

    #[test]
    fn left_axis_has_ticks_and_domain() {
        let ticks = vec![(300.0, "0".to_string()), (0.0, "10".to_string())];
        let markup = axis_left(&ticks, 300.0);
        assert!(markup.contains("translate(0,300)"));
        assert!(markup.contains(">10</text>"));
        assert!(markup.contains("M0,0V300"));
    }

    #[test]
    fn labels_are_escaped() {
        let ticks = vec![(0.0, "a<b&c".to_string())];
        let markup = axis_bottom(&ticks, 10.0);
        assert!(markup.contains(">a&lt;b&amp;c</text>"));
    }
}
