//! Scale and tick math for the chart axes.
//!
//! Two scale kinds: a linear value scale for the y axis (with nice round
//! domain bounds and 1/2/5-stepped ticks) and a time scale for the x axis
//! (ticks aligned to calendar-friendly intervals). Both map a data domain
//! onto a pixel range and collapse to the range start when the domain has
//! zero span, so degenerate series still draw instead of producing NaN.

use chrono::TimeZone;

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;
const MONTH_MS: i64 = 30 * DAY_MS;
const YEAR_MS: i64 = 365 * DAY_MS;

/// Candidate x-axis tick intervals, finest first.
const TIME_INTERVALS: &[i64] = &[
    SECOND_MS,
    5 * SECOND_MS,
    15 * SECOND_MS,
    30 * SECOND_MS,
    MINUTE_MS,
    5 * MINUTE_MS,
    15 * MINUTE_MS,
    30 * MINUTE_MS,
    HOUR_MS,
    3 * HOUR_MS,
    6 * HOUR_MS,
    12 * HOUR_MS,
    DAY_MS,
    2 * DAY_MS,
    WEEK_MS,
    2 * WEEK_MS,
    MONTH_MS,
    3 * MONTH_MS,
    YEAR_MS,
];

// ---------------------------------------------------------------------------
// Linear scale
// ---------------------------------------------------------------------------

/// Linear mapping from a value domain onto a pixel range.
///
/// The range may be inverted (e.g. `(height, 0)` for a y axis with zero at
/// the bottom). The range is fixed at construction; only the domain changes
/// between redraws.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Create a scale with the unit domain and the given pixel range.
    pub fn new(range: (f64, f64)) -> Self {
        Self {
            domain: (0.0, 1.0),
            range,
        }
    }

    pub fn set_domain(&mut self, min: f64, max: f64) {
        self.domain = (min, max);
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Extend the domain outward to multiples of a round step.
    ///
    /// Matches the usual charting convention: the step is the 1/2/5-ladder
    /// value for roughly ten subdivisions, the lower bound is floored to it
    /// and the upper bound is ceiled. A zero-span domain is left untouched.
    pub fn nice(&mut self) {
        let (d0, d1) = self.domain;
        let span = d1 - d0;
        if span <= 0.0 || !span.is_finite() {
            return;
        }
        let step = tick_step(span, 10);
        self.domain = ((d0 / step).floor() * step, (d1 / step).ceil() * step);
    }

    /// Map a domain value to a range position.
    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Round tick values covering the domain, at most `max_count` of them.
    ///
    /// Ticks are multiples of a 1/2/5-ladder step. When the natural step
    /// yields too many ticks the step is bumped up the ladder until the
    /// count fits.
    pub fn ticks(&self, max_count: usize) -> Vec<f64> {
        let (d0, d1) = ordered(self.domain);
        let span = d1 - d0;
        if span <= 0.0 || !span.is_finite() {
            return vec![d0];
        }

        let max_count = max_count.max(2);
        let mut step = tick_step(span, max_count);
        loop {
            let ticks = step_range(d0, d1, step);
            if ticks.len() <= max_count || ticks.len() <= 2 {
                return ticks;
            }
            step = bump_step(step);
        }
    }
}

fn ordered(domain: (f64, f64)) -> (f64, f64) {
    if domain.0 <= domain.1 {
        domain
    } else {
        (domain.1, domain.0)
    }
}

/// Pick a 1/2/5-ladder step giving roughly `count` subdivisions of `span`.
fn tick_step(span: f64, count: usize) -> f64 {
    let raw = span / count as f64;
    let mut step = power_of_ten(raw.log10().floor() as i32);
    let err = step / raw;
    if err <= 0.15 {
        step *= 10.0;
    } else if err <= 0.35 {
        step *= 5.0;
    } else if err <= 0.75 {
        step *= 2.0;
    }
    step
}

/// The next coarser step on the 1 → 2 → 5 → 10 ladder.
fn bump_step(step: f64) -> f64 {
    let base = power_of_ten(step.log10().floor() as i32);
    let mantissa = step / base;
    if mantissa < 1.5 {
        2.0 * base
    } else if mantissa < 3.5 {
        5.0 * base
    } else {
        10.0 * base
    }
}

/// `10^exp` via integer exponentiation, which stays exact where `powf`
/// may drift by an ulp.
fn power_of_ten(exp: i32) -> f64 {
    10.0_f64.powi(exp)
}

/// All multiples of `step` inside `[d0, d1]`.
fn step_range(d0: f64, d1: f64, step: f64) -> Vec<f64> {
    let start = (d0 / step).ceil() as i64;
    // The quotient can land an ulp under a whole number (0.3 / 0.1 does), so
    // give the floor a hair of tolerance or the top tick goes missing.
    let stop = (d1 / step + 1e-9).floor() as i64;
    (start..=stop).map(|i| i as f64 * step).collect()
}

// ---------------------------------------------------------------------------
// Time scale
// ---------------------------------------------------------------------------

/// Linear mapping from an epoch-millisecond window onto a pixel range.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeScale {
    domain: (i64, i64),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(range: (f64, f64)) -> Self {
        Self {
            domain: (0, 1),
            range,
        }
    }

    pub fn set_domain(&mut self, start: i64, end: i64) {
        self.domain = (start, end);
    }

    pub fn domain(&self) -> (i64, i64) {
        self.domain
    }

    /// Map an epoch-millisecond instant to a range position.
    pub fn scale(&self, ms: i64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (ms - d0) as f64 / (d1 - d0) as f64 * (r1 - r0)
    }

    /// Tick instants covering the window, at most `max_count` of them.
    ///
    /// Ticks land on multiples of a calendar-friendly interval (5 minutes,
    /// 1 day, 1 week, ...) in UTC, the finest interval that fits the count.
    pub fn ticks(&self, max_count: usize) -> Vec<i64> {
        let (d0, d1) = self.domain;
        if d1 <= d0 {
            return vec![d0];
        }

        let max_count = max_count.max(2);
        let interval = tick_interval(d1.saturating_sub(d0), max_count);

        let mut first = d0.div_euclid(interval) * interval;
        if first < d0 {
            first += interval;
        }

        let mut ticks = Vec::new();
        let mut t = first;
        while t <= d1 {
            ticks.push(t);
            // A window ending at i64::MAX would otherwise never satisfy the
            // loop bound.
            let Some(next) = t.checked_add(interval) else {
                break;
            };
            t = next;
        }
        ticks
    }

    /// The interval [`ticks`](Self::ticks) would use for the current window.
    pub fn tick_interval_for(&self, max_count: usize) -> i64 {
        let (d0, d1) = self.domain;
        if d1 <= d0 {
            return DAY_MS;
        }
        tick_interval(d1.saturating_sub(d0), max_count.max(2))
    }
}

/// The finest candidate interval that keeps the tick count within bounds.
fn tick_interval(span: i64, max_count: usize) -> i64 {
    let slots = (max_count - 1) as i64;
    for &interval in TIME_INTERVALS {
        if span / interval <= slots {
            return interval;
        }
    }
    // Multi-decade windows: fall back to whole-year multiples.
    (span / slots / YEAR_MS + 1) * YEAR_MS
}

/// Format a tick instant with a granularity suited to the interval.
pub fn time_label(ms: i64, interval: i64) -> String {
    let format = if interval < MINUTE_MS {
        "%H:%M:%S"
    } else if interval < DAY_MS {
        "%H:%M"
    } else if interval < MONTH_MS {
        "%b %d"
    } else if interval < YEAR_MS {
        "%b %Y"
    } else {
        "%Y"
    };
    match chrono::Utc.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format(format).to_string(),
        None => ms.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Value formatting
// ---------------------------------------------------------------------------

/// Format a tick value compactly with an SI suffix: `1200` → `"1.2k"`.
///
/// Keeps at most two decimals and trims trailing zeros, which is exact for
/// the 1/2/5-ladder values the ticks produce.
pub fn si_format(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e12 {
        (value / 1e12, "T")
    } else if abs >= 1e9 {
        (value / 1e9, "G")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "k")
    } else {
        (value, "")
    };

    let mut text = format!("{scaled:.2}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    format!("{text}{suffix}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
