//! Series transformation: raw metric arrays to plottable points.
//!
//! The endpoint reports samples column-wise (`time` plus one array per
//! metric). The chart wants row-wise points with millisecond dates. This
//! module does that pivot in one pass, computing the chart domain and the
//! total request count alongside.
//!
//! Shape violations (no time column, mismatched lengths, zero samples,
//! dates the axis cannot express) are errors; *value*-level problems (a
//! missing count column, negative or NaN samples) degrade to zero so
//! partial data still draws a line.

use chrono::TimeZone;
use thiserror::Error;

use crate::client::protocol::SeriesBundle;

/// Column holding the sample timestamps (Unix seconds).
pub const TIME_METRIC: &str = "time";

/// The single metric this chart plots.
///
/// Plotting a different metric would mean generalizing [`transform`] with a
/// selector parameter, not reading other columns ad hoc.
pub const VALUE_METRIC: &str = "request_count";

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One chart sample: epoch milliseconds and the plotted value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub date: i64,
    pub value: f64,
}

/// The extent of a series: time window plus value ceiling.
///
/// Recomputed from the points on every transform, never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDomain {
    /// Date of the first point (epoch ms).
    pub start_date: i64,
    /// Date of the last point (epoch ms).
    pub end_date: i64,
    /// Largest plotted value, `0.0` when every sample is zero.
    pub max_value: f64,
}

/// A fully transformed series, ready for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub points: Vec<PlotPoint>,
    pub domain: ChartDomain,
    /// Sum of all plotted values over the window. The chart itself does not
    /// use this; the `check` report surfaces it.
    pub total: f64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Shape violations that make a bundle unplottable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// The bundle has no array-shaped `time` column.
    #[error("bundle has no time array")]
    MissingTime,
    /// The time column exists but holds zero samples.
    #[error("time array is empty")]
    EmptySeries,
    /// A metric array disagrees with the time array's length.
    #[error("metric `{metric}` has {actual} samples, expected {expected}")]
    LengthMismatch {
        metric: String,
        expected: usize,
        actual: usize,
    },
    /// A timestamp converts to a date outside the plottable range.
    #[error("time value {seconds} is outside the plottable date range")]
    TimeOutOfRange { seconds: f64 },
}

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

/// Pivot a series bundle into chart points.
///
/// Points come out in input order — the endpoint reports samples
/// chronologically, so no re-sorting happens here. Dates are
/// `time[i] * 1000` (seconds to milliseconds).
pub fn transform(bundle: &SeriesBundle) -> Result<PlotSeries, TransformError> {
    let time = bundle
        .array(TIME_METRIC)
        .ok_or(TransformError::MissingTime)?;
    if time.is_empty() {
        return Err(TransformError::EmptySeries);
    }
    let n = time.len();

    // Every array column must be parallel to `time`.
    for (name, values) in bundle.arrays() {
        if name != TIME_METRIC && values.len() != n {
            return Err(TransformError::LengthMismatch {
                metric: name.to_string(),
                expected: n,
                actual: values.len(),
            });
        }
    }

    let counts = bundle.array(VALUE_METRIC);

    let mut points = Vec::with_capacity(n);
    let mut max_value = 0.0_f64;
    let mut total = 0.0_f64;

    for (i, &t) in time.iter().enumerate() {
        let date = date_ms(t).ok_or(TransformError::TimeOutOfRange { seconds: t })?;
        let value = counts
            .map(|c| c[i])
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(0.0);

        max_value = max_value.max(value);
        total += value;
        points.push(PlotPoint { date, value });
    }

    let domain = ChartDomain {
        start_date: points[0].date,
        end_date: points[n - 1].date,
        max_value,
    };

    Ok(PlotSeries {
        points,
        domain,
        total,
    })
}

/// Convert a wire timestamp (Unix seconds) to epoch milliseconds.
///
/// `None` when the value is non-finite or the resulting date falls outside
/// chrono's representable range. The `as i64` cast saturates, so a value past
/// the range would otherwise land on `i64::MAX` and pass for a real instant.
fn date_ms(seconds: f64) -> Option<i64> {
    if !seconds.is_finite() {
        return None;
    }
    let ms = (seconds * 1000.0) as i64;
    chrono::Utc.timestamp_millis_opt(ms).single().map(|_| ms)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
