//! Wire types for the usage metrics endpoint.
//!
//! The backend answers `GET <base_url>/data.json` with a single JSON object
//! that is either an error envelope (`error` + optional `reason`) or a data
//! envelope (`data` holding the series bundle). The structs here only mirror
//! the wire shape; deciding which envelope a response actually is happens in
//! [`crate::classify`], so no other module probes these fields directly.

use std::collections::BTreeMap;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// Top-level response body from the metrics endpoint.
///
/// A well-formed response carries exactly one of `error` or `data`. Unknown
/// extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricsResponse {
    /// Human-readable error text. Present on the error envelope.
    pub error: Option<String>,
    /// Machine-readable error reason (e.g. `invalidApiKey`). Only meaningful
    /// alongside `error`.
    pub reason: Option<String>,
    /// The series bundle. Present on the success envelope.
    pub data: Option<SeriesBundle>,
}

// ---------------------------------------------------------------------------
// Series bundle
// ---------------------------------------------------------------------------

/// A bundle of named metric columns.
///
/// Keys are metric names (`time`, `request_count`, ...). Values are either
/// parallel sample arrays or scalar metadata fields; only array-shaped
/// columns count as plottable metrics. A `BTreeMap` keeps iteration order
/// deterministic for validation and logging.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SeriesBundle {
    pub columns: BTreeMap<String, MetricColumn>,
}

/// One column in a series bundle: a sample array or anything else.
///
/// The untagged representation matches the wire format, where array-ness is
/// the only thing distinguishing a metric series from scalar metadata.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MetricColumn {
    /// Parallel numeric samples, one per time slot.
    Series(Vec<f64>),
    /// Non-array value (counters, labels, nested metadata). Ignored by the
    /// transformer.
    Scalar(serde_json::Value),
}

impl SeriesBundle {
    /// Look up a column by name, returning it only if it is array-shaped.
    pub fn array(&self, name: &str) -> Option<&[f64]> {
        match self.columns.get(name)? {
            MetricColumn::Series(values) => Some(values),
            MetricColumn::Scalar(_) => None,
        }
    }

    /// Iterate over all array-shaped columns as `(name, samples)` pairs.
    pub fn arrays(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns.iter().filter_map(|(name, column)| match column {
            MetricColumn::Series(values) => Some((name.as_str(), values.as_slice())),
            MetricColumn::Scalar(_) => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_data_envelope() {
        let resp: MetricsResponse = serde_json::from_value(json!({
            "data": {
                "time": [1000.0, 2000.0],
                "request_count": [5.0, 10.0]
            }
        }))
        .unwrap();

        assert!(resp.error.is_none());
        assert!(resp.reason.is_none());
        let data = resp.data.unwrap();
        assert_eq!(data.array("time"), Some(&[1000.0, 2000.0][..]));
        assert_eq!(data.array("request_count"), Some(&[5.0, 10.0][..]));
    }

    #[test]
    fn deserialize_error_envelope() {
        let resp: MetricsResponse = serde_json::from_value(json!({
            "error": "API key rejected",
            "reason": "invalidApiKey"
        }))
        .unwrap();

        assert_eq!(resp.error.as_deref(), Some("API key rejected"));
        assert_eq!(resp.reason.as_deref(), Some("invalidApiKey"));
        assert!(resp.data.is_none());
    }

    #[test]
    fn scalar_columns_are_not_arrays() {
        let resp: MetricsResponse = serde_json::from_value(json!({
            "data": {
                "time": [1.0],
                "interval": 86400,
                "server": "prod-1"
            }
        }))
        .unwrap();

        let data = resp.data.unwrap();
        assert!(data.array("interval").is_none());
        assert!(data.array("server").is_none());
        assert_eq!(data.arrays().count(), 1);
    }

    #[test]
    fn integer_samples_deserialize_as_floats() {
        let resp: MetricsResponse = serde_json::from_value(json!({
            "data": { "time": [1000, 2000, 3000] }
        }))
        .unwrap();

        let data = resp.data.unwrap();
        assert_eq!(data.array("time"), Some(&[1000.0, 2000.0, 3000.0][..]));
    }

    #[test]
    fn mixed_array_falls_back_to_scalar() {
        // An array that is not purely numeric is not a metric series.
        let resp: MetricsResponse = serde_json::from_value(json!({
            "data": { "labels": ["a", "b"], "time": [1.0] }
        }))
        .unwrap();

        let data = resp.data.unwrap();
        assert!(data.array("labels").is_none());
        assert!(data.array("time").is_some());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let resp: MetricsResponse = serde_json::from_value(json!({
            "error": "boom",
            "generatedAt": "2014-05-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(resp.error.as_deref(), Some("boom"));
    }
}
