//! Integration tests for the decode → classify → transform pipeline.
//!
//! Unit tests for each stage live in the module `#[cfg(test)]` blocks. These
//! tests start from raw JSON bodies — the exact bytes a metering backend
//! would send — and follow them through envelope triage into plottable
//! points.

use reqmeter::classify::{Classification, ErrorCategory, classify};
use reqmeter::client::protocol::{MetricsResponse, SeriesBundle};
use reqmeter::series::{PlotPoint, TransformError, transform};

/// Decode a JSON body the way the client does, then classify it.
fn classify_body(body: &str) -> Classification {
    let response: Option<MetricsResponse> =
        serde_json::from_str(body).expect("body should decode");
    classify(response)
}

/// Expect the body to classify as a series bundle.
fn expect_series(body: &str) -> SeriesBundle {
    match classify_body(body) {
        Classification::Series(bundle) => bundle,
        other => panic!("expected series, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[test]
fn full_payload_becomes_points() {
    let bundle =
        expect_series(r#"{"data":{"time":[1000,2000,3000],"request_count":[5,10,0]}}"#);
    let series = transform(&bundle).expect("plottable");

    assert_eq!(
        series.points,
        vec![
            PlotPoint {
                date: 1_000_000,
                value: 5.0
            },
            PlotPoint {
                date: 2_000_000,
                value: 10.0
            },
            PlotPoint {
                date: 3_000_000,
                value: 0.0
            },
        ]
    );
    assert_eq!(series.domain.start_date, 1_000_000);
    assert_eq!(series.domain.end_date, 3_000_000);
    assert_eq!(series.domain.max_value, 10.0);
    assert_eq!(series.total, 15.0);
}

#[test]
fn extra_scalar_columns_flow_through() {
    let bundle = expect_series(
        r#"{"data":{"time":[1000,2000],"request_count":[3,4],"interval":"day","host":null}}"#,
    );
    assert!(transform(&bundle).is_ok());
    assert_eq!(bundle.array("interval"), None, "scalar is not a series");
}

// ---------------------------------------------------------------------------
// Error envelopes
// ---------------------------------------------------------------------------

#[test]
fn recognized_reasons_map_to_categories() {
    let cases = vec![
        ("serverExpired", ErrorCategory::ServerExpired),
        ("unauthorized", ErrorCategory::Unauthorized),
        ("missingCredentials", ErrorCategory::MissingCredentials),
        ("invalidApiKey", ErrorCategory::InvalidApiKey),
        ("missingApiKey", ErrorCategory::MissingApiKey),
        ("unknown", ErrorCategory::Unknown),
    ];

    for (reason, expected) in cases {
        let body = format!(r#"{{"error":"denied","reason":"{reason}"}}"#);
        match classify_body(&body) {
            Classification::Error(err) => {
                assert_eq!(err.category, Some(expected), "reason {reason:?}");
            }
            other => panic!("expected error for {reason:?}, got {other:?}"),
        }
    }
}

#[test]
fn error_without_reason_is_unknown_with_raw_text() {
    match classify_body(r#"{"error":"metering backend down"}"#) {
        Classification::Error(err) => {
            assert_eq!(err.category, Some(ErrorCategory::Unknown));
            assert_eq!(err.message, "metering backend down");
        }
        other => panic!("expected error, got {other:?}"),
    }
}

#[test]
fn unrecognized_reason_carries_no_category() {
    match classify_body(r#"{"error":"denied","reason":"quotaExceeded"}"#) {
        Classification::Error(err) => {
            assert_eq!(err.category, None);
            assert_eq!(err.reason.as_deref(), Some("quotaExceeded"));
        }
        other => panic!("expected error, got {other:?}"),
    }
}

#[test]
fn missing_api_key_is_classified_but_silent() {
    match classify_body(r#"{"error":"no key configured","reason":"missingApiKey"}"#) {
        Classification::Error(err) => {
            assert_eq!(err.category, Some(ErrorCategory::MissingApiKey));
            assert!(err.category.unwrap().is_silent());
        }
        other => panic!("expected error, got {other:?}"),
    }
}

#[test]
fn error_takes_precedence_over_data() {
    let body =
        r#"{"error":"expired","reason":"serverExpired","data":{"time":[1],"request_count":[1]}}"#;
    match classify_body(body) {
        Classification::Error(err) => {
            assert_eq!(err.category, Some(ErrorCategory::ServerExpired));
        }
        other => panic!("expected error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Degenerate envelopes
// ---------------------------------------------------------------------------

#[test]
fn null_body_is_no_data() {
    assert!(matches!(classify_body("null"), Classification::NoData));
}

#[test]
fn envelope_without_data_or_error_is_malformed() {
    assert!(matches!(classify_body("{}"), Classification::Malformed));
    assert!(matches!(
        classify_body(r#"{"data":null}"#),
        Classification::Malformed
    ));
}

// ---------------------------------------------------------------------------
// Unplottable series
// ---------------------------------------------------------------------------

#[test]
fn unplottable_payloads_are_rejected() {
    let cases = vec![
        (r#"{"data":{"request_count":[1]}}"#, "time column absent"),
        (r#"{"data":{"time":[],"request_count":[]}}"#, "empty window"),
        (
            r#"{"data":{"time":"daily","request_count":[1]}}"#,
            "time not an array",
        ),
        (
            r#"{"data":{"time":[1000,9.3e15],"request_count":[1,2]}}"#,
            "date beyond the axis window",
        ),
    ];

    for (body, label) in cases {
        let bundle = expect_series(body);
        assert!(transform(&bundle).is_err(), "{label}");
    }
}

#[test]
fn mismatched_wire_columns_are_rejected() {
    let bundle = expect_series(r#"{"data":{"time":[1000,2000,3000],"request_count":[1,2]}}"#);
    match transform(&bundle) {
        Err(TransformError::LengthMismatch {
            metric,
            expected,
            actual,
        }) => {
            assert_eq!(metric, "request_count");
            assert_eq!(expected, 3);
            assert_eq!(actual, 2);
        }
        other => panic!("expected length mismatch, got {other:?}"),
    }
}
