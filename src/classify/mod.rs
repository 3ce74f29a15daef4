//! Response classification for the usage widget.
//!
//! Every response the endpoint can produce is mapped to exactly one
//! [`Classification`] at this boundary. Downstream code (the widget
//! controller, the CLI) branches on the classification and never inspects
//! raw envelope fields again.

use std::fmt;

use crate::client::protocol::{MetricsResponse, SeriesBundle};

// ---------------------------------------------------------------------------
// Error categories
// ---------------------------------------------------------------------------

/// Known operator-error categories reported by the metrics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The metering plan for the server has lapsed.
    ServerExpired,
    /// The viewer may not see data for this API key.
    Unauthorized,
    /// The backend has no stored credentials for this server.
    MissingCredentials,
    /// The configured API key was rejected.
    InvalidApiKey,
    /// No API key is configured yet. Expected on fresh installs, so the
    /// widget stays silent instead of showing an error.
    MissingApiKey,
    /// An error with no machine-readable reason; the raw error text is shown
    /// in the generic message slot.
    Unknown,
}

/// Wire `reason` strings mapped to categories.
const REASON_TABLE: &[(&str, ErrorCategory)] = &[
    ("serverExpired", ErrorCategory::ServerExpired),
    ("unauthorized", ErrorCategory::Unauthorized),
    ("missingCredentials", ErrorCategory::MissingCredentials),
    ("invalidApiKey", ErrorCategory::InvalidApiKey),
    ("missingApiKey", ErrorCategory::MissingApiKey),
    ("unknown", ErrorCategory::Unknown),
];

impl ErrorCategory {
    /// Look up the category for a wire `reason` string.
    ///
    /// Returns `None` for reasons this build does not know, which the
    /// controller treats as log-only. Matching is exact: reason strings are
    /// a machine protocol, not user input.
    pub fn from_reason(reason: &str) -> Option<Self> {
        REASON_TABLE
            .iter()
            .find(|(name, _)| *name == reason)
            .map(|(_, category)| *category)
    }

    /// Whether this category is deliberately invisible to the viewer.
    pub fn is_silent(self) -> bool {
        matches!(self, Self::MissingApiKey)
    }

    /// Stable kebab-case name, used for message-slot ids and logging.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ServerExpired => "server-expired",
            Self::Unauthorized => "unauthorized",
            Self::MissingCredentials => "missing-credentials",
            Self::InvalidApiKey => "invalid-api-key",
            Self::MissingApiKey => "missing-api-key",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// A classified error envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorError {
    /// The mapped category, or `None` when the backend sent a reason this
    /// build does not recognize. Unrecognized reasons are logged and
    /// dropped; a reason that is *absent* maps to [`ErrorCategory::Unknown`]
    /// instead, so the raw text still reaches the viewer. The asymmetry is
    /// intentional.
    pub category: Option<ErrorCategory>,
    /// The verbatim wire reason, kept for logging.
    pub reason: Option<String>,
    /// The raw error text from the envelope.
    pub message: String,
}

/// The four possible readings of a metrics response.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Absent or null body. Nothing to show, nothing to report.
    NoData,
    /// The payload carried a series bundle.
    Series(SeriesBundle),
    /// The payload carried an error envelope.
    Error(OperatorError),
    /// Present, but matching no known shape. Logged, never displayed.
    Malformed,
}

/// Classify a fetched response body.
///
/// Total over every input: callers always get exactly one variant back. The
/// error envelope is checked before the data envelope, so a (malformed)
/// response carrying both reads as an error.
pub fn classify(response: Option<MetricsResponse>) -> Classification {
    let Some(response) = response else {
        return Classification::NoData;
    };

    if let Some(message) = response.error {
        let category = match response.reason.as_deref() {
            Some(reason) => ErrorCategory::from_reason(reason),
            None => Some(ErrorCategory::Unknown),
        };
        return Classification::Error(OperatorError {
            category,
            reason: response.reason,
            message,
        });
    }

    if let Some(data) = response.data {
        return Classification::Series(data);
    }

    Classification::Malformed
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
