//! HTTP client for the usage metrics endpoint.
//!
//! A thin synchronous wrapper over `ureq`: one GET against the endpoint's
//! `data.json` resource per call, with the configured timeout and no retries.
//! Every failure mode (transport error, timeout, non-2xx status, undecodable
//! body) is folded into [`FetchError`] so callers branch on a single result
//! value instead of catching anything.

pub mod protocol;

use std::time::Duration;

use thiserror::Error;

use crate::config::schema::EndpointConfig;
use protocol::MetricsResponse;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure modes for a metrics fetch.
///
/// All of these are log-only conditions for the widget: the chart simply
/// stays hidden.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The endpoint answered with a non-2xx status.
    #[error("endpoint returned HTTP {0}")]
    Status(u16),
    /// The request never completed (connection refused, DNS, timeout).
    #[error("request failed: {0}")]
    Transport(String),
    /// The body was not valid JSON for the expected envelope.
    #[error("response body is not valid JSON: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous client for the usage metrics endpoint.
///
/// Created per widget instance and used for exactly one fetch per mount.
/// Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct StatsClient {
    base_url: String,
    timeout: Duration,
}

impl StatsClient {
    /// Build a client from the resolved endpoint config.
    pub fn from_config(config: &EndpointConfig) -> Self {
        Self::new(&config.base_url, Duration::from_millis(config.timeout_ms))
    }

    /// Build a client against an explicit base URL.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// The full URL of the `data.json` resource this client fetches.
    pub fn data_url(&self) -> String {
        format!("{}/data.json", self.base_url)
    }

    /// Fetch the metrics payload once.
    ///
    /// `Ok(None)` means the endpoint answered with a JSON `null` body — the
    /// no-data shape. No request body and no custom headers are sent.
    pub fn fetch(&self) -> Result<Option<MetricsResponse>, FetchError> {
        let url = self.data_url();

        match ureq::get(&url).timeout(self.timeout).call() {
            Ok(resp) => resp
                .into_json::<Option<MetricsResponse>>()
                .map_err(|e| FetchError::Decode(e.to_string())),
            Err(ureq::Error::Status(code, _)) => Err(FetchError::Status(code)),
            Err(e) => Err(FetchError::Transport(e.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
