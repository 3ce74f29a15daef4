//! Widget controller: the one-shot mount lifecycle.
//!
//! Mounting runs a single round trip: fetch the metrics payload, classify
//! it, then either draw the chart into the scaffold's chart region or
//! reveal the matching message slot. Several outcomes deliberately change
//! nothing visible and only log: fetch failures, malformed or empty
//! payloads, the silent missing-API-key case, and error reasons this build
//! does not recognize.
//!
//! There is no polling and no refresh; a mounted widget is done. Hosts that
//! want newer data mount a fresh widget.

pub mod scaffold;

use log::{debug, info, warn};

use crate::chart::ChartRenderer;
use crate::classify::{Classification, ErrorCategory, OperatorError, classify};
use crate::client::protocol::MetricsResponse;
use crate::client::{FetchError, StatsClient};
use crate::config::schema::ReqmeterConfig;
use crate::series::transform;
use scaffold::Scaffold;

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// The usage chart widget: one client, one renderer, one mount.
#[derive(Debug)]
pub struct UsageWidget {
    client: StatsClient,
    renderer: ChartRenderer,
}

impl UsageWidget {
    pub fn from_config(config: &ReqmeterConfig) -> Self {
        Self::new(StatsClient::from_config(&config.endpoint))
    }

    pub fn new(client: StatsClient) -> Self {
        Self {
            client,
            renderer: ChartRenderer::new(),
        }
    }

    /// Run the full mount lifecycle against a scaffold.
    pub fn mount(&mut self, scaffold: &mut Scaffold) {
        let outcome = self.client.fetch();
        self.apply(outcome, scaffold);
    }

    /// Route a fetch outcome into the scaffold.
    ///
    /// Split out from [`mount`](Self::mount) so the routing rules are
    /// testable without a live endpoint.
    pub fn apply(
        &mut self,
        outcome: Result<Option<MetricsResponse>, FetchError>,
        scaffold: &mut Scaffold,
    ) {
        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                warn!("usage fetch failed: {e}");
                return;
            }
        };

        match classify(response) {
            Classification::NoData => {
                info!("usage endpoint returned no data");
            }
            Classification::Malformed => {
                warn!("usage response matched no known shape");
            }
            Classification::Error(error) => route_error(scaffold, &error),
            Classification::Series(bundle) => match transform(&bundle) {
                Ok(series) => {
                    scaffold.chart.visible = true;
                    self.renderer
                        .draw(&series.points, &series.domain, scaffold.chart.surface);
                    scaffold.chart.markup = self.renderer.svg();
                }
                Err(e) => {
                    warn!("usage series not plottable: {e}");
                }
            },
        }
    }
}

/// Reveal the message slot an operator error calls for, if any.
fn route_error(scaffold: &mut Scaffold, error: &OperatorError) {
    match error.category {
        Some(ErrorCategory::MissingApiKey) => {
            debug!("no API key configured, usage chart stays hidden");
        }
        Some(ErrorCategory::Unknown) => {
            scaffold.messages.show_unknown(&error.message);
        }
        Some(category) => {
            scaffold.messages.show(category);
        }
        None => {
            warn!(
                "unhandled usage error reason {:?}: {}",
                error.reason, error.message
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
