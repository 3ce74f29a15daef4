//! Configuration schema and defaults.
//!
//! Defines the TOML-serializable configuration structure: `[endpoint]`,
//! `[chart]`, and `[serve]`. Every field has a built-in default, so users
//! only set the values they want to override.

use serde::{Deserialize, Serialize};

use crate::chart::SurfaceSize;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration.
///
/// Maps directly to the `~/.reqmeter/config.toml` and `.reqmeter.toml` file
/// schemas. All sections and fields are optional — missing values fall back
/// to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReqmeterConfig {
    pub endpoint: EndpointConfig,
    pub chart: ChartConfig,
    pub serve: ServeConfig,
}

// ---------------------------------------------------------------------------
// [endpoint]
// ---------------------------------------------------------------------------

/// Where the usage metrics live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL of the usage resource. The widget fetches
    /// `<base_url>/data.json`.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/rest/usage".to_string(),
            timeout_ms: 10_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [chart]
// ---------------------------------------------------------------------------

/// Drawing-surface size granted to the chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Drawing width in pixels (margins come on top of this).
    pub width: u32,
    /// Drawing height in pixels.
    pub height: u32,
}

impl ChartConfig {
    pub fn surface(&self) -> SurfaceSize {
        SurfaceSize::new(f64::from(self.width), f64::from(self.height))
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 700,
            height: 300,
        }
    }
}

// ---------------------------------------------------------------------------
// [serve]
// ---------------------------------------------------------------------------

/// Preview server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Listen address for `reqmeter serve`.
    pub listen: String,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:9748".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl ReqmeterConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Used by `reqmeter init` to create a starting config file with all
    /// settings documented.
    pub fn default_toml() -> String {
        r#"# reqmeter Configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (REQMETER_*)
#   2. Project config (.reqmeter.toml in current directory)
#   3. User global config (~/.reqmeter/config.toml)
#   4. Built-in defaults

[endpoint]
base_url = "http://127.0.0.1:8080/rest/usage"  # Widget fetches <base_url>/data.json
timeout_ms = 10000

[chart]
width = 700    # Drawing surface in pixels; axis margins come on top
height = 300

[serve]
listen = "127.0.0.1:9748"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
