//! Usage chart widget for request-metering backends.
//!
//! reqmeter fetches a request-count time series from a metering endpoint,
//! classifies the response envelope, and renders a static SVG area chart
//! wrapped in a small HTML scaffold. The same pipeline backs the `check`,
//! `render`, and `serve` subcommands.
//!
//! - [`client`] — HTTP fetch of the usage payload
//! - [`classify`] — response envelope triage (series, error, empty)
//! - [`series`] — raw metric columns to plottable points
//! - [`chart`] — scales, tick generation, SVG assembly
//! - [`widget`] — controller wiring the pipeline into the page scaffold
//! - [`config`] — layered TOML + environment configuration
//! - [`cli`] — terminal commands
//! - [`web`] — embedded preview server

pub mod chart;
pub mod classify;
pub mod cli;
pub mod client;
pub mod config;
pub mod series;
pub mod web;
pub mod widget;
