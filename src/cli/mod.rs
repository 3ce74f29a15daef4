//! CLI command implementations for reqmeter diagnostics and rendering.
//!
//! Provides subcommand handlers for:
//! - `reqmeter check` — probe the usage endpoint and summarize the response
//! - `reqmeter render` — fetch usage data and emit a standalone HTML page
//! - `reqmeter init` — write an annotated default config file

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::TimeZone;
use colored::Colorize;

use crate::classify::{Classification, ErrorCategory, OperatorError, classify};
use crate::client::StatsClient;
use crate::config::{self, ReqmeterConfig};
use crate::series::transform;
use crate::widget::UsageWidget;
use crate::widget::scaffold::Scaffold;

/// Output format for the check command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// reqmeter check
// ---------------------------------------------------------------------------

/// Probe the usage endpoint and report what the widget would make of the
/// response.
pub fn run_check(format: OutputFormat) -> Result<()> {
    let config = config::load();
    let report = inspect_endpoint(&config);

    match format {
        OutputFormat::Json => print_check_json(&report)?,
        OutputFormat::Table => print_check_table(&report),
    }

    Ok(())
}

/// Everything `check` learned about the endpoint, in printable form.
struct CheckReport {
    endpoint: String,
    reachable: bool,
    transport: String,
    outcome: &'static str,
    detail: String,
    series: Option<SeriesSummary>,
}

struct SeriesSummary {
    samples: usize,
    start_ms: i64,
    end_ms: i64,
    peak: f64,
    total: f64,
}

fn inspect_endpoint(config: &ReqmeterConfig) -> CheckReport {
    let client = StatsClient::from_config(&config.endpoint);
    let endpoint = client.data_url();

    let response = match client.fetch() {
        Ok(response) => response,
        Err(e) => {
            return CheckReport {
                endpoint,
                reachable: false,
                transport: e.to_string(),
                outcome: "unreachable",
                detail: String::new(),
                series: None,
            };
        }
    };

    let (outcome, detail, series) = match classify(response) {
        Classification::NoData => (
            "no-data",
            "endpoint returned an empty body".to_string(),
            None,
        ),
        Classification::Malformed => (
            "malformed",
            "response carries neither data nor error".to_string(),
            None,
        ),
        Classification::Error(err) => ("backend-error", describe_error(&err), None),
        Classification::Series(bundle) => match transform(&bundle) {
            Ok(series) => {
                let summary = SeriesSummary {
                    samples: series.points.len(),
                    start_ms: series.domain.start_date,
                    end_ms: series.domain.end_date,
                    peak: series.domain.max_value,
                    total: series.total,
                };
                ("ok", format!("{} samples", summary.samples), Some(summary))
            }
            Err(e) => ("not-plottable", e.to_string(), None),
        },
    };

    CheckReport {
        endpoint,
        reachable: true,
        transport: "responding".to_string(),
        outcome,
        detail,
        series,
    }
}

fn print_check_table(report: &CheckReport) {
    println!("{}", "Reqmeter Endpoint Check".bold().cyan());
    println!("{}", "=".repeat(50));

    print_check_item("Endpoint", true, &report.endpoint);
    print_check_item("Reachable", report.reachable, &report.transport);

    if !report.reachable {
        return;
    }

    print_check_item("Payload", report.outcome == "ok", &report.detail);

    if let Some(summary) = &report.series {
        println!();
        println!("{}", "Usage Summary".bold().cyan());
        println!("  {} {}", "Samples:".bold(), summary.samples);
        println!(
            "  {} {} → {}",
            "Window: ".bold(),
            format_day(summary.start_ms),
            format_day(summary.end_ms),
        );
        println!(
            "  {} {}",
            "Peak:   ".bold(),
            format_count(summary.peak as u64)
        );
        println!(
            "  {} {}",
            "Total:  ".bold(),
            format_count(summary.total as u64)
        );
    }
}

fn print_check_json(report: &CheckReport) -> Result<()> {
    let series = report.series.as_ref().map(|s| {
        serde_json::json!({
            "samples": s.samples,
            "window_start": s.start_ms,
            "window_end": s.end_ms,
            "peak": s.peak,
            "total": s.total,
        })
    });

    let value = serde_json::json!({
        "endpoint": report.endpoint,
        "reachable": report.reachable,
        "outcome": report.outcome,
        "detail": report.detail,
        "series": series,
    });

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// One line describing a backend error envelope for the table/JSON output.
///
/// Unlike the widget, `check` reports every category — including the ones
/// the widget stays silent about.
fn describe_error(err: &OperatorError) -> String {
    match (err.category, err.reason.as_deref()) {
        (Some(ErrorCategory::Unknown), _) => err.message.clone(),
        (Some(cat), _) => format!("backend reported {}", cat.as_str()),
        (None, Some(reason)) => format!("unhandled error reason \"{reason}\""),
        (None, None) => err.message.clone(),
    }
}

fn print_check_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// reqmeter render
// ---------------------------------------------------------------------------

/// Fetch usage data and emit the full widget page as HTML.
///
/// Writes to `out` when given, stdout otherwise. The page is self-contained:
/// inline styles, inline SVG, no scripts.
pub fn run_render(out: Option<PathBuf>) -> Result<()> {
    let config = config::load();
    let mut widget = UsageWidget::from_config(&config);
    let mut scaffold = Scaffold::new(config.chart.surface());
    widget.mount(&mut scaffold);

    let html = scaffold.page_html();
    match out {
        Some(path) => {
            fs::write(&path, &html)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "{} Rendered usage page to {}",
                "✓".green().bold(),
                path.display()
            );
        }
        None => print!("{html}"),
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// reqmeter init
// ---------------------------------------------------------------------------

/// Initialize a default config file at `~/.reqmeter/config.toml`.
pub fn run_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Edit the file to point reqmeter at your usage endpoint.".dimmed()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format a count with comma separators for readability.
fn format_count(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Format a millisecond timestamp as a UTC calendar day.
fn format_day(ms: i64) -> String {
    chrono::Utc
        .timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| ms.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
