//! Embedded preview server for the usage widget.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - The rendered usage page at `/`
//! - A JSON pipeline summary at `/status.json`
//!
//! Launched via `reqmeter serve` (default: `http://127.0.0.1:9748`).
//!
//! Every page load runs the pipeline again: fetch, classify, transform,
//! draw. The chart always reflects the endpoint's current answer.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::Serialize;
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::classify::{Classification, ErrorCategory, classify};
use crate::client::StatsClient;
use crate::config;
use crate::series::transform;
use crate::widget::UsageWidget;
use crate::widget::scaffold::Scaffold;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the preview server on the given address.
///
/// Blocks the current thread. Handles requests sequentially (sufficient for
/// a local single-user preview). Gracefully handles errors per-request
/// without crashing the server.
pub fn serve(addr: &str) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("reqmeter preview running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    // Try to open in default browser (best-effort)
    let url = format!("http://{addr}");
    let _ = open_browser(&url);

    for request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let result = dispatch(&method, &url);

        match result {
            Ok(resp) => {
                let _ = request.respond(resp);
            }
            Err(e) => {
                let body = serde_json::json!({ "error": e.to_string() }).to_string();
                let resp = Response::from_data(body.as_bytes().to_vec())
                    .with_header(content_type_json())
                    .with_status_code(StatusCode(500));
                let _ = request.respond(resp);
            }
        }

        // Brief access log
        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(method: &Method, url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => serve_page(),
        (&Method::Get, "/status.json") => serve_status(),
        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /` — run the widget pipeline and serve the resulting page.
fn serve_page() -> Result<Response<Cursor<Vec<u8>>>> {
    let config = config::load();
    let mut widget = UsageWidget::from_config(&config);
    let mut scaffold = Scaffold::new(config.chart.surface());
    widget.mount(&mut scaffold);

    let html = scaffold.page_html();
    Ok(Response::from_data(html.into_bytes())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200)))
}

/// `GET /status.json` — what the widget would make of the current response.
fn serve_status() -> Result<Response<Cursor<Vec<u8>>>> {
    let status = build_status();
    json_response(&status)
}

/// Status API response.
#[derive(Serialize)]
struct StatusResponse {
    endpoint: String,
    reachable: bool,
    outcome: String,
    detail: String,
    series: Option<SeriesStatus>,
}

#[derive(Serialize)]
struct SeriesStatus {
    samples: usize,
    window_start: i64,
    window_end: i64,
    peak: f64,
    total: f64,
}

fn build_status() -> StatusResponse {
    let config = config::load();
    let client = StatsClient::from_config(&config.endpoint);
    let endpoint = client.data_url();

    let response = match client.fetch() {
        Ok(response) => response,
        Err(e) => {
            return StatusResponse {
                endpoint,
                reachable: false,
                outcome: "unreachable".to_string(),
                detail: e.to_string(),
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
        Classification::Error(err) => {
            let detail = match err.category {
                Some(ErrorCategory::Unknown) | None => err.message,
                Some(cat) => format!("backend reported {}", cat.as_str()),
            };
            ("backend-error", detail, None)
        }
        Classification::Series(bundle) => match transform(&bundle) {
            Ok(series) => {
                let status = SeriesStatus {
                    samples: series.points.len(),
                    window_start: series.domain.start_date,
                    window_end: series.domain.end_date,
                    peak: series.domain.max_value,
                    total: series.total,
                };
                ("ok", format!("{} samples", status.samples), Some(status))
            }
            Err(e) => ("not-plottable", e.to_string(), None),
        },
    };

    StatusResponse {
        endpoint,
        reachable: true,
        outcome: outcome.to_string(),
        detail,
        series,
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// 404 response.
fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = r#"{"error": "not found"}"#;
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404))
}

/// JSON content type header.
fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap()
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap()
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
