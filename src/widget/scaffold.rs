//! Host-page scaffold the widget populates.
//!
//! A stand-in for the page that embeds the widget: one chart region and one
//! message board with a slot per visible error category. Both start hidden;
//! mounting the widget reveals exactly one of them (or neither, for the
//! silent and log-only outcomes). `to_html` renders the fragment a host page
//! would embed, `page_html` wraps it in a standalone page with styling.

use crate::chart::SurfaceSize;
use crate::chart::svg::escape;
use crate::classify::ErrorCategory;

/// Heading shown above the chart.
pub const CHART_HEADING: &str = "Server Request Data";

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// The region the chart draws into.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRegion {
    pub visible: bool,
    /// Drawing surface granted to the renderer.
    pub surface: SurfaceSize,
    /// Rendered SVG, set once the widget has drawn.
    pub markup: Option<String>,
}

/// One message slot: a visibility flag and its text.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageSlot {
    pub visible: bool,
    pub text: String,
}

impl MessageSlot {
    fn hidden(text: &str) -> Self {
        Self {
            visible: false,
            text: text.to_string(),
        }
    }
}

/// The message board: one slot per visible error category.
///
/// The board has its own visibility flag on top of the per-slot flags,
/// mirroring how the host page nests the slots in one container.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageBoard {
    pub visible: bool,
    server_expired: MessageSlot,
    unauthorized: MessageSlot,
    missing_credentials: MessageSlot,
    invalid_api_key: MessageSlot,
    unknown: MessageSlot,
}

impl MessageBoard {
    fn new() -> Self {
        Self {
            visible: false,
            server_expired: MessageSlot::hidden(
                "The metering plan for this server has expired. Renew the plan to resume usage reporting.",
            ),
            unauthorized: MessageSlot::hidden(
                "You are not authorized to view usage data for this server's API key.",
            ),
            missing_credentials: MessageSlot::hidden(
                "The metering backend has no stored credentials for this server. Update them in the server settings.",
            ),
            invalid_api_key: MessageSlot::hidden(
                "The configured API key was rejected by the metering backend.",
            ),
            unknown: MessageSlot::hidden("Usage data is currently unavailable."),
        }
    }

    /// Reveal the board and the slot for a category. Does nothing for the
    /// silent category, which has no slot.
    pub fn show(&mut self, category: ErrorCategory) {
        if let Some(slot) = self.slot_mut(category) {
            slot.visible = true;
            self.visible = true;
        }
    }

    /// Reveal the generic slot with the given text replacing its default.
    pub fn show_unknown(&mut self, text: &str) {
        self.unknown.text = text.to_string();
        self.unknown.visible = true;
        self.visible = true;
    }

    /// The slot for a category, if the category has one.
    pub fn slot(&self, category: ErrorCategory) -> Option<&MessageSlot> {
        match category {
            ErrorCategory::ServerExpired => Some(&self.server_expired),
            ErrorCategory::Unauthorized => Some(&self.unauthorized),
            ErrorCategory::MissingCredentials => Some(&self.missing_credentials),
            ErrorCategory::InvalidApiKey => Some(&self.invalid_api_key),
            ErrorCategory::Unknown => Some(&self.unknown),
            ErrorCategory::MissingApiKey => None,
        }
    }

    fn slot_mut(&mut self, category: ErrorCategory) -> Option<&mut MessageSlot> {
        match category {
            ErrorCategory::ServerExpired => Some(&mut self.server_expired),
            ErrorCategory::Unauthorized => Some(&mut self.unauthorized),
            ErrorCategory::MissingCredentials => Some(&mut self.missing_credentials),
            ErrorCategory::InvalidApiKey => Some(&mut self.invalid_api_key),
            ErrorCategory::Unknown => Some(&mut self.unknown),
            ErrorCategory::MissingApiKey => None,
        }
    }

    /// All slots with their categories, in display order.
    pub fn entries(&self) -> [(ErrorCategory, &MessageSlot); 5] {
        [
            (ErrorCategory::ServerExpired, &self.server_expired),
            (ErrorCategory::Unauthorized, &self.unauthorized),
            (ErrorCategory::MissingCredentials, &self.missing_credentials),
            (ErrorCategory::InvalidApiKey, &self.invalid_api_key),
            (ErrorCategory::Unknown, &self.unknown),
        ]
    }
}

// ---------------------------------------------------------------------------
// Scaffold
// ---------------------------------------------------------------------------

/// The container structure the widget mounts into.
#[derive(Debug, Clone, PartialEq)]
pub struct Scaffold {
    pub chart: ChartRegion,
    pub messages: MessageBoard,
}

impl Scaffold {
    /// A fresh scaffold with everything hidden and the given chart surface.
    pub fn new(surface: SurfaceSize) -> Self {
        Self {
            chart: ChartRegion {
                visible: false,
                surface,
                markup: None,
            },
            messages: MessageBoard::new(),
        }
    }

    /// Render the widget fragment: chart region plus message board.
    ///
    /// Hidden regions and slots are emitted with `display:none` rather than
    /// omitted, matching how a host page keeps them around for toggling.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<div class=\"usage-widget\">\n");

        out.push_str(&format!(
            "<div class=\"usage-chart\"{}>\n<h3>{}</h3>\n",
            hidden_attr(self.chart.visible),
            CHART_HEADING
        ));
        if let Some(markup) = &self.chart.markup {
            out.push_str(markup);
        }
        out.push_str("</div>\n");

        out.push_str(&format!(
            "<div class=\"usage-messages\"{}>\n",
            hidden_attr(self.messages.visible)
        ));
        for (category, slot) in self.messages.entries() {
            out.push_str(&format!(
                "<div class=\"usage-message {}\"{}>{}</div>\n",
                category.as_str(),
                hidden_attr(slot.visible),
                escape(&slot.text)
            ));
        }
        out.push_str("</div>\n</div>\n");
        out
    }

    /// Render a complete standalone page embedding the fragment.
    pub fn page_html(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>Request Usage</title>\n<style>\n{PAGE_STYLE}</style>\n</head>\n<body>\n\
<div class=\"page\">\n{}</div>\n</body>\n</html>\n",
            self.to_html()
        )
    }
}

fn hidden_attr(visible: bool) -> &'static str {
    if visible { "" } else { " style=\"display:none\"" }
}

/// Styling for the standalone preview page, chart classes included.
const PAGE_STYLE: &str = r#":root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --red: #f85149;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  font-size: 14px;
}

.page { max-width: 900px; margin: 0 auto; padding: 24px; }

.usage-chart {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: 8px;
  padding: 16px;
}
.usage-chart h3 { font-size: 16px; font-weight: 600; margin-bottom: 12px; }

.usage-chart .area { fill: var(--accent); fill-opacity: 0.25; }
.usage-chart .line { fill: none; stroke: var(--accent); stroke-width: 1.5; }
.usage-chart .axis line, .usage-chart .axis .domain {
  stroke: var(--border);
  fill: none;
}
.usage-chart .tick text { fill: var(--text-muted); font-size: 11px; }
.usage-chart .caption { fill: var(--text-muted); font-size: 12px; }

.usage-messages { margin-top: 8px; }
.usage-message {
  border: 1px solid var(--red);
  border-radius: 8px;
  color: var(--red);
  padding: 12px 16px;
  margin-bottom: 8px;
}
"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
