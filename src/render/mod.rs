//! HTML rendering for the chat UI.
//!
//! Rendering is split into pure view-model builders and string templates,
//! following the same `format!`-based HTML approach as the page shell.
//!
//! # Structure
//!
//! - [`evidence`]: One evidence card
//! - [`result`]: Fact-check verdict sections (scores, summary, evidence groups)
//! - [`page`]: The chat page (sidebar, message list, input form)

pub mod evidence;
pub mod page;
pub mod result;

pub use evidence::EvidenceView;
pub use page::ChatPage;
pub use result::{AccuracyTier, EvidenceGroupView, EvidenceKind, ResultView, confidence_icon};

/// Escape text for use in HTML content and quoted attribute values.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Format an accuracy score the way it is shown everywhere: one decimal and
/// a percent sign.
#[must_use]
pub fn format_percent(score: f64) -> String {
    format!("{score:.1}%")
}

/// Only `http`/`https` links are rendered as anchors.
#[must_use]
pub fn safe_href(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    (lower.starts_with("http://") || lower.starts_with("https://")).then_some(trimmed)
}
