//! Printable fact-check report.
//!
//! [`render_report`] turns a session's history into a standalone HTML
//! document. Verdicts are reduced to claim, accuracy, confidence and
//! summary; evidence is left out of the report on purpose. The document
//! prints itself and closes its window once loaded, so opening it in a new
//! tab is all the print sink needs to do.
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use factcheck_chat::export::render_report;
//! use factcheck_chat::session::Message;
//!
//! let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
//! let doc = render_report("Chat", &[Message::user("Is the earth flat?")], &now);
//! assert_eq!(doc.title, "Chat - Fact-Check Report");
//! assert!(doc.html.contains("Is the earth flat?"));
//! ```

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::render::{escape_html, format_percent};
use crate::session::{Message, MessageContent, Role};

/// A complete, self-contained report document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    /// Document title (`{session title} - Fact-Check Report`).
    pub title: String,
    /// Full HTML source.
    pub html: String,
}

/// Render the report for a session.
#[must_use]
pub fn render_report<Tz>(
    session_title: &str,
    messages: &[Message],
    generated_at: &DateTime<Tz>,
) -> ReportDocument
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let title = format!("{session_title} - Fact-Check Report");
    let now = generated_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let body = messages
        .iter()
        .map(report_entry)
        .collect::<Vec<_>>()
        .join("\n");

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{doc_title}</title>
    <style>{REPORT_STYLES}</style>
</head>
<body>
    <h2>🧾 Fact-Check Report</h2>
    <div class="header">
        <strong>Title:</strong> {session_title}<br/>
        <strong>Date:</strong> {now}
    </div>
    <hr />
{body}
    <div class="footer">Generated on {now}</div>
    <script>window.onload = () => {{ window.print(); window.close(); }};</script>
</body>
</html>"#,
        doc_title = escape_html(&title),
        session_title = escape_html(session_title),
        now = escape_html(&now),
    );

    ReportDocument { title, html }
}

fn report_entry(message: &Message) -> String {
    match (message.role, &message.content) {
        (Role::User, content) => {
            let text = match content {
                MessageContent::Text(text) => text.as_str(),
                MessageContent::FactCheck(fc) => fc.claim.as_str(),
            };
            format!(
                r#"    <div class="message">
        <div class="message-label">🧍 You:</div>
        <div class="user-message">&ldquo;{}&rdquo;</div>
    </div>"#,
                escape_html(text)
            )
        }
        (Role::Bot, MessageContent::FactCheck(fc)) => format!(
            r#"    <div class="message">
        <div class="message-label">🔍 Fact-Check:</div>
        <div class="bot-message">
            <div class="fact-check"><strong>Claim:</strong> {claim}</div>
            <div class="fact-check"><strong>Accuracy Score:</strong> {accuracy}</div>
            <div class="fact-check"><strong>Confidence:</strong> {confidence}</div>
            <div class="fact-check"><strong>Summary:</strong> {summary}</div>
        </div>
    </div>"#,
            claim = escape_html(&fc.claim),
            accuracy = format_percent(fc.accuracy_score),
            confidence = fc.confidence.label(),
            summary = escape_html(or_na(&fc.summary)),
        ),
        (Role::Bot, MessageContent::Text(text)) => format!(
            r#"    <div class="message">
        <div class="message-label">🔍 Fact-Check:</div>
        <div class="bot-message">{}</div>
    </div>"#,
            escape_html(text)
        ),
    }
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() { "N/A" } else { value }
}

const REPORT_STYLES: &str = r"
body { font-family: 'Segoe UI', Arial, sans-serif; padding: 20px; max-width: 800px; margin: 0 auto; line-height: 1.6; }
h2 { text-align: center; color: #333; margin-bottom: 10px; }
.header { text-align: center; font-size: 0.95em; color: #666; margin-bottom: 30px; }
.message { margin-bottom: 20px; }
.user-message { background: #e3f2fd; padding: 12px 16px; border-radius: 8px; margin-left: 20%; white-space: pre-wrap; }
.bot-message { background: #f5f5f5; padding: 12px 16px; border-radius: 8px; margin-right: 20%; }
.message-label { font-weight: bold; margin-bottom: 8px; }
.fact-check { padding: 4px 0; }
.fact-check strong { color: #1976d2; }
.footer { margin-top: 40px; text-align: center; color: #666; font-size: 0.9em; }
hr { margin: 20px 0; border: none; border-top: 1px solid #ddd; }
@media print { body { margin: 0; padding: 15px; } }
";
