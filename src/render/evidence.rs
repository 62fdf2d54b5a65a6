//! Evidence card.

use crate::factcheck::Evidence;

use super::{escape_html, safe_href};

/// Display fields of one evidence record.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceView<'a> {
    pub title: &'a str,
    pub snippet: &'a str,
    pub source: &'a str,
    /// Relevance with two decimals, e.g. `0.90`.
    pub relevance: String,
    pub sentiment: &'a str,
    /// Link target, present only for `http(s)` URLs.
    pub href: Option<&'a str>,
}

impl<'a> EvidenceView<'a> {
    #[must_use]
    pub fn new(evidence: &'a Evidence) -> Self {
        Self {
            title: &evidence.title,
            snippet: &evidence.snippet,
            source: &evidence.source,
            relevance: format!("{:.2}", evidence.relevance_score),
            sentiment: &evidence.sentiment,
            href: safe_href(&evidence.url),
        }
    }

    /// Render the card.
    #[must_use]
    pub fn to_html(&self) -> String {
        let link = self.href.map_or_else(String::new, |href| {
            format!(
                r#"<a class="evidence-link" href="{}" target="_blank" rel="noopener noreferrer">View Source</a>"#,
                escape_html(href)
            )
        });

        format!(
            r#"<div class="evidence-card">
    <div class="evidence-title">{title}</div>
    <div class="evidence-snippet">{snippet}</div>
    <div class="evidence-meta">
        <span class="evidence-source">📰 {source}</span>
        <span class="evidence-relevance">🎯 {relevance}</span>
        <span class="evidence-sentiment">💭 {sentiment}</span>
        {link}
    </div>
</div>"#,
            title = escape_html(self.title),
            snippet = escape_html(self.snippet),
            source = escape_html(self.source),
            relevance = escape_html(&self.relevance),
            sentiment = escape_html(self.sentiment),
        )
    }
}
