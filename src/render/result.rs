//! Fact-check verdict rendering.
//!
//! [`ResultView::new`] is a pure transform from a [`FactCheckResult`] into
//! display sections; [`ResultView::to_html`] turns those sections into
//! markup. Empty evidence groups render an explicit "No evidence found"
//! placeholder instead of an empty list.

use crate::factcheck::{Confidence, Evidence, FactCheckResult};

use super::{EvidenceView, escape_html, format_percent};

/// Placeholder shown for an evidence group without items.
pub const NO_EVIDENCE: &str = "No evidence found";

/// Severity band of an accuracy score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccuracyTier {
    /// `[80, 100]`
    Excellent,
    /// `[60, 80)`
    Good,
    /// `[40, 60)`
    Fair,
    /// `[0, 40)`
    Poor,
}

impl AccuracyTier {
    /// Classify a score. Bands are inclusive at the low end; out-of-range
    /// scores clamp and NaN is `Poor`.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 60.0 {
            Self::Good
        } else if score >= 40.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    /// CSS class carrying the tier colour.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Excellent => "tier-excellent",
            Self::Good => "tier-good",
            Self::Fair => "tier-fair",
            Self::Poor => "tier-poor",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

/// Icon shown next to the confidence label.
#[must_use]
pub fn confidence_icon(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "🔥",
        Confidence::Medium => "⚡",
        Confidence::Low => "💫",
        Confidence::Unknown => "🤔",
    }
}

/// Evidence classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidenceKind {
    Supporting,
    Contradicting,
    Neutral,
}

impl EvidenceKind {
    /// Display order of the groups.
    pub const ALL: [Self; 3] = [Self::Supporting, Self::Contradicting, Self::Neutral];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Supporting => "Supporting Evidence",
            Self::Contradicting => "Contradicting Evidence",
            Self::Neutral => "Neutral Evidence",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Supporting => "✅",
            Self::Contradicting => "❌",
            Self::Neutral => "🟡",
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Supporting => "evidence-supporting",
            Self::Contradicting => "evidence-contradicting",
            Self::Neutral => "evidence-neutral",
        }
    }

    fn select(self, result: &FactCheckResult) -> &[Evidence] {
        match self {
            Self::Supporting => &result.supporting_evidence,
            Self::Contradicting => &result.contradicting_evidence,
            Self::Neutral => &result.neutral_evidence,
        }
    }
}

/// One evidence section of a verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceGroupView<'a> {
    pub kind: EvidenceKind,
    pub items: Vec<EvidenceView<'a>>,
}

impl EvidenceGroupView<'_> {
    /// Count badge text, e.g. `3 sources`.
    #[must_use]
    pub fn count_label(&self) -> String {
        format!("{} sources", self.items.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn to_html(&self) -> String {
        let body = if self.items.is_empty() {
            format!(
                r#"<div class="evidence-empty"><div class="evidence-empty-icon">🔍</div><div>{NO_EVIDENCE}</div></div>"#
            )
        } else {
            self.items
                .iter()
                .map(EvidenceView::to_html)
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            r#"<section class="evidence-group {class}">
    <header class="evidence-group-header">
        <span class="evidence-group-icon">{icon}</span>
        <h4>{title}</h4>
        <span class="badge">{count}</span>
    </header>
    <div class="evidence-list">
{body}
    </div>
</section>"#,
            class = self.kind.css_class(),
            icon = self.kind.icon(),
            title = self.kind.title(),
            count = self.count_label(),
        )
    }
}

/// Display structure of a fact-check verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView<'a> {
    pub claim: &'a str,
    /// Accuracy with one decimal and `%`.
    pub accuracy: String,
    pub tier: AccuracyTier,
    pub confidence: Confidence,
    pub confidence_icon: &'static str,
    pub summary: &'a str,
    pub analysis: Option<&'a str>,
    pub groups: Vec<EvidenceGroupView<'a>>,
}

impl<'a> ResultView<'a> {
    #[must_use]
    pub fn new(result: &'a FactCheckResult) -> Self {
        let groups = EvidenceKind::ALL
            .into_iter()
            .map(|kind| EvidenceGroupView {
                kind,
                items: kind.select(result).iter().map(EvidenceView::new).collect(),
            })
            .collect();

        Self {
            claim: &result.claim,
            accuracy: format_percent(result.accuracy_score),
            tier: AccuracyTier::from_score(result.accuracy_score),
            confidence: result.confidence,
            confidence_icon: confidence_icon(result.confidence),
            summary: &result.summary,
            analysis: result.analysis(),
            groups,
        }
    }

    /// Number of groups rendering the empty placeholder.
    #[must_use]
    pub fn empty_groups(&self) -> usize {
        self.groups.iter().filter(|g| g.is_empty()).count()
    }

    /// Render all sections.
    #[must_use]
    pub fn to_html(&self) -> String {
        let analysis = self.analysis.map_or_else(String::new, |text| {
            format!(
                r#"<div class="result-card result-analysis">
        <h4>📝 Detailed Analysis</h4>
        <p>{}</p>
    </div>"#,
                escape_html(text)
            )
        });

        let groups = self
            .groups
            .iter()
            .map(EvidenceGroupView::to_html)
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<div class="fact-result">
    <div class="result-card result-claim">
        <span class="result-icon">🔍</span>
        <div><strong>Claim:</strong> {claim}</div>
    </div>
    <div class="result-stats">
        <div class="stat-card accuracy {tier_class}" data-tier="{tier_label}">
            <div class="stat-label">Accuracy Score</div>
            <div class="stat-value">{accuracy}</div>
        </div>
        <div class="stat-card confidence">
            <div class="stat-label">Confidence</div>
            <div class="stat-value">{confidence}</div>
            <div class="stat-icon">{confidence_icon}</div>
        </div>
    </div>
    <div class="result-card result-summary">
        <h4>💡 Summary</h4>
        <p>{summary}</p>
    </div>
    {analysis}
    <div class="evidence-groups">
{groups}
    </div>
</div>"#,
            claim = escape_html(self.claim),
            tier_class = self.tier.css_class(),
            tier_label = self.tier.label(),
            accuracy = escape_html(&self.accuracy),
            confidence = self.confidence.label(),
            confidence_icon = self.confidence_icon,
            summary = escape_html(self.summary),
        )
    }
}
