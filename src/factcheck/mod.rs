//! Fact-check backend types and client.
//!
//! The backend answers `POST {base_url}/fact-check` with a JSON document
//! describing how accurate a claim is and which sources support or
//! contradict it. Parsing is deliberately lenient: every field may be
//! missing or `null` and degrades to an empty/zero default, so a partial
//! response still renders.
//!
//! # Example
//!
//! ```rust
//! use factcheck_chat::factcheck::{Confidence, FactCheckResult};
//!
//! let result: FactCheckResult =
//!     serde_json::from_str(r#"{"claim": "Water is wet", "confidence": "HIGH"}"#).unwrap();
//! assert_eq!(result.claim, "Water is wet");
//! assert_eq!(result.confidence, Confidence::High);
//! assert!(result.supporting_evidence.is_empty());
//! ```

mod client;

pub use client::{FactCheckError, FactChecker, HttpFactChecker};

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Number of evidence items requested per category.
pub const MAX_RESULTS: u32 = 5;

/// Request body for the fact-check endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactCheckRequest {
    /// Claim text as the user typed it.
    pub claim: String,
    /// Evidence cap, always [`MAX_RESULTS`].
    pub max_results: u32,
}

impl FactCheckRequest {
    /// Build a request for the given claim.
    #[must_use]
    pub fn new(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            max_results: MAX_RESULTS,
        }
    }
}

/// Confidence the backend has in its verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Confidence {
    /// Parse a label case-insensitively. Anything unrecognised is `Unknown`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unknown,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.map_or(Self::Unknown, |l| Self::from_label(&l)))
    }
}

/// One cited source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Evidence {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub snippet: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub relevance_score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub sentiment: String,
}

/// Verdict returned by the backend for a single claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactCheckResult {
    #[serde(deserialize_with = "null_as_default")]
    pub claim: String,
    /// Accuracy in percent, nominally within `[0, 100]`.
    #[serde(deserialize_with = "null_as_default")]
    pub accuracy_score: f64,
    pub confidence: Confidence,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_analysis: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub supporting_evidence: Vec<Evidence>,
    #[serde(deserialize_with = "null_as_default")]
    pub contradicting_evidence: Vec<Evidence>,
    #[serde(deserialize_with = "null_as_default")]
    pub neutral_evidence: Vec<Evidence>,
}

impl FactCheckResult {
    /// Detailed analysis, if present and not blank.
    #[must_use]
    pub fn analysis(&self) -> Option<&str> {
        self.detailed_analysis
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_response_parses() {
        let json = r#"{
            "claim": "The sky is green",
            "accuracy_score": 5.0,
            "confidence": "high",
            "summary": "False",
            "detailed_analysis": "Rayleigh scattering makes it blue.",
            "supporting_evidence": [],
            "contradicting_evidence": [{
                "title": "Sky color",
                "url": "http://x",
                "snippet": "sky is blue",
                "source": "X",
                "relevance_score": 0.9,
                "sentiment": "negative"
            }],
            "neutral_evidence": []
        }"#;

        let result: FactCheckResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.claim, "The sky is green");
        assert!((result.accuracy_score - 5.0).abs() < f64::EPSILON);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.contradicting_evidence.len(), 1);
        assert_eq!(result.contradicting_evidence[0].source, "X");
        assert_eq!(result.analysis(), Some("Rayleigh scattering makes it blue."));
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let json = r#"{"claim": null, "accuracy_score": null, "neutral_evidence": null,
                       "supporting_evidence": [{"title": "Only a title"}]}"#;

        let result: FactCheckResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.claim, "");
        assert!(result.accuracy_score.abs() < f64::EPSILON);
        assert_eq!(result.confidence, Confidence::Unknown);
        assert_eq!(result.summary, "");
        assert!(result.neutral_evidence.is_empty());
        assert!(result.contradicting_evidence.is_empty());

        let evidence = &result.supporting_evidence[0];
        assert_eq!(evidence.title, "Only a title");
        assert_eq!(evidence.url, "");
        assert!(evidence.relevance_score.abs() < f64::EPSILON);
    }

    #[test]
    fn test_confidence_is_case_insensitive() {
        assert_eq!(Confidence::from_label("HIGH"), Confidence::High);
        assert_eq!(Confidence::from_label(" Medium "), Confidence::Medium);
        assert_eq!(Confidence::from_label("low"), Confidence::Low);
        assert_eq!(Confidence::from_label("certain"), Confidence::Unknown);

        let parsed: Confidence = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, Confidence::Unknown);
    }

    #[test]
    fn test_blank_analysis_is_absent() {
        let result = FactCheckResult {
            detailed_analysis: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(result.analysis(), None);
    }

    #[test]
    fn test_request_uses_fixed_cap() {
        let body = serde_json::to_value(FactCheckRequest::new("Is the earth flat?")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"claim": "Is the earth flat?", "max_results": 5})
        );
    }
}
