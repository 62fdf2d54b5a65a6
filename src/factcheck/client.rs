//! HTTP client for the fact-check backend.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::{FactCheckRequest, FactCheckResult};

/// Errors that can occur while calling the backend.
#[derive(Debug, thiserror::Error)]
pub enum FactCheckError {
    /// The configured base URL could not be turned into an endpoint.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The body was not a JSON fact-check document.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can verify a claim.
///
/// The chat controller only depends on this trait, which keeps the
/// network out of controller and router tests.
#[async_trait]
pub trait FactChecker: Send + Sync + std::fmt::Debug {
    /// Verify a single claim.
    async fn check(&self, claim: &str) -> Result<FactCheckResult, FactCheckError>;
}

/// [`FactChecker`] backed by the HTTP fact-check API.
#[derive(Debug, Clone)]
pub struct HttpFactChecker {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpFactChecker {
    /// Create a client for the backend rooted at `base_url`.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, FactCheckError> {
        let mut endpoint = base_url.clone();
        endpoint.set_fragment(None);
        endpoint
            .path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push("fact-check");
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { http, endpoint })
    }

    /// Full URL of the fact-check endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl FactChecker for HttpFactChecker {
    async fn check(&self, claim: &str) -> Result<FactCheckResult, FactCheckError> {
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::info!(
            name: "factcheck.request",
            request_id = %request_id,
            endpoint = %self.endpoint,
            claim_length = claim.len(),
            "Sending claim to fact-check backend"
        );

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&FactCheckRequest::new(claim))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(
                request_id = %request_id,
                status = %status,
                "Fact-check backend returned error status"
            );
            return Err(FactCheckError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let result: FactCheckResult = serde_json::from_str(&body)?;

        tracing::info!(
            name: "factcheck.response",
            request_id = %request_id,
            accuracy_score = result.accuracy_score,
            confidence = %result.confidence,
            "Fact-check completed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let base = Url::parse("http://localhost:8000/").unwrap();
        let client = HttpFactChecker::new(&base, Duration::from_secs(5)).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:8000/fact-check");

        let base = Url::parse("https://api.example.com/v1").unwrap();
        let client = HttpFactChecker::new(&base, Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://api.example.com/v1/fact-check"
        );
    }

    #[test]
    fn test_endpoint_keeps_query_outside_path() {
        let base = Url::parse("https://api.example.com/v1/?key=abc#top").unwrap();
        let client = HttpFactChecker::new(&base, Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://api.example.com/v1/fact-check?key=abc"
        );

        let base = Url::parse("mailto:someone@example.com").unwrap();
        assert!(matches!(
            HttpFactChecker::new(&base, Duration::from_secs(5)),
            Err(FactCheckError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let base = Url::parse("http://127.0.0.1:9").unwrap();
        let client = HttpFactChecker::new(&base, Duration::from_secs(2)).unwrap();

        let err = client.check("anything").await.unwrap_err();
        assert!(matches!(err, FactCheckError::Transport(_)));
    }
}
