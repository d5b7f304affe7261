//! Sentiment scoring through the Text Analytics REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Language hint sent with every document.
const DOCUMENT_LANGUAGE: &str = "en";

/// Errors surfaced while scoring sentiment.
#[derive(Debug, Error)]
pub enum SentimentClientError {
    /// Endpoint unreachable or the HTTP client could not be built.
    #[error("Sentiment provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Service returned an error response or rejected the document.
    #[error("Sentiment analysis failed: {0}")]
    AnalysisFailed(String),
    /// Service response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by sentiment providers.
#[async_trait]
pub trait SentimentClient: Send + Sync {
    /// Score a single document, returning the provider's label in lowercase.
    async fn analyze(&self, text: &str) -> Result<String, SentimentClientError>;
}

/// Text Analytics v3.1 sentiment client.
pub struct TextAnalyticsClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl TextAnalyticsClient {
    /// Construct a client for the given Language resource.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, SentimentClientError> {
        let http = Client::builder()
            .user_agent("second-brain/sentiment")
            .build()
            .map_err(|error| {
                SentimentClientError::ProviderUnavailable(format!(
                    "failed to build HTTP client: {error}"
                ))
            })?;
        tracing::debug!(url = base_url, "Initialized text analytics client");
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/text/analytics/v3.1/sentiment", self.base_url)
    }
}

#[derive(Serialize)]
struct SentimentRequest<'a> {
    documents: [RequestDocument<'a>; 1],
}

#[derive(Serialize)]
struct RequestDocument<'a> {
    id: &'a str,
    language: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SentimentResponse {
    #[serde(default)]
    documents: Vec<DocumentSentiment>,
    #[serde(default)]
    errors: Vec<DocumentError>,
}

#[derive(Debug, Deserialize)]
struct DocumentSentiment {
    sentiment: String,
}

#[derive(Debug, Deserialize)]
struct DocumentError {
    #[serde(default)]
    id: String,
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[async_trait]
impl SentimentClient for TextAnalyticsClient {
    async fn analyze(&self, text: &str) -> Result<String, SentimentClientError> {
        let payload = SentimentRequest {
            documents: [RequestDocument {
                id: "1",
                language: DOCUMENT_LANGUAGE,
                text,
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SentimentClientError::ProviderUnavailable(format!(
                    "failed to reach Text Analytics at {}: {error}",
                    self.base_url
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SentimentClientError::AnalysisFailed(format!(
                "Text Analytics returned {status}: {body}"
            )));
        }

        let body: SentimentResponse = response.json().await.map_err(|error| {
            SentimentClientError::InvalidResponse(format!(
                "failed to decode sentiment response: {error}"
            ))
        })?;

        if let Some(DocumentError { id, error }) = body.errors.into_iter().next() {
            return Err(SentimentClientError::AnalysisFailed(format!(
                "document {id} rejected ({}): {}",
                error.code, error.message
            )));
        }

        body.documents
            .into_iter()
            .next()
            .map(|document| document.sentiment.trim().to_lowercase())
            .filter(|label| !label.is_empty())
            .ok_or_else(|| {
                SentimentClientError::InvalidResponse("no document sentiment returned".into())
            })
    }
}
