//! HTTP client wrapper for the Azure AI Search REST API.

use crate::search::types::{
    DeleteOutcome, IndexDefinition, IndexingResponse, SearchError, SearchHit, SearchQuery,
    SearchResponse, UploadSummary,
};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::{Value, json};

/// Search REST API version.
pub const SEARCH_API_VERSION: &str = "2023-11-01";

/// Lightweight HTTP client for index and document operations.
pub struct SearchService {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
}

impl SearchService {
    /// Construct a new client for the given service endpoint and admin key.
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, SearchError> {
        let client = Client::builder().user_agent("second-brain/0.1").build()?;

        let base_url = normalize_base_url(endpoint).map_err(SearchError::InvalidUrl)?;
        tracing::debug!(
            url = %base_url,
            has_api_key = !api_key.is_empty(),
            "Initialized search HTTP client"
        );

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// Delete an index, reporting whether it existed.
    pub async fn delete_index(&self, index_name: &str) -> Result<DeleteOutcome, SearchError> {
        let response = self
            .request(Method::DELETE, &format!("indexes/{index_name}"))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                tracing::debug!(index = index_name, "Index deleted");
                Ok(DeleteOutcome::Deleted)
            }
            StatusCode::NOT_FOUND => Ok(DeleteOutcome::NotFound),
            status => {
                let body = response.text().await.unwrap_or_default();
                let error = SearchError::UnexpectedStatus { status, body };
                tracing::error!(index = index_name, error = %error, "Index deletion failed");
                Err(error)
            }
        }
    }

    /// Create an index from the supplied schema.
    pub async fn create_index(&self, definition: &IndexDefinition) -> Result<(), SearchError> {
        let response = self
            .request(Method::POST, "indexes")
            .json(definition)
            .send()
            .await?;

        self.ensure_success(response, || {
            tracing::debug!(
                index = %definition.name,
                fields = definition.fields.len(),
                "Index created"
            );
        })
        .await
    }

    /// Upload documents with the `upload` action; the service upserts by key.
    pub async fn upload_documents<T: Serialize>(
        &self,
        index_name: &str,
        documents: &[T],
    ) -> Result<UploadSummary, SearchError> {
        if documents.is_empty() {
            return Ok(UploadSummary::default());
        }

        let actions = documents
            .iter()
            .map(|document| {
                let mut value = serde_json::to_value(document)?;
                if let Value::Object(map) = &mut value {
                    map.insert("@search.action".into(), Value::String("upload".into()));
                }
                Ok(value)
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;

        let response = self
            .request(Method::POST, &format!("indexes/{index_name}/docs/index"))
            .json(&json!({ "value": actions }))
            .send()
            .await?;

        // 207 means some documents failed; the body still lists per-key status.
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = SearchError::UnexpectedStatus { status, body };
            tracing::error!(index = index_name, error = %error, "Document upload failed");
            return Err(error);
        }

        let IndexingResponse { value } = response.json().await?;
        let mut summary = UploadSummary::default();
        for result in value {
            if result.status {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
                tracing::warn!(
                    index = index_name,
                    key = %result.key,
                    status_code = ?result.status_code,
                    error = result.error_message.as_deref().unwrap_or(""),
                    "Document rejected by search service"
                );
            }
        }

        tracing::debug!(
            index = index_name,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Documents uploaded"
        );
        Ok(summary)
    }

    /// Run a full-text query, following result pages until exhausted or `limit` is reached.
    pub async fn search(
        &self,
        index_name: &str,
        query: &SearchQuery,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let mut body = json!({ "search": query.text });
        if let Value::Object(map) = &mut body {
            if !query.search_fields.is_empty() {
                map.insert(
                    "searchFields".into(),
                    Value::String(query.search_fields.join(",")),
                );
            }
            if let Some(limit) = query.limit {
                map.insert("top".into(), Value::from(limit));
            }
        }

        let mut hits = Vec::new();
        loop {
            let response = self
                .request(Method::POST, &format!("indexes/{index_name}/docs/search"))
                .json(&body)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                let error = SearchError::UnexpectedStatus { status, body };
                tracing::error!(index = index_name, error = %error, "Search failed");
                return Err(error);
            }

            let SearchResponse {
                value,
                next_page_parameters,
            } = response.json().await?;
            hits.extend(value.into_iter().map(into_hit));

            if query.limit.is_some_and(|limit| hits.len() >= limit) {
                break;
            }
            match next_page_parameters {
                Some(next) => body = next,
                None => break,
            }
        }

        if let Some(limit) = query.limit {
            hits.truncate(limit);
        }
        tracing::debug!(index = index_name, hits = hits.len(), "Search completed");
        Ok(hits)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format_endpoint(&self.base_url, path);
        let mut req = self
            .client
            .request(method, url)
            .query(&[("api-version", SEARCH_API_VERSION)]);
        if !self.api_key.is_empty() {
            req = req.header("api-key", &self.api_key);
        }
        req
    }

    async fn ensure_success<F>(
        &self,
        response: reqwest::Response,
        on_success: F,
    ) -> Result<(), SearchError>
    where
        F: FnOnce(),
    {
        if response.status().is_success() {
            on_success();
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = SearchError::UnexpectedStatus { status, body };
            tracing::error!(error = %error, "Search service request failed");
            Err(error)
        }
    }
}

fn into_hit(mut document: serde_json::Map<String, Value>) -> SearchHit {
    let score = document
        .remove("@search.score")
        .and_then(|value| value.as_f64())
        .unwrap_or_default();
    document.retain(|key, _| !key.starts_with("@search."));
    SearchHit { score, document }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
