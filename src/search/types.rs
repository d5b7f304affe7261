//! Shared types used by the search client.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors returned while interacting with the search service.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid search service URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// A document could not be encoded as a JSON object.
    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
    /// Search service responded with an unexpected status code.
    #[error("Unexpected search service response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the service.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
}

/// Field data type understood by the search service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldType {
    /// Plain string field.
    #[serde(rename = "Edm.String")]
    String,
}

/// One field of an index schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexField {
    /// Field name as stored in documents.
    pub name: String,
    /// Data type of the field.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether this field is the document key.
    pub key: bool,
    /// Whether the field can appear in `$filter` expressions.
    pub filterable: bool,
    /// Whether the field participates in full-text search.
    pub searchable: bool,
}

impl IndexField {
    /// Unique key field that can be filtered but is not full-text searchable.
    pub fn key(name: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: FieldType::String,
            key: true,
            filterable: true,
            searchable: false,
        }
    }

    /// Full-text searchable string field.
    pub fn searchable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: FieldType::String,
            key: false,
            filterable: false,
            searchable: true,
        }
    }
}

/// Index schema submitted when creating an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexDefinition {
    /// Index name.
    pub name: String,
    /// Ordered field list.
    pub fields: Vec<IndexField>,
}

/// Result of an index deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Index existed and was removed.
    Deleted,
    /// No index with that name existed.
    NotFound,
}

/// Summary describing how the service applied an upload batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadSummary {
    /// Documents accepted by the service.
    pub succeeded: usize,
    /// Documents the service reported as failed.
    pub failed: usize,
}

/// Full-text query restricted to a set of fields.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Free-text search expression.
    pub text: String,
    /// Fields the query is matched against; empty means all searchable fields.
    pub search_fields: Vec<String>,
    /// Optional cap on the number of hits collected across pages.
    pub limit: Option<usize>,
}

/// Scored document returned by a search.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Relevance score reported by the service.
    pub score: f64,
    /// Stored document fields.
    pub document: Map<String, Value>,
}

#[derive(Deserialize)]
pub(crate) struct IndexingResponse {
    #[serde(default)]
    pub(crate) value: Vec<IndexingResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IndexingResult {
    pub(crate) key: String,
    pub(crate) status: bool,
    #[serde(default)]
    pub(crate) error_message: Option<String>,
    #[serde(default)]
    pub(crate) status_code: Option<u16>,
}

#[derive(Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub(crate) value: Vec<Map<String, Value>>,
    #[serde(rename = "@search.nextPageParameters", default)]
    pub(crate) next_page_parameters: Option<Value>,
}
