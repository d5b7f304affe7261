//! Azure AI Search integration.

pub mod client;
pub mod types;

pub use client::{SEARCH_API_VERSION, SearchService};
pub use types::{
    DeleteOutcome, FieldType, IndexDefinition, IndexField, SearchError, SearchHit, SearchQuery,
    UploadSummary,
};
