//! Core data types and error definitions for the processing pipeline.

use crate::{
    chat::ChatClientError, corpus::CorpusError, search::SearchError, search::UploadSummary,
    sentiment::SentimentClientError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Metadata field pulled out of a source text by a chat prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractedField {
    /// Source URL mentioned in the text.
    Link,
    /// Author of the text.
    Author,
    /// Short summary of the text.
    Summary,
    /// Title of the text.
    Title,
}

impl ExtractedField {
    /// Every field, in the order the extractor requests them.
    pub const ALL: [Self; 4] = [Self::Link, Self::Author, Self::Summary, Self::Title];

    /// Human-readable field name used in prompts and logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Link => "Link",
            Self::Author => "Author",
            Self::Summary => "Summary",
            Self::Title => "Title",
        }
    }
}

impl fmt::Display for ExtractedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured record persisted to the search index, one per source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentRecord {
    /// Unique key generated when the record is built.
    pub id: String,
    /// Topic tag the source file was selected by.
    pub topic: String,
    /// Extracted title.
    pub title: String,
    /// Extracted summary.
    pub summary: String,
    /// Extracted author, or the configured placeholder.
    pub author: String,
    /// Extracted link.
    pub link: String,
    /// Sentiment label from the analyzer.
    pub sentiment: String,
}

/// Indexed document read back for synthesis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceDocument {
    /// Relevance score reported by the search service.
    pub score: f64,
    /// Stored topic, if present.
    pub topic: Option<String>,
    /// Stored title, if present.
    pub title: Option<String>,
    /// Stored summary, if present.
    pub summary: Option<String>,
    /// Stored sentiment label, if present.
    pub sentiment: Option<String>,
}

/// Summary of a completed ingestion produced by [`crate::processing::SecondBrain::ingest_topic`].
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// Number of source files read for the topic.
    pub files_read: usize,
    /// Records built from those files.
    pub records: Vec<DocumentRecord>,
    /// How the search service applied the upload.
    pub upload: UploadSummary,
}

/// Final synthesized answer for a topic.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Search text used to retrieve the sources.
    pub query: String,
    /// Number of indexed documents folded into the prompt.
    pub source_count: usize,
    /// Model output.
    pub text: String,
}

/// Errors raised while turning one source text into a record.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// A field prompt failed.
    #[error("Failed to extract {field}: {source}")]
    Chat {
        /// Field being extracted.
        field: ExtractedField,
        /// Underlying chat failure.
        #[source]
        source: ChatClientError,
    },
    /// Sentiment scoring failed.
    #[error("Failed to score sentiment: {0}")]
    Sentiment(#[from] SentimentClientError),
}

/// Errors raised by the synthesis stage.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Brief or final prompt failed.
    #[error("Chat completion failed: {0}")]
    Chat(#[from] ChatClientError),
    /// Retrieving sources from the index failed.
    #[error("Search request failed: {0}")]
    Search(#[from] SearchError),
}

/// Errors emitted by the end-to-end pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reading source files failed.
    #[error("Failed to read corpus: {0}")]
    Corpus(#[from] CorpusError),
    /// Building a record failed.
    #[error("Failed to extract metadata: {0}")]
    Extraction(#[from] ExtractionError),
    /// Index management failed.
    #[error("Search service request failed: {0}")]
    Search(#[from] SearchError),
    /// Synthesis failed.
    #[error("Synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
    /// Chat client could not be constructed.
    #[error("Chat client unavailable: {0}")]
    Chat(#[from] ChatClientError),
    /// Sentiment client could not be constructed.
    #[error("Sentiment client unavailable: {0}")]
    Sentiment(#[from] SentimentClientError),
    /// Writing the report failed.
    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}
