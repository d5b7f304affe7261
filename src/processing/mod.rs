//! Topic pipeline: metadata extraction, index management, and synthesis.

pub mod extractor;
pub mod index;
mod mappers;
pub mod prompts;
mod service;
pub mod synthesis;
pub mod types;

pub use extractor::MetadataExtractor;
pub use index::{IndexManager, index_schema};
pub use service::SecondBrain;
pub use synthesis::SynthesisStage;
pub use types::{
    DocumentRecord, ExtractedField, ExtractionError, IngestOutcome, PipelineError, Resolution,
    SourceDocument, SynthesisError,
};
