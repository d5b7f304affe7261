//! End-to-end orchestration: corpus → extraction → index → synthesis.

use crate::{
    chat::{AzureOpenAiChatClient, ChatClient},
    config::Config,
    corpus::CorpusReader,
    metrics::{ExtractionMetrics, MetricsSnapshot},
    processing::{
        extractor::MetadataExtractor,
        index::IndexManager,
        synthesis::SynthesisStage,
        types::{IngestOutcome, PipelineError, Resolution},
    },
    search::SearchService,
    sentiment::{SentimentClient, TextAnalyticsClient},
};
use std::io::Write;

/// Coordinates the whole run for one topic.
///
/// The service owns the chat, sentiment, and search clients plus the corpus reader. Build it
/// once from a [`Config`] near process start; every stage borrows from it.
pub struct SecondBrain {
    corpus: CorpusReader,
    chat: Box<dyn ChatClient>,
    sentiment: Box<dyn SentimentClient>,
    index: IndexManager,
    metrics: ExtractionMetrics,
    author_placeholder: String,
    synthesis_max_sources: Option<usize>,
}

impl SecondBrain {
    /// Build the service with the Azure-backed clients described by `config`.
    pub fn new(config: &Config) -> Result<Self, PipelineError> {
        tracing::info!("Initializing service clients");
        let chat = AzureOpenAiChatClient::new(&config.openai_endpoint, &config.openai_key)?;
        let sentiment =
            TextAnalyticsClient::new(&config.text_analytics_endpoint, &config.text_analytics_key)?;
        let search = SearchService::new(&config.search_endpoint, &config.search_key)?;
        Ok(Self::with_clients(
            config,
            Box::new(chat),
            Box::new(sentiment),
            search,
        ))
    }

    /// Build the service around caller-supplied clients.
    pub fn with_clients(
        config: &Config,
        chat: Box<dyn ChatClient>,
        sentiment: Box<dyn SentimentClient>,
        search: SearchService,
    ) -> Self {
        Self {
            corpus: CorpusReader::new(config.source_dirs.clone()),
            chat,
            sentiment,
            index: IndexManager::new(search, config.search_index.clone()),
            metrics: ExtractionMetrics::new(),
            author_placeholder: config.author_placeholder.clone(),
            synthesis_max_sources: config.synthesis_max_sources,
        }
    }

    /// Delete and recreate the index so the run starts from an empty corpus.
    pub async fn recreate_index(&self) -> Result<(), PipelineError> {
        self.index.create_index().await?;
        Ok(())
    }

    /// Read the topic's files, extract a record from each, and upload the batch.
    pub async fn ingest_topic(&self, topic: &str) -> Result<IngestOutcome, PipelineError> {
        tracing::info!(topic, index = %self.index.index_name(), "Ingesting topic");
        let sources = self.corpus.read_topic(topic)?;

        let extractor = MetadataExtractor::new(
            self.chat.as_ref(),
            self.sentiment.as_ref(),
            &self.author_placeholder,
            &self.metrics,
        );
        let records = extractor.extract_all(topic, &sources).await?;
        let upload = self.index.add_documents(&records).await?;

        let snapshot = self.metrics.snapshot();
        tracing::info!(
            topic,
            files = sources.len(),
            records = records.len(),
            chat_calls = snapshot.chat_calls,
            sentiment_calls = snapshot.sentiment_calls,
            "Topic ingested"
        );

        Ok(IngestOutcome {
            files_read: sources.len(),
            records,
            upload,
        })
    }

    /// Short brief of `topic`.
    pub async fn summarize(&self, topic: &str) -> Result<String, PipelineError> {
        Ok(self.synthesis().summarize(topic).await?)
    }

    /// Critical perspective on `topic` grounded in the indexed sources.
    pub async fn generate_final_resolution(&self, topic: &str) -> Result<Resolution, PipelineError> {
        Ok(self.synthesis().generate_final_resolution(topic).await?)
    }

    /// Print the brief and the final resolution for `topic` to `out`.
    ///
    /// Failures are logged and reported as `false`; the index built by ingestion stays usable.
    pub async fn report_synthesis<W: Write>(&self, topic: &str, out: &mut W) -> bool {
        match self.write_synthesis(topic, out).await {
            Ok(()) => true,
            Err(error) => {
                tracing::error!(topic, error = %error, "Synthesis failed");
                false
            }
        }
    }

    async fn write_synthesis<W: Write>(&self, topic: &str, out: &mut W) -> Result<(), PipelineError> {
        let brief = self.summarize(topic).await?;
        writeln!(out, "-------------------")?;
        writeln!(out, "Brief of topic {topic} with 70 words maximum: {brief}\n")?;

        let resolution = self.generate_final_resolution(topic).await?;
        writeln!(out, "-------------------")?;
        writeln!(out, "Final resolution about {topic}: {}", resolution.text)?;
        Ok(())
    }

    /// Return the current extraction metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn synthesis(&self) -> SynthesisStage<'_> {
        SynthesisStage::new(self.chat.as_ref(), &self.index, self.synthesis_max_sources)
    }
}
