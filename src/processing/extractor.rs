//! Metadata extraction: four field prompts plus one sentiment call per source text.

use crate::{
    chat::{ChatClient, ChatMessage},
    corpus::SourceText,
    metrics::ExtractionMetrics,
    processing::{
        prompts::{SYSTEM_PERSONA, extraction_prompt},
        types::{DocumentRecord, ExtractedField, ExtractionError},
    },
    sentiment::SentimentClient,
};
use uuid::Uuid;

/// Builds [`DocumentRecord`]s from raw text using the chat and sentiment providers.
pub struct MetadataExtractor<'a> {
    chat: &'a dyn ChatClient,
    sentiment: &'a dyn SentimentClient,
    author_placeholder: &'a str,
    metrics: &'a ExtractionMetrics,
}

impl<'a> MetadataExtractor<'a> {
    /// Wire an extractor to its providers.
    pub fn new(
        chat: &'a dyn ChatClient,
        sentiment: &'a dyn SentimentClient,
        author_placeholder: &'a str,
        metrics: &'a ExtractionMetrics,
    ) -> Self {
        Self {
            chat,
            sentiment,
            author_placeholder,
            metrics,
        }
    }

    /// Extract one record per source, in order.
    pub async fn extract_all(
        &self,
        topic: &str,
        sources: &[SourceText],
    ) -> Result<Vec<DocumentRecord>, ExtractionError> {
        let mut records = Vec::with_capacity(sources.len());
        for source in sources {
            tracing::info!(file = %source.path.display(), topic, "Extracting metadata");
            records.push(self.extract(topic, &source.text).await?);
        }
        Ok(records)
    }

    /// Issue the five extraction calls for `text` and assemble a record.
    ///
    /// The calls are independent and run concurrently.
    pub async fn extract(&self, topic: &str, text: &str) -> Result<DocumentRecord, ExtractionError> {
        let (link, author, summary, title, sentiment) = tokio::try_join!(
            self.extract_field(ExtractedField::Link, text),
            self.extract_field(ExtractedField::Author, text),
            self.extract_field(ExtractedField::Summary, text),
            self.extract_field(ExtractedField::Title, text),
            self.score_sentiment(text)
        )?;

        let author = if author.is_empty() {
            self.author_placeholder.to_string()
        } else {
            author
        };

        let record = DocumentRecord {
            id: Uuid::new_v4().to_string(),
            topic: topic.to_string(),
            title,
            summary,
            author,
            link,
            sentiment,
        };
        self.metrics.record_document();
        tracing::debug!(id = %record.id, title = %record.title, sentiment = %record.sentiment, "Record extracted");
        Ok(record)
    }

    async fn extract_field(
        &self,
        field: ExtractedField,
        text: &str,
    ) -> Result<String, ExtractionError> {
        let messages = [
            ChatMessage::system(SYSTEM_PERSONA),
            ChatMessage::user(extraction_prompt(field, text)),
        ];
        self.metrics.record_chat_call();
        let answer = self
            .chat
            .complete(&messages)
            .await
            .map_err(|source| ExtractionError::Chat { field, source })?;
        Ok(answer.trim().to_string())
    }

    async fn score_sentiment(&self, text: &str) -> Result<String, ExtractionError> {
        self.metrics.record_sentiment_call();
        Ok(self.sentiment.analyze(text).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatClientError;
    use crate::sentiment::SentimentClientError;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Answers each field prompt from a fixed table and records every prompt seen.
    struct ScriptedChat {
        answers: Vec<(ExtractedField, &'static str)>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedChat {
        fn new(answers: Vec<(ExtractedField, &'static str)>) -> Self {
            Self {
                answers,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatClient for ScriptedChat {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatClientError> {
            let prompt = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            self.prompts.lock().unwrap().push(prompt.clone());
            let answer = self
                .answers
                .iter()
                .find(|(field, _)| prompt.starts_with(&format!("Retrieve the {}", field.label())))
                .map(|(_, answer)| answer.to_string())
                .unwrap_or_default();
            Ok(answer)
        }
    }

    struct FixedSentiment(&'static str);

    #[async_trait]
    impl SentimentClient for FixedSentiment {
        async fn analyze(&self, _text: &str) -> Result<String, SentimentClientError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingChat;

    #[async_trait]
    impl ChatClient for FailingChat {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, ChatClientError> {
            Err(ChatClientError::CompletionFailed("quota exceeded".into()))
        }
    }

    fn source(name: &str, text: &str) -> SourceText {
        SourceText {
            path: PathBuf::from(name),
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn builds_record_from_field_answers() {
        let chat = ScriptedChat::new(vec![
            (ExtractedField::Link, " https://example.com/remote \n"),
            (ExtractedField::Author, "Ada"),
            (ExtractedField::Summary, "Remote work increases autonomy."),
            (ExtractedField::Title, "Remote Autonomy"),
        ]);
        let sentiment = FixedSentiment("positive");
        let metrics = ExtractionMetrics::new();
        let extractor = MetadataExtractor::new(&chat, &sentiment, "gemini", &metrics);

        let record = extractor
            .extract("learning", "Remote work boosts autonomy.")
            .await
            .expect("record");

        assert!(!record.id.is_empty());
        assert_eq!(record.topic, "learning");
        assert_eq!(record.link, "https://example.com/remote");
        assert_eq!(record.author, "Ada");
        assert_eq!(record.summary, "Remote work increases autonomy.");
        assert_eq!(record.title, "Remote Autonomy");
        assert_eq!(record.sentiment, "positive");

        let prompts = chat.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 4);
        assert!(prompts.iter().all(|p| p.ends_with("Remote work boosts autonomy.")));
    }

    #[tokio::test]
    async fn empty_author_falls_back_to_placeholder() {
        let chat = ScriptedChat::new(vec![(ExtractedField::Author, "   ")]);
        let sentiment = FixedSentiment("neutral");
        let metrics = ExtractionMetrics::new();
        let extractor = MetadataExtractor::new(&chat, &sentiment, "gemini", &metrics);

        let record = extractor.extract("learning", "text").await.expect("record");

        assert_eq!(record.author, "gemini");
        assert_eq!(record.link, "");
        assert_eq!(record.title, "");
    }

    #[tokio::test]
    async fn unrecognized_sentiment_label_is_stored_as_given() {
        let chat = ScriptedChat::new(Vec::new());
        let sentiment = FixedSentiment("ecstatic");
        let metrics = ExtractionMetrics::new();
        let extractor = MetadataExtractor::new(&chat, &sentiment, "gemini", &metrics);

        let record = extractor.extract("learning", "text").await.expect("record");

        assert_eq!(record.sentiment, "ecstatic");
    }

    #[tokio::test]
    async fn two_sources_issue_ten_calls_and_unique_ids() {
        let chat = ScriptedChat::new(vec![(ExtractedField::Title, "T")]);
        let sentiment = FixedSentiment("mixed");
        let metrics = ExtractionMetrics::new();
        let extractor = MetadataExtractor::new(&chat, &sentiment, "gemini", &metrics);

        let records = extractor
            .extract_all(
                "learning",
                &[source("a_learning.txt", "one"), source("b_learning.txt", "two")],
            )
            .await
            .expect("records");

        assert_eq!(records.len(), 2);
        let ids: HashSet<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 2);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.extraction_calls(), 10);
        assert_eq!(snapshot.chat_calls, 8);
        assert_eq!(snapshot.sentiment_calls, 2);
        assert_eq!(snapshot.documents_extracted, 2);
    }

    #[tokio::test]
    async fn no_sources_issue_no_calls() {
        let chat = ScriptedChat::new(Vec::new());
        let sentiment = FixedSentiment("neutral");
        let metrics = ExtractionMetrics::new();
        let extractor = MetadataExtractor::new(&chat, &sentiment, "gemini", &metrics);

        let records = extractor.extract_all("learning", &[]).await.expect("records");

        assert!(records.is_empty());
        assert_eq!(metrics.snapshot().extraction_calls(), 0);
    }

    #[tokio::test]
    async fn chat_failure_names_the_field() {
        let sentiment = FixedSentiment("neutral");
        let metrics = ExtractionMetrics::new();
        let extractor = MetadataExtractor::new(&FailingChat, &sentiment, "gemini", &metrics);

        let error = extractor.extract("learning", "text").await.expect_err("failure");
        assert!(matches!(error, ExtractionError::Chat { .. }));
        assert!(error.to_string().contains("quota exceeded"));
    }
}
