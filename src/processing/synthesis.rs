//! Synthesis: a topic brief and a source-grounded critical answer.

use crate::{
    chat::{ChatClient, ChatMessage},
    processing::{
        index::{FIELD_SENTIMENT, FIELD_SUMMARY, FIELD_TITLE, FIELD_TOPIC, IndexManager},
        mappers::{format_sources, map_search_hit},
        prompts::{SYSTEM_PERSONA, brief_prompt, critical_query, resolution_prompt},
        types::{Resolution, SourceDocument, SynthesisError},
    },
    search::SearchQuery,
};

/// Fields the critical query is matched against.
pub const SYNTHESIS_SEARCH_FIELDS: [&str; 4] =
    [FIELD_TOPIC, FIELD_TITLE, FIELD_SUMMARY, FIELD_SENTIMENT];

/// Reads the index back and asks the model for the final deliverables.
pub struct SynthesisStage<'a> {
    chat: &'a dyn ChatClient,
    index: &'a IndexManager,
    max_sources: Option<usize>,
}

impl<'a> SynthesisStage<'a> {
    /// Wire the stage to its chat provider and index.
    pub fn new(
        chat: &'a dyn ChatClient,
        index: &'a IndexManager,
        max_sources: Option<usize>,
    ) -> Self {
        Self {
            chat,
            index,
            max_sources,
        }
    }

    /// Short brief of `topic`; the 70-word target is left to the model.
    pub async fn summarize(&self, topic: &str) -> Result<String, SynthesisError> {
        let brief = self.ask(brief_prompt(topic)).await?;
        tracing::debug!(topic, words = brief.split_whitespace().count(), "Brief generated");
        Ok(brief)
    }

    /// Search the index for `topic` and ask for a critical perspective grounded in the hits.
    pub async fn generate_final_resolution(
        &self,
        topic: &str,
    ) -> Result<Resolution, SynthesisError> {
        let query = critical_query(topic);
        let sources = self.retrieve_sources(&query).await?;
        tracing::info!(topic, sources = sources.len(), "Retrieved sources for synthesis");

        let prompt = resolution_prompt(topic, &query, &format_sources(&sources));
        let text = self.ask(prompt).await?;

        Ok(Resolution {
            query,
            source_count: sources.len(),
            text,
        })
    }

    async fn retrieve_sources(&self, query: &str) -> Result<Vec<SourceDocument>, SynthesisError> {
        let hits = self
            .index
            .search(&SearchQuery {
                text: query.to_string(),
                search_fields: SYNTHESIS_SEARCH_FIELDS.iter().map(|f| f.to_string()).collect(),
                limit: self.max_sources,
            })
            .await?;
        Ok(hits.into_iter().map(map_search_hit).collect())
    }

    async fn ask(&self, prompt: String) -> Result<String, SynthesisError> {
        let messages = [ChatMessage::system(SYSTEM_PERSONA), ChatMessage::user(prompt)];
        Ok(self.chat.complete(&messages).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatClientError;
    use crate::search::SearchService;
    use async_trait::async_trait;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingChat {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatClient for RecordingChat {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatClientError> {
            let prompt = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            self.prompts.lock().unwrap().push(prompt);
            Ok("Autonomy without structure erodes learning.".into())
        }
    }

    fn index_for(server: &MockServer) -> IndexManager {
        let search = SearchService::new(&server.base_url(), "admin-key").expect("search client");
        IndexManager::new(search, "brain")
    }

    #[tokio::test]
    async fn summarize_sends_brief_prompt() {
        let server = MockServer::start_async().await;
        let index = index_for(&server);
        let chat = RecordingChat::default();

        let brief = SynthesisStage::new(&chat, &index, None)
            .summarize("learning")
            .await
            .expect("brief");

        assert!(!brief.is_empty());
        let prompts = chat.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("brief of the topic learning"));
    }

    #[tokio::test]
    async fn resolution_folds_every_hit_into_prompt() {
        let server = MockServer::start_async().await;
        let search = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/indexes/brain/docs/search")
                    .body_contains("\"searchFields\":\"Topic,Title,Summary,Sentiment\"")
                    .body_contains("critical perspective about the topic learning");
                then.status(200).json_body(json!({
                    "value": [
                        {
                            "@search.score": 1.2,
                            "Id": "a", "Topic": "learning", "Title": "Remote Autonomy",
                            "Summary": "Remote work boosts autonomy.", "Sentiment": "positive",
                            "Author": "gemini", "Link": ""
                        },
                        {
                            "@search.score": 0.4,
                            "Id": "b", "Topic": "learning", "Title": "Burnout",
                            "Summary": null, "Sentiment": "negative"
                        }
                    ]
                }));
            })
            .await;
        let index = index_for(&server);
        let chat = RecordingChat::default();

        let resolution = SynthesisStage::new(&chat, &index, None)
            .generate_final_resolution("learning")
            .await
            .expect("resolution");

        search.assert();
        assert_eq!(resolution.source_count, 2);
        assert_eq!(
            resolution.query,
            "Can you retrieve a critical perspective about the topic learning?"
        );

        let prompts = chat.prompts.lock().unwrap();
        let prompt = &prompts[0];
        assert!(prompt.contains(
            "Sources:\nTopic:learning;Title:Remote Autonomy;Content:Remote work boosts autonomy.;Sentiment:positive;\nTopic:learning;Title:Burnout;Content:;Sentiment:negative;"
        ));
        assert!(prompt.contains("Query: Can you retrieve a critical perspective about the topic learning?"));
    }

    #[tokio::test]
    async fn max_sources_is_sent_as_top() {
        let server = MockServer::start_async().await;
        let search = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/indexes/brain/docs/search")
                    .body_contains("\"top\":3");
                then.status(200).json_body(json!({ "value": [] }));
            })
            .await;
        let index = index_for(&server);
        let chat = RecordingChat::default();

        let resolution = SynthesisStage::new(&chat, &index, Some(3))
            .generate_final_resolution("learning")
            .await
            .expect("resolution");

        search.assert();
        assert_eq!(resolution.source_count, 0);
    }
}
