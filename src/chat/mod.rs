//! Chat-completion client for the hosted language model.
//!
//! Requests go straight to the Azure OpenAI REST surface. Only the first returned choice is
//! used; a response with no choices or null content reads as an empty answer so callers can
//! treat "model had nothing to say" uniformly.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Model deployment used for every chat request.
pub const CHAT_DEPLOYMENT: &str = "gpt-35-turbo";
/// Azure OpenAI REST API version.
pub const OPENAI_API_VERSION: &str = "2024-02-01";

/// Errors surfaced while requesting a chat completion.
#[derive(Debug, Error)]
pub enum ChatClientError {
    /// Endpoint unreachable or the HTTP client could not be built.
    #[error("Chat provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Chat completion failed: {0}")]
    CompletionFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Persona and standing instructions.
    System,
    /// The request itself.
    User,
}

/// One message in a chat exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Message author.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Interface implemented by chat-completion providers.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send the exchange and return the text of the first choice, or an empty string.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatClientError>;
}

/// Azure OpenAI chat-completions client.
pub struct AzureOpenAiChatClient {
    http: Client,
    base_url: String,
    api_key: String,
    deployment: String,
}

impl AzureOpenAiChatClient {
    /// Construct a client for the given resource using the fixed deployment.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ChatClientError> {
        let http = Client::builder()
            .user_agent("second-brain/chat")
            .build()
            .map_err(|error| {
                ChatClientError::ProviderUnavailable(format!("failed to build HTTP client: {error}"))
            })?;
        tracing::debug!(url = base_url, deployment = CHAT_DEPLOYMENT, "Initialized chat client");
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            deployment: CHAT_DEPLOYMENT.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions",
            self.base_url, self.deployment
        )
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<AssistantMessage>,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl ChatClient for AzureOpenAiChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatClientError> {
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("api-version", OPENAI_API_VERSION)])
            .header("api-key", &self.api_key)
            .json(&ChatRequest { messages })
            .send()
            .await
            .map_err(|error| {
                ChatClientError::ProviderUnavailable(format!(
                    "failed to reach Azure OpenAI at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ChatClientError::ProviderUnavailable(format!(
                "deployment {} not found at {}",
                self.deployment, self.base_url
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatClientError::CompletionFailed(format!(
                "Azure OpenAI returned {status}: {body}"
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|error| {
            ChatClientError::InvalidResponse(format!("failed to decode chat response: {error}"))
        })?;

        let answer = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();
        tracing::debug!(chars = answer.len(), "Chat completion received");
        Ok(answer)
    }
}
