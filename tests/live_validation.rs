use std::path::Path;

use secondbrain::{
    chat::{AzureOpenAiChatClient, ChatClient, ChatMessage},
    config::Config,
    processing::SecondBrain,
    sentiment::{SentimentClient, TextAnalyticsClient},
};

fn live_config() -> Config {
    Config::load(Path::new("appsettings.json"))
        .expect("live tests need appsettings.json or AZURE_* environment variables")
}

#[tokio::test]
#[ignore = "Requires live Azure OpenAI deployment"]
async fn live_chat_completion_roundtrip() {
    let config = live_config();
    let client = AzureOpenAiChatClient::new(&config.openai_endpoint, &config.openai_key)
        .expect("chat client");
    let answer = client
        .complete(&[
            ChatMessage::system("Your name is Jarvis"),
            ChatMessage::user("Reply with the single word: ready"),
        ])
        .await
        .expect("chat completion");
    assert!(!answer.trim().is_empty(), "expected a non-empty answer");
}

#[tokio::test]
#[ignore = "Requires live Text Analytics resource"]
async fn live_sentiment_roundtrip() {
    let config = live_config();
    let client = TextAnalyticsClient::new(
        &config.text_analytics_endpoint,
        &config.text_analytics_key,
    )
    .expect("sentiment client");
    let sentiment = client
        .analyze("Remote work boosts autonomy.")
        .await
        .expect("sentiment");
    assert!(["positive", "negative", "neutral", "mixed"].contains(&sentiment.as_str()));
}

#[tokio::test]
#[ignore = "Requires live Azure AI Search service"]
async fn live_index_recreation_is_repeatable() {
    let config = live_config();
    let brain = SecondBrain::new(&config).expect("service");
    brain.recreate_index().await.expect("first recreation");
    brain.recreate_index().await.expect("second recreation");
}
