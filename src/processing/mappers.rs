//! Mapping helpers for search hits.

use crate::{
    processing::{
        index::{FIELD_SENTIMENT, FIELD_SUMMARY, FIELD_TITLE, FIELD_TOPIC},
        types::SourceDocument,
    },
    search::SearchHit,
};
use serde_json::{Map, Value};

/// Map a raw search hit into the fields synthesis cares about.
pub(crate) fn map_search_hit(hit: SearchHit) -> SourceDocument {
    let SearchHit {
        score,
        mut document,
    } = hit;

    SourceDocument {
        score,
        topic: take_text(&mut document, FIELD_TOPIC),
        title: take_text(&mut document, FIELD_TITLE),
        summary: take_text(&mut document, FIELD_SUMMARY),
        sentiment: take_text(&mut document, FIELD_SENTIMENT),
    }
}

fn take_text(document: &mut Map<String, Value>, field: &str) -> Option<String> {
    match document.remove(field)? {
        Value::String(text) => Some(text),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Render one source as `Topic:..;Title:..;Content:..;Sentiment:..;`.
pub(crate) fn format_source_line(source: &SourceDocument) -> String {
    format!(
        "Topic:{};Title:{};Content:{};Sentiment:{};",
        source.topic.as_deref().unwrap_or(""),
        source.title.as_deref().unwrap_or(""),
        source.summary.as_deref().unwrap_or(""),
        source.sentiment.as_deref().unwrap_or(""),
    )
}

/// Join formatted sources with newlines.
pub(crate) fn format_sources(sources: &[SourceDocument]) -> String {
    sources
        .iter()
        .map(format_source_line)
        .collect::<Vec<_>>()
        .join("\n")
}
