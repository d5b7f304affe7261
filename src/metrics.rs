use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing extraction activity.
#[derive(Default)]
pub struct ExtractionMetrics {
    documents_extracted: AtomicU64,
    chat_calls: AtomicU64,
    sentiment_calls: AtomicU64,
}

impl ExtractionMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one outbound chat-completion request.
    pub fn record_chat_call(&self) {
        self.chat_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one outbound sentiment-analysis request.
    pub fn record_sentiment_call(&self) {
        self.sentiment_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a document turned into a record.
    pub fn record_document(&self) {
        self.documents_extracted.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_extracted: self.documents_extracted.load(Ordering::Relaxed),
            chat_calls: self.chat_calls.load(Ordering::Relaxed),
            sentiment_calls: self.sentiment_calls.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of extraction counters used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of documents turned into records.
    pub documents_extracted: u64,
    /// Chat-completion requests issued.
    pub chat_calls: u64,
    /// Sentiment-analysis requests issued.
    pub sentiment_calls: u64,
}

impl MetricsSnapshot {
    /// Total outbound extraction calls of either kind.
    pub fn extraction_calls(&self) -> u64 {
        self.chat_calls + self.sentiment_calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_documents_and_calls() {
        let metrics = ExtractionMetrics::new();
        for _ in 0..4 {
            metrics.record_chat_call();
        }
        metrics.record_sentiment_call();
        metrics.record_document();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_extracted, 1);
        assert_eq!(snapshot.chat_calls, 4);
        assert_eq!(snapshot.sentiment_calls, 1);
        assert_eq!(snapshot.extraction_calls(), 5);
    }

    #[test]
    fn snapshot_starts_empty() {
        let metrics = ExtractionMetrics::new();
        assert_eq!(metrics.snapshot().extraction_calls(), 0);
        assert_eq!(metrics.snapshot().documents_extracted, 0);
    }
}
