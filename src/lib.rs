#![deny(missing_docs)]

//! Core library for Second Brain: topic notes in, indexed records and a critical synthesis out.

/// Chat-completion client for the hosted language model.
pub mod chat;
/// Settings-file and environment configuration.
pub mod config;
/// Local corpus reader for topic-tagged text files.
pub mod corpus;
/// Structured logging and tracing setup.
pub mod logging;
/// Extraction metrics helpers.
pub mod metrics;
/// Extraction, index management, and synthesis pipeline.
pub mod processing;
/// Azure AI Search integration.
pub mod search;
/// Sentiment analysis client.
pub mod sentiment;
