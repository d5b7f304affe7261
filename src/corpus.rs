//! Local corpus reader: topic-tagged `.txt` files from the configured folders.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors raised while reading source files.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// A matching file could not be read as UTF-8 text.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Listing a source folder failed part way through.
    #[error("Failed to list {}: {source}", path.display())]
    List {
        /// Folder being listed.
        path: PathBuf,
        /// Underlying traversal failure.
        #[source]
        source: walkdir::Error,
    },
}

/// Raw text loaded from one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    /// File the text was read from.
    pub path: PathBuf,
    /// Full file contents.
    pub text: String,
}

/// Reads topic-tagged text files from an ordered list of folders.
#[derive(Debug, Clone)]
pub struct CorpusReader {
    source_dirs: Vec<PathBuf>,
}

impl CorpusReader {
    /// Build a reader over the given folders; they are scanned in the order supplied.
    pub fn new(source_dirs: Vec<PathBuf>) -> Self {
        Self { source_dirs }
    }

    /// Folders scanned by this reader.
    pub fn source_dirs(&self) -> &[PathBuf] {
        &self.source_dirs
    }

    /// Load every file whose name ends with `<topic>.txt`.
    ///
    /// Folders are read in configuration order and files within a folder in name order.
    /// Subdirectories are not descended into. Missing folders contribute nothing.
    pub fn read_topic(&self, topic: &str) -> Result<Vec<SourceText>, CorpusError> {
        let suffix = format!("{topic}.txt");
        let mut texts = Vec::new();

        for dir in &self.source_dirs {
            for path in matching_files(dir, &suffix)? {
                let text = std::fs::read_to_string(&path).map_err(|source| CorpusError::Read {
                    path: path.clone(),
                    source,
                })?;
                tracing::info!(file = %path.display(), bytes = text.len(), "Read source file");
                texts.push(SourceText { path, text });
            }
        }

        tracing::debug!(topic, files = texts.len(), "Corpus loaded");
        Ok(texts)
    }
}

fn matching_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, CorpusError> {
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "Source folder missing; skipping");
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| CorpusError::List {
            path: dir.to_path_buf(),
            source,
        })?;
        // Symlinks count when they resolve to a regular file.
        if !entry.path().is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(suffix));
        if matches {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}
