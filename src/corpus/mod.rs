//! Regulatory reference corpus loaded once and shared read-only
//!
//! Architecture: Infrastructure Layer - The corpus is built at startup and injected into analyses
//! - Missing or unreadable reference files degrade silently to less text
//! - The loaded corpus is never mutated; clones share one buffer

use crate::extract::TextExtractor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Concatenated text of the regulatory reference documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCorpus {
    text: Arc<str>,
    sources: Arc<[PathBuf]>,
}

impl ReferenceCorpus {
    /// An empty corpus, as when no reference document is available
    pub fn empty() -> Self {
        Self::from_text(String::new())
    }

    /// Build a corpus directly from text, for synthetic corpora in tests and embedding
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Arc::from(text.into()),
            sources: Arc::from(Vec::new()),
        }
    }

    /// Load and concatenate every reference document that exists
    pub fn load<P: AsRef<Path>>(paths: &[P], extractor: &dyn TextExtractor) -> Self {
        let mut buffer = String::new();
        let mut sources = Vec::new();

        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                tracing::warn!("Missing reference document: {}", path.display());
                continue;
            }

            buffer.push_str("\n\n");
            buffer.push_str(&extractor.extract(path));
            sources.push(path.to_path_buf());
        }

        tracing::debug!(
            "Loaded reference corpus: {} documents, {} characters",
            sources.len(),
            buffer.len()
        );

        Self {
            text: Arc::from(buffer),
            sources: Arc::from(sources),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Reference files that were found on disk
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// First `max_chars` characters, for prompt excerpts
    pub fn excerpt(&self, max_chars: usize) -> &str {
        truncate_chars(&self.text, max_chars)
    }
}

impl Default for ReferenceCorpus {
    fn default() -> Self {
        Self::empty()
    }
}

/// Longest prefix of `s` holding at most `max_chars` characters
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::findings::{ComplianceError, ComplianceResult};
    use crate::extract::FileTextExtractor;
    use std::fs;
    use tempfile::TempDir;

    struct FailingExtractor;

    impl TextExtractor for FailingExtractor {
        fn try_extract(&self, path: &Path) -> ComplianceResult<String> {
            Err(ComplianceError::extraction(path.display().to_string(), "boom"))
        }
    }

    #[test]
    fn test_load_skips_missing_files() {
        let temp_dir = TempDir::new().unwrap();
        let present = temp_dir.path().join("part11.txt");
        fs::write(&present, "21 CFR Part 11 electronic records").unwrap();
        let missing = temp_dir.path().join("absent.pdf");

        let corpus = ReferenceCorpus::load(&[missing, present.clone()], &FileTextExtractor::new());

        assert_eq!(corpus.text(), "\n\n21 CFR Part 11 electronic records");
        assert_eq!(corpus.sources(), &[present]);
    }

    #[test]
    fn test_extraction_failure_contributes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("guidance.pdf");
        fs::write(&path, "whatever").unwrap();

        let corpus = ReferenceCorpus::load(&[path], &FailingExtractor);
        assert!(corpus.is_empty());
        assert_eq!(corpus.sources().len(), 1);
    }

    #[test]
    fn test_empty_paths_give_empty_corpus() {
        let paths: Vec<PathBuf> = Vec::new();
        let corpus = ReferenceCorpus::load(&paths, &FileTextExtractor::new());
        assert_eq!(corpus, ReferenceCorpus::empty());
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let corpus = ReferenceCorpus::from_text("§11.10 controls");
        assert_eq!(corpus.excerpt(3), "§11");
        assert_eq!(corpus.excerpt(100), "§11.10 controls");
    }
}
