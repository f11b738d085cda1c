//! Document discovery using extension allow-lists and glob exclusions
//!
//! Architectural Principle: Service Layer - PathFilter decides which files are SOP candidates
//! - Only extensions the text extractor understands are accepted
//! - Exclude patterns follow .gitignore order semantics, `!` re-includes
//! - Directory trees are walked with walkdir, results sorted for stable batch order

use crate::config::DocumentConfig;
use crate::domain::findings::{ComplianceError, ComplianceResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Decides which files are analysed as SOP documents
#[derive(Debug, Clone)]
pub struct PathFilter {
    /// Lower-cased extensions without the dot
    extensions: Vec<String>,
    /// Include/exclude patterns, applied in order
    patterns: Vec<FilterPattern>,
}

/// A single path filter pattern
#[derive(Debug, Clone)]
struct FilterPattern {
    /// The glob pattern
    pattern: glob::Pattern,
    /// Whether this is an include pattern (starts with !)
    is_include: bool,
    /// Original pattern string, used to pick filename vs full-path matching
    original: String,
}

impl PathFilter {
    /// Create a new path filter from extensions and exclude patterns
    pub fn new(extensions: Vec<String>, patterns: Vec<String>) -> ComplianceResult<Self> {
        let mut filter = Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            patterns: Vec::new(),
        };

        for pattern in patterns {
            filter.add_pattern(pattern)?;
        }

        Ok(filter)
    }

    /// Build the filter described by the document configuration
    pub fn from_config(config: &DocumentConfig) -> ComplianceResult<Self> {
        Self::new(config.extensions.clone(), config.exclude.clone())
    }

    /// Whether a file has an accepted extension and is not excluded
    pub fn should_analyze<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = path.as_ref();
        self.is_included(path, path)
    }

    /// Extension check on `path`, slash patterns matched against `relative`
    fn is_included(&self, path: &Path, relative: &Path) -> bool {
        let extension_ok = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .is_some_and(|e| self.extensions.iter().any(|allowed| *allowed == e));
        if !extension_ok {
            return false;
        }

        // Apply patterns in order (like .gitignore)
        let mut should_include = true;
        for pattern in &self.patterns {
            if self.pattern_matches_path(pattern, relative) {
                should_include = pattern.is_include;
            }
        }

        should_include
    }

    /// Get all documents that should be analysed in a directory tree, sorted by path
    ///
    /// Patterns containing a slash are matched against the path relative to `root`.
    pub fn find_files<P: AsRef<Path>>(&self, root: P) -> Vec<PathBuf> {
        let root = root.as_ref();
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!("Skipping unreadable directory entry: {}", err);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                let relative = path.strip_prefix(root).unwrap_or(path);
                self.is_included(path, relative)
            })
            .collect();

        files.sort();
        files
    }

    /// Expand files and directories into the documents to analyse
    pub fn collect<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in paths {
            let path = path.as_ref();
            if path.is_dir() {
                files.extend(self.find_files(path));
            } else if self.should_analyze(path) {
                files.push(path.to_path_buf());
            } else {
                tracing::debug!("Ignoring {}: not an accepted document", path.display());
            }
        }

        files
    }

    /// Add a pattern to the filter
    pub fn add_pattern(&mut self, pattern: String) -> ComplianceResult<()> {
        let (is_include, pattern_str) = if let Some(stripped) = pattern.strip_prefix('!') {
            (true, stripped.to_string())
        } else {
            (false, pattern)
        };

        let glob_pattern = glob::Pattern::new(&pattern_str).map_err(|e| {
            ComplianceError::config(format!("Invalid pattern '{pattern_str}': {e}"))
        })?;

        self.patterns.push(FilterPattern {
            pattern: glob_pattern,
            is_include,
            original: pattern_str,
        });

        Ok(())
    }

    /// Check if a pattern matches a path using .gitignore-style rules
    fn pattern_matches_path(&self, pattern: &FilterPattern, path: &Path) -> bool {
        if pattern.original.contains('/') {
            // Pattern contains slash - match full path
            pattern.pattern.matches(&path.to_string_lossy())
        } else {
            // No slash - match filename only
            path.file_name()
                .map(|name| pattern.pattern.matches(&name.to_string_lossy()))
                .unwrap_or(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn filter(patterns: &[&str]) -> PathFilter {
        PathFilter::new(
            vec!["pdf".to_string(), ".DOCX".to_string(), "txt".to_string()],
            patterns.iter().map(|p| p.to_string()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_extension_allow_list() {
        let filter = filter(&[]);
        assert!(filter.should_analyze("sops/cleaning.pdf"));
        assert!(filter.should_analyze("sops/Cleaning.DocX"));
        assert!(filter.should_analyze("notes.txt"));
        assert!(!filter.should_analyze("image.png"));
        assert!(!filter.should_analyze("README"));
    }

    #[test]
    fn test_exclude_and_reinclude() {
        let filter = filter(&["archive/**", "!archive/current/**", "~$*"]);
        assert!(!filter.should_analyze("archive/2010/sop.docx"));
        assert!(filter.should_analyze("archive/current/sop.docx"));
        assert!(!filter.should_analyze("drafts/~$sop.docx"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let result = PathFilter::new(vec!["pdf".to_string()], vec!["[invalid".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn test_find_files_is_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("b/second.txt"), "Purpose").unwrap();
        fs::write(root.join("a.txt"), "Scope").unwrap();
        fs::write(root.join("logo.png"), [0u8, 1, 2]).unwrap();

        let files = filter(&[]).find_files(root);
        assert_eq!(files, vec![root.join("a.txt"), root.join("b/second.txt")]);
    }

    #[test]
    fn test_find_files_matches_slash_patterns_below_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("archive/current")).unwrap();
        fs::write(root.join("archive/old.txt"), "x").unwrap();
        fs::write(root.join("archive/current/live.txt"), "x").unwrap();
        fs::write(root.join("keep.txt"), "x").unwrap();

        let files = filter(&["archive/**", "!archive/current/**"]).find_files(root);
        assert_eq!(
            files,
            vec![root.join("archive/current/live.txt"), root.join("keep.txt")]
        );
    }

    #[test]
    fn test_default_excludes_apply_at_walk_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join(".git/notes.txt"), "x").unwrap();
        fs::write(root.join("~$lock.docx"), "x").unwrap();
        fs::write(root.join("sop.txt"), "x").unwrap();

        let files = filter(&["**/.git/**", "**/~$*"]).find_files(root);
        assert_eq!(files, vec![root.join("sop.txt")]);
    }

    #[test]
    fn test_collect_mixes_files_and_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("dir")).unwrap();
        fs::write(root.join("dir/inner.txt"), "x").unwrap();
        fs::write(root.join("single.txt"), "x").unwrap();
        fs::write(root.join("skip.csv"), "x").unwrap();

        let files = filter(&[]).collect(&[
            root.join("single.txt"),
            root.join("dir"),
            root.join("skip.csv"),
        ]);
        assert_eq!(files, vec![root.join("single.txt"), root.join("dir/inner.txt")]);
    }
}
