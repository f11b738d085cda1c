//! Analysis orchestration for SOP documents
//!
//! Architectural Principle: Domain Services - the analyzer drives whole-file workflows
//! - Extracts text, rejects unreadable documents and hands text to the engine
//! - Prefers a well-formed external-model report when a substitute is configured
//! - Batch runs go through rayon or a plain loop and keep input order

pub mod engine;
pub mod profile;
pub mod scoring;

pub use engine::{Assessment, ComplianceEngine};
pub use profile::ProfileClassifier;

use crate::config::ComplianceConfig;
use crate::corpus::ReferenceCorpus;
use crate::domain::batch::BatchReport;
use crate::domain::findings::{ComplianceError, ComplianceResult, Report};
use crate::extract::{FileTextExtractor, TextExtractor};
use crate::patterns::PathFilter;
use crate::substitute::{self, ModelSubstitute};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Analyzer that turns document files into compliance reports
pub struct ComplianceAnalyzer {
    /// Rule engine shared by every analysis
    engine: Arc<ComplianceEngine>,
    /// Regulatory reference text loaded once
    corpus: ReferenceCorpus,
    /// Turns files into text
    extractor: Arc<dyn TextExtractor>,
    /// Decides which files in a directory are documents
    path_filter: PathFilter,
    /// Optional external model tried before the engine
    substitute: Option<Arc<dyn ModelSubstitute>>,
}

/// Options for customizing batch behavior
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Whether to use parallel processing
    pub parallel: bool,
    /// Maximum number of files to analyze
    pub max_files: Option<usize>,
    /// Stop at the first unreadable document instead of skipping it
    pub fail_fast: bool,
    /// Additional patterns to exclude for this run
    pub exclude_patterns: Vec<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            max_files: None,
            fail_fast: false,
            exclude_patterns: Vec::new(),
        }
    }
}

impl ComplianceAnalyzer {
    /// Create an analyzer, loading the reference corpus named in the configuration
    pub fn new(config: ComplianceConfig) -> ComplianceResult<Self> {
        let extractor: Arc<dyn TextExtractor> = Arc::new(FileTextExtractor::new());
        let corpus = ReferenceCorpus::load(&config.references.paths, extractor.as_ref());
        Self::with_parts(config, corpus, extractor)
    }

    /// Create an analyzer from an already loaded corpus and a custom extractor
    pub fn with_parts(
        config: ComplianceConfig,
        corpus: ReferenceCorpus,
        extractor: Arc<dyn TextExtractor>,
    ) -> ComplianceResult<Self> {
        let path_filter = PathFilter::from_config(&config.documents)?;
        let engine = ComplianceEngine::new(config)?;

        tracing::debug!(
            "Analyzer ready with {} rule(s) and {} reference source(s)",
            engine.registry().rule_count(),
            corpus.sources().len()
        );

        Ok(Self {
            engine: Arc::new(engine),
            corpus,
            extractor,
            path_filter,
            substitute: None,
        })
    }

    /// Create an analyzer with default configuration and no reference corpus
    pub fn with_defaults() -> ComplianceResult<Self> {
        Self::with_parts(
            ComplianceConfig::default(),
            ReferenceCorpus::empty(),
            Arc::new(FileTextExtractor::new()),
        )
    }

    /// Try an external model before the rule engine
    pub fn with_substitute(mut self, substitute: Arc<dyn ModelSubstitute>) -> Self {
        self.substitute = Some(substitute);
        self
    }

    pub fn engine(&self) -> &ComplianceEngine {
        &self.engine
    }

    pub fn corpus(&self) -> &ReferenceCorpus {
        &self.corpus
    }

    pub fn config(&self) -> &ComplianceConfig {
        self.engine.config()
    }

    /// Analyze already extracted text
    ///
    /// Blank text is an error; the engine is never asked to score it.
    pub fn analyze_text(&self, text: &str, filename: &str) -> ComplianceResult<Report> {
        if text.trim().is_empty() {
            return Err(ComplianceError::unreadable(filename));
        }

        if let Some(substitute) = &self.substitute {
            if let Some(report) =
                substitute::try_substitute(substitute.as_ref(), text, filename, &self.corpus)
            {
                return Ok(report);
            }
        }

        Ok(self.engine.analyze(text, filename, &self.corpus))
    }

    /// Extract and analyze a single document
    pub fn analyze_file<P: AsRef<Path>>(&self, file_path: P) -> ComplianceResult<Report> {
        let file_path = file_path.as_ref();
        let filename = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.display().to_string());

        let text = self.extractor.extract(file_path);
        self.analyze_text(&text, &filename)
    }

    /// Analyze files and directory trees and return a batch report
    pub fn analyze_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &AnalysisOptions,
    ) -> ComplianceResult<BatchReport> {
        let start_time = Instant::now();

        let mut files = if options.exclude_patterns.is_empty() {
            self.path_filter.collect(paths)
        } else {
            let mut temp_filter = self.path_filter.clone();
            for pattern in &options.exclude_patterns {
                temp_filter.add_pattern(pattern.clone())?;
            }
            temp_filter.collect(paths)
        };

        if let Some(max_files) = options.max_files {
            files.truncate(max_files);
        }

        let outcomes = if options.parallel && files.len() > 1 {
            self.analyze_files_parallel(&files)
        } else {
            self.analyze_files_sequential(&files, options.fail_fast)
        };

        let mut report = BatchReport::new();
        for (path, outcome) in outcomes {
            match outcome {
                Ok(analysis) => report.add_document(path, analysis),
                Err(e) if options.fail_fast => return Err(e),
                Err(e) => {
                    tracing::warn!("Failed to analyze {}: {}", path.display(), e);
                    report.add_skipped(path, e.to_string());
                }
            }
        }

        report.set_files_considered(files.len());
        report.set_execution_time(start_time.elapsed().as_millis() as u64);
        report.set_config_fingerprint(self.config().fingerprint());

        Ok(report)
    }

    /// Analyze files one by one, stopping at the first failure when asked
    fn analyze_files_sequential(
        &self,
        files: &[PathBuf],
        fail_fast: bool,
    ) -> Vec<(PathBuf, ComplianceResult<Report>)> {
        let mut outcomes = Vec::with_capacity(files.len());

        for file_path in files {
            let outcome = self.analyze_file(file_path);
            let failed = outcome.is_err();
            outcomes.push((file_path.clone(), outcome));
            if failed && fail_fast {
                break;
            }
        }

        outcomes
    }

    /// Analyze files in parallel; results come back in input order
    fn analyze_files_parallel(&self, files: &[PathBuf]) -> Vec<(PathBuf, ComplianceResult<Report>)> {
        files
            .par_iter()
            .map(|file_path| (file_path.clone(), self.analyze_file(file_path)))
            .collect()
    }

    /// Analyze one of the configured sample documents
    pub fn analyze_sample(&self, key: &str) -> ComplianceResult<Report> {
        let path = self
            .config()
            .sample_path(key)
            .ok_or_else(|| ComplianceError::validation(format!("Unknown sample key '{key}'")))?;

        if !path.is_file() {
            return Err(ComplianceError::validation(format!(
                "Sample file not found: {}",
                path.display()
            )));
        }

        self.analyze_file(path)
    }
}
