//! SOP Guardian - Rule-based compliance scoring for Standard Operating Procedures
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Pure classification, rule and scoring logic lives in the domain, rules and analyzer modules
//! - Text extraction, document discovery and the external model sit at the edges
//! - The validator facade bundles them for batch and async workflows

pub mod analyzer;
pub mod config;
pub mod corpus;
pub mod domain;
pub mod extract;
pub mod patterns;
pub mod report;
pub mod rules;
pub mod substitute;

// Re-export main types for convenient access
pub use domain::batch::{AnalyzedDocument, BatchReport, BatchSummary, SkippedDocument};
pub use domain::document::{DocumentProfile, DocumentText};
pub use domain::findings::{
    ComplianceError, ComplianceResult, Defect, DefectCategory, Finding, Report, Severity,
    SeverityCounts,
};

pub use config::{ComplianceConfig, ConfigBuilder};

pub use analyzer::{AnalysisOptions, Assessment, ComplianceAnalyzer, ComplianceEngine};

pub use corpus::ReferenceCorpus;

pub use extract::{FileTextExtractor, TextExtractor};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

pub use rules::{DefectRule, RuleRegistry};

pub use substitute::ModelSubstitute;

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Analyze SOP text with the built-in checklist
///
/// Total over any input; blank text should be rejected by the caller first.
pub fn analyze(document_text: &str, filename: &str, corpus: &ReferenceCorpus) -> Report {
    ComplianceEngine::with_defaults().analyze(document_text, filename, corpus)
}

/// Main validator providing high-level analysis operations
pub struct SopValidator {
    analyzer: Arc<ComplianceAnalyzer>,
    report_formatter: ReportFormatter,
}

impl SopValidator {
    /// Create a validator, loading the references the configuration names
    pub fn new_with_config(config: ComplianceConfig) -> ComplianceResult<Self> {
        Ok(Self::from_analyzer(ComplianceAnalyzer::new(config)?))
    }

    /// Create a validator with default configuration
    pub fn new() -> ComplianceResult<Self> {
        Self::new_with_config(ComplianceConfig::default())
    }

    /// Create a validator loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> ComplianceResult<Self> {
        let config = ComplianceConfig::load_from_file(path)?;
        Self::new_with_config(config)
    }

    /// Wrap an analyzer built elsewhere
    pub fn from_analyzer(analyzer: ComplianceAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            report_formatter: ReportFormatter::default(),
        }
    }

    /// Set custom report formatter
    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.report_formatter = formatter;
        self
    }

    pub fn analyzer(&self) -> &ComplianceAnalyzer {
        &self.analyzer
    }

    pub fn corpus(&self) -> &ReferenceCorpus {
        self.analyzer.corpus()
    }

    pub fn config(&self) -> &ComplianceConfig {
        self.analyzer.config()
    }

    /// Analyze extracted text, trying the external model first if one is configured
    pub fn analyze_text(&self, text: &str, filename: &str) -> ComplianceResult<Report> {
        self.analyzer.analyze_text(text, filename)
    }

    /// Analyze a single document file
    pub fn validate_file<P: AsRef<Path>>(&self, file_path: P) -> ComplianceResult<Report> {
        self.analyzer.analyze_file(file_path)
    }

    /// Analyze files and directories on the blocking pool
    pub async fn validate_files<P: AsRef<Path>>(
        &self,
        paths: Vec<P>,
        options: &AnalysisOptions,
    ) -> ComplianceResult<BatchReport> {
        let paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        let analyzer = Arc::clone(&self.analyzer);
        let options = options.clone();

        tokio::task::spawn_blocking(move || analyzer.analyze_paths(&paths, &options))
            .await
            .map_err(|e| ComplianceError::validation(format!("Analysis task failed: {e}")))?
    }

    /// Analyze one of the configured sample documents
    pub fn validate_sample(&self, key: &str) -> ComplianceResult<Report> {
        self.analyzer.analyze_sample(key)
    }

    /// Format a report for output
    pub fn format_report(&self, report: &Report, format: OutputFormat) -> ComplianceResult<String> {
        self.report_formatter.format_report(report, format)
    }

    /// Format a batch for output
    pub fn format_batch(&self, batch: &BatchReport, format: OutputFormat) -> ComplianceResult<String> {
        self.report_formatter.format_batch(batch, format)
    }
}

/// Convenience function to analyze files with default settings
pub async fn validate_files<P: AsRef<Path>>(files: Vec<P>) -> ComplianceResult<BatchReport> {
    let validator = SopValidator::new()?;
    validator.validate_files(files, &AnalysisOptions::default()).await
}
