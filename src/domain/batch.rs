//! Results of analysing many documents in one run

use super::findings::{Report, SeverityCounts};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One analysed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedDocument {
    pub path: PathBuf,
    pub report: Report,
}

/// A document that could not be analysed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// Summary statistics for a batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Documents considered, analysed or not
    pub total_files: usize,
    /// Defects across every report
    pub issues_by_severity: SeverityCounts,
    /// Mean score of the analysed documents
    pub average_score: Option<f64>,
    /// Lowest score among analysed documents
    pub min_score: Option<u32>,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
    /// Timestamp when the batch ran
    pub analyzed_at: DateTime<Utc>,
    /// Sum of analysed scores, kept so the average updates in constant time
    #[serde(default)]
    score_total: u64,
}

/// Reports for every document in a run, in input order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub documents: Vec<AnalyzedDocument>,
    pub skipped: Vec<SkippedDocument>,
    pub summary: BatchSummary,
    /// Fingerprint of the configuration the rules came from
    pub config_fingerprint: Option<String>,
}

impl BatchReport {
    /// Create a new empty batch report
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            skipped: Vec::new(),
            summary: BatchSummary {
                analyzed_at: Utc::now(),
                ..Default::default()
            },
            config_fingerprint: None,
        }
    }

    /// Add an analysed document, keeping the summary current
    pub fn add_document(&mut self, path: PathBuf, report: Report) {
        self.summary.issues_by_severity.merge(report.counts());
        self.summary.min_score = Some(
            self.summary
                .min_score
                .map_or(report.score, |min| min.min(report.score)),
        );
        self.summary.score_total += u64::from(report.score);
        self.documents.push(AnalyzedDocument { path, report });
        self.summary.average_score =
            Some(self.summary.score_total as f64 / self.documents.len() as f64);
    }

    /// Record a document that could not be analysed
    pub fn add_skipped(&mut self, path: PathBuf, reason: impl Into<String>) {
        self.skipped.push(SkippedDocument {
            path,
            reason: reason.into(),
        });
    }

    /// Whether any report contains a defect
    pub fn has_issues(&self) -> bool {
        self.documents.iter().any(|d| d.report.has_issues())
    }

    /// Whether any report contains a critical defect
    pub fn has_blocking(&self) -> bool {
        self.documents.iter().any(|d| d.report.has_blocking())
    }

    /// Whether any analysed document scored below `threshold`
    pub fn any_below(&self, threshold: u32) -> bool {
        self.documents.iter().any(|d| d.report.score < threshold)
    }

    pub fn set_files_considered(&mut self, count: usize) {
        self.summary.total_files = count;
    }

    pub fn set_execution_time(&mut self, duration_ms: u64) {
        self.summary.execution_time_ms = duration_ms;
    }

    pub fn set_config_fingerprint(&mut self, fingerprint: impl Into<String>) {
        self.config_fingerprint = Some(fingerprint.into());
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::findings::{Defect, Severity};

    fn report(score: u32, issues: Vec<Defect>) -> Report {
        Report {
            filename: "sop.docx".to_string(),
            score,
            issues,
            suggestions: Vec::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_summary_tracks_scores_and_counts() {
        let mut batch = BatchReport::new();
        batch.add_document(PathBuf::from("a.docx"), report(90, vec![]));
        batch.add_document(
            PathBuf::from("b.docx"),
            report(30, vec![Defect::new(Severity::Critical, "Outdated reference")]),
        );
        batch.add_skipped(PathBuf::from("c.pdf"), "unreadable");

        assert_eq!(batch.summary.average_score, Some(60.0));
        assert_eq!(batch.summary.min_score, Some(30));
        assert_eq!(batch.summary.issues_by_severity.critical, 1);
        assert!(batch.has_blocking());
        assert!(batch.any_below(50));
        assert!(!batch.any_below(30));
        assert_eq!(batch.skipped.len(), 1);
    }

    #[test]
    fn test_average_follows_every_addition() {
        let mut batch = BatchReport::new();
        let scores = [100, 0, 50, 25, 75, 10];
        for (i, score) in scores.iter().enumerate() {
            batch.add_document(PathBuf::from(format!("{i}.docx")), report(*score, vec![]));
            let expected = scores[..=i].iter().sum::<u32>() as f64 / (i + 1) as f64;
            assert_eq!(batch.summary.average_score, Some(expected));
        }

        for i in 0..1000 {
            batch.add_document(PathBuf::from(format!("bulk{i}.docx")), report(100, vec![]));
        }
        let expected = (260 + 100 * 1000) as f64 / 1006.0;
        assert_eq!(batch.summary.average_score, Some(expected));
        assert_eq!(batch.summary.min_score, Some(0));
    }

    #[test]
    fn test_empty_batch() {
        let batch = BatchReport::new();
        assert_eq!(batch.summary.average_score, None);
        assert!(!batch.has_issues());
    }
}
