//! Core domain models for compliance defects and analysis reports
//!
//! Architecture: Rich Domain Models - Findings carry their own scoring weight and category
//! - Defects are the public, serializable view of a detected problem
//! - Findings wrap a defect with the rule that raised it and the points it costs
//! - Report is the immutable result of one analysis

use serde::{Deserialize, Serialize};

/// Severity levels for compliance defects
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub enum Severity {
    /// Cosmetic or clerical gaps
    Minor,
    /// Gaps that must be closed before the SOP is released
    Major,
    /// Problems that invalidate the SOP as written
    Critical,
}

impl Severity {
    /// Whether this severity level should block approval of the document
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Critical)
    }

    /// Convert to string for display
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minor => "Minor",
            Self::Major => "Major",
            Self::Critical => "Critical",
        }
    }

    /// Parse a severity label, ignoring case
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "minor" => Some(Self::Minor),
            "major" => Some(Self::Major),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// Category of a defect, used to derive remediation suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DefectCategory {
    /// Approval block left unsigned
    Signature,
    /// A required section header could not be found
    MissingSection,
    /// A superseded regulatory citation is still referenced
    OutdatedReference,
    /// Effective date is known to be stale
    StaleDate,
    /// Placeholder text in place of real content
    Placeholder,
}

impl DefectCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Signature => "signature",
            Self::MissingSection => "missing_section",
            Self::OutdatedReference => "outdated_reference",
            Self::StaleDate => "stale_date",
            Self::Placeholder => "placeholder",
        }
    }
}

/// A single detected compliance problem, as it appears in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defect {
    pub severity: Severity,
    pub message: String,
}

impl Defect {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Format defect for display
    pub fn format_display(&self) -> String {
        format!("[{}] {}", self.severity.as_str(), self.message)
    }
}

/// A defect together with the rule that raised it and its score deduction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Identifier of the rule that produced this finding
    pub rule_id: String,
    /// Category used for suggestion derivation
    pub category: DefectCategory,
    /// The public defect
    pub defect: Defect,
    /// Points subtracted from the profile baseline
    pub deduction: u32,
}

impl Finding {
    pub fn new(
        rule_id: impl Into<String>,
        category: DefectCategory,
        severity: Severity,
        message: impl Into<String>,
        deduction: u32,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            category,
            defect: Defect::new(severity, message),
            deduction,
        }
    }

    pub fn severity(&self) -> Severity {
        self.defect.severity
    }
}

/// Final structured result of analysing one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Name of the analysed document
    pub filename: String,
    /// Compliance score, always within 0..=100
    pub score: u32,
    /// Defects in rule evaluation order
    pub issues: Vec<Defect>,
    /// Remediation suggestions in insertion order
    pub suggestions: Vec<String>,
    /// Which analysis path produced this report
    pub notes: String,
}

impl Report {
    /// Whether the report contains any defects
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Whether the report contains blocking (critical) defects
    pub fn has_blocking(&self) -> bool {
        self.issues.iter().any(|d| d.severity.is_blocking())
    }

    /// Get defects of a specific severity
    pub fn issues_by_severity(&self, severity: Severity) -> impl Iterator<Item = &Defect> {
        self.issues.iter().filter(move |d| d.severity == severity)
    }

    /// Count of defects by severity
    pub fn counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for defect in &self.issues {
            counts.add(defect.severity);
        }
        counts
    }
}

/// Count of defects by severity level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
}

impl SeverityCounts {
    /// Total number of defects across all severities
    pub fn total(&self) -> usize {
        self.critical + self.major + self.minor
    }

    /// Add a defect to the counts
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::Major => self.major += 1,
            Severity::Minor => self.minor += 1,
        }
    }

    /// Merge another set of counts into this one
    pub fn merge(&mut self, other: SeverityCounts) {
        self.critical += other.critical;
        self.major += other.major;
        self.minor += other.minor;
    }
}

/// Error types that can occur around an analysis
#[derive(Debug, thiserror::Error)]
pub enum ComplianceError {
    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Text extraction failed for a document
    #[error("Extraction error in {file}: {message}")]
    Extraction { file: String, message: String },

    /// Extracted text was empty or whitespace-only
    #[error("Document {file} is unreadable: no text could be extracted")]
    UnreadableDocument { file: String },

    /// External model output could not be used
    #[error("Substitute error: {message}")]
    Substitute { message: String },

    /// Validation operation failed
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl ComplianceError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an extraction error
    pub fn extraction(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create an unreadable-document error
    pub fn unreadable(file: impl Into<String>) -> Self {
        Self::UnreadableDocument { file: file.into() }
    }

    /// Create a substitute error
    pub fn substitute(message: impl Into<String>) -> Self {
        Self::Substitute {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Result type for compliance operations
pub type ComplianceResult<T> = Result<T, ComplianceError>;
