//! Report generation with multiple output formats
//!
//! Architectural Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - Report (domain) is rendered for people or serialized as the report JSON schema
//! - A batch wraps each report as `{filename, analysis}`
//! - Domain logic remains pure while supporting multiple presentation needs

pub mod assembler;

use crate::domain::batch::BatchReport;
use crate::domain::findings::{ComplianceError, ComplianceResult, Defect, Report, Severity};
use serde_json::Value as JsonValue;
use std::io::Write;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format, optionally coloured
    Human,
    /// The report JSON schema
    Json,
}

impl OutputFormat {
    /// Parse format from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json"]
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (human format only)
    pub use_colors: bool,
    /// Whether to list suggestions
    pub show_suggestions: bool,
    /// Minimum severity listed in human output
    pub min_severity: Option<Severity>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            use_colors: true,
            show_suggestions: true,
            min_severity: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Good,
    Warn,
    Bad,
    Dim,
    Strong,
}

/// Renders reports in the requested format
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Format a single report
    pub fn format_report(&self, report: &Report, format: OutputFormat) -> ComplianceResult<String> {
        match format {
            OutputFormat::Human => Ok(self.format_human(report)),
            OutputFormat::Json => to_pretty_json(&report_json(report)),
        }
    }

    /// Format every report of a batch run
    pub fn format_batch(&self, batch: &BatchReport, format: OutputFormat) -> ComplianceResult<String> {
        match format {
            OutputFormat::Human => Ok(self.format_batch_human(batch)),
            OutputFormat::Json => to_pretty_json(&batch_json(batch)),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &Report,
        format: OutputFormat,
        mut writer: W,
    ) -> ComplianceResult<()> {
        let formatted = self.format_report(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    /// Write a formatted batch to a writer
    pub fn write_batch<W: Write>(
        &self,
        batch: &BatchReport,
        format: OutputFormat,
        mut writer: W,
    ) -> ComplianceResult<()> {
        let formatted = self.format_batch(batch, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    fn visible_issues<'a>(&self, issues: &'a [Defect]) -> Vec<&'a Defect> {
        issues
            .iter()
            .filter(|d| self.options.min_severity.map_or(true, |min| d.severity >= min))
            .collect()
    }

    fn format_human(&self, report: &Report) -> String {
        let mut output = String::new();

        let score_tone = match report.score {
            80..=100 => Tone::Good,
            50..=79 => Tone::Warn,
            _ => Tone::Bad,
        };
        output.push_str(&format!(
            "📄 {}  {}\n",
            self.paint(&report.filename, Tone::Strong),
            self.paint(&format!("{}/100", report.score), score_tone)
        ));

        let issues = self.visible_issues(&report.issues);
        if report.issues.is_empty() {
            output.push_str(&format!("  ✅ {}\n", self.paint("No compliance issues found", Tone::Good)));
        } else {
            let icon = if report.has_blocking() { "❌" } else { "⚠️" };
            output.push_str(&format!("  {} {} issue(s)\n", icon, report.issues.len()));

            for issue in &issues {
                let tone = match issue.severity {
                    Severity::Critical => Tone::Bad,
                    Severity::Major => Tone::Warn,
                    Severity::Minor => Tone::Dim,
                };
                output.push_str(&format!(
                    "    [{}] {}\n",
                    self.paint(issue.severity.as_str(), tone),
                    issue.message
                ));
            }

            let hidden = report.issues.len() - issues.len();
            if hidden > 0 {
                output.push_str(&format!(
                    "    {}\n",
                    self.paint(&format!("... {hidden} below the severity threshold"), Tone::Dim)
                ));
            }
        }

        if self.options.show_suggestions {
            for suggestion in &report.suggestions {
                output.push_str(&format!("  💡 {}\n", self.paint(suggestion, Tone::Good)));
            }
        }

        if !report.notes.is_empty() {
            output.push_str(&format!("  {}\n", self.paint(&report.notes, Tone::Dim)));
        }

        output
    }

    fn format_batch_human(&self, batch: &BatchReport) -> String {
        let mut output = String::new();

        if batch.documents.is_empty() && batch.skipped.is_empty() {
            output.push_str("No documents found to analyze\n");
        }

        for document in &batch.documents {
            output.push_str(&self.format_human(&document.report));
            output.push('\n');
        }

        for skipped in &batch.skipped {
            output.push_str(&format!(
                "⏭️  {} {}\n",
                skipped.path.display(),
                self.paint(&format!("({})", skipped.reason), Tone::Dim)
            ));
        }

        output.push_str(&self.format_summary(batch));
        output
    }

    fn format_summary(&self, batch: &BatchReport) -> String {
        let summary = &batch.summary;
        let counts = &summary.issues_by_severity;
        let execution_time = (summary.execution_time_ms as f64) / 1000.0;

        let mut parts = vec![format!(
            "{} document{}",
            batch.documents.len(),
            if batch.documents.len() == 1 { "" } else { "s" }
        )];

        if let Some(average) = summary.average_score {
            parts.push(format!("average score {average:.1}"));
        }

        if counts.total() == 0 {
            parts.push(self.paint("0 issues", Tone::Good));
        } else {
            for (count, label, tone) in [
                (counts.critical, "critical", Tone::Bad),
                (counts.major, "major", Tone::Warn),
                (counts.minor, "minor", Tone::Dim),
            ] {
                if count > 0 {
                    parts.push(self.paint(&format!("{count} {label}"), tone));
                }
            }
        }

        if !batch.skipped.is_empty() {
            parts.push(format!("{} skipped", batch.skipped.len()));
        }

        format!(
            "📊 {} {} ({:.1}s)\n",
            self.paint("Summary:", Tone::Strong),
            parts.join(", "),
            execution_time
        )
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        #[cfg(feature = "colors")]
        {
            if self.options.use_colors {
                use colored::Colorize;
                let styled = match tone {
                    Tone::Good => text.green(),
                    Tone::Warn => text.yellow(),
                    Tone::Bad => text.red(),
                    Tone::Dim => text.dimmed(),
                    Tone::Strong => text.bold(),
                };
                return styled.to_string();
            }
        }

        #[cfg(not(feature = "colors"))]
        let _ = tone;

        text.to_string()
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(ReportOptions::default())
    }
}

/// The report JSON schema value for one report
pub fn report_json(report: &Report) -> JsonValue {
    serde_json::json!({
        "filename": report.filename,
        "score": report.score,
        "issues": report.issues.iter().map(|d| serde_json::json!({
            "severity": d.severity.as_str(),
            "message": d.message,
        })).collect::<Vec<_>>(),
        "suggestions": report.suggestions,
        "notes": report.notes,
    })
}

fn batch_json(batch: &BatchReport) -> JsonValue {
    let results: Vec<JsonValue> = batch
        .documents
        .iter()
        .map(|d| {
            serde_json::json!({
                "filename": d.report.filename,
                "path": d.path.display().to_string(),
                "analysis": report_json(&d.report),
            })
        })
        .collect();

    let skipped: Vec<JsonValue> = batch
        .skipped
        .iter()
        .map(|s| {
            serde_json::json!({
                "path": s.path.display().to_string(),
                "reason": s.reason,
            })
        })
        .collect();

    let summary = &batch.summary;
    serde_json::json!({
        "results": results,
        "skipped": skipped,
        "summary": {
            "total_files": summary.total_files,
            "issues_by_severity": {
                "critical": summary.issues_by_severity.critical,
                "major": summary.issues_by_severity.major,
                "minor": summary.issues_by_severity.minor
            },
            "average_score": summary.average_score,
            "min_score": summary.min_score,
            "execution_time_ms": summary.execution_time_ms,
            "analyzed_at": summary.analyzed_at.to_rfc3339()
        },
        "config_fingerprint": batch.config_fingerprint
    })
}

fn to_pretty_json(value: &JsonValue) -> ComplianceResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ComplianceError::validation(format!("JSON serialization failed: {e}")))
}
