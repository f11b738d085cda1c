//! The rule-based compliance engine
//!
//! The engine performs no I/O: text goes in, a report comes out. It holds only immutable
//! tables, so one instance can serve any number of concurrent analyses.

use super::profile::ProfileClassifier;
use super::scoring;
use crate::config::ComplianceConfig;
use crate::corpus::ReferenceCorpus;
use crate::domain::document::{DocumentProfile, DocumentText};
use crate::domain::findings::{ComplianceResult, Finding, Report};
use crate::report::assembler::{self, RULE_ENGINE_NOTES};
use crate::rules::RuleRegistry;

/// Intermediate result of one analysis, before it becomes a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub profile: DocumentProfile,
    pub baseline: u32,
    pub findings: Vec<Finding>,
    pub score: u32,
}

/// Classifies documents, runs the matching rule subset and scores the result
#[derive(Debug)]
pub struct ComplianceEngine {
    config: ComplianceConfig,
    classifier: ProfileClassifier,
    registry: RuleRegistry,
}

impl ComplianceEngine {
    /// Create an engine from a validated configuration
    pub fn new(config: ComplianceConfig) -> ComplianceResult<Self> {
        config.validate()?;
        let registry = RuleRegistry::from_config(&config);
        Ok(Self::with_registry(config, registry))
    }

    /// Create an engine with the built-in checklist
    pub fn with_defaults() -> Self {
        let config = ComplianceConfig::default();
        let registry = RuleRegistry::from_config(&config);
        Self::with_registry(config, registry)
    }

    /// Create an engine with a custom rule registry
    pub fn with_registry(config: ComplianceConfig, registry: RuleRegistry) -> Self {
        let classifier = ProfileClassifier::from_config(&config);
        Self {
            config,
            classifier,
            registry,
        }
    }

    pub fn config(&self) -> &ComplianceConfig {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Decide which profile applies to a document
    pub fn classify(&self, document: &DocumentText, filename: &str) -> DocumentProfile {
        self.classifier.classify(document, filename)
    }

    /// Classify, evaluate and score without assembling a report
    pub fn assess(
        &self,
        document: &DocumentText,
        filename: &str,
        corpus: &ReferenceCorpus,
    ) -> Assessment {
        let profile = self.classify(document, filename);
        let baseline = self.config.baseline(profile);
        let findings = self.registry.evaluate(document, corpus, profile);
        let score = scoring::score(baseline, &findings);

        tracing::debug!(
            "Classified '{}' as {} (baseline {}, {} finding(s), score {})",
            filename,
            profile,
            baseline,
            findings.len(),
            score
        );

        Assessment {
            profile,
            baseline,
            findings,
            score,
        }
    }

    /// Analyse document text and produce the final report
    pub fn analyze(&self, text: &str, filename: &str, corpus: &ReferenceCorpus) -> Report {
        let document = DocumentText::new(text);
        let assessment = self.assess(&document, filename, corpus);
        let advisories = self
            .config
            .profile(assessment.profile)
            .map(|p| p.advisories.as_slice())
            .unwrap_or(&[]);

        assembler::assemble(
            filename,
            assessment.score,
            &assessment.findings,
            advisories,
            RULE_ENGINE_NOTES,
        )
    }
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::findings::Severity;

    fn analyze(text: &str, filename: &str) -> Report {
        ComplianceEngine::with_defaults().analyze(text, filename, &ReferenceCorpus::empty())
    }

    #[test]
    fn test_compliant_profile_with_blank_signature() {
        let report = analyze(
            "SOP-001 Equipment Cleaning\n# Purpose\n# Approvals\nQA: ________",
            "upload.docx",
        );

        assert_eq!(report.score, 85);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].severity, Severity::Minor);
        assert_eq!(
            report.suggestions,
            vec![
                "Consider adding more detailed procedure steps",
                "Include version control information in header",
                "Review and address all identified issues",
            ]
        );
    }

    #[test]
    fn test_compliant_profile_clean() {
        let report = analyze("SOP-001\nApproved by J. Smith", "upload.docx");
        assert_eq!(report.score, 90);
        assert!(report.issues.is_empty());
        assert_eq!(report.suggestions.last().map(String::as_str), Some(assembler::COMPLIANT_SUGGESTION));
    }

    #[test]
    fn test_outdated_references_with_stale_date() {
        let report = analyze(
            "SOP-004\nEffective: 2010-05-10\nReferences: ISO 9001:1994; ICH Q7 (2001)",
            "sop.docx",
        );

        // 30 - 20 - 20 - 10
        assert_eq!(report.score, 0);
        assert_eq!(report.issues.len(), 3);
        assert_eq!(report.issues[2].severity, Severity::Major);
        assert!(report
            .suggestions
            .contains(&"Update all references to current versions".to_string()));
    }

    #[test]
    fn test_generic_document_missing_everything() {
        let report = analyze("Just some notes. TBD.", "notes.txt");

        // 100 - 4 * 15 - 10
        assert_eq!(report.score, 30);
        assert_eq!(report.issues.len(), 5);
        assert_eq!(report.issues[4].message, "Contains placeholder text");
    }

    #[test]
    fn test_assessment_exposes_profile_and_baseline() {
        let engine = ComplianceEngine::with_defaults();
        let assessment = engine.assess(
            &DocumentText::new("SOP-002"),
            "x.txt",
            &ReferenceCorpus::empty(),
        );
        assert_eq!(assessment.profile, DocumentProfile::MissingSections);
        assert_eq!(assessment.baseline, 60);
        assert_eq!(assessment.findings.len(), 3);
        assert_eq!(assessment.score, 30);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ComplianceConfig::default();
        config.version = "0.9".to_string();
        assert!(ComplianceEngine::new(config).is_err());
    }
}
