//! Turns findings and a score into the final report

use crate::domain::findings::{DefectCategory, Finding, Report};

/// Notes stamped on reports produced by the rule engine
pub const RULE_ENGINE_NOTES: &str = "Analysis performed using rule-based compliance engine";

/// Notes stamped on reports accepted from the external model
pub const EXTERNAL_MODEL_NOTES: &str = "Analysis performed using external model";

pub const COMPLIANT_SUGGESTION: &str = "SOP appears compliant with FDA regulations";
pub const REVIEW_SUGGESTION: &str = "Review and address all identified issues";

/// Category-keyed suggestions, in the order they are added
const CATEGORY_SUGGESTIONS: [(DefectCategory, &str); 3] = [
    (
        DefectCategory::Placeholder,
        "Replace all placeholder text with actual content",
    ),
    (
        DefectCategory::OutdatedReference,
        "Update all references to current versions",
    ),
    (
        DefectCategory::MissingSection,
        "Add all missing required sections",
    ),
];

/// Derive suggestions from which defect categories occurred
pub fn derive_suggestions(findings: &[Finding]) -> Vec<String> {
    if findings.is_empty() {
        return vec![COMPLIANT_SUGGESTION.to_string()];
    }

    let mut suggestions = vec![REVIEW_SUGGESTION.to_string()];
    suggestions.extend(
        CATEGORY_SUGGESTIONS
            .iter()
            .filter(|(category, _)| findings.iter().any(|f| f.category == *category))
            .map(|(_, suggestion)| suggestion.to_string()),
    );
    suggestions
}

/// Build the report; profile advisories go ahead of the derived suggestions
pub fn assemble(
    filename: &str,
    score: u32,
    findings: &[Finding],
    advisories: &[String],
    notes: &str,
) -> Report {
    let mut suggestions = advisories.to_vec();
    suggestions.extend(derive_suggestions(findings));

    Report {
        filename: filename.to_string(),
        score,
        issues: findings.iter().map(|f| f.defect.clone()).collect(),
        suggestions,
        notes: notes.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::findings::Severity;

    fn finding(category: DefectCategory) -> Finding {
        Finding::new("test", category, Severity::Major, "x", 10)
    }

    #[test]
    fn test_clean_document_gets_positive_suggestion() {
        let report = assemble("sop.txt", 100, &[], &[], RULE_ENGINE_NOTES);
        assert_eq!(report.suggestions, vec![COMPLIANT_SUGGESTION]);
        assert!(report.issues.is_empty());
        assert_eq!(report.notes, RULE_ENGINE_NOTES);
    }

    #[test]
    fn test_one_suggestion_per_category() {
        let findings = vec![
            finding(DefectCategory::MissingSection),
            finding(DefectCategory::MissingSection),
            finding(DefectCategory::Placeholder),
        ];

        assert_eq!(
            derive_suggestions(&findings),
            vec![
                REVIEW_SUGGESTION,
                "Replace all placeholder text with actual content",
                "Add all missing required sections",
            ]
        );
    }

    #[test]
    fn test_categories_without_suggestion() {
        let findings = vec![finding(DefectCategory::Signature), finding(DefectCategory::StaleDate)];
        assert_eq!(derive_suggestions(&findings), vec![REVIEW_SUGGESTION]);
    }

    #[test]
    fn test_advisories_come_first() {
        let advisories = vec!["Include version control information in header".to_string()];
        let report = assemble("a.docx", 90, &[], &advisories, RULE_ENGINE_NOTES);

        assert_eq!(
            report.suggestions,
            vec!["Include version control information in header", COMPLIANT_SUGGESTION]
        );
    }

    #[test]
    fn test_issues_keep_finding_order() {
        let findings = vec![
            Finding::new("a", DefectCategory::OutdatedReference, Severity::Critical, "first", 20),
            Finding::new("b", DefectCategory::StaleDate, Severity::Major, "second", 10),
        ];
        let report = assemble("x", 0, &findings, &[], RULE_ENGINE_NOTES);
        let messages: Vec<&str> = report.issues.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
