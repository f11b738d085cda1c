//! Defect rules and the profile-keyed registry that runs them
//!
//! Architectural Principle: Service Layer - Each rule is an independent, pure check
//! - Every rule implements DefectRule and owns its keyword table and penalty
//! - The registry maps each DocumentProfile to its ordered rule subset
//! - Rules share no mutable state, so a registry is freely shared across threads

pub mod citations;
pub mod placeholders;
pub mod sections;
pub mod signature;

use crate::config::ComplianceConfig;
use crate::corpus::ReferenceCorpus;
use crate::domain::document::{DocumentProfile, DocumentText};
use crate::domain::findings::{DefectCategory, Finding};
use std::collections::BTreeMap;
use std::fmt;

pub use citations::{OutdatedReferenceRule, StaleDateRule};
pub use placeholders::{GenericPlaceholderRule, PlaceholderTokenRule, ProcedurePlaceholderRule};
pub use sections::MissingSectionRule;
pub use signature::BlankSignatureRule;

/// A single compliance check over document text
pub trait DefectRule: Send + Sync + fmt::Debug {
    /// Stable identifier, used in logs and `explain` output
    fn id(&self) -> &str;

    /// Category of every finding this rule emits
    fn category(&self) -> DefectCategory;

    /// One-line description of what triggers the rule
    fn describe(&self) -> String;

    /// Evaluate the rule; findings must be emitted in a deterministic order
    fn evaluate(
        &self,
        document: &DocumentText,
        corpus: &ReferenceCorpus,
        profile: DocumentProfile,
    ) -> Vec<Finding>;
}

/// Rules grouped by the profile they apply to
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: BTreeMap<DocumentProfile, Vec<Box<dyn DefectRule>>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the standard rule subsets from configuration
    pub fn from_config(config: &ComplianceConfig) -> Self {
        let penalties = &config.penalties;
        let mut registry = Self::new();

        registry.register(
            DocumentProfile::Compliant,
            BlankSignatureRule::new(config.blank_signature_marker.clone(), penalties.blank_signature),
        );

        if let Some(profile) = config.profile(DocumentProfile::MissingSections) {
            registry.register(
                DocumentProfile::MissingSections,
                MissingSectionRule::profile_specific(
                    profile.required_sections.clone(),
                    penalties.missing_section,
                ),
            );
        }

        registry.register(
            DocumentProfile::OutdatedReferences,
            OutdatedReferenceRule::new(config.outdated_references.clone(), penalties.outdated_reference),
        );
        registry.register(
            DocumentProfile::OutdatedReferences,
            StaleDateRule::new(config.stale_dates.clone(), penalties.stale_date),
        );

        registry.register(
            DocumentProfile::Placeholder,
            PlaceholderTokenRule::new(config.placeholders.tokens.clone(), penalties.placeholder),
        );
        registry.register(
            DocumentProfile::Placeholder,
            ProcedurePlaceholderRule::new(
                config.placeholders.procedure_keyword.clone(),
                config.placeholders.procedure_markers.clone(),
                penalties.procedure_placeholder,
            ),
        );

        registry.register(
            DocumentProfile::Generic,
            MissingSectionRule::generic(config.generic_sections.clone(), penalties.generic_missing_section),
        );
        registry.register(
            DocumentProfile::Generic,
            GenericPlaceholderRule::new(config.placeholders.tokens.clone(), penalties.generic_placeholder),
        );

        registry
    }

    /// Append a rule to a profile's subset
    pub fn register<R: DefectRule + 'static>(&mut self, profile: DocumentProfile, rule: R) {
        tracing::debug!("Registering rule '{}' for profile '{}'", rule.id(), profile);
        self.rules.entry(profile).or_default().push(Box::new(rule));
    }

    /// Rules applying to a profile, in evaluation order
    pub fn rules_for(&self, profile: DocumentProfile) -> &[Box<dyn DefectRule>] {
        self.rules.get(&profile).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Run a profile's rules and collect findings in rule order
    pub fn evaluate(
        &self,
        document: &DocumentText,
        corpus: &ReferenceCorpus,
        profile: DocumentProfile,
    ) -> Vec<Finding> {
        self.rules_for(profile)
            .iter()
            .flat_map(|rule| {
                let findings = rule.evaluate(document, corpus, profile);
                if !findings.is_empty() {
                    tracing::debug!("Rule '{}' raised {} finding(s)", rule.id(), findings.len());
                }
                findings
            })
            .collect()
    }

    /// Total number of registered rules
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Find a rule by id along with the profile it is registered for
    pub fn find(&self, rule_id: &str) -> Option<(DocumentProfile, &dyn DefectRule)> {
        self.rules.iter().find_map(|(profile, rules)| {
            rules
                .iter()
                .find(|r| r.id() == rule_id)
                .map(|r| (*profile, r.as_ref()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::findings::Severity;

    #[derive(Debug)]
    struct AlwaysRule;

    impl DefectRule for AlwaysRule {
        fn id(&self) -> &str {
            "always"
        }

        fn category(&self) -> DefectCategory {
            DefectCategory::StaleDate
        }

        fn describe(&self) -> String {
            "always fires".to_string()
        }

        fn evaluate(
            &self,
            _document: &DocumentText,
            _corpus: &ReferenceCorpus,
            _profile: DocumentProfile,
        ) -> Vec<Finding> {
            vec![Finding::new(self.id(), self.category(), Severity::Minor, "always", 1)]
        }
    }

    #[test]
    fn test_default_registry_layout() {
        let registry = RuleRegistry::from_config(&ComplianceConfig::default());

        let ids = |profile| -> Vec<String> {
            registry
                .rules_for(profile)
                .iter()
                .map(|r| r.id().to_string())
                .collect()
        };

        assert_eq!(ids(DocumentProfile::Compliant), vec!["blank_signature"]);
        assert_eq!(ids(DocumentProfile::MissingSections), vec!["missing_section"]);
        assert_eq!(
            ids(DocumentProfile::OutdatedReferences),
            vec!["outdated_reference", "stale_effective_date"]
        );
        assert_eq!(
            ids(DocumentProfile::Placeholder),
            vec!["placeholder_token", "procedure_placeholder"]
        );
        assert_eq!(
            ids(DocumentProfile::Generic),
            vec!["generic_missing_section", "generic_placeholder"]
        );
        assert_eq!(registry.rule_count(), 8);
    }

    #[test]
    fn test_custom_rule_without_touching_scorer() {
        let mut registry = RuleRegistry::new();
        registry.register(DocumentProfile::Generic, AlwaysRule);

        let findings = registry.evaluate(
            &DocumentText::new("anything"),
            &ReferenceCorpus::empty(),
            DocumentProfile::Generic,
        );
        assert_eq!(findings.len(), 1);
        assert!(registry
            .evaluate(&DocumentText::new("x"), &ReferenceCorpus::empty(), DocumentProfile::Compliant)
            .is_empty());
    }

    #[test]
    fn test_find_rule() {
        let registry = RuleRegistry::from_config(&ComplianceConfig::default());
        let (profile, rule) = registry.find("stale_effective_date").unwrap();
        assert_eq!(profile, DocumentProfile::OutdatedReferences);
        assert_eq!(rule.category(), DefectCategory::StaleDate);
        assert!(registry.find("nope").is_none());
    }
}
