//! Missing-section detection

use super::DefectRule;
use crate::config::Penalty;
use crate::corpus::ReferenceCorpus;
use crate::domain::document::{DocumentProfile, DocumentText};
use crate::domain::findings::{DefectCategory, Finding};
use crate::patterns::{has_section, title_case};

/// How missing sections are worded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionScope {
    /// Sections tailored to a known template, named as configured
    Profile,
    /// The general checklist applied to unclassified documents
    Generic,
}

/// Emits one finding per required section that cannot be found
#[derive(Debug, Clone)]
pub struct MissingSectionRule {
    scope: SectionScope,
    sections: Vec<String>,
    penalty: Penalty,
}

impl MissingSectionRule {
    /// Rule for a template's own required-section list
    pub fn profile_specific(sections: Vec<String>, penalty: Penalty) -> Self {
        Self {
            scope: SectionScope::Profile,
            sections,
            penalty,
        }
    }

    /// Rule for the generic checklist
    pub fn generic(sections: Vec<String>, penalty: Penalty) -> Self {
        Self {
            scope: SectionScope::Generic,
            sections,
            penalty,
        }
    }

    fn message(&self, section: &str) -> String {
        match self.scope {
            SectionScope::Profile => format!("Missing section: {section}"),
            SectionScope::Generic => format!("Missing required section: {}", title_case(section)),
        }
    }
}

impl DefectRule for MissingSectionRule {
    fn id(&self) -> &str {
        match self.scope {
            SectionScope::Profile => "missing_section",
            SectionScope::Generic => "generic_missing_section",
        }
    }

    fn category(&self) -> DefectCategory {
        DefectCategory::MissingSection
    }

    fn describe(&self) -> String {
        format!("Required sections not found: {}", self.sections.join(", "))
    }

    fn evaluate(
        &self,
        document: &DocumentText,
        _corpus: &ReferenceCorpus,
        _profile: DocumentProfile,
    ) -> Vec<Finding> {
        self.sections
            .iter()
            .filter(|section| !has_section(document.lower(), section))
            .map(|section| {
                Finding::new(
                    self.id(),
                    self.category(),
                    self.penalty.severity,
                    self.message(section),
                    self.penalty.deduction,
                )
            })
            .collect()
    }
}
