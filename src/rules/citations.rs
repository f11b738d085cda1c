//! Superseded citations and stale effective dates
//!
//! Citations are matched verbatim and case-sensitively; the tables are iterated in
//! declared order so repeated runs emit identical finding sequences.

use super::DefectRule;
use crate::config::{OutdatedReference, Penalty, StaleDate};
use crate::corpus::ReferenceCorpus;
use crate::domain::document::{DocumentProfile, DocumentText};
use crate::domain::findings::{DefectCategory, Finding};

/// One finding per superseded citation present in the text
#[derive(Debug, Clone)]
pub struct OutdatedReferenceRule {
    references: Vec<OutdatedReference>,
    penalty: Penalty,
}

impl OutdatedReferenceRule {
    pub fn new(references: Vec<OutdatedReference>, penalty: Penalty) -> Self {
        Self { references, penalty }
    }
}

impl DefectRule for OutdatedReferenceRule {
    fn id(&self) -> &str {
        "outdated_reference"
    }

    fn category(&self) -> DefectCategory {
        DefectCategory::OutdatedReference
    }

    fn describe(&self) -> String {
        let pairs: Vec<String> = self
            .references
            .iter()
            .map(|r| format!("{} -> {}", r.old, r.new))
            .collect();
        format!("Superseded citations: {}", pairs.join("; "))
    }

    fn evaluate(
        &self,
        document: &DocumentText,
        corpus: &ReferenceCorpus,
        _profile: DocumentProfile,
    ) -> Vec<Finding> {
        self.references
            .iter()
            .filter(|reference| document.raw().contains(reference.old.as_str()))
            .map(|reference| {
                if !corpus.is_empty() && !corpus.text().contains(reference.new.as_str()) {
                    tracing::debug!(
                        "Replacement citation '{}' not found in the reference corpus",
                        reference.new
                    );
                }

                Finding::new(
                    self.id(),
                    self.category(),
                    self.penalty.severity,
                    format!(
                        "Outdated reference: {}. Should be updated to {}",
                        reference.old, reference.new
                    ),
                    self.penalty.deduction,
                )
            })
            .collect()
    }
}

/// Flags effective dates known to be long past review
#[derive(Debug, Clone)]
pub struct StaleDateRule {
    dates: Vec<StaleDate>,
    penalty: Penalty,
}

impl StaleDateRule {
    pub fn new(dates: Vec<StaleDate>, penalty: Penalty) -> Self {
        Self { dates, penalty }
    }
}

impl DefectRule for StaleDateRule {
    fn id(&self) -> &str {
        "stale_effective_date"
    }

    fn category(&self) -> DefectCategory {
        DefectCategory::StaleDate
    }

    fn describe(&self) -> String {
        let tokens: Vec<&str> = self.dates.iter().map(|d| d.token.as_str()).collect();
        format!("Stale effective dates: {}", tokens.join(", "))
    }

    fn evaluate(
        &self,
        document: &DocumentText,
        _corpus: &ReferenceCorpus,
        _profile: DocumentProfile,
    ) -> Vec<Finding> {
        self.dates
            .iter()
            .filter(|date| document.raw().contains(date.token.as_str()))
            .map(|date| {
                Finding::new(
                    self.id(),
                    self.category(),
                    self.penalty.severity,
                    date.message.clone(),
                    self.penalty.deduction,
                )
            })
            .collect()
    }
}
