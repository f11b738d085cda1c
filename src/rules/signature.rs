//! Blank approval signature detection

use super::DefectRule;
use crate::config::Penalty;
use crate::corpus::ReferenceCorpus;
use crate::domain::document::{DocumentProfile, DocumentText};
use crate::domain::findings::{DefectCategory, Finding};

/// Flags approval blocks whose signature lines are still underscores
#[derive(Debug, Clone)]
pub struct BlankSignatureRule {
    marker: String,
    penalty: Penalty,
}

impl BlankSignatureRule {
    pub fn new(marker: impl Into<String>, penalty: Penalty) -> Self {
        Self {
            marker: marker.into(),
            penalty,
        }
    }
}

impl DefectRule for BlankSignatureRule {
    fn id(&self) -> &str {
        "blank_signature"
    }

    fn category(&self) -> DefectCategory {
        DefectCategory::Signature
    }

    fn describe(&self) -> String {
        format!("Signature line left blank ('{}' present)", self.marker)
    }

    fn evaluate(
        &self,
        document: &DocumentText,
        _corpus: &ReferenceCorpus,
        _profile: DocumentProfile,
    ) -> Vec<Finding> {
        if !document.raw().contains(&self.marker) {
            return Vec::new();
        }

        vec![Finding::new(
            self.id(),
            self.category(),
            self.penalty.severity,
            "Approval signatures are blank (using underscores)",
            self.penalty.deduction,
        )]
    }
}
