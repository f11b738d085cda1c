//! Placeholder text detection
//!
//! All matching here is on the lower-cased text, so `TBD`, `Tbd` and `tbd` are the same token.

use super::DefectRule;
use crate::config::{Penalty, PlaceholderToken};
use crate::corpus::ReferenceCorpus;
use crate::domain::document::{DocumentProfile, DocumentText};
use crate::domain::findings::{DefectCategory, Finding};
use crate::patterns::present_tokens;

/// One finding per distinct placeholder token present
#[derive(Debug, Clone)]
pub struct PlaceholderTokenRule {
    tokens: Vec<PlaceholderToken>,
    penalty: Penalty,
}

impl PlaceholderTokenRule {
    pub fn new(tokens: Vec<PlaceholderToken>, penalty: Penalty) -> Self {
        Self { tokens, penalty }
    }
}

impl DefectRule for PlaceholderTokenRule {
    fn id(&self) -> &str {
        "placeholder_token"
    }

    fn category(&self) -> DefectCategory {
        DefectCategory::Placeholder
    }

    fn describe(&self) -> String {
        let labels: Vec<&str> = self.tokens.iter().map(|t| t.label.as_str()).collect();
        format!("Placeholder tokens: {}", labels.join(", "))
    }

    fn evaluate(
        &self,
        document: &DocumentText,
        _corpus: &ReferenceCorpus,
        _profile: DocumentProfile,
    ) -> Vec<Finding> {
        self.tokens
            .iter()
            .filter(|t| document.lower().contains(t.token.to_lowercase().as_str()))
            .map(|t| {
                Finding::new(
                    self.id(),
                    self.category(),
                    self.penalty.severity,
                    format!("Contains placeholder text: {}", t.label),
                    self.penalty.deduction,
                )
            })
            .collect()
    }
}

/// Fires once when the procedure is written with placeholder markers
#[derive(Debug, Clone)]
pub struct ProcedurePlaceholderRule {
    keyword: String,
    markers: Vec<String>,
    penalty: Penalty,
}

impl ProcedurePlaceholderRule {
    pub fn new(keyword: impl Into<String>, markers: Vec<String>, penalty: Penalty) -> Self {
        Self {
            keyword: keyword.into().to_lowercase(),
            markers: markers.into_iter().map(|m| m.to_lowercase()).collect(),
            penalty,
        }
    }
}

impl DefectRule for ProcedurePlaceholderRule {
    fn id(&self) -> &str {
        "procedure_placeholder"
    }

    fn category(&self) -> DefectCategory {
        DefectCategory::Placeholder
    }

    fn describe(&self) -> String {
        format!(
            "'{}' present together with any of: {}",
            self.keyword,
            self.markers.join(", ")
        )
    }

    fn evaluate(
        &self,
        document: &DocumentText,
        _corpus: &ReferenceCorpus,
        _profile: DocumentProfile,
    ) -> Vec<Finding> {
        let text = document.lower();
        let armed = text.contains(self.keyword.as_str());
        if !armed || present_tokens(text, self.markers.iter().map(String::as_str)).next().is_none() {
            return Vec::new();
        }

        vec![Finding::new(
            self.id(),
            self.category(),
            self.penalty.severity,
            "Procedure section contains placeholder text instead of actual steps",
            self.penalty.deduction,
        )]
    }
}

/// Single catch-all placeholder finding for unclassified documents
#[derive(Debug, Clone)]
pub struct GenericPlaceholderRule {
    tokens: Vec<String>,
    penalty: Penalty,
}

impl GenericPlaceholderRule {
    pub fn new(tokens: Vec<PlaceholderToken>, penalty: Penalty) -> Self {
        Self {
            tokens: tokens.into_iter().map(|t| t.token.to_lowercase()).collect(),
            penalty,
        }
    }
}

impl DefectRule for GenericPlaceholderRule {
    fn id(&self) -> &str {
        "generic_placeholder"
    }

    fn category(&self) -> DefectCategory {
        DefectCategory::Placeholder
    }

    fn describe(&self) -> String {
        format!("Any placeholder token: {}", self.tokens.join(", "))
    }

    fn evaluate(
        &self,
        document: &DocumentText,
        _corpus: &ReferenceCorpus,
        _profile: DocumentProfile,
    ) -> Vec<Finding> {
        if present_tokens(document.lower(), self.tokens.iter().map(String::as_str))
            .next()
            .is_none()
        {
            return Vec::new();
        }

        vec![Finding::new(
            self.id(),
            self.category(),
            self.penalty.severity,
            "Contains placeholder text",
            self.penalty.deduction,
        )]
    }
}
