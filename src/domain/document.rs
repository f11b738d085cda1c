//! Documents under analysis and the profiles they are classified into

use serde::{Deserialize, Serialize};
use std::fmt;

/// Plain text extracted from a source document, with its lower-cased form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentText {
    raw: String,
    lower: String,
}

impl DocumentText {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let lower = raw.to_lowercase();
        Self { raw, lower }
    }

    /// Text exactly as extracted
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Lower-cased text used for case-insensitive matching
    pub fn lower(&self) -> &str {
        &self.lower
    }

    /// Whether the text contains anything besides whitespace
    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

impl From<&str> for DocumentText {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for DocumentText {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

/// Classification bucket selecting the rule subset and baseline score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentProfile {
    Compliant,
    MissingSections,
    OutdatedReferences,
    Placeholder,
    Generic,
}

impl DocumentProfile {
    /// All profiles in classification priority order
    pub const ALL: [DocumentProfile; 5] = [
        Self::Compliant,
        Self::MissingSections,
        Self::OutdatedReferences,
        Self::Placeholder,
        Self::Generic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::MissingSections => "missing_sections",
            Self::OutdatedReferences => "outdated_references",
            Self::Placeholder => "placeholder",
            Self::Generic => "generic",
        }
    }

    /// Parse a profile name as printed by `as_str`
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name.trim().to_lowercase())
    }
}

impl fmt::Display for DocumentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_text_lowercases_once() {
        let doc = DocumentText::new("PURPOSE: Describe TBD");
        assert_eq!(doc.raw(), "PURPOSE: Describe TBD");
        assert_eq!(doc.lower(), "purpose: describe tbd");
    }

    #[test]
    fn test_blank_document() {
        assert!(DocumentText::new("  \n\t ").is_blank());
        assert!(!DocumentText::new("Scope").is_blank());
    }

    #[test]
    fn test_profile_round_trips_through_name() {
        for profile in DocumentProfile::ALL {
            assert_eq!(DocumentProfile::parse(profile.as_str()), Some(profile));
        }
        assert_eq!(DocumentProfile::parse("unknown"), None);
    }
}
