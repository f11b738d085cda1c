//! Document classification into SOP profiles
//!
//! Classification happens once per analysis, before any rule runs. Profiles are checked in
//! configured priority order; the first whose identifier token appears in the text, or whose
//! filename hint appears in the file name, wins. Anything else is Generic.

use crate::config::ComplianceConfig;
use crate::domain::document::{DocumentProfile, DocumentText};

/// Recognition markers for one profile
#[derive(Debug, Clone)]
struct ProfileMarker {
    profile: DocumentProfile,
    /// Matched case-sensitively against the raw text
    identifier: Option<String>,
    /// Lower-cased, matched against the lower-cased file name
    filename_hint: Option<String>,
}

impl ProfileMarker {
    fn matches(&self, document: &DocumentText, filename_lower: &str) -> bool {
        let by_identifier = self
            .identifier
            .as_deref()
            .is_some_and(|id| document.raw().contains(id));
        let by_filename = self
            .filename_hint
            .as_deref()
            .is_some_and(|hint| filename_lower.contains(hint));

        by_identifier || by_filename
    }
}

/// Pure function from (text, filename) to a profile
#[derive(Debug, Clone)]
pub struct ProfileClassifier {
    markers: Vec<ProfileMarker>,
}

impl ProfileClassifier {
    pub fn from_config(config: &ComplianceConfig) -> Self {
        let markers = config
            .profiles
            .iter()
            .filter(|p| p.profile != DocumentProfile::Generic)
            .map(|p| ProfileMarker {
                profile: p.profile,
                identifier: p.identifier.clone(),
                filename_hint: p.filename_hint.as_ref().map(|h| h.to_lowercase()),
            })
            .collect();

        Self { markers }
    }

    /// Pick exactly one profile for the document
    pub fn classify(&self, document: &DocumentText, filename: &str) -> DocumentProfile {
        let filename_lower = filename.to_lowercase();

        self.markers
            .iter()
            .find(|marker| marker.matches(document, &filename_lower))
            .map(|marker| marker.profile)
            .unwrap_or(DocumentProfile::Generic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn classifier() -> ProfileClassifier {
        ProfileClassifier::from_config(&ComplianceConfig::default())
    }

    #[rstest]
    #[case("Document ID: SOP-001", "upload.docx", DocumentProfile::Compliant)]
    #[case("Document ID: SOP-002", "upload.docx", DocumentProfile::MissingSections)]
    #[case("Document ID: SOP-004", "upload.docx", DocumentProfile::OutdatedReferences)]
    #[case("Document ID: SOP-003", "upload.docx", DocumentProfile::Placeholder)]
    #[case("plain text", "Synthetic_SOP_Placeholder.docx", DocumentProfile::Placeholder)]
    #[case("plain text", "Synthetic_SOP_Missing_Sections.docx", DocumentProfile::MissingSections)]
    #[case("plain text", "outdated_refs.pdf", DocumentProfile::OutdatedReferences)]
    #[case("plain text", "cleaning.txt", DocumentProfile::Generic)]
    fn test_classification(
        #[case] text: &str,
        #[case] filename: &str,
        #[case] expected: DocumentProfile,
    ) {
        assert_eq!(classifier().classify(&DocumentText::new(text), filename), expected);
    }

    #[test]
    fn test_priority_order_wins() {
        // Compliant is checked before Placeholder
        let doc = DocumentText::new("SOP-003 revision of SOP-001");
        assert_eq!(classifier().classify(&doc, "x.txt"), DocumentProfile::Compliant);
    }

    #[test]
    fn test_identifier_is_case_sensitive() {
        let doc = DocumentText::new("sop-002");
        assert_eq!(classifier().classify(&doc, "x.txt"), DocumentProfile::Generic);
    }
}
