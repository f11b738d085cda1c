//! Configuration loading and management for SOP Guardian
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to clean domain objects
//! - Default tables (profiles, citations, placeholder tokens, penalties) are embedded here
//! - Rules read their keyword tables from configuration rather than inline conditionals

use crate::domain::document::DocumentProfile;
use crate::domain::findings::{ComplianceError, ComplianceResult, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure for SOP Guardian
///
/// Tables left out of a configuration file keep their built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceConfig {
    /// Configuration format version
    pub version: String,
    /// Regulatory reference documents
    pub references: ReferenceConfig,
    /// Document discovery and sample documents
    pub documents: DocumentConfig,
    /// Profiles in classification priority order
    pub profiles: Vec<ProfileConfig>,
    /// Superseded citations and their replacements, in evaluation order
    pub outdated_references: Vec<OutdatedReference>,
    /// Date tokens known to mark a stale effective date
    pub stale_dates: Vec<StaleDate>,
    /// Placeholder detection tables
    pub placeholders: PlaceholderConfig,
    /// Sections every unclassified SOP must carry
    pub generic_sections: Vec<String>,
    /// Marker indicating an unsigned approval line
    pub blank_signature_marker: String,
    /// Severity and deduction for each rule kind
    pub penalties: PenaltyTable,
}

/// Locations of the regulatory reference documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    pub paths: Vec<PathBuf>,
}

/// Where documents are discovered and which files count as SOPs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Directory holding reference and sample documents
    pub directory: PathBuf,
    /// File extensions accepted for analysis (without the dot)
    pub extensions: Vec<String>,
    /// Exclude patterns (glob syntax, `!` prefix re-includes)
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Sample key to file name within `directory`
    #[serde(default)]
    pub samples: BTreeMap<String, String>,
}

/// How one profile is recognised and scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub profile: DocumentProfile,
    /// Template code embedded in the document text (case-sensitive)
    pub identifier: Option<String>,
    /// Fragment of the file name (case-insensitive)
    pub filename_hint: Option<String>,
    /// Score before deductions
    pub baseline: u32,
    /// Sections checked by the profile-specific missing-section rule
    #[serde(default)]
    pub required_sections: Vec<String>,
    /// Fixed suggestions placed ahead of the derived ones
    #[serde(default)]
    pub advisories: Vec<String>,
}

/// A superseded citation and its current replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutdatedReference {
    pub old: String,
    pub new: String,
}

/// A date token that marks an effective date as stale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleDate {
    pub token: String,
    pub message: String,
}

/// Placeholder tokens and the narrower markers used inside procedures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    pub tokens: Vec<PlaceholderToken>,
    /// Word whose presence arms the procedure placeholder rule
    pub procedure_keyword: String,
    pub procedure_markers: Vec<String>,
}

/// A placeholder token (matched lower-cased) and the label used in messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderToken {
    pub token: String,
    pub label: String,
}

/// Severity and score deduction applied by one rule kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    pub severity: Severity,
    pub deduction: u32,
}

impl Penalty {
    pub const fn new(severity: Severity, deduction: u32) -> Self {
        Self { severity, deduction }
    }
}

/// Explicit severity/deduction table for every rule kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyTable {
    pub blank_signature: Penalty,
    pub missing_section: Penalty,
    pub generic_missing_section: Penalty,
    pub outdated_reference: Penalty,
    pub stale_date: Penalty,
    pub placeholder: Penalty,
    pub procedure_placeholder: Penalty,
    pub generic_placeholder: Penalty,
}

impl Default for PenaltyTable {
    fn default() -> Self {
        Self {
            blank_signature: Penalty::new(Severity::Minor, 5),
            missing_section: Penalty::new(Severity::Major, 10),
            generic_missing_section: Penalty::new(Severity::Major, 15),
            outdated_reference: Penalty::new(Severity::Critical, 20),
            stale_date: Penalty::new(Severity::Major, 10),
            placeholder: Penalty::new(Severity::Major, 15),
            procedure_placeholder: Penalty::new(Severity::Critical, 20),
            generic_placeholder: Penalty::new(Severity::Major, 10),
        }
    }
}

impl ComplianceConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ComplianceResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            ComplianceError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            ComplianceError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> ComplianceResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ComplianceError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Get default configuration with the built-in FDA checklist tables
    pub fn with_defaults() -> Self {
        let directory = PathBuf::from("documents");

        Self {
            version: "1.0".to_string(),
            references: ReferenceConfig {
                paths: vec![
                    directory.join("21 CFR Part 11 (up to date as of 2-01-2024).pdf"),
                    directory.join(
                        "General-Principles-of-Software-Validation---Final-Guidance-for-Industry-and-FDA-Staff.pdf",
                    ),
                ],
            },
            documents: DocumentConfig {
                directory,
                extensions: vec!["pdf".to_string(), "docx".to_string(), "txt".to_string()],
                exclude: vec!["**/.git/**".to_string(), "**/~$*".to_string()],
                samples: default_samples(),
            },
            profiles: default_profiles(),
            outdated_references: vec![
                outdated("ISO 9001:1994", "ISO 9001:2015"),
                outdated("ICH Q7 (2001)", "ICH Q7 (2015)"),
                outdated("21 CFR Part 11 (1997)", "21 CFR Part 11 (2024)"),
            ],
            stale_dates: vec![StaleDate {
                token: "2010-05-10".to_string(),
                message: "Effective date is from 2010 - document needs comprehensive review"
                    .to_string(),
            }],
            placeholders: PlaceholderConfig {
                tokens: vec![
                    placeholder("tbd", "TBD"),
                    placeholder("to be decided", "to be decided"),
                    placeholder("to be updated", "to be updated"),
                    placeholder("lorem ipsum", "lorem ipsum"),
                ],
                procedure_keyword: "procedure".to_string(),
                procedure_markers: vec!["tbd".to_string(), "to be".to_string(), "lorem".to_string()],
            },
            generic_sections: vec![
                "purpose".to_string(),
                "scope".to_string(),
                "procedure".to_string(),
                "references".to_string(),
            ],
            blank_signature_marker: "___".to_string(),
            penalties: PenaltyTable::default(),
        }
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> ComplianceResult<()> {
        if !["1.0"].contains(&self.version.as_str()) {
            return Err(ComplianceError::config(format!(
                "Unsupported configuration version: {}. Supported versions: 1.0",
                self.version
            )));
        }

        for profile in &self.profiles {
            let duplicate_count = self
                .profiles
                .iter()
                .filter(|p| p.profile == profile.profile)
                .count();
            if duplicate_count > 1 {
                return Err(ComplianceError::config(format!(
                    "Profile '{}' is configured more than once",
                    profile.profile
                )));
            }

            if profile.baseline > 100 {
                return Err(ComplianceError::config(format!(
                    "Baseline {} for profile '{}' is outside 0..=100",
                    profile.baseline, profile.profile
                )));
            }

            let has_empty_marker = [&profile.identifier, &profile.filename_hint]
                .into_iter()
                .flatten()
                .any(|m| m.trim().is_empty());
            if has_empty_marker {
                return Err(ComplianceError::config(format!(
                    "Profile '{}' has an empty identifier or filename hint",
                    profile.profile
                )));
            }
        }

        if self.profile(DocumentProfile::Generic).is_none() {
            return Err(ComplianceError::config(
                "The 'generic' profile is required as the classification fallback",
            ));
        }

        let empty_token = self
            .outdated_references
            .iter()
            .map(|r| &r.old)
            .chain(self.stale_dates.iter().map(|d| &d.token))
            .chain(self.placeholders.tokens.iter().map(|t| &t.token))
            .chain(self.placeholders.procedure_markers.iter())
            .chain(self.generic_sections.iter())
            .chain(std::iter::once(&self.blank_signature_marker))
            .chain(std::iter::once(&self.placeholders.procedure_keyword))
            .any(|token| token.trim().is_empty());
        if empty_token {
            return Err(ComplianceError::config(
                "Keyword tables must not contain empty tokens",
            ));
        }

        for pattern in &self.documents.exclude {
            let pattern = pattern.strip_prefix('!').unwrap_or(pattern.as_str());
            glob::Pattern::new(pattern).map_err(|e| {
                ComplianceError::config(format!("Invalid exclude pattern '{pattern}': {e}"))
            })?;
        }

        Ok(())
    }

    /// Settings for one profile, if configured
    pub fn profile(&self, profile: DocumentProfile) -> Option<&ProfileConfig> {
        self.profiles.iter().find(|p| p.profile == profile)
    }

    /// Baseline score for a profile, 100 when the profile is not configured
    pub fn baseline(&self, profile: DocumentProfile) -> u32 {
        self.profile(profile).map(|p| p.baseline).unwrap_or(100)
    }

    /// Resolve a sample key to its file path
    pub fn sample_path(&self, key: &str) -> Option<PathBuf> {
        self.documents
            .samples
            .get(key)
            .map(|name| self.documents.directory.join(name))
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> ComplianceResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ComplianceError::config(format!("Failed to serialize config: {e}")))
    }

    /// Create a fingerprint of the configuration so reports can name the rules they ran
    pub fn fingerprint(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        // Every collection is ordered, so the JSON form is stable
        match serde_json::to_string(self) {
            Ok(json) => json.hash(&mut hasher),
            Err(_) => self.version.hash(&mut hasher),
        }

        format!("{:x}", hasher.finish())
    }
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_profiles() -> Vec<ProfileConfig> {
    vec![
        ProfileConfig {
            profile: DocumentProfile::Compliant,
            identifier: Some("SOP-001".to_string()),
            filename_hint: Some("compliant".to_string()),
            baseline: 90,
            required_sections: Vec::new(),
            advisories: vec![
                "Consider adding more detailed procedure steps".to_string(),
                "Include version control information in header".to_string(),
            ],
        },
        ProfileConfig {
            profile: DocumentProfile::MissingSections,
            identifier: Some("SOP-002".to_string()),
            filename_hint: Some("missing_sections".to_string()),
            baseline: 60,
            required_sections: vec![
                "Definitions".to_string(),
                "Revision History".to_string(),
                "Approvals".to_string(),
            ],
            advisories: Vec::new(),
        },
        ProfileConfig {
            profile: DocumentProfile::OutdatedReferences,
            identifier: Some("SOP-004".to_string()),
            filename_hint: Some("outdated_refs".to_string()),
            baseline: 30,
            required_sections: Vec::new(),
            advisories: Vec::new(),
        },
        ProfileConfig {
            profile: DocumentProfile::Placeholder,
            identifier: Some("SOP-003".to_string()),
            filename_hint: Some("placeholder".to_string()),
            baseline: 20,
            required_sections: Vec::new(),
            advisories: Vec::new(),
        },
        ProfileConfig {
            profile: DocumentProfile::Generic,
            identifier: None,
            filename_hint: None,
            baseline: 100,
            required_sections: Vec::new(),
            advisories: Vec::new(),
        },
    ]
}

fn default_samples() -> BTreeMap<String, String> {
    [
        ("compliant", "Synthetic_SOP_Compliant.docx"),
        ("missing_sections", "Synthetic_SOP_Missing_Sections.docx"),
        ("outdated_refs", "Synthetic_SOP_Outdated_References.docx"),
        ("placeholder", "Synthetic_SOP_Placeholder.docx"),
    ]
    .into_iter()
    .map(|(key, file)| (key.to_string(), file.to_string()))
    .collect()
}

fn outdated(old: &str, new: &str) -> OutdatedReference {
    OutdatedReference {
        old: old.to_string(),
        new: new.to_string(),
    }
}

fn placeholder(token: &str, label: &str) -> PlaceholderToken {
    PlaceholderToken {
        token: token.to_string(),
        label: label.to_string(),
    }
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: ComplianceConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ComplianceConfig::default(),
        }
    }

    /// Replace the reference document list
    pub fn references(mut self, paths: Vec<PathBuf>) -> Self {
        self.config.references.paths = paths;
        self
    }

    /// Set the document directory
    pub fn document_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config.documents.directory = directory.into();
        self
    }

    /// Add a superseded citation to track
    pub fn add_outdated_reference(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.config.outdated_references.push(OutdatedReference {
            old: old.into(),
            new: new.into(),
        });
        self
    }

    /// Add a placeholder token
    pub fn add_placeholder(mut self, token: impl Into<String>, label: impl Into<String>) -> Self {
        self.config.placeholders.tokens.push(PlaceholderToken {
            token: token.into(),
            label: label.into(),
        });
        self
    }

    /// Add an exclude pattern for document discovery
    pub fn add_exclude_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.documents.exclude.push(pattern.into());
        self
    }

    /// Build the final configuration
    pub fn build(self) -> ComplianceResult<ComplianceConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = ComplianceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.profiles.len(), 5);
        assert_eq!(config.baseline(DocumentProfile::Placeholder), 20);
        assert_eq!(config.baseline(DocumentProfile::Generic), 100);
    }

    #[test]
    fn test_partial_yaml_keeps_default_tables() {
        let yaml = r#"
version: "1.0"
blank_signature_marker: "Signed: ____"
outdated_references:
  - old: "ISO 13485:2003"
    new: "ISO 13485:2016"
"#;
        let config = ComplianceConfig::load_from_str(yaml).unwrap();
        let defaults = ComplianceConfig::default();

        assert_eq!(config.blank_signature_marker, "Signed: ____");
        assert_eq!(config.outdated_references.len(), 1);
        assert_eq!(config.outdated_references[0].new, "ISO 13485:2016");
        assert_eq!(config.profiles, defaults.profiles);
        assert_eq!(config.profiles.len(), 5);
        assert_eq!(config.penalties, defaults.penalties);
        assert_eq!(config.placeholders, defaults.placeholders);
        assert_eq!(config.documents, defaults.documents);
        assert_eq!(config.generic_sections, defaults.generic_sections);
    }

    #[test]
    fn test_empty_mapping_is_default_config() {
        let config = ComplianceConfig::load_from_str("{}").unwrap();
        assert_eq!(config, ComplianceConfig::default());
    }

    #[test]
    fn test_yaml_config_loads() {
        let yaml = serde_yaml::to_string(&ComplianceConfig::default()).unwrap();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let loaded = ComplianceConfig::load_from_file(file.path()).unwrap();
        assert_eq!(loaded, ComplianceConfig::default());
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut config = ComplianceConfig::default();
        config.version = "2.0".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Unsupported configuration version"));
    }

    #[test]
    fn test_rejects_missing_generic_profile() {
        let mut config = ComplianceConfig::default();
        config.profiles.retain(|p| p.profile != DocumentProfile::Generic);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_profile_and_bad_baseline() {
        let mut config = ComplianceConfig::default();
        let duplicate = config.profiles[0].clone();
        config.profiles.push(duplicate);
        assert!(config.validate().is_err());

        let mut config = ComplianceConfig::default();
        config.profiles[0].baseline = 120;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_placeholder_token() {
        let result = ConfigBuilder::new().add_placeholder("  ", "blank").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_extends_tables() {
        let config = ConfigBuilder::new()
            .add_outdated_reference("ISO 13485:2003", "ISO 13485:2016")
            .document_directory("fixtures")
            .build()
            .unwrap();

        assert_eq!(config.outdated_references.len(), 4);
        assert_eq!(
            config.sample_path("compliant"),
            Some(PathBuf::from("fixtures/Synthetic_SOP_Compliant.docx"))
        );
    }

    #[test]
    fn test_fingerprint_tracks_changes() {
        let config = ComplianceConfig::default();
        assert_eq!(config.fingerprint(), ComplianceConfig::default().fingerprint());

        let changed = ConfigBuilder::new()
            .add_placeholder("xxx", "xxx")
            .build()
            .unwrap();
        assert_ne!(config.fingerprint(), changed.fingerprint());
    }

    #[test]
    fn test_invalid_yaml_reports_config_error() {
        let err = ComplianceConfig::load_from_str("version: [unterminated").unwrap_err();
        assert!(matches!(err, ComplianceError::Configuration { .. }));
    }
}
