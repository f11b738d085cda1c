//! Document files through extraction, batch analysis and formatting

use sop_guardian::{
    AnalysisOptions, ComplianceAnalyzer, ComplianceConfig, ComplianceError, OutputFormat,
    ReportFormatter, ReportOptions, SopValidator,
};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::TempDir;

fn write_docx(path: &Path, paragraphs: &[&str]) {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!("<w:document><w:body>{body}</w:body></w:document>");

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", zip::write::FileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    let bytes = writer.finish().unwrap().into_inner();
    fs::write(path, bytes).unwrap();
}

fn sample_config(directory: &Path) -> ComplianceConfig {
    let mut config = ComplianceConfig::default();
    config.references.paths = vec![directory.join("reference.txt")];
    config.documents.directory = directory.to_path_buf();
    config
}

#[tokio::test]
async fn docx_samples_score_by_profile() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("reference.txt"), "ISO 9001:2015").unwrap();

    write_docx(
        &dir.join("Synthetic_SOP_Compliant.docx"),
        &["SOP-001 Gowning", "Purpose", "Approved by: ________"],
    );
    write_docx(
        &dir.join("Synthetic_SOP_Outdated_References.docx"),
        &["SOP-004 Audits", "Effective: 2010-05-10", "ISO 9001:1994"],
    );

    let validator = SopValidator::new_with_config(sample_config(dir)).unwrap();
    assert!(!validator.corpus().is_empty());

    let compliant = validator.validate_sample("compliant").unwrap();
    assert_eq!(compliant.score, 85);

    let outdated = validator.validate_sample("outdated_refs").unwrap();
    // 30 - 20 - 10
    assert_eq!(outdated.score, 0);
    assert_eq!(outdated.issues.len(), 2);

    // Sample file for this key was never written
    assert!(validator.validate_sample("placeholder").is_err());

    let batch = validator
        .validate_files(vec![dir], &AnalysisOptions::default())
        .await
        .unwrap();
    let names: Vec<&str> = batch
        .documents
        .iter()
        .map(|d| d.report.filename.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "Synthetic_SOP_Compliant.docx",
            "Synthetic_SOP_Outdated_References.docx",
            "reference.txt",
        ]
    );
}

#[test]
fn corrupt_docx_is_skipped_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("broken.docx"), b"not a zip archive").unwrap();
    fs::write(dir.join("ok.txt"), "Purpose: a\nScope: b\nProcedure: c\nReferences: d").unwrap();

    let analyzer = ComplianceAnalyzer::with_defaults().unwrap();

    let single = analyzer.analyze_file(dir.join("broken.docx"));
    assert!(matches!(single, Err(ComplianceError::UnreadableDocument { .. })));

    let batch = analyzer
        .analyze_paths(&[dir], &AnalysisOptions::default())
        .unwrap();
    assert_eq!(batch.documents.len(), 1);
    assert_eq!(batch.documents[0].report.score, 100);
    assert_eq!(batch.skipped.len(), 1);
    assert!(batch.skipped[0].path.ends_with("broken.docx"));

    let output = ReportFormatter::new(ReportOptions {
        use_colors: false,
        ..Default::default()
    })
    .format_batch(&batch, OutputFormat::Human)
    .unwrap();
    assert!(output.contains("1 skipped"));
}

#[test]
fn config_round_trips_through_yaml_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sop_guardian.yaml");
    let config = ComplianceConfig::default();
    fs::write(&path, serde_yaml::to_string(&config).unwrap()).unwrap();

    let loaded = ComplianceConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.fingerprint(), config.fingerprint());
}
