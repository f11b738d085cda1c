//! Plain-text extraction from PDF, DOCX and text documents
//!
//! Architecture: Infrastructure Layer - Extraction turns files into text the engine can read
//! - The engine never touches files; callers extract first and pass text in
//! - `extract` is tolerant and yields an empty string for unreadable input
//! - `try_extract` keeps the failure for callers that want to report it

use crate::domain::findings::{ComplianceError, ComplianceResult};
use regex::Regex;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

/// Source formats the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    /// Detect the format from the file extension, defaulting to plain text
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("pdf") => Self::Pdf,
            Some("docx") => Self::Docx,
            _ => Self::PlainText,
        }
    }
}

/// Turns a document on disk into plain text
pub trait TextExtractor: Send + Sync {
    /// Extract text, surfacing the failure
    fn try_extract(&self, path: &Path) -> ComplianceResult<String>;

    /// Extract text, returning an empty string when the document cannot be read
    fn extract(&self, path: &Path) -> String {
        match self.try_extract(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to extract text from {}: {}", path.display(), e);
                String::new()
            }
        }
    }
}

/// Extractor dispatching on file extension
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextExtractor;

impl FileTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for FileTextExtractor {
    fn try_extract(&self, path: &Path) -> ComplianceResult<String> {
        let bytes = fs::read(path).map_err(|e| {
            ComplianceError::extraction(path.display().to_string(), format!("Failed to read file: {e}"))
        })?;

        let text = match DocumentFormat::from_path(path) {
            DocumentFormat::Pdf => extract_pdf(&bytes),
            DocumentFormat::Docx => extract_docx(&bytes),
            DocumentFormat::PlainText => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        }
        .map_err(|message| ComplianceError::extraction(path.display().to_string(), message))?;

        tracing::debug!("Extracted {} characters from {}", text.len(), path.display());
        Ok(text)
    }
}

/// Extract the text layer of a PDF
pub fn extract_pdf(bytes: &[u8]) -> Result<String, String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| format!("Invalid PDF: {e}"))
}

/// Extract paragraph text from a DOCX package, one non-empty paragraph per line
pub fn extract_docx(bytes: &[u8]) -> Result<String, String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| format!("Invalid DOCX archive: {e}"))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| format!("DOCX has no document body: {e}"))?
        .read_to_string(&mut xml)
        .map_err(|e| format!("Failed to read document body: {e}"))?;

    let run = Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>")
        .map_err(|e| format!("Invalid text run pattern: {e}"))?;

    let entity = Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|lt|gt|quot|apos|amp);")
        .map_err(|e| format!("Invalid entity pattern: {e}"))?;

    let paragraphs: Vec<String> = xml
        .split("</w:p>")
        .map(|paragraph| {
            run.captures_iter(paragraph)
                .filter_map(|c| c.get(1))
                .map(|m| unescape_xml(&entity, m.as_str()))
                .collect::<String>()
        })
        .filter(|paragraph| !paragraph.is_empty())
        .collect();

    Ok(paragraphs.join("\n"))
}

/// Decode predefined entities and numeric character references in one pass
///
/// References that do not name a valid character are left as written.
fn unescape_xml(entity: &Regex, s: &str) -> String {
    entity
        .replace_all(s, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            let decoded = match name {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "amp" => Some('&'),
                _ => name
                    .strip_prefix("#x")
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .unwrap_or_else(|| name[1..].parse::<u32>())
                    .ok()
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
