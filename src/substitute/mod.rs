//! Optional external-model path
//!
//! An external model may stand in for the rule engine. Its raw output is only trusted
//! after it parses into a well-formed report; anything else is rejected so the caller
//! can fall back to the engine.

use crate::corpus::{truncate_chars, ReferenceCorpus};
use crate::domain::findings::{ComplianceError, ComplianceResult, Defect, Report, Severity};
use crate::report::assembler::EXTERNAL_MODEL_NOTES;
use serde::Deserialize;

/// Characters of SOP text included in a prompt
pub const SOP_PROMPT_CHARS: usize = 5000;

/// Characters of reference text included in a prompt
pub const REFERENCE_PROMPT_CHARS: usize = 3000;

/// Something that turns a prompt into raw model output
///
/// Returning `None` means the model was unavailable; the caller falls back to the engine.
pub trait ModelSubstitute: Send + Sync {
    fn complete(&self, prompt: &str) -> Option<String>;
}

impl<F> ModelSubstitute for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn complete(&self, prompt: &str) -> Option<String> {
        self(prompt)
    }
}

/// Build the prompt sent to the external model
pub fn build_prompt(sop_text: &str, filename: &str, corpus: &ReferenceCorpus) -> String {
    let trimmed_sop = truncate_chars(sop_text, SOP_PROMPT_CHARS);
    let trimmed_refs = corpus.excerpt(REFERENCE_PROMPT_CHARS);

    format!(
        r#"You are an FDA compliance expert. Analyze the SOP for compliance.

Return ONLY JSON with schema:
{{
  "filename": "{filename}",
  "score": <0-100>,
  "issues": [{{"severity":"Critical|Major|Minor", "message":"..."}}],
  "suggestions": ["..."],
  "notes": "...",
  "scoring_explanation": "..."
}}

Check for:
- Missing sections: Title, Purpose, Scope, Responsibilities, Definitions, Procedure, References, Revision History, Approvals
- Metadata: Document ID, Version/Revision, Effective Date
- Revision History completeness
- References freshness
- Placeholders (TBD, lorem ipsum, etc.)
- Procedure steps clarity (at least 3)
- Approvals/signatures

Current references:
{trimmed_refs}

SOP Content:
{trimmed_sop}
"#
    )
}

#[derive(Debug, Deserialize)]
struct RawReport {
    score: i64,
    issues: Vec<RawIssue>,
    suggestions: Vec<String>,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    severity: String,
    message: String,
}

/// Parse raw model output into a report for `filename`
///
/// Unknown fields such as `scoring_explanation` are ignored. Missing required fields,
/// unknown severities and scores outside 0..=100 are rejected. The filename is always
/// the analysed file's, whatever the model echoed back.
pub fn parse_report(raw: &str, filename: &str) -> ComplianceResult<Report> {
    let body = strip_code_fence(raw.trim());
    let parsed: RawReport = serde_json::from_str(body)
        .map_err(|e| ComplianceError::substitute(format!("Malformed model output: {e}")))?;

    if !(0..=100).contains(&parsed.score) {
        return Err(ComplianceError::substitute(format!(
            "Score {} is outside 0..=100",
            parsed.score
        )));
    }

    let issues = parsed
        .issues
        .into_iter()
        .map(|issue| {
            Severity::parse(&issue.severity)
                .map(|severity| Defect::new(severity, issue.message))
                .ok_or_else(|| {
                    ComplianceError::substitute(format!("Unknown severity '{}'", issue.severity))
                })
        })
        .collect::<ComplianceResult<Vec<_>>>()?;

    let notes = match parsed.notes.as_deref().map(str::trim) {
        Some(extra) if !extra.is_empty() => format!("{EXTERNAL_MODEL_NOTES}: {extra}"),
        _ => EXTERNAL_MODEL_NOTES.to_string(),
    };

    Ok(Report {
        filename: filename.to_string(),
        score: parsed.score as u32,
        issues,
        suggestions: parsed.suggestions,
        notes,
    })
}

/// Ask the substitute for a report, returning `None` when it is absent or unusable
pub fn try_substitute(
    substitute: &dyn ModelSubstitute,
    sop_text: &str,
    filename: &str,
    corpus: &ReferenceCorpus,
) -> Option<Report> {
    let prompt = build_prompt(sop_text, filename, corpus);
    let raw = substitute.complete(&prompt)?;

    match parse_report(&raw, filename) {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::warn!("Discarding model output for '{}': {}", filename, e);
            None
        }
    }
}

fn strip_code_fence(body: &str) -> &str {
    body.strip_prefix("```json")
        .or_else(|| body.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(body)
}
