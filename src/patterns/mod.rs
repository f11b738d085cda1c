//! Header patterns for detecting SOP sections in extracted text
//!
//! Architectural Principle: Service Layer - Section detection is a small, permissive heuristic
//! - Patterns are expanded from declarative templates, never hand-written per section
//! - Matching is plain substring search on lower-cased text, not a tokenizer
//! - Heterogeneous header styles (markdown, colon-suffixed, all caps) all count as present

pub mod path_filter;

pub use path_filter::PathFilter;

/// Header templates, `{}` is replaced by the section name
const HEADER_TEMPLATES: [&str; 4] = ["# {}", "## {}", "#{}", "{}:"];

/// Every lower-cased pattern that marks `section_name` as present
pub fn section_patterns(section_name: &str) -> Vec<String> {
    let mut patterns: Vec<String> = HEADER_TEMPLATES
        .iter()
        .map(|template| template.replace("{}", section_name))
        .collect();

    patterns.push(section_name.to_uppercase());
    patterns.push(title_case(section_name));

    patterns.into_iter().map(|p| p.to_lowercase()).collect()
}

/// Whether the lower-cased document text contains the named section
pub fn has_section(text_lowercase: &str, section_name: &str) -> bool {
    section_patterns(section_name)
        .iter()
        .any(|pattern| text_lowercase.contains(pattern.as_str()))
}

/// Upper-case the first letter of every word and lower-case the rest
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}

/// Tokens from `tokens` that occur in `haystack`, in table order
pub fn present_tokens<'a, I>(haystack: &'a str, tokens: I) -> impl Iterator<Item = &'a str> + 'a
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: 'a,
{
    tokens
        .into_iter()
        .filter(move |token| haystack.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("PROCEDURE\n1. Mix the batch")]
    #[case("Procedure: mix the batch")]
    #[case("## Procedure\n1. Mix")]
    #[case("#procedure\n1. Mix")]
    fn test_procedure_header_variants(#[case] text: &str) {
        assert!(has_section(&text.to_lowercase(), "procedure"));
    }

    #[test]
    fn test_absent_section() {
        let text = "# purpose\nthis sop covers cleaning.\n# scope\nline 3".to_lowercase();
        assert!(!has_section(&text, "definitions"));
        assert!(!has_section(&text, "revision history"));
    }

    #[test]
    fn test_permissive_substring_match() {
        // Any mention counts, even inside running prose
        let text = "the approvals are pending".to_string();
        assert!(has_section(&text, "approvals"));
    }

    #[test]
    fn test_section_patterns_are_lowercase() {
        let patterns = section_patterns("Revision History");
        assert!(patterns.contains(&"# revision history".to_string()));
        assert!(patterns.contains(&"#revision history".to_string()));
        assert!(patterns.contains(&"revision history:".to_string()));
        assert!(patterns.iter().all(|p| p == &p.to_lowercase()));
    }

    #[rstest]
    #[case("purpose", "Purpose")]
    #[case("revision history", "Revision History")]
    #[case("REFERENCES", "References")]
    #[case("21 cfr part", "21 Cfr Part")]
    fn test_title_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(title_case(input), expected);
    }

    #[test]
    fn test_present_tokens_keeps_table_order() {
        let found: Vec<&str> =
            present_tokens("lorem ipsum then tbd", ["tbd", "to be decided", "lorem ipsum"]).collect();
        assert_eq!(found, vec!["tbd", "lorem ipsum"]);
    }
}
