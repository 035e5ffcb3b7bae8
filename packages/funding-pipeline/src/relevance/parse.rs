//! Parsing free-text judge answers into decisions.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::VerdictParseError;
use crate::types::verdict::Decision;

lazy_static! {
    // "Pertinence : Oui", "**Relevance** - no", "pertinence – NON"
    static ref DECISION_REGEX: Regex = Regex::new(
        r"(?i)(pertinence|relevance)\s*\**\s*[:\-–]\s*\**\s*(oui|non|yes|no)\b"
    ).unwrap();
}

const SUMMARY_MARKERS: [&str; 3] = ["résumé", "resume", "summary"];

/// Decision and summary recovered from a judge answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVerdict {
    /// `Yes` or `No`.
    pub decision: Decision,
    pub summary: String,
}

/// Parse a judge answer.
///
/// Fails with [`VerdictParseError::Unparseable`] when no relevance marker
/// is present; the error still carries the best summary found.
pub fn parse_verdict(raw: &str) -> Result<ParsedVerdict, VerdictParseError> {
    let summary = extract_summary(raw);

    let decision = DECISION_REGEX
        .captures(raw)
        .and_then(|caps| caps.get(2))
        .map(|answer| match answer.as_str().to_lowercase().as_str() {
            "oui" | "yes" => Decision::Yes,
            _ => Decision::No,
        });

    match decision {
        Some(decision) => Ok(ParsedVerdict { decision, summary }),
        None => Err(VerdictParseError::Unparseable {
            fallback_summary: summary,
        }),
    }
}

/// The text after the first summary marker line, or lines 2-4 joined.
pub fn extract_summary(raw: &str) -> String {
    let marked = raw.lines().find_map(|line| {
        let stripped = line
            .trim()
            .trim_start_matches(|c: char| c == '-' || c == '*' || c == '•' || c.is_whitespace());
        let lowered = stripped.to_lowercase();
        if !SUMMARY_MARKERS.iter().any(|m| lowered.starts_with(m)) {
            return None;
        }
        let (_, rest) = stripped.split_once(':')?;
        let rest = rest.trim().trim_matches('*').trim();
        (!rest.is_empty()).then(|| rest.to_string())
    });

    marked.unwrap_or_else(|| {
        raw.split('\n')
            .skip(1)
            .take(3)
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_french_answer() {
        let parsed = parse_verdict("Pertinence: Oui\nRésumé: Good fit.\nautre").unwrap();
        assert_eq!(parsed.decision, Decision::Yes);
        assert_eq!(parsed.summary, "Good fit.");
    }

    #[test]
    fn test_markdown_and_dash_variants() {
        let parsed =
            parse_verdict("**Pertinence** – NON\n- **Résumé rapide** : Hors sujet.").unwrap();
        assert_eq!(parsed.decision, Decision::No);
        assert_eq!(parsed.summary, "Hors sujet.");

        let parsed = parse_verdict("Relevance - yes\nSummary: matches AI work").unwrap();
        assert_eq!(parsed.decision, Decision::Yes);
        assert_eq!(parsed.summary, "matches AI work");
    }

    #[test]
    fn test_non_is_not_read_as_no_prefix() {
        let parsed = parse_verdict("Pertinence : non").unwrap();
        assert_eq!(parsed.decision, Decision::No);
    }

    #[test]
    fn test_unparseable_falls_back_to_lines() {
        let err = parse_verdict("Intro\nline two\nline three\nline four\nline five").unwrap_err();
        assert_eq!(
            err,
            VerdictParseError::Unparseable {
                fallback_summary: "line two line three line four".into()
            }
        );
    }

    #[test]
    fn test_answer_word_needs_boundary() {
        assert!(parse_verdict("Pertinence: nothing to say").is_err());
    }

    #[test]
    fn test_never_panics_on_odd_input() {
        for raw in ["", ":", "résumé", "Résumé :", "\n\n\n", "pertinence:"] {
            let _ = parse_verdict(raw);
        }
    }
}
