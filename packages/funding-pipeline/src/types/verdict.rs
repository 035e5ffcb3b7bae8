//! Verdicts attached to listings by the two classification stages.

use serde::Serialize;

/// Result of the keyword stage.
///
/// Fields are private so that `is_relevant` can only ever mean
/// "at least one term matched".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordVerdict {
    is_relevant: bool,
    matched_terms: Vec<String>,
}

impl KeywordVerdict {
    /// Build a verdict from the matched terms, in dictionary order.
    pub fn from_matches(matched_terms: Vec<String>) -> Self {
        Self {
            is_relevant: !matched_terms.is_empty(),
            matched_terms,
        }
    }

    pub fn is_relevant(&self) -> bool {
        self.is_relevant
    }

    pub fn matched_terms(&self) -> &[String] {
        &self.matched_terms
    }

    /// Matched terms joined for the `Matching Word(s)` column.
    pub fn joined_terms(&self) -> String {
        self.matched_terms.join(", ")
    }

    /// `Yes`/`No` label for the `Pertinence` column.
    pub fn label(&self) -> &'static str {
        if self.is_relevant {
            "Yes"
        } else {
            "No"
        }
    }
}

/// Judge decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Yes,
    No,
    /// The judge answered but no relevance marker was recognized.
    Unknown,
    /// No answer: extraction or the judge call failed.
    Error,
}

impl Decision {
    /// Label used in the `Pertinence LLM` column.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Yes => "Oui",
            Decision::No => "Non",
            Decision::Unknown => "Inconnu",
            Decision::Error => "Erreur",
        }
    }
}

/// Result of the judge stage for one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JudgeVerdict {
    pub decision: Decision,
    pub summary: String,
    /// Full unparsed response, kept for audit.
    pub raw_response: String,
}

impl JudgeVerdict {
    pub fn new(decision: Decision, summary: impl Into<String>, raw_response: impl Into<String>) -> Self {
        Self {
            decision,
            summary: summary.into(),
            raw_response: raw_response.into(),
        }
    }

    /// Verdict for a listing whose extraction or judge call failed.
    pub fn error(error: &dyn std::error::Error) -> Self {
        Self {
            decision: Decision::Error,
            summary: format!("Erreur: {}", error),
            raw_response: error.to_string(),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.decision == Decision::Yes
    }
}
