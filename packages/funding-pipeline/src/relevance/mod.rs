//! Relevance judge adapter.
//!
//! Turns listing text into a comparison prompt, asks a [`Judge`], and
//! reads the free-text answer back into a [`JudgeVerdict`]. Every failure
//! ends up inside the verdict; nothing here returns an error.

pub mod parse;
pub mod prompts;

pub use parse::{extract_summary, parse_verdict, ParsedVerdict};
pub use prompts::{build_prompt, format_references, truncate_words, SYSTEM_PROMPT, TRUNCATION_MARKER};

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{JudgeError, VerdictParseError};
use crate::traits::judge::Judge;
use crate::types::config::PipelineConfig;
use crate::types::reference::ReferenceProject;
use crate::types::verdict::{Decision, JudgeVerdict};

/// Asks a judge whether a listing fits the reference projects.
pub struct RelevanceJudge {
    judge: Arc<dyn Judge>,
    portal_label: String,
    word_limit: usize,
    max_references: usize,
}

impl RelevanceJudge {
    pub fn new(judge: Arc<dyn Judge>, portal_label: impl Into<String>) -> Self {
        let defaults = PipelineConfig::default();
        Self {
            judge,
            portal_label: portal_label.into(),
            word_limit: defaults.word_limit,
            max_references: defaults.max_references,
        }
    }

    /// Take word limit and reference cap from a pipeline config.
    pub fn with_config(mut self, config: &PipelineConfig) -> Self {
        self.word_limit = config.word_limit;
        self.max_references = config.max_references;
        self
    }

    /// Judge one listing's text. One judge call; never fails.
    pub async fn judge(&self, listing_text: &str, references: &[ReferenceProject]) -> JudgeVerdict {
        let prompt = build_prompt(
            listing_text,
            references,
            &self.portal_label,
            self.word_limit,
            self.max_references,
        );

        match self.judge.ask(&prompt).await {
            Ok(raw) if raw.trim().is_empty() => {
                let e = JudgeError::EmptyResponse;
                warn!(judge = self.judge.name(), error = %e, "Judge call failed");
                JudgeVerdict::error(&e)
            }
            Ok(raw) => verdict_from_response(raw),
            Err(e) => {
                warn!(judge = self.judge.name(), error = %e, "Judge call failed");
                JudgeVerdict::error(&e)
            }
        }
    }
}

/// Read a raw answer into a verdict; unrecognized answers are `Unknown`.
pub fn verdict_from_response(raw: String) -> JudgeVerdict {
    match parse_verdict(&raw) {
        Ok(parsed) => {
            debug!(decision = ?parsed.decision, "Parsed judge verdict");
            JudgeVerdict::new(parsed.decision, parsed.summary, raw)
        }
        Err(e) => {
            let VerdictParseError::Unparseable { fallback_summary } = &e;
            warn!(error = %e, "Judge response unparseable");
            JudgeVerdict::new(Decision::Unknown, fallback_summary.clone(), raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockJudge;

    #[tokio::test]
    async fn test_yes_answer() {
        let mock = Arc::new(MockJudge::new().with_default("Pertinence : Oui\nRésumé : Bon alignement."));
        let judge = RelevanceJudge::new(mock.clone(), "européen");

        let verdict = judge.judge("Deeptech call", &ReferenceProject::defaults()).await;

        assert_eq!(verdict.decision, Decision::Yes);
        assert_eq!(verdict.summary, "Bon alignement.");
        assert_eq!(mock.calls().len(), 1);
        assert!(mock.calls()[0].user.contains("appel à projets européen"));
    }

    #[tokio::test]
    async fn test_failure_is_error_verdict() {
        let judge = RelevanceJudge::new(Arc::new(MockJudge::new().failing("quota exceeded")), "européen");

        let verdict = judge.judge("text", &[]).await;

        assert_eq!(verdict.decision, Decision::Error);
        assert_eq!(verdict.summary, "Erreur: judge call failed: quota exceeded");
    }

    #[tokio::test]
    async fn test_blank_answer_is_error_verdict() {
        let judge = RelevanceJudge::new(Arc::new(MockJudge::new().with_default("  \n")), "européen");
        let verdict = judge.judge("text", &[]).await;

        assert_eq!(verdict.decision, Decision::Error);
        assert_eq!(verdict.summary, "Erreur: judge returned an empty response");
    }

    #[test]
    fn test_unparseable_is_unknown() {
        let verdict = verdict_from_response("Hmm\nhard to say\n".to_string());

        assert_eq!(verdict.decision, Decision::Unknown);
        assert_eq!(verdict.summary, "hard to say");
        assert_eq!(verdict.raw_response, "Hmm\nhard to say\n");
    }

    #[tokio::test]
    async fn test_word_limit_applies() {
        let mock = Arc::new(MockJudge::new().with_default("Pertinence: non"));
        let config = PipelineConfig::default().with_word_limit(2);
        let judge = RelevanceJudge::new(mock.clone(), "européen").with_config(&config);

        judge.judge("alpha beta gamma", &[]).await;

        assert!(mock.calls()[0].user.contains("alpha beta [...]"));
    }
}
