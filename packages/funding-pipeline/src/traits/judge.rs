//! Judge trait: free-text answers to a relevance prompt.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::JudgeResult;

/// A prompt for the judge: system instruction plus user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JudgePrompt {
    pub system: String,
    pub user: String,
}

impl JudgePrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// An LLM (or anything else) that answers a prompt with free text.
///
/// Pacing is the implementation's concern; see
/// [`RateLimitedJudge`](crate::judges::RateLimitedJudge).
#[async_trait]
pub trait Judge: Send + Sync {
    async fn ask(&self, prompt: &JudgePrompt) -> JudgeResult<String>;

    /// Name for logs.
    fn name(&self) -> &str {
        "judge"
    }
}
