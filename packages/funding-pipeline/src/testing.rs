//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the pipeline
//! without making real LLM or network calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{ExtractError, ExtractResult, JudgeError, JudgeResult, ListError, ListResult};
use crate::traits::{
    extractor::Extractor,
    judge::{Judge, JudgePrompt},
    lister::Lister,
};
use crate::types::{config::PortalConfig, listing::RawRecord};

/// A mock judge.
///
/// Answers are picked by the first configured needle found in the user
/// prompt, else the default answer. Every prompt is recorded.
#[derive(Default)]
pub struct MockJudge {
    /// (needle, answer) pairs, checked in order
    answers: Arc<RwLock<Vec<(String, String)>>>,

    /// (needle, error message) pairs, checked before answers
    failures: Arc<RwLock<Vec<(String, String)>>>,

    /// Answer when no needle matches
    default_answer: String,

    /// Fail every call with this message
    fail_all: Option<String>,

    /// Simulated latency per call
    delay: Option<Duration>,

    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<JudgePrompt>>>,
}

impl MockJudge {
    /// Create a mock that answers "Pertinence : Non".
    pub fn new() -> Self {
        Self {
            default_answer: "Pertinence : Non\nRésumé : Aucun lien.".to_string(),
            ..Default::default()
        }
    }

    pub fn with_default(mut self, answer: impl Into<String>) -> Self {
        self.default_answer = answer.into();
        self
    }

    /// Answer `answer` when the prompt contains `needle`.
    pub fn with_answer(self, needle: impl Into<String>, answer: impl Into<String>) -> Self {
        self.answers
            .write()
            .unwrap()
            .push((needle.into(), answer.into()));
        self
    }

    /// Fail when the prompt contains `needle`.
    pub fn with_failure(self, needle: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures
            .write()
            .unwrap()
            .push((needle.into(), message.into()));
        self
    }

    /// Fail every call.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_all = Some(message.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get all prompts received.
    pub fn calls(&self) -> Vec<JudgePrompt> {
        self.calls.read().unwrap().clone()
    }

    /// Highest number of calls observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Judge for MockJudge {
    async fn ask(&self, prompt: &JudgePrompt) -> JudgeResult<String> {
        self.calls.write().unwrap().push(prompt.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(message) = &self.fail_all {
            return Err(JudgeError::Call(message.clone().into()));
        }

        if let Some((_, message)) = self
            .failures
            .read()
            .unwrap()
            .iter()
            .find(|(needle, _)| prompt.user.contains(needle.as_str()))
        {
            return Err(JudgeError::Call(message.clone().into()));
        }

        let answer = self
            .answers
            .read()
            .unwrap()
            .iter()
            .find(|(needle, _)| prompt.user.contains(needle.as_str()))
            .map(|(_, answer)| answer.clone())
            .unwrap_or_else(|| self.default_answer.clone());
        Ok(answer)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A mock extractor with per-URL text.
#[derive(Default)]
pub struct MockExtractor {
    texts: Arc<RwLock<HashMap<String, String>>>,
    failing: Arc<RwLock<Vec<String>>>,
    default_text: Option<String>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockExtractor {
    /// Create a mock with no pages: every URL yields `ExtractError::Empty`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.write().unwrap().insert(url.into(), text.into());
        self
    }

    /// Text returned for URLs without their own.
    pub fn with_default(mut self, text: impl Into<String>) -> Self {
        self.default_text = Some(text.into());
        self
    }

    /// Answer HTTP 503 for this URL.
    pub fn with_failure(self, url: impl Into<String>) -> Self {
        self.failing.write().unwrap().push(url.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    async fn extract(&self, url: &str) -> ExtractResult<String> {
        self.calls.write().unwrap().push(url.to_string());

        if self.failing.read().unwrap().iter().any(|u| u == url) {
            return Err(ExtractError::Status {
                url: url.to_string(),
                status: 503,
            });
        }

        self.texts
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .or_else(|| self.default_text.clone())
            .ok_or_else(|| ExtractError::Empty {
                url: url.to_string(),
            })
    }
}

/// A mock lister returning fixed records.
#[derive(Default)]
pub struct MockLister {
    records: Vec<RawRecord>,
    fail: bool,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockLister {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    /// A lister whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Portal ids listed so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl Lister for MockLister {
    async fn list(&self, portal: &PortalConfig) -> ListResult<Vec<RawRecord>> {
        self.calls.write().unwrap().push(portal.id.clone());
        if self.fail {
            return Err(ListError::Status {
                url: format!("mock://{}", portal.id),
                status: 503,
            });
        }
        Ok(self.records.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
