//! Rate-limited judge wrapper.
//!
//! Wraps any Judge with a request quota using the governor crate. This is
//! where judge-side pacing lives; the pipeline only adds its fixed
//! `judge_delay`.

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::error::JudgeResult;
use crate::traits::judge::{Judge, JudgePrompt};

type DefaultRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// A judge wrapper that enforces a request quota.
///
/// The limiter is shared across clones, so every worker holding a clone
/// draws from the same budget.
pub struct RateLimitedJudge<J: Judge> {
    inner: Arc<J>,
    limiter: Arc<DefaultRateLimiter>,
}

impl<J: Judge> Clone for RateLimitedJudge<J> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            limiter: self.limiter.clone(),
        }
    }
}

impl<J: Judge> RateLimitedJudge<J> {
    /// Allow `requests_per_minute`, evenly spaced (no burst).
    pub fn per_minute(judge: J, requests_per_minute: NonZeroU32) -> Self {
        Self::with_quota(
            judge,
            Quota::per_minute(requests_per_minute).allow_burst(nonzero!(1u32)),
        )
    }

    /// Create with a custom quota.
    pub fn with_quota(judge: J, quota: Quota) -> Self {
        Self {
            inner: Arc::new(judge),
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    pub fn inner(&self) -> &J {
        &self.inner
    }
}

#[async_trait]
impl<J: Judge> Judge for RateLimitedJudge<J> {
    async fn ask(&self, prompt: &JudgePrompt) -> JudgeResult<String> {
        self.limiter.until_ready().await;
        self.inner.ask(prompt).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
