//! Judge implementations.

pub mod rate_limited;

#[cfg(feature = "openai")]
mod openai;

pub use rate_limited::RateLimitedJudge;

#[cfg(feature = "openai")]
pub use openai::{OpenAIJudge, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
