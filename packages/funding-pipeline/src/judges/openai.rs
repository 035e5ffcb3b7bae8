//! Judge backed by an OpenAI-compatible chat completions endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use funding_pipeline::judges::OpenAIJudge;
//! use openai_client::OpenAIClient;
//!
//! let judge = OpenAIJudge::new(OpenAIClient::new(api_key)).with_model("llama3-70b-8192");
//! ```

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError};
use tracing::debug;

use crate::error::{JudgeError, JudgeResult};
use crate::traits::judge::{Judge, JudgePrompt};

pub const DEFAULT_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_TEMPERATURE: f32 = 1.0;
pub const DEFAULT_MAX_TOKENS: u32 = 3000;

/// LLM judge over [`OpenAIClient`].
#[derive(Clone)]
pub struct OpenAIJudge {
    client: OpenAIClient,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIJudge {
    pub fn new(client: OpenAIClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Judge for OpenAIJudge {
    async fn ask(&self, prompt: &JudgePrompt) -> JudgeResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message::system(&prompt.system), Message::user(&prompt.user)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        match self.client.chat_completion(&request).await {
            Ok(answer) => {
                debug!(model = %self.model, chars = answer.len(), "Judge answered");
                Ok(answer)
            }
            Err(OpenAIError::EmptyCompletion { .. }) => Err(JudgeError::EmptyResponse),
            Err(e) => Err(JudgeError::Call(Box::new(e))),
        }
    }

    fn name(&self) -> &str {
        &self.model
    }
}
