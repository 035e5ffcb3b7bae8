//! Minimal client for OpenAI-compatible `/chat/completions` endpoints
//! (Groq by default, or any gateway speaking the same protocol).
//!
//! ```rust,ignore
//! use openai_client::{ChatRequest, Message, OpenAIClient};
//!
//! let client = OpenAIClient::new(api_key).with_timeout(Duration::from_secs(120))?;
//! let text = client
//!     .chat_completion(&ChatRequest {
//!         model: "llama3-70b-8192",
//!         messages: vec![Message::system("Be brief."), Message::user("Hello")],
//!         temperature: 1.0,
//!         max_tokens: 3000,
//!     })
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{OpenAIError, Result};
pub use types::{ChatRequest, Message, Role};

use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, warn};

/// Groq's OpenAI-compatible endpoint.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

#[derive(Clone)]
pub struct OpenAIClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Client for [`GROQ_BASE_URL`]; see [`OpenAIClient::with_base_url`].
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            base_url: GROQ_BASE_URL.to_string(),
        }
    }

    /// Point at another endpoint. A trailing `/` is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OpenAIError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(self)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Send `request` and return the first choice's text, trimmed.
    ///
    /// A reply with no text is [`OpenAIError::EmptyCompletion`], never an
    /// empty string.
    pub async fn chat_completion(&self, request: &ChatRequest<'_>) -> Result<String> {
        let started = Instant::now();

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Chat completion request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %message, "Chat completion rejected");
            return Err(OpenAIError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: types::Completion = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;
        let text = completion
            .into_text()
            .ok_or_else(|| OpenAIError::EmptyCompletion {
                model: request.model.to_string(),
            })?;

        debug!(
            model = request.model,
            duration_ms = started.elapsed().as_millis(),
            chars = text.len(),
            "Chat completion"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        assert_eq!(
            OpenAIClient::new("k").endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(
            OpenAIClient::new("k").with_base_url("http://gateway:8080/v1/").endpoint(),
            "http://gateway:8080/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let client = OpenAIClient::new("k")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2))
            .unwrap();
        let request = ChatRequest {
            model: "m",
            messages: vec![Message::user("hi")],
            temperature: 1.0,
            max_tokens: 1,
        };

        let err = client.chat_completion(&request).await.unwrap_err();
        assert!(matches!(err, OpenAIError::Network(_)));
    }
}
