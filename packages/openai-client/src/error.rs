use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpenAIError>;

#[derive(Debug, Error)]
pub enum OpenAIError {
    /// The HTTP client could not be built
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failed or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body was not a completion
    #[error("Parse error: {0}")]
    Parse(String),

    /// The provider answered without any message content
    #[error("Empty completion from {model}")]
    EmptyCompletion { model: String },
}
