//! Wire types for `/chat/completions`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One conversation turn, borrowed from the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message<'a> {
    pub role: Role,
    pub content: &'a str,
}

impl<'a> Message<'a> {
    pub fn system(content: &'a str) -> Self {
        Self {
            role: Role::System,
            content,
        }
    }

    pub fn user(content: &'a str) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }
}

/// Request body. Sampling settings are always sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<Message<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The part of a completion response the client reads.
#[derive(Debug, Deserialize)]
pub(crate) struct Completion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Reply,
}

#[derive(Debug, Deserialize)]
struct Reply {
    content: Option<String>,
}

impl Completion {
    /// Trimmed text of the first choice; `None` when null or blank.
    pub(crate) fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}
