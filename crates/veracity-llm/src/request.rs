//! Chat-completions wire types and the per-stage request builders

use crate::config::ServiceConfig;
use crate::prompt::{build_extraction_prompt, build_verification_prompt};
use crate::LlmError;
use serde::{Deserialize, Serialize};
use veracity_domain::Claim;

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `user`, `assistant` or `system`
    pub role: String,

    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// A user-role message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `POST /chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,

    /// Conversation; the pipeline always sends a single user message
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature
    pub temperature: f64,

    /// Completion token ceiling
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Build the claim extraction request
    pub fn extraction(config: &ServiceConfig, content: &str) -> Self {
        Self {
            model: config.extraction_model.clone(),
            messages: vec![ChatMessage::user(build_extraction_prompt(content))],
            temperature: config.temperature,
            max_tokens: config.extraction_max_tokens,
        }
    }

    /// Build the claim verification request over the full claim list
    pub fn verification(config: &ServiceConfig, claims: &[Claim]) -> Result<Self, LlmError> {
        Ok(Self {
            model: config.verification_model.clone(),
            messages: vec![ChatMessage::user(build_verification_prompt(claims)?)],
            temperature: config.temperature,
            max_tokens: config.verification_max_tokens,
        })
    }

    /// Total prompt length in bytes
    pub fn prompt_len(&self) -> usize {
        self.messages.iter().map(|m| m.content.len()).sum()
    }
}

/// Response body from `POST /chat/completions`
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice
    pub fn into_text(self) -> Result<String, LlmError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                LlmError::InvalidResponse("Response contained no message content".to_string())
            })
    }
}

/// Error body returned with a non-success status
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub message: String,
}

/// Response body from `GET /models`
#[derive(Debug, Deserialize)]
pub(crate) struct ModelList {
    #[serde(default)]
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelEntry {
    pub id: String,
}
