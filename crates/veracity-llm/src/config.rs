//! Configuration for the verification service client

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default OpenAI-compatible endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1";

/// Lightweight model used to extract claims
pub const DEFAULT_EXTRACTION_MODEL: &str = "meta-llama/llama-4-maverick-17b-128e-instruct";

/// Search-augmented model used to verify claims
pub const DEFAULT_VERIFICATION_MODEL: &str = "compound-beta";

/// Sampling temperature; low to bias toward deterministic structured output
pub const DEFAULT_TEMPERATURE: f64 = 0.1;

/// Token ceiling for the extraction stage
pub const DEFAULT_EXTRACTION_MAX_TOKENS: u32 = 4000;

/// Token ceiling for the verification stage (room for cited evidence)
pub const DEFAULT_VERIFICATION_MAX_TOKENS: u32 = 8000;

/// Configuration for the verification service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the chat-completions API (no trailing slash)
    pub endpoint: String,

    /// Model for claim extraction
    pub extraction_model: String,

    /// Model for claim verification
    pub verification_model: String,

    /// Sampling temperature for both stages
    pub temperature: f64,

    /// `max_tokens` for the extraction request
    pub extraction_max_tokens: u32,

    /// `max_tokens` for the verification request
    pub verification_max_tokens: u32,

    /// Per-request timeout in seconds; unset leaves the transport default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ServiceConfig {
    /// Get the request timeout as a Duration, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// URL of the chat-completions resource
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }

    /// URL of the model listing resource
    pub fn models_url(&self) -> String {
        format!("{}/models", self.endpoint.trim_end_matches('/'))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if self.extraction_model.trim().is_empty() {
            return Err("extraction_model must not be empty".to_string());
        }
        if self.verification_model.trim().is_empty() {
            return Err("verification_model must not be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        if self.extraction_max_tokens == 0 || self.verification_max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if self.timeout_secs == Some(0) {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            extraction_model: DEFAULT_EXTRACTION_MODEL.to_string(),
            verification_model: DEFAULT_VERIFICATION_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            extraction_max_tokens: DEFAULT_EXTRACTION_MAX_TOKENS,
            verification_max_tokens: DEFAULT_VERIFICATION_MAX_TOKENS,
            timeout_secs: None,
        }
    }
}
