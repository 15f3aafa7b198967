//! Groq Provider Implementation
//!
//! Talks to an OpenAI-compatible chat-completions API (Groq by default) with
//! a caller-supplied bearer credential.
//!
//! # Features
//!
//! - One request per stage; nothing is retried here
//! - Service errors carry the status code and the message from the JSON
//!   error body, falling back to the status reason
//! - Credential probe via the model listing
//!
//! # Examples
//!
//! ```no_run
//! use veracity_llm::{Credential, GroqProvider, ServiceConfig, VerificationService};
//!
//! # async fn example() -> Result<(), veracity_llm::LlmError> {
//! let provider = GroqProvider::new(ServiceConfig::default())?;
//! let credential = Credential::new("gsk_...")?;
//! let raw = provider.extract_claims("The Eiffel Tower was completed in 1889.", &credential).await?;
//! println!("{}", raw);
//! # Ok(())
//! # }
//! ```

use crate::config::ServiceConfig;
use crate::credential::{Credential, CredentialStatus};
use crate::request::{ChatRequest, ChatResponse, ErrorBody, ModelList};
use crate::{LlmError, VerificationService};
use async_trait::async_trait;
use tracing::{debug, info};
use veracity_domain::Claim;

/// Verification service client over HTTP
#[derive(Debug, Clone)]
pub struct GroqProvider {
    config: ServiceConfig,
    client: reqwest::Client,
}

impl GroqProvider {
    /// Create a provider from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: ServiceConfig) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Config)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// The active configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Send one chat-completions request and return the first choice's text
    ///
    /// # Errors
    ///
    /// - [`LlmError::Transport`] if the request cannot be sent or read
    /// - [`LlmError::Service`] for a non-success status
    /// - [`LlmError::InvalidResponse`] if the body is not a chat completion
    pub async fn complete(
        &self,
        request: &ChatRequest,
        credential: &Credential,
    ) -> Result<String, LlmError> {
        debug!(
            "POST {} model={} prompt_len={} max_tokens={}",
            self.config.completions_url(),
            request.model,
            request.prompt_len(),
            request.max_tokens
        );

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(credential.expose())
            .json(request)
            .send()
            .await?;

        let response = check_status(response).await?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let text = body.into_text()?;
        debug!("Response length: {} chars", text.len());
        Ok(text)
    }

    /// List the model identifiers visible to `credential`
    pub async fn list_models(&self, credential: &Credential) -> Result<Vec<String>, LlmError> {
        let response = self
            .client
            .get(self.config.models_url())
            .bearer_auth(credential.expose())
            .send()
            .await?;

        let response = check_status(response).await?;

        let models: ModelList = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse model list: {}", e)))?;

        Ok(models.data.into_iter().map(|m| m.id).collect())
    }

    /// Check that `credential` works and can reach the verification model
    pub async fn probe(&self, credential: &Credential) -> CredentialStatus {
        match self.list_models(credential).await {
            Ok(models) => {
                let model = &self.config.verification_model;
                if models.iter().any(|m| m == model) {
                    CredentialStatus::Valid
                } else {
                    CredentialStatus::ValidWithoutVerificationModel {
                        model: model.clone(),
                    }
                }
            }
            Err(e) => CredentialStatus::Invalid {
                message: e.to_string(),
            },
        }
    }
}

#[async_trait]
impl VerificationService for GroqProvider {
    async fn extract_claims(
        &self,
        content: &str,
        credential: &Credential,
    ) -> Result<String, LlmError> {
        info!("Requesting claim extraction ({} chars of content)", content.len());
        let request = ChatRequest::extraction(&self.config, content);
        self.complete(&request, credential).await
    }

    async fn verify_claims(
        &self,
        claims: &[Claim],
        credential: &Credential,
    ) -> Result<String, LlmError> {
        info!("Requesting verification of {} claims", claims.len());
        let request = ChatRequest::verification(&self.config, claims)?;
        self.complete(&request, credential).await
    }
}

/// Pass a success response through; turn anything else into `LlmError::Service`
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    Err(LlmError::Service {
        status: status.as_u16(),
        message,
    })
}
