//! Veracity Verification Service Layer
//!
//! Client side of the two service requests the pipeline makes: claim
//! extraction and claim verification. Both return the model's raw text;
//! turning that text into records is the pipeline's job.
//!
//! # Providers
//!
//! - `GroqProvider`: OpenAI-compatible chat-completions API over HTTP
//! - `MockProvider`: Deterministic scripted responses for testing
//!
//! # Examples
//!
//! ```
//! use veracity_llm::{Credential, MockProvider, VerificationService};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockProvider::new(r#"{"claims": []}"#, r#"{"fact_checks": []}"#);
//! let credential = Credential::new("gsk_test").unwrap();
//! let raw = provider.extract_claims("some text", &credential).await.unwrap();
//! assert_eq!(raw, r#"{"claims": []}"#);
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod credential;
pub mod groq;
pub mod prompt;
pub mod request;

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::sync::Semaphore;
use veracity_domain::Claim;

pub use config::ServiceConfig;
pub use credential::{Credential, CredentialStatus};
pub use groq::GroqProvider;
pub use request::{ChatMessage, ChatRequest};

/// Errors that can occur while talking to the verification service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// The service answered with a non-success status
    #[error("Verification service error (HTTP {status}): {message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Message from the error body, else the status reason
        message: String,
    },

    /// The request could not be sent or its response could not be read
    #[error("Communication error: {0}")]
    Transport(String),

    /// A success response that is not a chat completion
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The credential is unusable
    #[error("Invalid API key: {0}")]
    InvalidCredential(String),

    /// Claims could not be serialized into the prompt
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Transport(format!("Request timed out: {}", e))
        } else if e.is_connect() {
            LlmError::Transport(format!("Connection failed: {}", e))
        } else {
            LlmError::Transport(e.to_string())
        }
    }
}

/// The two requests the pipeline makes of the verification service
///
/// Implementations return the model's raw text and never retry; retry
/// policy, if any, belongs to the caller.
#[async_trait]
pub trait VerificationService: Send + Sync {
    /// Ask the service to extract claims from `content`
    async fn extract_claims(
        &self,
        content: &str,
        credential: &Credential,
    ) -> Result<String, LlmError>;

    /// Ask the service to judge every claim in `claims` in one batch
    async fn verify_claims(
        &self,
        claims: &[Claim],
        credential: &Credential,
    ) -> Result<String, LlmError>;
}

/// Mock verification service for deterministic testing
///
/// Returns scripted responses without any network calls, counts calls per
/// stage, and records what it was asked. Clones share state.
///
/// # Examples
///
/// ```
/// use veracity_llm::{LlmError, MockProvider};
///
/// let provider = MockProvider::new("extraction text", "verification text");
/// provider.fail_verification(LlmError::Service {
///     status: 500,
///     message: "Internal Server Error".to_string(),
/// });
/// assert_eq!(provider.extraction_calls(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
    extraction_gate: Arc<Mutex<Option<Arc<Semaphore>>>>,
    verification_gate: Arc<Mutex<Option<Arc<Semaphore>>>>,
}

#[derive(Debug, Default)]
struct MockState {
    extraction: Option<Result<String, LlmError>>,
    verification: Option<Result<String, LlmError>>,
    extraction_calls: usize,
    verification_calls: usize,
    last_content: Option<String>,
    last_claims: Option<Vec<Claim>>,
    last_credential: Option<String>,
}

/// Handle returned by [`MockProvider::hold_extraction`] and
/// [`MockProvider::hold_verification`]
#[derive(Debug, Clone)]
pub struct MockGate {
    semaphore: Arc<Semaphore>,
}

impl MockGate {
    /// Let one held call proceed
    pub fn release(&self) {
        self.semaphore.add_permits(1);
    }
}

impl MockProvider {
    /// Create a MockProvider with fixed responses for each stage
    pub fn new(extraction: impl Into<String>, verification: impl Into<String>) -> Self {
        let provider = Self::default();
        {
            let mut state = provider.lock();
            state.extraction = Some(Ok(extraction.into()));
            state.verification = Some(Ok(verification.into()));
        }
        provider
    }

    /// Replace the extraction response
    pub fn set_extraction(&self, response: impl Into<String>) {
        self.lock().extraction = Some(Ok(response.into()));
    }

    /// Replace the verification response
    pub fn set_verification(&self, response: impl Into<String>) {
        self.lock().verification = Some(Ok(response.into()));
    }

    /// Make the extraction stage fail with `error`
    pub fn fail_extraction(&self, error: LlmError) {
        self.lock().extraction = Some(Err(error));
    }

    /// Make the verification stage fail with `error`
    pub fn fail_verification(&self, error: LlmError) {
        self.lock().verification = Some(Err(error));
    }

    /// Hold extraction calls open until the returned gate is released
    pub fn hold_extraction(&self) -> MockGate {
        hold(&self.extraction_gate)
    }

    /// Hold verification calls open until the returned gate is released
    pub fn hold_verification(&self) -> MockGate {
        hold(&self.verification_gate)
    }

    /// Number of extraction requests received
    pub fn extraction_calls(&self) -> usize {
        self.lock().extraction_calls
    }

    /// Number of verification requests received
    pub fn verification_calls(&self) -> usize {
        self.lock().verification_calls
    }

    /// Content passed to the most recent extraction request
    pub fn last_content(&self) -> Option<String> {
        self.lock().last_content.clone()
    }

    /// Claims passed to the most recent verification request
    pub fn last_claims(&self) -> Option<Vec<Claim>> {
        self.lock().last_claims.clone()
    }

    /// Raw key passed with the most recent request
    pub fn last_credential(&self) -> Option<String> {
        self.lock().last_credential.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl VerificationService for MockProvider {
    async fn extract_claims(
        &self,
        content: &str,
        credential: &Credential,
    ) -> Result<String, LlmError> {
        {
            let mut state = self.lock();
            state.extraction_calls += 1;
            state.last_content = Some(content.to_string());
            state.last_credential = Some(credential.expose().to_string());
        }

        pass(&self.extraction_gate).await?;

        self.lock()
            .extraction
            .clone()
            .unwrap_or_else(|| Ok(String::new()))
    }

    async fn verify_claims(
        &self,
        claims: &[Claim],
        credential: &Credential,
    ) -> Result<String, LlmError> {
        {
            let mut state = self.lock();
            state.verification_calls += 1;
            state.last_claims = Some(claims.to_vec());
            state.last_credential = Some(credential.expose().to_string());
        }

        pass(&self.verification_gate).await?;

        self.lock()
            .verification
            .clone()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

fn hold(slot: &Mutex<Option<Arc<Semaphore>>>) -> MockGate {
    let semaphore = Arc::new(Semaphore::new(0));
    *slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(Arc::clone(&semaphore));
    MockGate { semaphore }
}

/// Wait for a permit if the stage is held
async fn pass(slot: &Mutex<Option<Arc<Semaphore>>>) -> Result<(), LlmError> {
    let gate = slot.lock().unwrap_or_else(|e| e.into_inner()).clone();
    if let Some(semaphore) = gate {
        semaphore
            .acquire()
            .await
            .map_err(|e| LlmError::Transport(format!("Mock gate closed: {}", e)))?
            .forget();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> Credential {
        Credential::new("gsk_test").unwrap()
    }

    #[tokio::test]
    async fn test_mock_provider_fixed_responses() {
        let provider = MockProvider::new("claims text", "checks text");

        let extracted = provider.extract_claims("content", &credential()).await.unwrap();
        let verified = provider.verify_claims(&[], &credential()).await.unwrap();

        assert_eq!(extracted, "claims text");
        assert_eq!(verified, "checks text");
    }

    #[tokio::test]
    async fn test_mock_provider_call_counts() {
        let provider = MockProvider::new("a", "b");
        assert_eq!(provider.extraction_calls(), 0);

        provider.extract_claims("one", &credential()).await.unwrap();
        provider.extract_claims("two", &credential()).await.unwrap();
        provider.verify_claims(&[], &credential()).await.unwrap();

        assert_eq!(provider.extraction_calls(), 2);
        assert_eq!(provider.verification_calls(), 1);
        assert_eq!(provider.last_content().as_deref(), Some("two"));
        assert_eq!(provider.last_credential().as_deref(), Some("gsk_test"));
    }

    #[tokio::test]
    async fn test_mock_provider_scripted_error() {
        let provider = MockProvider::new("a", "b");
        provider.fail_extraction(LlmError::Service {
            status: 401,
            message: "Invalid API Key".to_string(),
        });

        let result = provider.extract_claims("x", &credential()).await;
        assert_eq!(
            result,
            Err(LlmError::Service {
                status: 401,
                message: "Invalid API Key".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_mock_provider_records_claims() {
        let provider = MockProvider::new("a", "b");
        let claims = vec![Claim::new(1, "X").unwrap(), Claim::new(2, "Y").unwrap()];

        provider.verify_claims(&claims, &credential()).await.unwrap();
        assert_eq!(provider.last_claims(), Some(claims));
    }

    #[tokio::test]
    async fn test_mock_provider_gate_holds_extraction() {
        let provider = MockProvider::new("released", "b");
        let gate = provider.hold_extraction();

        let cred = credential();
        let (result, _) = tokio::join!(provider.extract_claims("x", &cred), async {
            tokio::task::yield_now().await;
            gate.release();
        });

        assert_eq!(result.unwrap(), "released");
    }

    #[tokio::test]
    async fn test_mock_provider_gate_holds_verification() {
        let provider = MockProvider::new("a", "released");
        let gate = provider.hold_verification();
        let claims = vec![Claim::new(1, "X").unwrap()];

        let cred = credential();
        let (result, _) = tokio::join!(provider.verify_claims(&claims, &cred), async {
            tokio::task::yield_now().await;
            assert_eq!(provider.verification_calls(), 1);
            gate.release();
        });

        assert_eq!(result.unwrap(), "released");
    }

    #[test]
    fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("a", "b");
        let provider2 = provider1.clone();
        provider2.set_extraction("changed");

        assert_eq!(
            provider1.lock().extraction.clone(),
            Some(Ok("changed".to_string()))
        );
    }

    #[test]
    fn test_service_error_message() {
        let error = LlmError::Service {
            status: 429,
            message: "Rate limit reached".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Verification service error (HTTP 429): Rate limit reached"
        );
    }
}
