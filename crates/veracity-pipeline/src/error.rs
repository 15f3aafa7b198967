//! Error types for the pipeline

use thiserror::Error;
use veracity_llm::LlmError;

/// Errors that end a pipeline run
///
/// Malformed service output is not an error: the parser always recovers
/// a best-effort result instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The service could not be reached or answered with a failure status
    #[error("{0}")]
    Transport(#[from] LlmError),

    /// The session state machine rejected a transition
    #[error("Invalid session state: {0}")]
    State(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
