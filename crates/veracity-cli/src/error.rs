//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No API key in flags, environment or config file
    #[error("No API key configured. Pass --api-key, set VERACITY_API_KEY or run 'veracity config set-key <KEY>'.")]
    MissingApiKey,

    /// Verification service error
    #[error(transparent)]
    Llm(#[from] veracity_llm::LlmError),

    /// Pipeline error
    #[error(transparent)]
    Pipeline(#[from] veracity_pipeline::PipelineError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The command ran but did not succeed; details were already rendered
    #[error("{0}")]
    Failed(String),
}
