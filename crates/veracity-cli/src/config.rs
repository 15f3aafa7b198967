//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use veracity_llm::{Credential, LlmError, ServiceConfig};
use veracity_pipeline::{PipelineConfig, PipelineError};

/// Environment variable consulted after `--api-key` / `VERACITY_API_KEY`.
pub const PROVIDER_KEY_ENV: &str = "GROQ_API_KEY";

/// Approximate token budget of the downstream service, in characters.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 300_000;

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Stored API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Verification service settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Parser settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Content beyond this many characters is dropped before checking
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON lines, one bridge message per line
    Json,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".veracity").join("config.toml"))
    }

    /// Load configuration from `path`, or the defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.service.validate().map_err(LlmError::Config)?;
        self.pipeline.validate().map_err(PipelineError::Config)?;
        if self.settings.max_content_chars == 0 {
            return Err(CliError::Config(
                "settings.max_content_chars must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the credential to use.
    ///
    /// `flag` (which clap also fills from `VERACITY_API_KEY`) wins, then
    /// `GROQ_API_KEY`, then the stored key.
    pub fn credential(&self, flag: Option<&str>) -> Result<Credential> {
        let env = std::env::var(PROVIDER_KEY_ENV).ok();
        self.credential_with_env(flag, env.as_deref())
    }

    fn credential_with_env(&self, flag: Option<&str>, env: Option<&str>) -> Result<Credential> {
        let key = [flag, env, self.api_key.as_deref()]
            .into_iter()
            .flatten()
            .find(|key| !key.trim().is_empty())
            .ok_or(CliError::MissingApiKey)?;

        Ok(Credential::new(key)?)
    }

    /// Copy of the configuration with the stored key masked, for display.
    pub fn redacted(&self) -> Self {
        let api_key = self
            .api_key
            .as_deref()
            .and_then(|key| Credential::new(key).ok())
            .map(|credential| credential.to_string());

        Self {
            api_key,
            ..self.clone()
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_max_content_chars() -> usize {
    DEFAULT_MAX_CONTENT_CHARS
}
