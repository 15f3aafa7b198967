//! Configuration for the pipeline

use serde::{Deserialize, Serialize};
use veracity_domain::Verdict;

/// Verdict the text-mining tier assigns when it finds no verdict keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnclassifiedVerdict {
    /// Record the claim as false
    #[default]
    False,

    /// Record the claim as unknown
    Unknown,
}

impl UnclassifiedVerdict {
    /// The verdict this setting stands for
    pub fn verdict(&self) -> Verdict {
        match self {
            UnclassifiedVerdict::False => Verdict::False,
            UnclassifiedVerdict::Unknown => Verdict::Unknown,
        }
    }
}

/// Configuration for the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Verdict for text-mined sections with no verdict keyword
    pub unclassified_verdict: UnclassifiedVerdict,

    /// Maximum characters of a text-mined explanation, ellipsis included
    pub explanation_limit: usize,

    /// Characters of a section used as the claim when nothing better is found
    pub claim_excerpt_limit: usize,
}

impl PipelineConfig {
    /// Preset that never manufactures a verdict the service did not give
    pub fn conservative() -> Self {
        Self {
            unclassified_verdict: UnclassifiedVerdict::Unknown,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.explanation_limit < 4 {
            return Err("explanation_limit must be at least 4".to_string());
        }
        if self.claim_excerpt_limit == 0 {
            return Err("claim_excerpt_limit must be greater than 0".to_string());
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

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            unclassified_verdict: UnclassifiedVerdict::False,
            explanation_limit: 200,
            claim_excerpt_limit: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.unclassified_verdict.verdict(), Verdict::False);
    }

    #[test]
    fn test_conservative_config() {
        let config = PipelineConfig::conservative();
        assert!(config.validate().is_ok());
        assert_eq!(config.unclassified_verdict.verdict(), Verdict::Unknown);
    }

    #[test]
    fn test_invalid_explanation_limit() {
        let mut config = PipelineConfig::default();
        config.explanation_limit = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_parsing() {
        let config = PipelineConfig::from_toml("unclassified_verdict = \"unknown\"").unwrap();
        assert_eq!(config.unclassified_verdict, UnclassifiedVerdict::Unknown);
        assert_eq!(config.explanation_limit, 200);

        assert!(PipelineConfig::from_toml("unclassified_verdict = \"maybe\"").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PipelineConfig::conservative();
        let toml_str = config.to_toml().unwrap();
        assert_eq!(PipelineConfig::from_toml(&toml_str).unwrap(), config);
    }
}
