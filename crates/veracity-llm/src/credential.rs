//! Bearer credential for the verification service

use crate::LlmError;
use std::fmt;

/// Prefix carried by keys issued by the default provider
pub const KEY_PREFIX: &str = "gsk_";

/// An API key passed by value into each pipeline stage
///
/// `Debug` and `Display` never print the key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap an API key, rejecting an empty one
    pub fn new(key: impl Into<String>) -> Result<Self, LlmError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(LlmError::InvalidCredential(
                "API key is empty".to_string(),
            ));
        }
        Ok(Self(key))
    }

    /// The raw key, for the `Authorization` header only
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Warning to show when the key does not look like a provider key
    pub fn format_warning(&self) -> Option<String> {
        if self.0.starts_with(KEY_PREFIX) {
            None
        } else {
            Some(format!(
                "API key should start with \"{}\". Please check your key.",
                KEY_PREFIX
            ))
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible: String = self.0.chars().take(KEY_PREFIX.len()).collect();
        write!(f, "{}****", visible)
    }
}

/// Outcome of probing the service with a credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialStatus {
    /// Key accepted and the verification model is listed
    Valid,

    /// Key accepted but the verification model is not listed
    ValidWithoutVerificationModel {
        /// The model that was looked for
        model: String,
    },

    /// Key rejected or the probe failed
    Invalid {
        /// Why the probe failed
        message: String,
    },
}

impl CredentialStatus {
    /// Whether the key can be used at all
    pub fn is_usable(&self) -> bool {
        !matches!(self, CredentialStatus::Invalid { .. })
    }

    /// User-facing status string
    pub fn describe(&self) -> String {
        match self {
            CredentialStatus::Valid => {
                "API key is valid and has access to the verification model!".to_string()
            }
            CredentialStatus::ValidWithoutVerificationModel { model } => format!(
                "API key is valid, but the verification model '{}' may not be available.",
                model
            ),
            CredentialStatus::Invalid { message } => {
                format!("Error testing API key: {}", message)
            }
        }
    }
}
