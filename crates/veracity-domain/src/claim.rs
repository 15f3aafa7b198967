//! Claim module - a single factual assertion slated for verification

use serde::{Deserialize, Serialize};
use std::fmt;

/// A claim extracted from page content
///
/// Identifiers are assigned sequentially from 1 by the extraction stage.
/// Uniqueness within a session is expected but not enforced. Claims are
/// immutable once created; fact-check records refer to them by `id`.
///
/// The serialized field names (`claim_id`, `claim`) match the shape the
/// verification service is asked to produce and consume.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    /// Positive identifier, sequential within a session
    #[serde(rename = "claim_id")]
    pub id: u32,

    /// The assertion itself (never empty)
    #[serde(rename = "claim")]
    pub text: String,
}

impl Claim {
    /// Create a new claim
    ///
    /// # Examples
    ///
    /// ```
    /// use veracity_domain::Claim;
    ///
    /// let claim = Claim::new(1, "The Eiffel Tower was completed in 1889.").unwrap();
    /// assert_eq!(claim.id, 1);
    ///
    /// assert!(Claim::new(0, "zero is not a valid id").is_err());
    /// assert!(Claim::new(2, "   ").is_err());
    /// ```
    pub fn new(id: u32, text: impl Into<String>) -> Result<Self, String> {
        if id == 0 {
            return Err("claim id must be positive".to_string());
        }

        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(format!("claim {} has empty text", id));
        }

        Ok(Self { id, text })
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.text)
    }
}
