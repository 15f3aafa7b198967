//! Fact-check records and the tri-state verdict

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source recorded when the verification service cites none
pub const DEFAULT_SOURCE: &str = "Not specified";

/// Tri-state classification of a claim's accuracy
///
/// On the wire a verdict is `true`, `false` or `null` (unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Verdict {
    /// The claim was judged accurate
    True,

    /// The claim was judged inaccurate
    False,

    /// The service's answer could not be classified
    Unknown,
}

impl Verdict {
    /// Get the verdict name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "true",
            Verdict::False => "false",
            Verdict::Unknown => "unknown",
        }
    }

    /// Parse a verdict from a string
    ///
    /// Accepts the spellings models tend to produce in place of a boolean.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "verified" | "correct" | "accurate" => Some(Verdict::True),
            "false" | "no" | "not verified" | "incorrect" | "inaccurate" => Some(Verdict::False),
            "unknown" | "unverified" | "unclear" | "null" | "none" => Some(Verdict::Unknown),
            _ => None,
        }
    }
}

impl From<bool> for Verdict {
    fn from(value: bool) -> Self {
        if value {
            Verdict::True
        } else {
            Verdict::False
        }
    }
}

impl From<Option<bool>> for Verdict {
    fn from(value: Option<bool>) -> Self {
        value.map(Verdict::from).unwrap_or(Verdict::Unknown)
    }
}

impl From<Verdict> for Option<bool> {
    fn from(value: Verdict) -> Self {
        match value {
            Verdict::True => Some(true),
            Verdict::False => Some(false),
            Verdict::Unknown => None,
        }
    }
}

impl std::str::FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid verdict: {}", s))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The verdict, explanation and source attached to one claim
///
/// `claim_id` should match a [`Claim::id`](crate::Claim) from the same
/// session but is advisory: the verification service may renumber or drop
/// claims, and nothing corrects that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckResult {
    /// Identifier of the claim this record judges
    pub claim_id: u32,

    /// Claim text as echoed by the verification service
    #[serde(rename = "claim")]
    pub claim_text: String,

    /// Verdict
    pub verified: Verdict,

    /// Evidence-backed explanation
    pub explanation: String,

    /// Cited source, or [`DEFAULT_SOURCE`]
    pub source: String,
}

impl FactCheckResult {
    /// Create a record, substituting [`DEFAULT_SOURCE`] for a blank source
    pub fn new(
        claim_id: u32,
        claim_text: impl Into<String>,
        verified: Verdict,
        explanation: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        let source = source.into();
        let source = if source.trim().is_empty() {
            DEFAULT_SOURCE.to_string()
        } else {
            source.trim().to_string()
        };

        Self {
            claim_id,
            claim_text: claim_text.into(),
            verified,
            explanation: explanation.into(),
            source,
        }
    }
}
