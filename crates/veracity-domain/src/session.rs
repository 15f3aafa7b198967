//! Session module - one end-to-end run of the pipeline

use crate::{Claim, FactCheckResult};
use std::collections::HashSet;
use std::fmt;

/// Unique identifier for a session based on UUIDv7
///
/// Used to correlate log lines across the two stages of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u128);

impl SessionId {
    /// Generate a new UUIDv7-based SessionId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Lifecycle phase of a session
///
/// ```text
/// Idle -> ExtractingClaims -> AwaitingVerification -> Completed
///               |                      |
///               +-------> Failed <-----+
/// ```
///
/// An extraction that yields no claims completes without a verification
/// stage (`ExtractingClaims -> Completed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No run has started
    Idle,

    /// Waiting on the extraction request
    ExtractingClaims,

    /// Claims are known; waiting on the verification request
    AwaitingVerification,

    /// Final results are available
    Completed,

    /// A stage failed; collected claims/results are retained
    Failed,
}

impl Phase {
    /// Get the phase name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::ExtractingClaims => "extracting_claims",
            Phase::AwaitingVerification => "awaiting_verification",
            Phase::Completed => "completed",
            Phase::Failed => "failed",
        }
    }

    /// Whether a network stage is outstanding
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Phase::ExtractingClaims | Phase::AwaitingVerification)
    }

    /// Whether the state machine allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Idle, Phase::ExtractingClaims)
                | (Phase::ExtractingClaims, Phase::AwaitingVerification)
                | (Phase::ExtractingClaims, Phase::Completed)
                | (Phase::ExtractingClaims, Phase::Failed)
                | (Phase::AwaitingVerification, Phase::Completed)
                | (Phase::AwaitingVerification, Phase::Failed)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One run of the pipeline for a single piece of content
///
/// The credential is deliberately absent: it is passed into each stage by
/// the orchestrator and dropped when the run ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Identifier for log correlation
    pub id: SessionId,

    /// Content submitted by the bridge
    pub content: String,

    /// Current phase
    pub phase: Phase,

    /// Claims produced by the extraction stage, in order
    pub claims: Vec<Claim>,

    /// Records produced by the verification stage, in order
    pub results: Vec<FactCheckResult>,

    /// Failure message, set when `phase` is `Failed`
    pub error: Option<String>,
}

impl Session {
    /// Create an idle session for the given content
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            content: content.into(),
            phase: Phase::Idle,
            claims: Vec::new(),
            results: Vec::new(),
            error: None,
        }
    }

    /// Move to `next`, rejecting transitions the state machine forbids
    pub fn transition(&mut self, next: Phase) -> Result<(), String> {
        if !self.phase.can_transition_to(next) {
            return Err(format!(
                "Invalid session transition: {} -> {}",
                self.phase, next
            ));
        }
        self.phase = next;
        Ok(())
    }

    /// Whether a network stage is outstanding
    pub fn is_in_progress(&self) -> bool {
        self.phase.is_in_progress()
    }

    /// Mark the session failed, keeping whatever was collected so far
    pub fn fail(&mut self, message: impl Into<String>) {
        self.phase = Phase::Failed;
        self.error = Some(message.into());
    }

    /// Results whose `claim_id` matches no extracted claim
    pub fn unmatched_results(&self) -> Vec<&FactCheckResult> {
        let known: HashSet<u32> = self.claims.iter().map(|c| c.id).collect();
        self.results
            .iter()
            .filter(|r| !known.contains(&r.claim_id))
            .collect()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(String::new())
    }
}
