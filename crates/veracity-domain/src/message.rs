//! Messages exchanged between the bridge and the pipeline
//!
//! Both directions are closed tagged unions. The `action` tag and field
//! names match the JSON the presentation layer already understands, so a
//! bridge can forward these values across a process boundary unchanged.

use crate::{Claim, FactCheckResult};
use serde::{Deserialize, Serialize};

/// Requests sent from the bridge to the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BridgeCommand {
    /// Start a fact check over `content` using the bearer credential `api_key`
    #[serde(rename_all = "camelCase")]
    StartFactCheck {
        /// Plain-text page content, already bounded by the bridge
        content: String,
        /// Service credential
        api_key: String,
    },
}

/// Notifications sent from the pipeline to the bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PipelineEvent {
    /// Interim claim list, emitted before verification starts
    ClaimsExtracted {
        /// Extracted claims in order
        claims: Vec<Claim>,
    },

    /// Final fact-check records
    FactCheckResults {
        /// Records in the order the service returned them
        results: Vec<FactCheckResult>,
    },

    /// A stage failed
    FactCheckError {
        /// Human-readable failure message
        error: String,
    },

    /// `start` was invoked while a run was in progress
    ToggleOverlay,
}

impl PipelineEvent {
    /// Tag of this event, as serialized in `action`
    pub fn action(&self) -> &'static str {
        match self {
            PipelineEvent::ClaimsExtracted { .. } => "claimsExtracted",
            PipelineEvent::FactCheckResults { .. } => "factCheckResults",
            PipelineEvent::FactCheckError { .. } => "factCheckError",
            PipelineEvent::ToggleOverlay => "toggleOverlay",
        }
    }
}
