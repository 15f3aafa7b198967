//! Veracity Domain Layer
//!
//! Core data model for the fact-check pipeline. Every other crate depends on
//! these types; this crate performs no I/O.
//!
//! ## Key Concepts
//!
//! - **Claim**: a single factual assertion extracted from page content
//! - **Fact-check record**: the verdict, explanation and source for one claim
//! - **Verdict**: tri-state classification (true / false / unknown)
//! - **Session**: one end-to-end run of the pipeline for one piece of content
//! - **Messages**: the closed set of notifications exchanged with the bridge

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod fact_check;
pub mod message;
pub mod session;

// Re-exports for convenience
pub use claim::Claim;
pub use fact_check::{FactCheckResult, Verdict, DEFAULT_SOURCE};
pub use message::{BridgeCommand, PipelineEvent};
pub use session::{Phase, Session, SessionId};
