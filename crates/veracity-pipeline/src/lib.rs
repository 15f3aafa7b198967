//! Veracity Claim Pipeline
//!
//! Turns a piece of content into fact-check records in two service calls:
//! extract claims, then verify all of them in one batch. Service output is
//! recovered by a layered parser that never fails, and progress reaches
//! the presentation layer as typed events.
//!
//! # Architecture
//!
//! ```text
//! BridgeCommand ──> FactCheckPipeline ──extract──> VerificationService
//!                        │   ▲                            │
//!                        │   └──── ResponseParser <───────┘
//!                        ▼
//!                   PipelineEvent (claimsExtracted, factCheckResults,
//!                                  factCheckError, toggleOverlay)
//! ```
//!
//! # Modules
//!
//! - `parser`: strategy chain recovering claims and fact checks from raw text
//! - `orchestrator`: session state machine and event emission
//! - `config`: parser settings
//! - `error`: error types

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod parser;

pub use config::{PipelineConfig, UnclassifiedVerdict};
pub use error::PipelineError;
pub use orchestrator::{FactCheckPipeline, StartOutcome};
pub use parser::{ParsedResponse, ResponseKind, ResponseParser, Strategy};
