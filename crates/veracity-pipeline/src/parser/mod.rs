//! Resilient parser for verification-service output
//!
//! The service is asked for JSON but answers in natural language, so a
//! response may wrap its payload in a code fence, surround it with prose,
//! or ignore the JSON instruction altogether. [`ResponseParser`] runs an
//! ordered chain of [`Strategy`] values and takes the first result:
//!
//! 1. [`FencedBlock`]: interior of a code fence, preferring one tagged `json`
//! 2. [`DirectParse`]: the whole trimmed text
//! 3. [`BraceScan`]: first `{` through last `}`
//! 4. [`HeuristicSections`]: "Claim N:" sections of free text (fact checks)
//! 5. [`GenericFallback`]: one generic record (fact checks)
//!
//! Parsing never fails. Fact-check parsing always yields at least one
//! record; claim parsing yields an empty list when nothing is recoverable.

mod heuristic;
mod json;
mod strategy;

pub use strategy::{
    BraceScan, DirectParse, FencedBlock, GenericFallback, HeuristicSections, Strategy,
    FALLBACK_CLAIM, FALLBACK_EXPLANATION, FALLBACK_SOURCE,
};

use crate::config::PipelineConfig;
use tracing::{debug, warn};
use veracity_domain::{Claim, FactCheckResult};

/// Which schema a response is expected to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    /// Extraction output, keyed by `claims`
    Claims,

    /// Verification output, keyed by `fact_checks`
    FactChecks,
}

impl ResponseKind {
    /// Top-level JSON key holding the payload
    pub fn key(&self) -> &'static str {
        match self {
            ResponseKind::Claims => "claims",
            ResponseKind::FactChecks => "fact_checks",
        }
    }
}

/// A typed parse result
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    /// Claims in response order
    Claims(Vec<Claim>),

    /// Fact-check records in response order
    FactChecks(Vec<FactCheckResult>),
}

impl ParsedResponse {
    /// An empty result of `kind`
    pub fn empty(kind: ResponseKind) -> Self {
        match kind {
            ResponseKind::Claims => ParsedResponse::Claims(Vec::new()),
            ResponseKind::FactChecks => ParsedResponse::FactChecks(Vec::new()),
        }
    }

    /// The kind of this result
    pub fn kind(&self) -> ResponseKind {
        match self {
            ParsedResponse::Claims(_) => ResponseKind::Claims,
            ParsedResponse::FactChecks(_) => ResponseKind::FactChecks,
        }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        match self {
            ParsedResponse::Claims(claims) => claims.len(),
            ParsedResponse::FactChecks(records) => records.len(),
        }
    }

    /// Whether there are no items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered chain of recovery strategies
pub struct ResponseParser {
    strategies: Vec<Box<dyn Strategy>>,
}

impl ResponseParser {
    /// Create a parser with the default strategy chain
    pub fn new(config: &PipelineConfig) -> Self {
        Self::with_strategies(vec![
            Box::new(FencedBlock),
            Box::new(DirectParse),
            Box::new(BraceScan),
            Box::new(HeuristicSections::new(config.clone())),
            Box::new(GenericFallback),
        ])
    }

    /// Create a parser with a custom strategy chain
    pub fn with_strategies(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    /// Names of the strategies, in the order they are tried
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Parse `raw` as a response of `kind`
    ///
    /// A result whose kind does not match `kind` is ignored. If every
    /// strategy declines, an empty result is returned.
    pub fn parse(&self, raw: &str, kind: ResponseKind) -> ParsedResponse {
        for strategy in &self.strategies {
            match strategy.try_parse(raw, kind) {
                Some(parsed) if parsed.kind() == kind => {
                    debug!(
                        "Parsed {} {} with strategy {}",
                        parsed.len(),
                        kind.key(),
                        strategy.name()
                    );
                    return parsed;
                }
                Some(_) => warn!(
                    "Strategy {} returned the wrong response kind, ignoring",
                    strategy.name()
                ),
                None => debug!("Strategy {} declined", strategy.name()),
            }
        }

        if !raw.trim().is_empty() {
            warn!("No strategy recovered {} from a {}-char response", kind.key(), raw.len());
        }
        ParsedResponse::empty(kind)
    }

    /// Parse an extraction response
    pub fn parse_claims(&self, raw: &str) -> Vec<Claim> {
        match self.parse(raw, ResponseKind::Claims) {
            ParsedResponse::Claims(claims) => claims,
            ParsedResponse::FactChecks(_) => Vec::new(),
        }
    }

    /// Parse a verification response
    pub fn parse_fact_checks(&self, raw: &str) -> Vec<FactCheckResult> {
        match self.parse(raw, ResponseKind::FactChecks) {
            ParsedResponse::FactChecks(records) => records,
            ParsedResponse::Claims(_) => Vec::new(),
        }
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}

impl std::fmt::Debug for ResponseParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseParser")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}
