//! Recovery strategies, tried in order by [`ResponseParser`](super::ResponseParser)

use super::heuristic;
use super::json::{brace_span, fenced_payload, parse_value, reconcile};
use super::{ParsedResponse, ResponseKind};
use crate::config::PipelineConfig;
use tracing::debug;
use veracity_domain::{FactCheckResult, Verdict};

/// One way of recovering a typed result from raw model output
///
/// A strategy returns `None` when it cannot produce a result of the
/// requested kind, letting the next strategy in the chain try.
pub trait Strategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Attempt to recover a result of `kind` from `raw`
    fn try_parse(&self, raw: &str, kind: ResponseKind) -> Option<ParsedResponse>;
}

/// Parse the interior of a fenced code block
///
/// Prefers a block tagged `json`. The interior is parsed directly, then
/// brace-scanned in case the block holds commentary around the payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct FencedBlock;

impl Strategy for FencedBlock {
    fn name(&self) -> &'static str {
        "fenced_block"
    }

    fn try_parse(&self, raw: &str, kind: ResponseKind) -> Option<ParsedResponse> {
        let payload = fenced_payload(raw)?;
        debug!("Found fenced block ({} chars)", payload.len());

        parse_value(payload)
            .and_then(|value| reconcile(&value, kind))
            .or_else(|| {
                let span = brace_span(payload)?;
                reconcile(&parse_value(span)?, kind)
            })
    }
}

/// Parse the whole trimmed text
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectParse;

impl Strategy for DirectParse {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn try_parse(&self, raw: &str, kind: ResponseKind) -> Option<ParsedResponse> {
        let value = parse_value(raw.trim())?;
        reconcile(&value, kind)
    }
}

/// Parse the span from the first `{` to the last `}`
///
/// Recovers payloads with prose before or after them.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceScan;

impl Strategy for BraceScan {
    fn name(&self) -> &'static str {
        "brace_scan"
    }

    fn try_parse(&self, raw: &str, kind: ResponseKind) -> Option<ParsedResponse> {
        let span = brace_span(raw)?;
        reconcile(&parse_value(span)?, kind)
    }
}

/// Mine "Claim N:" / "Fact Check N:" sections of free text
///
/// Applies to fact checks only; there is no text-mining fallback for claims.
#[derive(Debug, Clone, Default)]
pub struct HeuristicSections {
    config: PipelineConfig,
}

impl HeuristicSections {
    /// Create a text-mining strategy with the given settings
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }
}

impl Strategy for HeuristicSections {
    fn name(&self) -> &'static str {
        "heuristic_sections"
    }

    fn try_parse(&self, raw: &str, kind: ResponseKind) -> Option<ParsedResponse> {
        if kind != ResponseKind::FactChecks {
            return None;
        }

        let sections = heuristic::sections(raw)?;
        let records: Vec<_> = sections
            .into_iter()
            .zip(1u32..)
            .map(|(section, id)| heuristic::mine_section(id, section, &self.config))
            .collect();

        if records.is_empty() {
            None
        } else {
            Some(ParsedResponse::FactChecks(records))
        }
    }
}

/// Claim text of the record produced when nothing else could be recovered
pub const FALLBACK_CLAIM: &str = "Extracted claim";

/// Explanation of the fallback record
pub const FALLBACK_EXPLANATION: &str =
    "Could not properly parse fact check results. Please try again.";

/// Source of the fallback record
pub const FALLBACK_SOURCE: &str = "Error in processing";

/// Always produce the single generic fact-check record
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericFallback;

impl GenericFallback {
    /// The record this strategy produces
    pub fn record() -> FactCheckResult {
        FactCheckResult::new(
            1,
            FALLBACK_CLAIM,
            Verdict::False,
            FALLBACK_EXPLANATION,
            FALLBACK_SOURCE,
        )
    }
}

impl Strategy for GenericFallback {
    fn name(&self) -> &'static str {
        "generic_fallback"
    }

    fn try_parse(&self, _raw: &str, kind: ResponseKind) -> Option<ParsedResponse> {
        match kind {
            ResponseKind::FactChecks => Some(ParsedResponse::FactChecks(vec![Self::record()])),
            ResponseKind::Claims => None,
        }
    }
}
