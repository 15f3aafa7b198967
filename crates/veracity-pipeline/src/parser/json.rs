//! Locating and reconciling JSON payloads inside model output

use super::{ParsedResponse, ResponseKind};
use serde_json::{Map, Value};
use tracing::debug;
use veracity_domain::{Claim, FactCheckResult, Verdict};

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Interior of the first fenced block, preferring one tagged `json`
///
/// An unterminated fence (truncated output) runs to the end of the text.
pub(crate) fn fenced_payload(text: &str) -> Option<&str> {
    // ASCII lowercasing keeps byte offsets valid for `text`
    if let Some(start) = text.to_ascii_lowercase().find(JSON_FENCE) {
        let body = &text[start + JSON_FENCE.len()..];
        let end = body.find(FENCE).unwrap_or(body.len());
        return Some(body[..end].trim());
    }

    let start = text.find(FENCE)?;
    let mut body = &text[start + FENCE.len()..];

    // Skip a language tag on the opening line
    if let Some(newline) = body.find('\n') {
        let tag = body[..newline].trim();
        if tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            body = &body[newline + 1..];
        }
    }

    let end = body.find(FENCE).unwrap_or(body.len());
    Some(body[..end].trim())
}

/// Substring from the first `{` to the last `}`, inclusive
pub(crate) fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Parse `text` as JSON
pub(crate) fn parse_value(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("JSON parse failed: {}", e);
            None
        }
    }
}

/// Accept a parsed value if it has the shape `kind` expects
///
/// An object exposing the top-level key is unwrapped; a bare list is taken
/// as the payload itself. Anything else is rejected. A fact-check payload
/// with no usable record is rejected too, so later tiers can run.
pub(crate) fn reconcile(value: &Value, kind: ResponseKind) -> Option<ParsedResponse> {
    let items = match value {
        Value::Object(map) => map.get(kind.key())?.as_array()?,
        Value::Array(items) => items,
        _ => return None,
    };

    match kind {
        ResponseKind::Claims => Some(ParsedResponse::Claims(claims_from_items(items))),
        ResponseKind::FactChecks => {
            let records = fact_checks_from_items(items);
            if records.is_empty() {
                None
            } else {
                Some(ParsedResponse::FactChecks(records))
            }
        }
    }
}

fn claims_from_items(items: &[Value]) -> Vec<Claim> {
    let mut claims = Vec::with_capacity(items.len());

    for (idx, item) in items.iter().enumerate() {
        let position = idx as u32 + 1;
        let claim = match item {
            Value::String(text) => Claim::new(position, text.as_str()),
            Value::Object(obj) => {
                let id = id_field(obj).unwrap_or(position);
                let text = text_field(obj, &["claim", "text", "claim_text"]).unwrap_or_default();
                Claim::new(id, text)
            }
            _ => Err(format!("item {} is not an object", position)),
        };

        match claim {
            Ok(claim) => claims.push(claim),
            Err(e) => debug!("Skipping claim item: {}", e),
        }
    }

    claims
}

fn fact_checks_from_items(items: &[Value]) -> Vec<FactCheckResult> {
    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            let obj = item.as_object()?;
            let position = idx as u32 + 1;

            Some(FactCheckResult::new(
                id_field(obj).unwrap_or(position),
                text_field(obj, &["claim", "claim_text", "text"]).unwrap_or_default(),
                verdict_field(obj.get("verified")),
                text_field(obj, &["explanation", "reasoning", "reason"]).unwrap_or_default(),
                source_field(obj.get("source").or_else(|| obj.get("sources"))),
            ))
        })
        .collect()
}

/// A positive `claim_id`/`id`, given as a number or a numeric string
fn id_field(obj: &Map<String, Value>) -> Option<u32> {
    let value = obj.get("claim_id").or_else(|| obj.get("id"))?;
    let id = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;

    u32::try_from(id).ok().filter(|id| *id > 0)
}

/// First of `keys` holding a string
fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(|s| s.trim().to_string())
}

fn verdict_field(value: Option<&Value>) -> Verdict {
    match value {
        Some(Value::Bool(b)) => Verdict::from(*b),
        Some(Value::String(s)) => Verdict::parse(s).unwrap_or(Verdict::Unknown),
        _ => Verdict::Unknown,
    }
}

/// A source string, or a list of them joined with `; `
fn source_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("; "),
        _ => String::new(),
    }
}
