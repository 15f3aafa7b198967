//! Text mining for fact-check responses that carry no usable JSON
//!
//! The response is split on "Claim N:" / "Fact Check N:" markers and each
//! section becomes one record. Claim text, verdict, explanation and source
//! are pulled out of the section with simple patterns.

use crate::config::PipelineConfig;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use veracity_domain::{FactCheckResult, Verdict};

static SECTION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:claim|fact[ \t]*check)[ \t]*#?[ \t]*\d+[ \t]*:")
        .expect("section marker pattern is valid")
});

static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"\n]+)"|“([^”\n]+)”|(?:^|\s)'([^'\n]+)'"#).expect("quote pattern is valid")
});

static FIRST_SENTENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^\n]+?[.!?])(?:\s|$)").expect("sentence pattern is valid")
});

static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:not|cannot)\s+(?:be(?:en)?\s+)?(?:true|verified|verify|correct|accurate)\b|\b(?:false|incorrect|inaccurate)\b",
    )
    .expect("negative verdict pattern is valid")
});

static POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:true|verified|correct|accurate)\b")
        .expect("positive verdict pattern is valid")
});

static SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)\bsources?[ \t]*:[ \t]*(.+?)(?:\.\s|\.?$)").expect("source pattern is valid")
});

/// Split `text` into marker-delimited sections, dropping any preamble
///
/// Every marker yields a section, empty or not, so positions line up with
/// claim ids. Returns `None` when the text has no section marker at all.
pub(crate) fn sections(text: &str) -> Option<Vec<&str>> {
    let markers: Vec<_> = SECTION_MARKER.find_iter(text).collect();
    if markers.is_empty() {
        return None;
    }

    let sections = markers
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            let end = markers.get(i + 1).map_or(text.len(), |next| next.start());
            text[marker.end()..end].trim_matches(|c: char| c.is_whitespace() || c == '*' || c == '#')
        })
        .collect();

    Some(sections)
}

/// Build one record from a section of free text
pub(crate) fn mine_section(id: u32, section: &str, config: &PipelineConfig) -> FactCheckResult {
    let (claim, span) = claim_text(section, config.claim_excerpt_limit);

    let mut remainder = String::with_capacity(section.len());
    remainder.push_str(&section[..span.start]);
    remainder.push_str(&section[span.end..]);
    let explanation = remainder
        .trim()
        .trim_start_matches(|c: char| c == ':' || c == '-' || c.is_whitespace());

    FactCheckResult::new(
        id,
        claim,
        verdict(section).unwrap_or_else(|| config.unclassified_verdict.verdict()),
        truncate(explanation, config.explanation_limit),
        source(section).unwrap_or_default(),
    )
}

/// Claim text and the byte span it was taken from
///
/// First quoted span, else the first sentence, else a leading excerpt.
fn claim_text(section: &str, excerpt_limit: usize) -> (String, Range<usize>) {
    if let Some(caps) = QUOTED.captures(section) {
        if let (Some(whole), Some(inner)) = (
            caps.get(0),
            caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)),
        ) {
            return (inner.as_str().trim().to_string(), whole.range());
        }
    }

    if let Some(sentence) = FIRST_SENTENCE.captures(section).and_then(|caps| caps.get(1)) {
        return (sentence.as_str().trim().to_string(), sentence.range());
    }

    let end = section
        .char_indices()
        .nth(excerpt_limit)
        .map_or(section.len(), |(idx, _)| idx);
    let mut excerpt = section[..end].trim().to_string();
    if end < section.len() {
        excerpt.push_str("...");
    }
    (excerpt, 0..end)
}

/// Verdict from the earliest verdict keyword in `section`
fn verdict(section: &str) -> Option<Verdict> {
    let negative = NEGATIVE.find(section).map(|m| m.start());
    let positive = POSITIVE.find(section).map(|m| m.start());

    match (negative, positive) {
        (Some(neg), Some(pos)) if pos < neg => Some(Verdict::True),
        (Some(_), _) => Some(Verdict::False),
        (None, Some(_)) => Some(Verdict::True),
        (None, None) => None,
    }
}

fn source(section: &str) -> Option<String> {
    SOURCE
        .captures(section)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Cap `text` at `limit` characters, ending in `...` when cut
pub(crate) fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let kept: String = text.chars().take(limit.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnclassifiedVerdict;
    use veracity_domain::DEFAULT_SOURCE;

    #[test]
    fn test_sections_drop_preamble() {
        let text = "Here are my findings.\n\nClaim 1: First.\nCLAIM 2: Second.";
        assert_eq!(sections(text), Some(vec!["First.", "Second."]));
    }

    #[test]
    fn test_sections_fact_check_markers() {
        let text = "**Fact Check 1:** alpha\n**Fact check #2:** beta";
        assert_eq!(sections(text), Some(vec!["alpha", "beta"]));
    }

    #[test]
    fn test_sections_keep_empty_bodies() {
        let text = "Claim 1:\n\nClaim 2: Paris is in France. True.";
        assert_eq!(sections(text), Some(vec!["", "Paris is in France. True."]));
    }

    #[test]
    fn test_empty_section_record() {
        let record = mine_section(1, "", &PipelineConfig::default());
        assert_eq!(record.claim_id, 1);
        assert_eq!(record.claim_text, "");
        assert_eq!(record.explanation, "");
        assert_eq!(record.source, DEFAULT_SOURCE);
    }

    #[test]
    fn test_no_markers() {
        assert_eq!(sections("Nothing structured here."), None);
        assert_eq!(sections("Claim: without a number"), None);
    }

    #[test]
    fn test_quoted_claim_removed_from_explanation() {
        let config = PipelineConfig::default();
        let record = mine_section(
            1,
            "\"The Eiffel Tower was completed in 1889.\" This is true. Source: Britannica.",
            &config,
        );

        assert_eq!(record.claim_text, "The Eiffel Tower was completed in 1889.");
        assert_eq!(record.verified, Verdict::True);
        assert_eq!(record.explanation, "This is true. Source: Britannica.");
        assert_eq!(record.source, "Britannica");
    }

    #[test]
    fn test_curly_quotes() {
        let config = PipelineConfig::default();
        let record = mine_section(1, "“Water boils at 50C.” This is false.", &config);
        assert_eq!(record.claim_text, "Water boils at 50C.");
        assert_eq!(record.verified, Verdict::False);
    }

    #[test]
    fn test_apostrophe_is_not_a_quote() {
        let config = PipelineConfig::default();
        let record = mine_section(1, "It's widely reported. The claim is correct.", &config);
        assert_eq!(record.claim_text, "It's widely reported.");
        assert_eq!(record.explanation, "The claim is correct.");
    }

    #[test]
    fn test_first_sentence_claim() {
        let config = PipelineConfig::default();
        let record = mine_section(2, "Mount Everest is 8,849 m tall. Verified by survey.", &config);
        assert_eq!(record.claim_id, 2);
        assert_eq!(record.claim_text, "Mount Everest is 8,849 m tall.");
        assert_eq!(record.verified, Verdict::True);
        assert_eq!(record.source, DEFAULT_SOURCE);
    }

    #[test]
    fn test_excerpt_claim() {
        let config = PipelineConfig {
            claim_excerpt_limit: 10,
            ..PipelineConfig::default()
        };
        let record = mine_section(1, "no sentence end here at all", &config);
        assert_eq!(record.claim_text, "no sentenc...");

        let short = mine_section(1, "short", &config);
        assert_eq!(short.claim_text, "short");
    }

    #[test]
    fn test_verdict_keywords() {
        assert_eq!(verdict("This claim is true."), Some(Verdict::True));
        assert_eq!(verdict("This claim is FALSE."), Some(Verdict::False));
        assert_eq!(verdict("The figure is incorrect."), Some(Verdict::False));
        assert_eq!(verdict("This could not be verified."), Some(Verdict::False));
        assert_eq!(verdict("Sources show it is not accurate."), Some(Verdict::False));
        assert_eq!(verdict("Correct, though often called false."), Some(Verdict::True));
        assert_eq!(verdict("Mixed evidence."), None);
        assert_eq!(verdict("Untrue-ish construct"), None);
    }

    #[test]
    fn test_unclassified_verdict_setting() {
        let section = "Some statement. Evidence is mixed.";

        let record = mine_section(1, section, &PipelineConfig::default());
        assert_eq!(record.verified, Verdict::False);

        let config = PipelineConfig {
            unclassified_verdict: UnclassifiedVerdict::Unknown,
            ..PipelineConfig::default()
        };
        let record = mine_section(1, section, &config);
        assert_eq!(record.verified, Verdict::Unknown);
    }

    #[test]
    fn test_source_pattern() {
        assert_eq!(source("Sources: NASA, ESA. More text"), Some("NASA, ESA".to_string()));
        assert_eq!(source("source:  https://example.org/page"), Some("https://example.org/page".to_string()));
        assert_eq!(source("no attribution"), None);
    }

    #[test]
    fn test_explanation_truncated() {
        let config = PipelineConfig::default();
        let long = format!("\"X\" {}", "word ".repeat(100));
        let record = mine_section(1, &long, &config);

        assert_eq!(record.explanation.chars().count(), 200);
        assert!(record.explanation.ends_with("..."));
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
        assert_eq!(truncate("short", 8), "short");
    }
}
