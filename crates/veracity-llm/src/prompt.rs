//! Prompt templates for the two service requests

use crate::LlmError;
use serde::Serialize;
use veracity_domain::Claim;

/// `{"claims": [...]}` with each claim's fields in declared order
#[derive(Serialize)]
struct ClaimsPayload<'a> {
    claims: &'a [Claim],
}

/// Build the claim extraction prompt, embedding `content` verbatim
pub fn build_extraction_prompt(content: &str) -> String {
    let mut prompt = String::with_capacity(
        EXTRACTION_INSTRUCTIONS.len() + content.len() + EXTRACTION_FORMAT.len() + 32,
    );

    prompt.push_str(EXTRACTION_INSTRUCTIONS);
    prompt.push_str("\n\nCONTENT:\n");
    prompt.push_str(content);
    prompt.push_str("\n\n");
    prompt.push_str(EXTRACTION_FORMAT);

    prompt
}

/// Build the verification prompt, embedding the claim list as JSON
///
/// The claims are wrapped as `{"claims": [...]}`, the same shape the
/// extraction stage was asked to return.
pub fn build_verification_prompt(claims: &[Claim]) -> Result<String, LlmError> {
    let payload = serde_json::to_string(&ClaimsPayload { claims })
        .map_err(|e| LlmError::Serialization(e.to_string()))?;

    let mut prompt = String::new();
    prompt.push_str(VERIFICATION_INSTRUCTIONS);
    prompt.push_str("\n\nCLAIMS TO CHECK:\n");
    prompt.push_str(&payload);
    prompt.push_str("\n\n");
    prompt.push_str(VERIFICATION_FORMAT);

    Ok(prompt)
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are an expert at identifying factual claims in text. Extract the key factual claims from the content below that should be fact-checked.

TASK:
1. Read the entire content.
2. Identify the most important claims that could be verified or disputed: statistics, historical events, scientific statements, attributions.
3. Prefer substantive claims that are central to the content's argument.
4. Ignore opinions, subjective statements and rhetorical questions.
5. Return between 5 and 10 of the most significant claims.
6. Extract only the claim itself, not the surrounding context.
7. Each claim must stand alone with enough context to be checked."#;

const EXTRACTION_FORMAT: &str = r#"OUTPUT FORMAT:
Return a JSON object with exactly this structure:
{
  "claims": [
    {
      "claim_id": 1,
      "claim": "The exact claim text as presented in the content"
    },
    {
      "claim_id": 2,
      "claim": "Another specific factual claim"
    }
  ]
}"#;

const VERIFICATION_INSTRUCTIONS: &str = r#"You are an expert fact-checker with access to current information via web search. Fact-check each claim rigorously and explain your verdict with reliable sources.

TASK:
1. Research each claim using your web search capability.
2. Decide whether each claim is TRUE or FALSE. Do not use "partially true".
3. Give a 2-3 sentence explanation grounded in the evidence you found.
4. Cite the specific, reliable source you used for each claim.
5. Be balanced and objective."#;

const VERIFICATION_FORMAT: &str = r#"CRITICAL INSTRUCTIONS:
- Respond ONLY with a valid JSON object in the exact format below.
- Do not include any text before or after the JSON.
- "verified" must be a boolean (true or false).

OUTPUT FORMAT:
{
  "fact_checks": [
    {
      "claim_id": 1,
      "claim": "The exact claim text",
      "verified": true,
      "explanation": "Why the claim is true, with specific details from your research",
      "source": "Specific source"
    },
    {
      "claim_id": 2,
      "claim": "Another claim text",
      "verified": false,
      "explanation": "Why the claim is false",
      "source": "Source"
    }
  ]
}"#;
