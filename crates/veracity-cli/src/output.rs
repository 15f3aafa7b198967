//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use veracity_domain::{Claim, FactCheckResult, PipelineEvent, Verdict};
use tabled::{
    builder::Builder,
    settings::{
        object::{Columns, Rows},
        Alignment, Modify, Style, Width,
    },
};

/// Shown under an error notice.
pub const ERROR_HINT: &str = "Please try again later or check your API key settings.";

/// Shown when a run judged nothing.
pub const NO_CLAIMS: &str = "No claims found to fact check.";

const EXPLANATION_WIDTH: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render one pipeline event, or nothing if it has no terminal form.
    pub fn format_event(&self, event: &PipelineEvent) -> Result<Option<String>> {
        if self.format == OutputFormat::Json {
            return Ok(Some(serde_json::to_string(event)?));
        }

        let rendered = match event {
            PipelineEvent::ClaimsExtracted { claims } if claims.is_empty() => None,
            PipelineEvent::ClaimsExtracted { claims } => Some(self.format_claims(claims)),
            PipelineEvent::FactCheckResults { results } => Some(self.format_results(results)),
            PipelineEvent::FactCheckError { error } => Some(self.format_error(error)),
            PipelineEvent::ToggleOverlay => None,
        };
        Ok(rendered)
    }

    /// Interim claim list.
    fn format_claims(&self, claims: &[Claim]) -> String {
        let mut lines = vec![self.colorize("Extracted Claims", "cyan")];
        lines.extend(claims.iter().map(|c| format!("  {}. {}", c.id, c.text)));
        lines.push(self.info("Checking..."));
        lines.join("\n")
    }

    /// Final results as a table.
    fn format_results(&self, results: &[FactCheckResult]) -> String {
        if results.is_empty() {
            return self.colorize(NO_CLAIMS, "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Verdict", "Claim", "Explanation", "Source"]);

        for result in results {
            builder.push_record([
                result.claim_id.to_string(),
                self.verdict(result.verified),
                result.claim_text.clone(),
                result.explanation.clone(),
                result.source.clone(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .with(Modify::new(Columns::new(2..4)).with(Width::wrap(EXPLANATION_WIDTH)));

        let (t, f, u) = tally(results);
        format!(
            "{}\n{}",
            table,
            self.info(&format!(
                "{} checked: {} true, {} false, {} unknown",
                results.len(),
                t,
                f,
                u
            ))
        )
    }

    /// Error notice with the retry hint.
    pub fn format_error(&self, message: &str) -> String {
        format!(
            "{}\n{}",
            self.error(&format!("An error occurred: {}", message)),
            ERROR_HINT
        )
    }

    fn verdict(&self, verdict: Verdict) -> String {
        match verdict {
            Verdict::True => self.colorize("✓ TRUE", "green"),
            Verdict::False => self.colorize("✗ FALSE", "red"),
            Verdict::Unknown => self.colorize("? UNKNOWN", "yellow"),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Counts of true, false and unknown verdicts.
fn tally(results: &[FactCheckResult]) -> (usize, usize, usize) {
    results.iter().fold((0, 0, 0), |(t, f, u), r| match r.verified {
        Verdict::True => (t + 1, f, u),
        Verdict::False => (t, f + 1, u),
        Verdict::Unknown => (t, f, u + 1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<FactCheckResult> {
        vec![
            FactCheckResult::new(
                1,
                "The Eiffel Tower was completed in 1889.",
                Verdict::True,
                "Completed for the 1889 World's Fair.",
                "Britannica",
            ),
            FactCheckResult::new(2, "The moon is made of cheese.", Verdict::False, "It is rock.", ""),
        ]
    }

    #[test]
    fn test_table_results() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let event = PipelineEvent::FactCheckResults { results: results() };
        let output = formatter.format_event(&event).unwrap().unwrap();

        assert!(output.contains("Verdict"));
        assert!(output.contains("✓ TRUE"));
        assert!(output.contains("✗ FALSE"));
        assert!(output.contains("Not specified"));
        assert!(output.contains("2 checked: 1 true, 1 false, 0 unknown"));
    }

    fn strip_ansi(text: &str) -> String {
        let mut plain = String::with_capacity(text.len());
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                chars.by_ref().find(|&c| c == 'm');
            } else {
                plain.push(c);
            }
        }
        plain
    }

    #[test]
    fn test_colored_table_borders_align() {
        colored::control::set_override(true);
        let formatter = Formatter::new(OutputFormat::Table, true);
        let event = PipelineEvent::FactCheckResults { results: results() };
        let output = formatter.format_event(&event).unwrap().unwrap();
        assert!(output.contains('\x1b'));

        let plain = strip_ansi(&output);
        let table: Vec<&str> = plain.lines().filter(|line| !line.starts_with('ℹ')).collect();
        let width = table[0].chars().count();
        assert!(table.iter().all(|line| line.chars().count() == width));
    }

    #[test]
    fn test_empty_results() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let event = PipelineEvent::FactCheckResults { results: vec![] };
        assert_eq!(formatter.format_event(&event).unwrap().as_deref(), Some(NO_CLAIMS));
    }

    #[test]
    fn test_interim_claims() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let event = PipelineEvent::ClaimsExtracted {
            claims: vec![Claim::new(1, "Water boils at 100C.").unwrap()],
        };
        let output = formatter.format_event(&event).unwrap().unwrap();

        assert!(output.starts_with("Extracted Claims"));
        assert!(output.contains("  1. Water boils at 100C."));
        assert!(output.ends_with("Checking..."));
    }

    #[test]
    fn test_empty_interim_claims_not_rendered() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let event = PipelineEvent::ClaimsExtracted { claims: vec![] };
        assert!(formatter.format_event(&event).unwrap().is_none());
        assert!(formatter.format_event(&PipelineEvent::ToggleOverlay).unwrap().is_none());
    }

    #[test]
    fn test_error_notice() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_error("Verification service error (HTTP 401): Invalid API Key");
        assert_eq!(
            output,
            "✗ An error occurred: Verification service error (HTTP 401): Invalid API Key\nPlease try again later or check your API key settings."
        );
    }

    #[test]
    fn test_json_lines() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let event = PipelineEvent::FactCheckError {
            error: "boom".to_string(),
        };
        let output = formatter.format_event(&event).unwrap().unwrap();

        assert!(!output.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["action"], "factCheckError");
        assert_eq!(value["error"], "boom");
    }

    #[test]
    fn test_json_results_use_wire_names() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let event = PipelineEvent::FactCheckResults { results: results() };
        let output = formatter.format_event(&event).unwrap().unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["results"][0]["claim"], "The Eiffel Tower was completed in 1889.");
        assert_eq!(value["results"][0]["verified"], true);
        assert_eq!(value["results"][1]["verified"], false);
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("test"), "⚠ test");
    }

    #[test]
    fn test_tally() {
        let mut all = results();
        all.push(FactCheckResult::new(3, "x", Verdict::Unknown, "", ""));
        assert_eq!(tally(&all), (1, 1, 1));
    }
}
