//! Check command implementation.

use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::io::Read;
use tracing::{debug, warn};
use veracity_domain::PipelineEvent;
use veracity_llm::GroqProvider;
use veracity_pipeline::{FactCheckPipeline, StartOutcome};

/// Execute the check command.
pub async fn execute_check(
    args: CheckArgs,
    api_key: Option<&str>,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    config.validate()?;
    let content = read_content(args)?;
    let content = prepare_content(&content, config.settings.max_content_chars)?;

    let credential = config.credential(api_key)?;
    if let Some(warning) = credential.format_warning() {
        eprintln!("{}", formatter.warning(&warning));
    }

    let provider = GroqProvider::new(config.service.clone())?;
    let (pipeline, mut events) = FactCheckPipeline::channel(provider, &config.pipeline);

    // Render notifications while the run is in flight
    let render = async {
        while let Some(event) = events.recv().await {
            let last = matches!(
                event,
                PipelineEvent::FactCheckResults { .. } | PipelineEvent::FactCheckError { .. }
            );
            if let Some(output) = formatter.format_event(&event)? {
                println!("{}", output);
            }
            if last {
                break;
            }
        }
        Ok::<(), CliError>(())
    };

    let (outcome, rendered) = tokio::join!(pipeline.start(content, credential), render);
    rendered?;

    match outcome {
        StartOutcome::Completed => Ok(()),
        _ => Err(CliError::Failed("Fact check failed".to_string())),
    }
}

/// Text from the argument, the file, or stdin.
fn read_content(args: CheckArgs) -> Result<String> {
    if let Some(text) = args.text {
        return Ok(text);
    }
    if let Some(path) = args.file {
        debug!("Reading content from {}", path);
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Reject blank content and cut it to `max_chars` characters.
pub fn prepare_content(content: &str, max_chars: usize) -> Result<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(CliError::InvalidInput(
            "No content to fact check".to_string(),
        ));
    }

    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            warn!(
                "Content truncated to {} characters for the verification service",
                max_chars
            );
            Ok(content[..cut].to_string())
        }
        None => Ok(content.to_string()),
    }
}
