//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;
use veracity_llm::Credential;

/// Execute the config command against the file at `path`.
pub fn execute_config(
    args: ConfigArgs,
    config: &mut Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            println!("{}", render_config(config, formatter)?);
        }
        ConfigAction::SetKey { key } => {
            let credential = Credential::new(key)?;
            if let Some(warning) = credential.format_warning() {
                println!("{}", formatter.warning(&warning));
            }

            config.api_key = Some(credential.expose().to_string());
            config.save_to(path)?;
            println!(
                "{}",
                formatter.success(&format!("API key saved to {}", path.display()))
            );
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn render_config(config: &Config, formatter: &Formatter) -> Result<String> {
    let shown = config.redacted();
    match formatter.format() {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&shown)?),
        OutputFormat::Table => toml::to_string_pretty(&shown)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e))),
    }
}
