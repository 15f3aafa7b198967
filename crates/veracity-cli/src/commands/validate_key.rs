//! Validate-key command implementation.

use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use veracity_llm::{CredentialStatus, GroqProvider};

/// Execute the validate-key command.
pub async fn execute_validate_key(
    api_key: Option<&str>,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    config.validate()?;
    let credential = config.credential(api_key)?;
    let warning = credential.format_warning();

    let provider = GroqProvider::new(config.service.clone())?;
    let status = provider.probe(&credential).await;

    match formatter.format() {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": status.is_usable(),
                "status": status.describe(),
                "warning": warning,
            });
            println!("{}", serde_json::to_string(&output)?);
        }
        OutputFormat::Table => {
            if let Some(warning) = &warning {
                println!("{}", formatter.warning(warning));
            }
            println!("{}", render_status(&status, formatter));
        }
    }

    if status.is_usable() {
        Ok(())
    } else {
        Err(CliError::Failed("API key validation failed".to_string()))
    }
}

fn render_status(status: &CredentialStatus, formatter: &Formatter) -> String {
    match status {
        CredentialStatus::Valid => formatter.success(&status.describe()),
        CredentialStatus::ValidWithoutVerificationModel { .. } => {
            formatter.warning(&status.describe())
        }
        CredentialStatus::Invalid { .. } => formatter.error(&status.describe()),
    }
}
