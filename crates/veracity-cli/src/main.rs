//! Veracity CLI - Fact-check the claims in a piece of text.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use veracity_cli::commands;
use veracity_cli::{Cli, Command, Config, Formatter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so rendered results on stdout stay clean
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> veracity_cli::Result<()> {
    let path = match cli.config {
        Some(path) => PathBuf::from(path),
        None => Config::path()?,
    };
    let mut config = Config::load_from(&path)?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);
    let api_key = cli.api_key.as_deref();

    match cli.command {
        Command::Check(args) => {
            commands::execute_check(args, api_key, &config, &formatter).await?;
        }
        Command::ValidateKey => {
            commands::execute_validate_key(api_key, &config, &formatter).await?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &mut config, &path, &formatter)?;
        }
    }

    Ok(())
}
