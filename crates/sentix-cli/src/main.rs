mod cli;
mod commands;
mod error;
mod logging;
mod metadata;
mod output;

use clap::Parser;
use std::process::ExitCode;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    logging::setup_tracing(&cli.log_level, cli.log_json)?;

    let output = commands::run(&cli).await?;
    output::render(&output, cli.format, cli.pretty)?;

    let envelope = &output.envelope;
    if cli.strict && (!envelope.meta.warnings.is_empty() || envelope.has_errors()) {
        return Err(CliError::StrictModeViolation {
            warning_count: envelope.meta.warnings.len(),
            error_count: envelope.errors.len(),
        });
    }

    if envelope.has_errors() {
        return Ok(ExitCode::from(3));
    }

    Ok(ExitCode::SUCCESS)
}
