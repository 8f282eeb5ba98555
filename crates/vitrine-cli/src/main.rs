//! Vitrine CLI: run the media attachment pipeline over local files.
//!
//! Limits and collaborators come from VITRINE_* environment variables (a `.env`
//! file is honoured). Set VITRINE_UPLOAD_DIR to keep the uploaded bytes.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use vitrine_cli::{init_tracing, render_table, run_attach, Mode};
use vitrine_core::{AppError, AttachmentConfig};
use vitrine_infra::ErrorResponse;

#[derive(Parser)]
#[command(name = "vitrine", about = "Storefront media attachment pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate, upload and attach files as a form would
    Attach {
        /// Form the files are attached to
        #[arg(long, value_enum, default_value = "request")]
        mode: Mode,
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
        /// Files to attach, in selection order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the effective attachment limits and settings
    Limits,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let (config, warnings) =
        AttachmentConfig::from_env_with_warnings().context("Failed to load configuration")?;
    init_tracing(&config)?;
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Attach {
            mode,
            format,
            files,
        } => {
            let report = match run_attach(&config, mode, &files).await {
                Ok(report) => report,
                Err(e) => {
                    let err = AppError::from(e);
                    tracing::error!(error = %err.detailed_message(), "Attach failed");
                    print_json(&ErrorResponse::from_app_error(&err, !config.is_production()))?;
                    vitrine_infra::shutdown_telemetry().await;
                    std::process::exit(1);
                }
            };
            tracing::info!(
                accepted = report.outcome.accepted.len(),
                rejected = report.outcome.rejected.len(),
                skipped = report.outcome.skipped.len(),
                "Attach finished"
            );
            match format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Table => print!("{}", render_table(&report)),
            }
        }
        Commands::Limits => print_json(&config)?,
    }

    vitrine_infra::shutdown_telemetry().await;
    Ok(())
}
