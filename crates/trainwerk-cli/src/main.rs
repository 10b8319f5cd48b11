// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trainwerk: Workout and body-metric extraction from fitness reports
//
// Entry point. Initialises logging, builds the extractor from configuration,
// and prints the result envelope as JSON on stdout.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use trainwerk_core::human_errors::humanize_error;
use trainwerk_core::{ExtractOptions, ExtractionConfig, ExtractionResult};
use trainwerk_extract::Extractor;

/// Extract workouts, exercises, dates, and body metrics from a fitness report
/// (PDF or scanned image).
#[derive(Debug, Parser)]
#[command(name = "trainwerk", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract one document and print the result envelope as JSON.
    Extract {
        /// Document to read. It is never modified or deleted.
        path: PathBuf,

        /// JSON configuration file. Missing fields take their defaults.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Opaque identifier of the uploading user, passed through.
        #[arg(long)]
        user_id: Option<String>,

        /// Mark the result as a preview that should not be persisted.
        #[arg(long)]
        preview: bool,

        /// Ask the caller to keep the original upload.
        #[arg(long)]
        preserve_original: bool,

        /// Override the OCR fallback threshold (characters of direct text).
        #[arg(long)]
        min_text_length: Option<usize>,

        /// Override the rasterization resolution.
        #[arg(long)]
        dpi: Option<u32>,

        /// Give up after this many seconds.
        #[arg(long)]
        timeout: Option<u64>,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Print the default configuration as JSON.
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&ExtractionConfig::default())?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Extract {
            path,
            config,
            user_id,
            preview,
            preserve_original,
            min_text_length,
            dpi,
            timeout,
            pretty,
        } => {
            let mut extraction_config = match &config {
                Some(config_path) => ExtractionConfig::load(config_path).with_context(|| {
                    format!("failed to load config from {}", config_path.display())
                })?,
                None => ExtractionConfig::default(),
            };
            if let Some(min_text_length) = min_text_length {
                extraction_config.min_text_length = min_text_length;
            }
            if let Some(dpi) = dpi {
                extraction_config.raster_dpi = dpi;
            }

            let options = ExtractOptions {
                user_id,
                preserve_original,
                preview_mode: preview,
            };

            tracing::info!(path = %path.display(), "Trainwerk starting");
            let extractor = Arc::new(Extractor::new(extraction_config));
            let result = match timeout {
                Some(seconds) => {
                    extractor
                        .extract_with_timeout(path, options, Duration::from_secs(seconds))
                        .await
                }
                None => extractor.extract_async(path, options).await,
            };

            let json = result.to_json_value()?;
            let rendered = if pretty {
                serde_json::to_string_pretty(&json)?
            } else {
                serde_json::to_string(&json)?
            };
            println!("{rendered}");

            for line in explain_errors(&result) {
                eprintln!("{line}");
            }
            if result.success {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(2))
            }
        }
    }
}

/// Every recorded error in plain language, two lines each. Terminal errors
/// are headed `error:`, the ones the run recovered from `warning:`.
fn explain_errors(result: &ExtractionResult) -> Vec<String> {
    result
        .causes
        .iter()
        .flat_map(|cause| {
            let human = humanize_error(cause);
            let heading = if cause.is_terminal() { "error" } else { "warning" };
            [
                format!("{heading}: {}", human.message),
                format!("  {}", human.suggestion),
            ]
        })
        .collect()
}
