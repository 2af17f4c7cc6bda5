//! lexdeck-enrich - vocabulary term enrichment
//!
//! Passes:
//! - `terms`: print the terms extracted from an input file
//! - `enrich`: enrich every term and write the intermediate and export datasets
//! - `export`: re-render the export dataset from an intermediate dataset
//! - `sync`: copy generated media into a flashcard profile

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lexdeck_common::config::{load_config, LoggingConfig};
use lexdeck_enrich::config::{CliOverrides, EnrichConfig};
use lexdeck_enrich::dataset::{read_intermediate, DatasetSink, ExportWriter};
use lexdeck_enrich::sync::{FixedSelection, MediaSynchronizer, ProfileSelector, PromptSelector};
use lexdeck_enrich::term_extractor::{extract_line_terms, extract_terms};
use lexdeck_enrich::types::Term;
use lexdeck_enrich::workflow::Pipeline;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for lexdeck-enrich
#[derive(Parser, Debug)]
#[command(name = "lexdeck-enrich")]
#[command(about = "Build flashcard vocabulary datasets from free-form text")]
#[command(version)]
struct Cli {
    /// TOML configuration file (default: platform config dir)
    #[arg(long, global = true, env = "LEXDECK_CONFIG")]
    config: Option<PathBuf>,

    /// Audio source: dictionary or synthesized
    #[arg(long, global = true)]
    audio_strategy: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the terms extracted from an input file
    Terms {
        #[arg(short, long)]
        input: PathBuf,

        /// One term per line, no extraction
        #[arg(long)]
        line_mode: bool,
    },

    /// Enrich every term and write both datasets
    Enrich {
        #[arg(short, long)]
        input: PathBuf,

        /// One term per line, no extraction
        #[arg(long)]
        line_mode: bool,

        /// Intermediate dataset
        #[arg(long, default_value = "output.tsv")]
        dataset: PathBuf,

        /// Export dataset for flashcard import
        #[arg(long, default_value = "anki.tsv")]
        export: PathBuf,
    },

    /// Render the export dataset from an intermediate dataset
    Export {
        #[arg(long, default_value = "output.tsv")]
        dataset: PathBuf,

        #[arg(short, long, default_value = "anki.tsv")]
        output: PathBuf,
    },

    /// Copy generated media into a flashcard profile's media directory
    Sync {
        /// Profile number (prompted on stdin when omitted)
        #[arg(long)]
        profile: Option<String>,

        /// Flashcard application data folder holding the profiles
        #[arg(long)]
        anki_base: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (toml_config, origin) =
        load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&toml_config.logging)?;
    origin.log();

    let overrides = CliOverrides {
        anki_base_folder: match &cli.command {
            Command::Sync { anki_base, .. } => anki_base.clone(),
            _ => None,
        },
        audio_strategy: cli.audio_strategy.clone(),
    };
    let config = EnrichConfig::resolve(&overrides, &toml_config)?;

    match cli.command {
        Command::Terms { input, line_mode } => {
            for term in read_terms(&input, line_mode)? {
                println!("{}", term);
            }
        }

        Command::Enrich {
            input,
            line_mode,
            dataset,
            export,
        } => {
            let terms = read_terms(&input, line_mode)?;
            info!(terms = terms.len(), input = %input.display(), "Terms extracted");

            let pipeline = Pipeline::from_config(&config)?;
            let mut sink = DatasetSink::create(&dataset, &export)
                .with_context(|| format!("Failed to create {}", dataset.display()))?;

            let cancel_token = cancel_on_ctrl_c();
            let summary = pipeline.run(&terms, &mut sink, &cancel_token).await?;

            info!(
                processed = summary.processed,
                total = summary.total,
                dataset = %dataset.display(),
                export = %export.display(),
                "Datasets written"
            );
        }

        Command::Export { dataset, output } => {
            let rows = read_intermediate(&dataset)
                .with_context(|| format!("Failed to read {}", dataset.display()))?;

            let pipeline = Pipeline::from_config(&config)?;
            let mut writer = ExportWriter::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;

            let cancel_token = cancel_on_ctrl_c();
            pipeline.rebuild_export(rows, &mut writer, &cancel_token).await?;
        }

        Command::Sync { profile, .. } => {
            run_sync(&config, profile);
        }
    }

    Ok(())
}

/// Initialize tracing: `RUST_LOG` wins over the configured level
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    let file_layer = match &logging.file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    Ok(())
}

fn read_terms(input: &Path, line_mode: bool) -> Result<Vec<Term>> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let terms = if line_mode {
        extract_line_terms(&text)
    } else {
        extract_terms(&text)
    };
    Ok(terms.into_iter().collect())
}

/// Token cancelled on Ctrl+C; the pipeline stops before the next term
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, stopping after the current term");
            child.cancel();
        }
    });
    token
}

/// Sync failures are reported and leave the process usable
fn run_sync(config: &EnrichConfig, profile: Option<String>) {
    let Some(root) = &config.anki_base_folder else {
        warn!("Flashcard data folder not configured (ANKI_BASE_FOLDER or --anki-base), skipping sync");
        return;
    };

    let synchronizer = MediaSynchronizer::from_config(config);
    let stdin = io::stdin();
    let mut selector: Box<dyn ProfileSelector> = match profile {
        Some(choice) => Box::new(FixedSelection(choice)),
        None => Box::new(PromptSelector::new(stdin.lock(), io::stdout())),
    };

    match synchronizer.sync(root, selector.as_mut()) {
        Ok(report) => {
            for source in &report.skipped_sources {
                warn!(source = %source.display(), "Not synchronized (missing)");
            }
            info!(
                profile = %report.profile,
                copied = report.copied,
                failed = report.failed,
                "Sync finished"
            );
        }
        Err(e) => warn!(error = %e, "Sync skipped"),
    }
}
