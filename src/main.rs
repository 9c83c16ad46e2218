//! # iac-rag CLI
//!
//! ## Usage
//!
//! ```bash
//! iac-rag --config ./config/iac-rag.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `iac-rag ingest` | Scan, classify, chunk, and write the JSON output |
//! | `iac-rag sources` | List scanned files with their classification |
//! | `iac-rag classify <path>` | Print the classification of one path |
//! | `iac-rag chunk <file>` | Print the enriched chunks of one file |
//!
//! Diagnostics go to stderr through `tracing` (filter with `RUST_LOG`);
//! stdout carries only command output.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use iac_rag::classify::Classifier;
use iac_rag::config::{self, Config};
use iac_rag::ingest::{self, process_file};
use iac_rag::sources;

/// iac-rag: classify and chunk Dockerfiles, GitHub Actions workflows, and
/// Terraform for retrieval pipelines.
#[derive(Parser)]
#[command(
    name = "iac-rag",
    about = "Classify and chunk infrastructure-as-code for retrieval pipelines",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/iac-rag.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the source tree and write chunks for every supported file.
    ///
    /// Files that cannot be read or parsed contribute zero chunks; the run
    /// always completes.
    Ingest {
        /// Output file, or `-` for stdout. Overrides `[output].path`.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output shape: `chunks` or `records`. Overrides `[output].format`.
        #[arg(long)]
        format: Option<String>,

        /// Show counts without writing the output file.
        #[arg(long)]
        dry_run: bool,

        /// Maximum number of files to process.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List scanned files and how each one is classified.
    Sources,

    /// Print the classification of a path as JSON. The file need not exist.
    Classify {
        path: String,
    },

    /// Classify, chunk, and enrich a single file; print the chunks as JSON.
    Chunk {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Single-path commands work without a config file.
    match &cli.command {
        Commands::Classify { path } => {
            let cfg = config::load_config(&cli.config).unwrap_or_else(|_| Config::minimal());
            let classifier = Classifier::new(cfg.classifier.root_marker);
            let metadata = classifier.classify(path);
            println!("{}", serde_json::to_string_pretty(&metadata)?);
            return Ok(());
        }
        Commands::Chunk { file } => {
            let cfg = config::load_config(&cli.config).unwrap_or_else(|_| Config::minimal());
            let classifier = Classifier::new(cfg.classifier.root_marker);
            let content = tokio::fs::read_to_string(file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let chunks = process_file(&classifier, &file.to_string_lossy(), &content);
            println!("{}", serde_json::to_string_pretty(&chunks)?);
            return Ok(());
        }
        _ => {}
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Ingest {
            output,
            format,
            dry_run,
            limit,
        } => {
            ingest::run_ingest(&cfg, output, format, dry_run, limit).await?;
        }
        Commands::Sources => {
            sources::list_sources(&cfg)?;
        }
        Commands::Classify { .. } | Commands::Chunk { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
