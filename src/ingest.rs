//! Ingestion pipeline orchestration.
//!
//! Coordinates the full run: scan → classify → chunk → enrich → export.
//! A bad file never aborts the run: files without a chunker are skipped
//! before they are read, and unreadable files contribute zero chunks.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::chunkers::Chunker;
use crate::classify::Classifier;
use crate::config::Config;
use crate::connector_fs::{self, SourceFile};
use crate::enrich::enrich;
use crate::export::{self, FileChunks, OutputFormat};
use crate::models::{EnrichedChunk, FileMetadata, FileType};

/// Classify, chunk, and enrich one file's content.
pub fn process_file(classifier: &Classifier, file_path: &str, content: &str) -> Vec<EnrichedChunk> {
    let metadata = classifier.classify(file_path);
    match Chunker::for_file_type(metadata.file_type) {
        Some(chunker) => chunk_classified(&metadata, chunker, file_path, content),
        None => Vec::new(),
    }
}

/// Chunk content whose classification and chunker are already known.
fn chunk_classified(
    metadata: &FileMetadata,
    chunker: Chunker,
    file_path: &str,
    content: &str,
) -> Vec<EnrichedChunk> {
    enrich(metadata, chunker.chunk(file_path, content))
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestStats {
    pub files_scanned: u64,
    pub files_chunked: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    pub chunks_written: u64,
    pub chunks_by_type: BTreeMap<FileType, u64>,
}

/// Process scanned files in order. Returns per-file chunks plus counters.
pub async fn ingest_files(
    classifier: &Classifier,
    files: &[SourceFile],
) -> (Vec<FileChunks>, IngestStats) {
    let mut stats = IngestStats {
        files_scanned: files.len() as u64,
        ..Default::default()
    };
    let mut results = Vec::new();

    for file in files {
        let file_path = file.path_str();
        let metadata = classifier.classify(&file_path);

        let Some(chunker) = Chunker::for_file_type(metadata.file_type) else {
            tracing::warn!(
                file = %file_path,
                file_type = %metadata.file_type,
                "no chunker for file"
            );
            stats.files_skipped += 1;
            continue;
        };

        let content = match tokio::fs::read_to_string(&file.path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(file = %file_path, error = %e, "failed to read file");
                stats.files_failed += 1;
                continue;
            }
        };

        let chunks = chunk_classified(&metadata, chunker, &file_path, &content);
        tracing::info!(file = %file_path, chunks = chunks.len(), "processed");

        stats.files_chunked += 1;
        stats.chunks_written += chunks.len() as u64;
        *stats.chunks_by_type.entry(metadata.file_type).or_default() += chunks.len() as u64;

        results.push(FileChunks { file_path, chunks });
    }

    (results, stats)
}

pub async fn run_ingest(
    config: &Config,
    output: Option<PathBuf>,
    format: Option<String>,
    dry_run: bool,
    limit: Option<usize>,
) -> Result<()> {
    let format = OutputFormat::parse(format.as_deref().unwrap_or(&config.output.format))?;
    let output = output.unwrap_or_else(|| config.output.path.clone());
    let classifier = Classifier::new(config.classifier.root_marker.clone());

    let mut files = connector_fs::scan_filesystem(config)?;
    if let Some(lim) = limit {
        files.truncate(lim);
    }

    let (results, stats) = ingest_files(&classifier, &files).await;

    if dry_run {
        println!("ingest {} (dry-run)", config.source.root.display());
        print_stats(&stats);
        return Ok(());
    }

    let json = export::render(&results, format)?;
    export::write_output(&output, &json)?;

    // Keep stdout clean when the JSON itself goes there.
    if output.as_path() != Path::new("-") {
        println!("ingest {}", config.source.root.display());
        print_stats(&stats);
        println!("  output: {}", output.display());
        println!("ok");
    }
    Ok(())
}

fn print_stats(stats: &IngestStats) {
    println!("  files scanned: {}", stats.files_scanned);
    println!("  files chunked: {}", stats.files_chunked);
    println!("  files skipped: {}", stats.files_skipped);
    println!("  files failed: {}", stats.files_failed);
    println!("  chunks written: {}", stats.chunks_written);
    for (file_type, count) in &stats.chunks_by_type {
        println!("    {:<18} {}", file_type.as_str(), count);
    }
}
