use anyhow::Result;

use crate::chunkers::Chunker;
use crate::classify::Classifier;
use crate::config::Config;
use crate::connector_fs::scan_filesystem;

/// Print every scanned file with its classification.
pub fn list_sources(config: &Config) -> Result<()> {
    let classifier = Classifier::new(config.classifier.root_marker.clone());
    let files = scan_filesystem(config)?;

    println!(
        "{:<48} {:<18} {:<10} {:<10} {:<16} CHUNKER",
        "PATH", "TYPE", "AUTHORITY", "RISK", "SERVICE"
    );
    for file in &files {
        let meta = classifier.classify(&file.path_str());
        let chunker = Chunker::for_file_type(meta.file_type)
            .map(|c| c.name())
            .unwrap_or("-");
        println!(
            "{:<48} {:<18} {:<10} {:<10} {:<16} {}",
            file.relative, meta.file_type, meta.authority, meta.execution_risk, meta.service, chunker
        );
    }
    println!("{} files", files.len());

    Ok(())
}
