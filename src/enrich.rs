//! Merge file-level classification into chunk metadata.

use crate::models::{Chunk, EnrichedChunk, FileMetadata};

/// Overlay each chunk's metadata on top of the file's metadata.
///
/// Chunk keys win on collision. Order is preserved and nothing is dropped.
pub fn enrich(file: &FileMetadata, chunks: Vec<Chunk>) -> Vec<EnrichedChunk> {
    let base = file.to_metadata();
    chunks
        .into_iter()
        .map(|chunk| {
            let mut metadata = base.clone();
            metadata.extend(chunk.metadata);
            EnrichedChunk {
                content: chunk.content,
                metadata,
            }
        })
        .collect()
}
