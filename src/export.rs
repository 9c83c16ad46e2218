//! Serialize enriched chunks for downstream retrieval systems.
//!
//! Two shapes are supported:
//!
//! - **chunks**: the enriched chunks as-is, `{content, metadata}`, with
//!   list-valued metadata kept as JSON arrays.
//! - **records**: `{id, document, metadata}` rows for vector stores that
//!   only accept flat scalar metadata. Lists are flattened to their compact
//!   JSON text and nulls to `""`. IDs are derived from the file path, the
//!   chunk's position in its file, and a SHA-256 of its content, so
//!   re-exporting unchanged input produces identical IDs.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

use crate::models::{EnrichedChunk, MetadataValue, Scalar};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Chunks,
    Records,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "chunks" => Ok(OutputFormat::Chunks),
            "records" => Ok(OutputFormat::Records),
            other => bail!(
                "Unknown output format: '{}'. Must be chunks or records.",
                other
            ),
        }
    }
}

/// A flattened row ready for a vector index upsert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexRecord {
    pub id: String,
    pub document: String,
    pub metadata: BTreeMap<String, Scalar>,
}

/// All enriched chunks of one file, in emission order.
#[derive(Debug, Clone)]
pub struct FileChunks {
    pub file_path: String,
    pub chunks: Vec<EnrichedChunk>,
}

/// Build index records for one file's chunks.
pub fn to_records(file_path: &str, chunks: &[EnrichedChunk]) -> Vec<IndexRecord> {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| IndexRecord {
            id: record_id(file_path, i, &chunk.content),
            document: chunk.content.clone(),
            metadata: chunk
                .metadata
                .iter()
                .map(|(k, v)| (k.clone(), flatten_value(v)))
                .collect(),
        })
        .collect()
}

/// `{file_path}_{index}_{first 8 hex chars of sha256(content + file_path)}`.
pub fn record_id(file_path: &str, index: usize, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.update(file_path.as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    format!("{}_{}_{}", file_path, index, &hash[..8])
}

/// Collapse a metadata value to a single scalar.
pub fn flatten_value(value: &MetadataValue) -> Scalar {
    match value {
        MetadataValue::Null => Scalar::String(String::new()),
        MetadataValue::Scalar(s) => s.clone(),
        MetadataValue::List(items) => {
            Scalar::String(serde_json::to_string(items).unwrap_or_default())
        }
    }
}

/// Render the output document for the chosen format.
pub fn render(files: &[FileChunks], format: OutputFormat) -> Result<String> {
    let json = match format {
        OutputFormat::Chunks => {
            let chunks: Vec<&EnrichedChunk> =
                files.iter().flat_map(|f| f.chunks.iter()).collect();
            serde_json::to_string_pretty(&chunks)?
        }
        OutputFormat::Records => {
            let records: Vec<IndexRecord> = files
                .iter()
                .flat_map(|f| to_records(&f.file_path, &f.chunks))
                .collect();
            serde_json::to_string_pretty(&records)?
        }
    };
    Ok(json)
}

/// Write the rendered output to `path`, or to stdout when `path` is `-`.
pub fn write_output(path: &Path, json: &str) -> Result<()> {
    if path == Path::new("-") {
        println!("{}", json);
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metadata;

    fn enriched(content: &str, pairs: Vec<(&str, MetadataValue)>) -> EnrichedChunk {
        let metadata: Metadata = pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        EnrichedChunk {
            content: content.to_string(),
            metadata,
        }
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(OutputFormat::parse("chunks").unwrap(), OutputFormat::Chunks);
        assert_eq!(OutputFormat::parse("records").unwrap(), OutputFormat::Records);
        assert!(OutputFormat::parse("yaml").is_err());
    }

    #[test]
    fn test_record_id_is_stable() {
        let a = record_id("svc/Dockerfile", 2, "RUN true");
        let b = record_id("svc/Dockerfile", 2, "RUN true");
        assert_eq!(a, b);
        assert!(a.starts_with("svc/Dockerfile_2_"));
        assert_eq!(a.len(), "svc/Dockerfile_2_".len() + 8);
        assert_ne!(a, record_id("svc/Dockerfile", 2, "RUN false"));
    }

    #[test]
    fn test_flatten_value() {
        assert_eq!(flatten_value(&MetadataValue::Null), Scalar::String(String::new()));
        assert_eq!(flatten_value(&"x".into()), Scalar::from("x"));
        assert_eq!(
            flatten_value(&MetadataValue::List(vec![
                Scalar::from("push"),
                Scalar::from("pull_request")
            ])),
            Scalar::from(r#"["push","pull_request"]"#)
        );
        assert_eq!(
            flatten_value(&Scalar::Integer(3).into()),
            Scalar::Integer(3)
        );
    }

    #[test]
    fn test_records_are_flat_and_indexed_per_file() {
        let file = FileChunks {
            file_path: "a.yml".into(),
            chunks: vec![
                enriched(
                    "build: {}",
                    vec![("triggers", MetadataValue::List(vec![Scalar::from("push")]))],
                ),
                enriched("test: {}", vec![("instruction_type", MetadataValue::Null)]),
            ],
        };
        let records = to_records(&file.file_path, &file.chunks);
        assert_eq!(records.len(), 2);
        assert!(records[0].id.starts_with("a.yml_0_"));
        assert!(records[1].id.starts_with("a.yml_1_"));
        assert_eq!(records[0].metadata["triggers"], Scalar::from(r#"["push"]"#));
        assert_eq!(records[1].metadata["instruction_type"], Scalar::from(""));
        assert_eq!(records[1].document, "test: {}");
    }

    #[test]
    fn test_render_chunks_shape() {
        let files = vec![FileChunks {
            file_path: "Dockerfile".into(),
            chunks: vec![enriched("FROM alpine", vec![("base_image", "alpine".into())])],
        }];
        let json = render(&files, OutputFormat::Chunks).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["content"], "FROM alpine");
        assert_eq!(value[0]["metadata"]["base_image"], "alpine");
    }

    #[test]
    fn test_render_is_deterministic() {
        let files = vec![FileChunks {
            file_path: "Dockerfile".into(),
            chunks: vec![enriched("FROM alpine", vec![("b", "2".into()), ("a", "1".into())])],
        }];
        assert_eq!(
            render(&files, OutputFormat::Records).unwrap(),
            render(&files, OutputFormat::Records).unwrap()
        );
    }

    #[test]
    fn test_write_output_creates_parents() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/out.json");
        write_output(&path, "[]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
