//! Path-based file classification.
//!
//! Assigns every file a [`FileType`] and, through the fixed profile table
//! on [`FileType::profile`], its authority and execution risk. Only the path
//! string is inspected; file contents are never read here.
//!
//! Rules are evaluated in order, first match wins:
//!
//! | Rule | File type |
//! |------|-----------|
//! | basename is exactly `Dockerfile` | `container_runtime` |
//! | under `.github/workflows` and ends in `.yml`/`.yaml` | `ci_pipeline` |
//! | ends in `.tf` | `infra_iac` |
//! | basename starts with `README` | `docs` |
//! | anything else | `unknown` |
//!
//! The service name is the path segment directly after the configured root
//! marker directory (default `rag_data_source`), or `"unknown"`.

use std::path::{Component, Path};

use crate::models::{FileMetadata, FileType};

pub const DEFAULT_ROOT_MARKER: &str = "rag_data_source";

const UNKNOWN: &str = "unknown";

/// Classifies paths relative to a root marker directory name.
#[derive(Debug, Clone)]
pub struct Classifier {
    root_marker: String,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_MARKER)
    }
}

impl Classifier {
    pub fn new(root_marker: impl Into<String>) -> Self {
        Self {
            root_marker: root_marker.into(),
        }
    }

    pub fn root_marker(&self) -> &str {
        &self.root_marker
    }

    /// Classify a path. Never fails; unrecognized paths fall into `unknown`.
    pub fn classify(&self, file_path: &str) -> FileMetadata {
        let segments = path_segments(file_path);
        let file_type = detect_file_type(&segments);
        let (authority, execution_risk) = file_type.profile();

        FileMetadata {
            file_path: file_path.to_string(),
            file_type,
            authority,
            execution_risk,
            environment: UNKNOWN.to_string(),
            service: self
                .service_for(&segments)
                .unwrap_or(UNKNOWN)
                .to_string(),
        }
    }

    fn service_for<'a>(&self, segments: &[&'a str]) -> Option<&'a str> {
        let idx = segments.iter().position(|s| *s == self.root_marker)?;
        segments.get(idx + 1).copied()
    }
}

/// Classify with the default root marker.
pub fn classify(file_path: &str) -> FileMetadata {
    Classifier::default().classify(file_path)
}

fn detect_file_type(segments: &[&str]) -> FileType {
    let basename = segments.last().copied().unwrap_or("");

    if basename == "Dockerfile" {
        FileType::ContainerRuntime
    } else if in_workflows_dir(segments)
        && (basename.ends_with(".yml") || basename.ends_with(".yaml"))
    {
        FileType::CiPipeline
    } else if basename.ends_with(".tf") {
        FileType::InfraIac
    } else if basename.starts_with("README") {
        FileType::Docs
    } else {
        FileType::Unknown
    }
}

/// True when `.github` is immediately followed by `workflows` somewhere
/// among the directory segments.
fn in_workflows_dir(segments: &[&str]) -> bool {
    let dirs = &segments[..segments.len().saturating_sub(1)];
    dirs.windows(2)
        .any(|pair| pair[0] == ".github" && pair[1] == "workflows")
}

fn path_segments(file_path: &str) -> Vec<&str> {
    Path::new(file_path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect()
}
