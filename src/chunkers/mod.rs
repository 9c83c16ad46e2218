//! Format-specific chunkers and the dispatch table that selects them.
//!
//! | File type | Chunker |
//! |-----------|---------|
//! | `container_runtime` | [`Chunker::Dockerfile`], one chunk per instruction |
//! | `ci_pipeline` | [`Chunker::Workflow`], one chunk per job |
//! | `infra_iac` | [`Chunker::Terraform`], one chunk per labeled block |
//! | anything else | none |
//!
//! Chunkers never fail: content they cannot parse produces no chunks.

pub mod dockerfile;
pub mod terraform;
pub mod workflow;

use crate::models::{Chunk, FileType};

pub use dockerfile::chunk_dockerfile;
pub use terraform::chunk_terraform;
pub use workflow::chunk_workflow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunker {
    Dockerfile,
    Workflow,
    Terraform,
}

impl Chunker {
    /// Returns `None` for file types that are classified but not chunked.
    pub fn for_file_type(file_type: FileType) -> Option<Self> {
        match file_type {
            FileType::ContainerRuntime => Some(Chunker::Dockerfile),
            FileType::CiPipeline => Some(Chunker::Workflow),
            FileType::InfraIac => Some(Chunker::Terraform),
            FileType::Docs | FileType::Unknown => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Chunker::Dockerfile => "dockerfile",
            Chunker::Workflow => "github-actions",
            Chunker::Terraform => "terraform",
        }
    }

    pub fn chunk(&self, file_path: &str, content: &str) -> Vec<Chunk> {
        let chunks = match self {
            Chunker::Dockerfile => chunk_dockerfile(content),
            Chunker::Workflow => chunk_workflow(content),
            Chunker::Terraform => chunk_terraform(content),
        };
        tracing::debug!(
            file = file_path,
            chunker = self.name(),
            chunks = chunks.len(),
            "chunked"
        );
        chunks
    }
}
