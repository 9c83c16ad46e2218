//! Core data models used throughout iac-rag.
//!
//! These types represent the file classifications, chunks, and enriched
//! chunks that flow through the classification and chunking pipeline.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// What kind of artifact a file is, as decided by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    ContainerRuntime,
    CiPipeline,
    InfraIac,
    Docs,
    Unknown,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::ContainerRuntime => "container_runtime",
            FileType::CiPipeline => "ci_pipeline",
            FileType::InfraIac => "infra_iac",
            FileType::Docs => "docs",
            FileType::Unknown => "unknown",
        }
    }

    /// Fixed lookup of how binding and how risky each file type is.
    /// Authority and execution risk are never set independently of the type.
    pub fn profile(&self) -> (Authority, ExecutionRisk) {
        match self {
            FileType::ContainerRuntime => (Authority::High, ExecutionRisk::Critical),
            FileType::CiPipeline => (Authority::Critical, ExecutionRisk::Critical),
            FileType::InfraIac => (Authority::Critical, ExecutionRisk::Critical),
            FileType::Docs => (Authority::Medium, ExecutionRisk::None),
            FileType::Unknown => (Authority::Low, ExecutionRisk::Low),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How authoritative a file's content is for downstream reasoning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Authority {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Authority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Authority::None => "none",
            Authority::Low => "low",
            Authority::Medium => "medium",
            Authority::High => "high",
            Authority::Critical => "critical",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity if the file's instructions are executed or applied incorrectly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionRisk {
    None,
    Low,
    Critical,
}

impl ExecutionRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionRisk::None => "none",
            ExecutionRisk::Low => "low",
            ExecutionRisk::Critical => "critical",
        }
    }
}

impl fmt::Display for ExecutionRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File-level metadata produced by the classifier, one per file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    pub file_path: String,
    pub file_type: FileType,
    pub authority: Authority,
    pub execution_risk: ExecutionRisk,
    /// Reserved; always "unknown" for now.
    pub environment: String,
    pub service: String,
}

impl FileMetadata {
    /// Flatten into the generic metadata map used by chunks.
    pub fn to_metadata(&self) -> Metadata {
        let mut map = Metadata::new();
        map.insert("file_path".into(), self.file_path.as_str().into());
        map.insert("file_type".into(), self.file_type.as_str().into());
        map.insert("authority".into(), self.authority.as_str().into());
        map.insert("execution_risk".into(), self.execution_risk.as_str().into());
        map.insert("environment".into(), self.environment.as_str().into());
        map.insert("service".into(), self.service.as_str().into());
        map
    }
}

/// A single scalar metadata value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Float(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

/// A chunk metadata value: absent, a scalar, or a list of scalars.
///
/// Serialized untagged, so JSON consumers see plain `null`, strings,
/// numbers, booleans, and arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Null,
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl MetadataValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            MetadataValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MetadataValue::Null)
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Scalar(Scalar::from(s))
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Scalar(Scalar::from(s))
    }
}

impl From<Scalar> for MetadataValue {
    fn from(s: Scalar) -> Self {
        MetadataValue::Scalar(s)
    }
}

impl From<Vec<Scalar>> for MetadataValue {
    fn from(items: Vec<Scalar>) -> Self {
        MetadataValue::List(items)
    }
}

impl<T: Into<MetadataValue>> From<Option<T>> for MetadataValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(MetadataValue::Null)
    }
}

/// Metadata keyed by field name. Ordered so output is byte-stable.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A fragment of a source file produced by a chunker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chunk {
    pub content: String,
    pub metadata: Metadata,
}

impl Chunk {
    /// Returns `None` for blank content; emitted chunks always carry text.
    pub fn new(content: impl Into<String>, metadata: Metadata) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            return None;
        }
        Some(Self { content, metadata })
    }
}

/// A chunk whose metadata has been merged with its file's metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedChunk {
    pub content: String,
    pub metadata: Metadata,
}
