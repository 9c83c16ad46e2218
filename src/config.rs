use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::classify::DEFAULT_ROOT_MARKER;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClassifierConfig {
    #[serde(default = "default_root_marker")]
    pub root_marker: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            root_marker: default_root_marker(),
        }
    }
}

fn default_root_marker() -> String {
    DEFAULT_ROOT_MARKER.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    #[serde(default = "default_output_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: default_output_format(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("rag_pipeline_output.json")
}
fn default_output_format() -> String {
    "chunks".to_string()
}

impl Config {
    /// Defaults for commands that work on a single path and need no source tree.
    pub fn minimal() -> Self {
        Self {
            source: SourceConfig {
                root: PathBuf::from(DEFAULT_ROOT_MARKER),
                include_globs: default_include_globs(),
                exclude_globs: Vec::new(),
                follow_symlinks: false,
            },
            classifier: ClassifierConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.classifier.root_marker.trim().is_empty() {
        anyhow::bail!("classifier.root_marker must not be empty");
    }

    match config.output.format.as_str() {
        "chunks" | "records" => {}
        other => anyhow::bail!(
            "Unknown output format: '{}'. Must be chunks or records.",
            other
        ),
    }

    Ok(())
}
