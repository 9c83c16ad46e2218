//! GitHub Actions workflow chunker.
//!
//! Emits one chunk per job. The chunk body is the job re-serialized on its
//! own as a single-key YAML document (`{job_id: definition}`), and every
//! chunk carries the workflow name and trigger list so a job can be
//! retrieved without its surrounding file.

use anyhow::{bail, Result};
use serde_yaml::{Mapping, Value};

use crate::models::{Chunk, Metadata, MetadataValue, Scalar};

const DEFAULT_WORKFLOW_NAME: &str = "unnamed-workflow";

/// Split a workflow into per-job chunks. Invalid YAML yields no chunks.
pub fn chunk_workflow(content: &str) -> Vec<Chunk> {
    match parse_jobs(content) {
        Ok(chunks) => chunks,
        Err(e) => {
            tracing::debug!(error = %e, "workflow not chunked");
            Vec::new()
        }
    }
}

fn parse_jobs(content: &str) -> Result<Vec<Chunk>> {
    let document: Value = serde_yaml::from_str(content)?;
    let workflow = match document {
        Value::Mapping(map) => map,
        Value::Null => return Ok(Vec::new()),
        _ => bail!("workflow document is not a mapping"),
    };

    let name = workflow
        .get("name")
        .and_then(scalar)
        .unwrap_or_else(|| Scalar::from(DEFAULT_WORKFLOW_NAME));
    let triggers = triggers(workflow.get("on"));

    let jobs = match workflow.get("jobs") {
        Some(Value::Mapping(jobs)) => jobs,
        None => return Ok(Vec::new()),
        Some(_) => bail!("`jobs` is not a mapping"),
    };

    let mut chunks = Vec::with_capacity(jobs.len());
    for (job_id, job) in jobs {
        let mut single = Mapping::new();
        single.insert(job_id.clone(), job.clone());
        let body = serde_yaml::to_string(&single)?;

        let mut metadata = Metadata::new();
        metadata.insert("workflow_name".into(), name.clone().into());
        metadata.insert("triggers".into(), MetadataValue::List(triggers.clone()));
        metadata.insert("job_name".into(), MetadataValue::from(scalar(job_id)));
        metadata.insert("runs_on".into(), runs_on(job));
        metadata.insert("chunk_type".into(), "ci_job".into());

        chunks.extend(Chunk::new(body, metadata));
    }
    Ok(chunks)
}

/// `on:` may be a mapping of events, a single event, or a list of events.
fn triggers(on: Option<&Value>) -> Vec<Scalar> {
    match on {
        Some(Value::Mapping(events)) => events.keys().filter_map(scalar).collect(),
        Some(Value::Sequence(events)) => events.iter().filter_map(scalar).collect(),
        Some(other) => scalar(other).into_iter().collect(),
        None => Vec::new(),
    }
}

fn runs_on(job: &Value) -> MetadataValue {
    match job.get("runs-on") {
        None | Some(Value::Null) => "unknown".into(),
        Some(Value::Sequence(labels)) => {
            MetadataValue::List(labels.iter().filter_map(scalar).collect())
        }
        Some(Value::Mapping(group)) => serde_json::to_string(group)
            .map(MetadataValue::from)
            .unwrap_or_else(|_| "unknown".into()),
        Some(other) => scalar(other)
            .map(MetadataValue::from)
            .unwrap_or_else(|| "unknown".into()),
    }
}

fn scalar(value: &Value) -> Option<Scalar> {
    match value {
        Value::String(s) => Some(Scalar::String(s.clone())),
        Value::Bool(b) => Some(Scalar::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(Scalar::Integer)
            .or_else(|| n.as_f64().map(Scalar::Float)),
        Value::Tagged(tagged) => scalar(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CI: &str = r#"name: CI
on:
  push: {}
  pull_request: {}
jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - run: cargo build
  test:
    runs-on: ubuntu-latest
    steps:
      - run: cargo test
"#;

    fn str_of<'a>(chunk: &'a Chunk, key: &str) -> Option<&'a str> {
        chunk.metadata[key].as_str()
    }

    #[test]
    fn test_one_chunk_per_job() {
        let chunks = chunk_workflow(CI);
        assert_eq!(chunks.len(), 2);

        for chunk in &chunks {
            assert_eq!(str_of(chunk, "workflow_name"), Some("CI"));
            assert_eq!(
                chunk.metadata["triggers"].as_list(),
                Some(&[Scalar::from("push"), Scalar::from("pull_request")][..])
            );
            assert_eq!(str_of(chunk, "runs_on"), Some("ubuntu-latest"));
            assert_eq!(str_of(chunk, "chunk_type"), Some("ci_job"));
        }
        assert_eq!(str_of(&chunks[0], "job_name"), Some("build"));
        assert_eq!(str_of(&chunks[1], "job_name"), Some("test"));
    }

    #[test]
    fn test_job_body_is_isolated_yaml() {
        let chunks = chunk_workflow(CI);
        assert!(chunks[0].content.starts_with("build:\n"));
        assert!(chunks[0].content.contains("cargo build"));
        assert!(!chunks[0].content.contains("cargo test"));

        let reparsed: Value = serde_yaml::from_str(&chunks[1].content).unwrap();
        let map = reparsed.as_mapping().unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("test"));
    }

    #[test]
    fn test_job_keys_keep_order() {
        let chunks = chunk_workflow(CI);
        let body = &chunks[0].content;
        let runs_on = body.find("runs-on").unwrap();
        let steps = body.find("steps").unwrap();
        assert!(runs_on < steps);
    }

    #[test]
    fn test_defaults() {
        let chunks = chunk_workflow("jobs:\n  lint:\n    steps: []\n");
        assert_eq!(chunks.len(), 1);
        assert_eq!(str_of(&chunks[0], "workflow_name"), Some("unnamed-workflow"));
        assert_eq!(chunks[0].metadata["triggers"].as_list(), Some(&[] as &[Scalar]));
        assert_eq!(str_of(&chunks[0], "runs_on"), Some("unknown"));
    }

    #[test]
    fn test_scalar_trigger() {
        let chunks = chunk_workflow("name: Nightly\non: schedule\njobs:\n  a:\n    runs-on: linux\n");
        assert_eq!(
            chunks[0].metadata["triggers"].as_list(),
            Some(&[Scalar::from("schedule")][..])
        );
    }

    #[test]
    fn test_sequence_trigger() {
        let chunks = chunk_workflow("on: [push, workflow_dispatch]\njobs:\n  a:\n    runs-on: linux\n");
        assert_eq!(
            chunks[0].metadata["triggers"].as_list(),
            Some(&[Scalar::from("push"), Scalar::from("workflow_dispatch")][..])
        );
    }

    #[test]
    fn test_runs_on_label_list() {
        let chunks = chunk_workflow("jobs:\n  a:\n    runs-on: [self-hosted, linux]\n");
        assert_eq!(
            chunks[0].metadata["runs_on"].as_list(),
            Some(&[Scalar::from("self-hosted"), Scalar::from("linux")][..])
        );
    }

    #[test]
    fn test_runs_on_group_mapping() {
        let chunks = chunk_workflow("jobs:\n  a:\n    runs-on:\n      group: large\n");
        assert_eq!(str_of(&chunks[0], "runs_on"), Some(r#"{"group":"large"}"#));
    }

    #[test]
    fn test_empty_and_null_documents() {
        assert!(chunk_workflow("").is_empty());
        assert!(chunk_workflow("~").is_empty());
        assert!(chunk_workflow("# only a comment\n").is_empty());
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(chunk_workflow("jobs: [unclosed").is_empty());
        assert!(chunk_workflow("on: {push: [main\n").is_empty());
    }

    #[test]
    fn test_wrong_shapes() {
        assert!(chunk_workflow("- just\n- a list\n").is_empty());
        assert!(chunk_workflow("name: x\njobs: [a, b]\n").is_empty());
        assert!(chunk_workflow("name: x\n").is_empty());
    }
}
