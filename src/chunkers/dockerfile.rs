//! Instruction-boundary Dockerfile chunker.
//!
//! Each chunk starts at a recognized instruction keyword and runs until the
//! next one, so `RUN` lines continued with `\` stay together with their
//! instruction. Blank lines and `#` comments are dropped.
//!
//! Every chunk records the build stage and base image that were active when
//! it was opened. A `FROM` line updates both before its own chunk opens.

use crate::models::{Chunk, Metadata, MetadataValue};

const INSTRUCTIONS: &[&str] = &[
    "FROM",
    "RUN",
    "CMD",
    "ENTRYPOINT",
    "COPY",
    "ADD",
    "ENV",
    "ARG",
    "LABEL",
    "EXPOSE",
    "USER",
    "WORKDIR",
    "VOLUME",
    "STOPSIGNAL",
    "ONBUILD",
    "HEALTHCHECK",
    "SHELL",
];

const UNKNOWN: &str = "unknown";
const FINAL_STAGE: &str = "final";

/// Split a Dockerfile into one chunk per instruction.
pub fn chunk_dockerfile(content: &str) -> Vec<Chunk> {
    content
        .lines()
        .fold(ParseState::default(), ParseState::feed)
        .finish()
}

/// The chunk currently being accumulated.
struct OpenChunk {
    instruction: Option<&'static str>,
    stage: String,
    base_image: String,
    lines: Vec<String>,
}

impl OpenChunk {
    fn close(self) -> Option<Chunk> {
        let mut metadata = Metadata::new();
        metadata.insert(
            "instruction_type".into(),
            MetadataValue::from(self.instruction),
        );
        metadata.insert("docker_stage".into(), self.stage.into());
        metadata.insert("base_image".into(), self.base_image.into());
        Chunk::new(self.lines.join("\n"), metadata)
    }
}

struct ParseState {
    stage: String,
    base_image: String,
    open: Option<OpenChunk>,
    chunks: Vec<Chunk>,
}

impl Default for ParseState {
    fn default() -> Self {
        Self {
            stage: UNKNOWN.to_string(),
            base_image: UNKNOWN.to_string(),
            open: None,
            chunks: Vec::new(),
        }
    }
}

impl ParseState {
    fn feed(mut self, raw: &str) -> Self {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return self;
        }

        if let Some(instruction) = match_instruction(line) {
            self.flush();
            if instruction == "FROM" {
                self.enter_stage(line);
            }
            self.open = Some(self.open_chunk(Some(instruction)));
        }

        if self.open.is_none() {
            // Content before the first recognized instruction.
            self.open = Some(self.open_chunk(None));
        }
        if let Some(open) = self.open.as_mut() {
            open.lines.push(line.to_string());
        }
        self
    }

    fn finish(mut self) -> Vec<Chunk> {
        self.flush();
        self.chunks
    }

    fn flush(&mut self) {
        if let Some(chunk) = self.open.take().and_then(OpenChunk::close) {
            self.chunks.push(chunk);
        }
    }

    fn open_chunk(&self, instruction: Option<&'static str>) -> OpenChunk {
        OpenChunk {
            instruction,
            stage: self.stage.clone(),
            base_image: self.base_image.clone(),
            lines: Vec::new(),
        }
    }

    /// `FROM <image> [AS <name>]`: the image becomes the base, the stage is
    /// the token after `AS`, or `final` when the stage is unnamed.
    fn enter_stage(&mut self, line: &str) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if let Some(image) = tokens.get(1) {
            self.base_image = image.to_string();
        }
        self.stage = tokens
            .iter()
            .position(|t| *t == "AS")
            .and_then(|idx| tokens.get(idx + 1))
            .unwrap_or(&FINAL_STAGE)
            .to_string();
    }
}

/// Returns the instruction keyword if the (trimmed) line starts with one
/// followed by whitespace.
fn match_instruction(line: &str) -> Option<&'static str> {
    INSTRUCTIONS.iter().copied().find(|keyword| {
        line.strip_prefix(keyword)
            .is_some_and(|rest| rest.starts_with(char::is_whitespace))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta<'a>(chunk: &'a Chunk, key: &str) -> &'a MetadataValue {
        &chunk.metadata[key]
    }

    #[test]
    fn test_multi_stage_scenario() {
        let content =
            "FROM ubuntu:20.04 AS builder\nRUN apt-get update\nFROM ubuntu:20.04\nCMD [\"echo\",\"hi\"]";
        let chunks = chunk_dockerfile(content);
        assert_eq!(chunks.len(), 4);

        assert_eq!(meta(&chunks[0], "instruction_type").as_str(), Some("FROM"));
        assert_eq!(meta(&chunks[0], "docker_stage").as_str(), Some("builder"));
        assert_eq!(meta(&chunks[0], "base_image").as_str(), Some("ubuntu:20.04"));

        assert_eq!(meta(&chunks[1], "instruction_type").as_str(), Some("RUN"));
        assert_eq!(meta(&chunks[1], "docker_stage").as_str(), Some("builder"));

        assert_eq!(meta(&chunks[2], "instruction_type").as_str(), Some("FROM"));
        assert_eq!(meta(&chunks[2], "docker_stage").as_str(), Some("final"));
        assert_eq!(meta(&chunks[2], "base_image").as_str(), Some("ubuntu:20.04"));

        assert_eq!(meta(&chunks[3], "instruction_type").as_str(), Some("CMD"));
        assert_eq!(meta(&chunks[3], "docker_stage").as_str(), Some("final"));
        assert_eq!(meta(&chunks[3], "base_image").as_str(), Some("ubuntu:20.04"));
        assert_eq!(chunks[3].content, "CMD [\"echo\",\"hi\"]");
    }

    #[test]
    fn test_empty_content() {
        assert!(chunk_dockerfile("").is_empty());
        assert!(chunk_dockerfile("\n\n   \n").is_empty());
    }

    #[test]
    fn test_comments_only() {
        assert!(chunk_dockerfile("# syntax=docker/dockerfile:1\n# nothing here\n").is_empty());
    }

    #[test]
    fn test_continuation_lines_join_their_instruction() {
        let content = "FROM alpine:3.19\nRUN apk add --no-cache \\\n    curl \\\n    git\n\n# cleanup\nUSER app";
        let chunks = chunk_dockerfile(content);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].content, "RUN apk add --no-cache \\\ncurl \\\ngit");
        assert_eq!(meta(&chunks[2], "instruction_type").as_str(), Some("USER"));
    }

    #[test]
    fn test_content_before_first_instruction() {
        let chunks = chunk_dockerfile("something odd\nFROM node:20");
        assert_eq!(chunks.len(), 2);
        assert!(meta(&chunks[0], "instruction_type").is_null());
        assert_eq!(meta(&chunks[0], "docker_stage").as_str(), Some("unknown"));
        assert_eq!(meta(&chunks[0], "base_image").as_str(), Some("unknown"));
        assert_eq!(meta(&chunks[1], "base_image").as_str(), Some("node:20"));
    }

    #[test]
    fn test_keyword_needs_trailing_whitespace() {
        // "RUNNER" is not RUN; a bare keyword with nothing after it is not a boundary.
        let chunks = chunk_dockerfile("FROM alpine\nRUNNER x\nEXPOSE");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "FROM alpine\nRUNNER x\nEXPOSE");
    }

    #[test]
    fn test_lowercase_keywords_are_not_boundaries() {
        let chunks = chunk_dockerfile("FROM alpine\nrun echo hi");
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_as_as_last_token_falls_back_to_final() {
        let chunks = chunk_dockerfile("FROM golang:1.22 AS");
        assert_eq!(meta(&chunks[0], "docker_stage").as_str(), Some("final"));
        assert_eq!(meta(&chunks[0], "base_image").as_str(), Some("golang:1.22"));
    }

    #[test]
    fn test_indented_instructions_match() {
        let chunks = chunk_dockerfile("FROM alpine\n   ONBUILD RUN make\n\tHEALTHCHECK CMD true");
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].content, "ONBUILD RUN make");
        assert_eq!(meta(&chunks[2], "instruction_type").as_str(), Some("HEALTHCHECK"));
    }

    #[test]
    fn test_every_chunk_has_content() {
        let content = "ARG VERSION=1\nFROM debian:${VERSION} AS base\nENV A=1\nCOPY . /app\nWORKDIR /app\nENTRYPOINT [\"/app/run\"]";
        let chunks = chunk_dockerfile(content);
        assert_eq!(chunks.len(), 6);
        assert!(chunks.iter().all(|c| !c.content.is_empty()));
        // ARG precedes the first FROM, so no stage is known yet.
        assert_eq!(meta(&chunks[0], "docker_stage").as_str(), Some("unknown"));
        assert_eq!(meta(&chunks[5], "docker_stage").as_str(), Some("base"));
    }
}
