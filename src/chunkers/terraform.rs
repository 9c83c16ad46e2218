//! Terraform (HCL) block chunker.
//!
//! Each labeled top-level block becomes one chunk: a header line naming the
//! block followed by its body rendered as pretty JSON. Block types are
//! emitted in a fixed order (`resource`, `module`, `variable`, `output`,
//! `data`, `provider`) and in declaration order within each type. Anything
//! else at the top level (`terraform`, `locals`, attributes) is ignored.

use anyhow::{anyhow, bail, Result};
use hcl::{Block, BlockLabel, Body, Expression, Structure};
use serde_json::{Map, Value};

use crate::models::{Chunk, Metadata};

const BLOCK_TYPES: &[&str] = &["resource", "module", "variable", "output", "data", "provider"];

/// Block types labeled `"<type>" "<name>"`; the rest carry a single name label.
const TYPED_BLOCKS: &[&str] = &["resource", "data"];

/// Split a Terraform file into one chunk per block. Unparsable HCL yields
/// no chunks.
pub fn chunk_terraform(content: &str) -> Vec<Chunk> {
    let body = match hcl::parse(content) {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(error = %e, "terraform not chunked");
            return Vec::new();
        }
    };

    let mut chunks = Vec::new();
    for block_type in BLOCK_TYPES {
        for block in body.blocks().filter(|b| b.identifier() == *block_type) {
            match block_chunk(block_type, block) {
                Ok(chunk) => chunks.push(chunk),
                Err(e) => tracing::debug!(block_type = %block_type, error = %e, "skipping block"),
            }
        }
    }
    chunks
}

fn block_chunk(block_type: &str, block: &Block) -> Result<Chunk> {
    let labels: Vec<&str> = block.labels().iter().map(BlockLabel::as_str).collect();
    let config = serde_json::to_string_pretty(&body_to_json(block.body()))?;

    let mut metadata = Metadata::new();
    metadata.insert("block_type".into(), block_type.into());
    metadata.insert("chunk_type".into(), "terraform_block".into());

    let typed = TYPED_BLOCKS.contains(&block_type);
    let header = match (typed, labels.as_slice()) {
        (true, [resource_type, name]) => {
            metadata.insert("resource_type".into(), (*resource_type).into());
            metadata.insert("resource_name".into(), (*name).into());
            format!("{} \"{}\" \"{}\"", block_type, resource_type, name)
        }
        (false, [name]) => {
            metadata.insert("name".into(), (*name).into());
            format!("{} \"{}\"", block_type, name)
        }
        _ => bail!("unexpected label count {}", labels.len()),
    };

    Chunk::new(format!("{} {}", header, config), metadata)
        .ok_or_else(|| anyhow!("empty block"))
}

/// Render a block body as JSON. Attributes map to their values; nested
/// blocks collect into an array under their identifier, with any labels
/// nesting as single-key objects.
fn body_to_json(body: &Body) -> Value {
    let mut map = Map::new();
    for structure in body.iter() {
        match structure {
            Structure::Attribute(attr) => {
                map.insert(attr.key().to_string(), expr_to_json(attr.expr()));
            }
            Structure::Block(block) => {
                let value = block
                    .labels()
                    .iter()
                    .rev()
                    .fold(body_to_json(block.body()), |inner, label| {
                        let mut wrapped = Map::new();
                        wrapped.insert(label.as_str().to_string(), inner);
                        Value::Object(wrapped)
                    });
                match map
                    .entry(block.identifier().to_string())
                    .or_insert_with(|| Value::Array(Vec::new()))
                {
                    Value::Array(items) => items.push(value),
                    slot => *slot = Value::Array(vec![value]),
                }
            }
        }
    }
    Value::Object(map)
}

/// Literal expressions become plain JSON values; references, calls, and
/// templates become interpolated strings such as `"${var.region}"`.
fn expr_to_json(expr: &Expression) -> Value {
    serde_json::to_value(hcl::Value::from(expr.clone())).unwrap_or(Value::Null)
}
