//! # iac-rag
//!
//! Classify and chunk infrastructure-as-code and CI/CD artifacts for
//! retrieval pipelines.
//!
//! Every file under a source tree is classified by path (type, authority,
//! execution risk, owning service). Dockerfiles, GitHub Actions workflows,
//! and Terraform files are then split into self-contained chunks, each
//! carrying structured metadata, ready to be embedded and indexed.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌────────────┐   ┌─────────────┐   ┌──────────┐
//! │ Filesystem  │──▶│ Classifier │──▶│  Chunkers   │──▶│  Export  │
//! │  walk+glob  │   │  path→meta │   │ Docker/GHA/ │   │  JSON    │
//! └─────────────┘   └────────────┘   │  Terraform  │   └──────────┘
//!                                    └──────┬──────┘
//!                                           ▼
//!                                       Enricher
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! iac-rag sources                         # list files and their classification
//! iac-rag ingest                          # write rag_pipeline_output.json
//! iac-rag ingest --format records -o -    # flat records on stdout
//! iac-rag chunk rag_data_source/api/Dockerfile
//! ```
//!
//! ## Library use
//!
//! ```rust
//! use iac_rag::classify::Classifier;
//! use iac_rag::ingest::process_file;
//!
//! let chunks = process_file(
//!     &Classifier::default(),
//!     "rag_data_source/api/Dockerfile",
//!     "FROM alpine:3.19\nRUN apk add curl\n",
//! );
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[0].metadata["service"].as_str(), Some("api"));
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`classify`] | Path-based file classification |
//! | [`chunkers`] | Dockerfile, workflow, and Terraform chunkers |
//! | [`enrich`] | Merge file metadata into chunks |
//! | [`connector_fs`] | Filesystem scan |
//! | [`ingest`] | Pipeline orchestration |
//! | [`export`] | JSON output and flat index records |
//! | [`sources`] | Classification inventory |

pub mod chunkers;
pub mod classify;
pub mod config;
pub mod connector_fs;
pub mod enrich;
pub mod export;
pub mod ingest;
pub mod models;
pub mod sources;
