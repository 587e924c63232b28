// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # kotoami
//!
//! Builds a weighted, multi-relational knowledge network from validated
//! Japanese-learning records and emits reproducible graph artifacts.
//!
//! ## Architecture
//!
//! - **Entity loader** (`loader`): validated JSON records → deduplicated,
//!   id-sorted entities
//! - **Relation extractors** (`extract`): five independent heuristics
//!   proposing candidate edges in parallel
//! - **Edge aggregator** (`aggregate`): single-owner merge, max-confidence
//!   dedup, threshold gate
//! - **Cluster assignment** (`cluster`) and **enrichment** (`enrich`):
//!   derived labels and lesson metadata, never topology
//! - **Serializer** (`artifact`): atomic, byte-reproducible
//!   `nodes.json`/`edges.json`
//! - **Evaluator** (`eval`): baseline precision/coverage/reproducibility
//!   metrics over the artifacts
//!
//! ## Library usage
//!
//! ```no_run
//! use std::path::Path;
//! use kotoami::builder::NetworkBuilder;
//! use kotoami::config::NetworkConfig;
//!
//! let builder = NetworkBuilder::new(NetworkConfig::default()).unwrap();
//! let report = builder
//!     .build(
//!         Path::new("data/clean/grammar_pattern.json"),
//!         Path::new("data/clean/vocabulary_entry.json"),
//!         None,
//!         Path::new("network_output"),
//!     )
//!     .unwrap();
//! println!("{report}");
//! ```

pub mod aggregate;
pub mod artifact;
pub mod builder;
pub mod cluster;
pub mod config;
pub mod edge;
pub mod enrich;
pub mod entity;
pub mod error;
pub mod eval;
pub mod extract;
pub mod loader;
