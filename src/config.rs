//! Network construction configuration.
//!
//! Every threshold and weight constant the pipeline uses lives here and is
//! passed explicitly into each stage — no module-level state — so unit tests
//! can pin any threshold in isolation and two runs with the same config are
//! guaranteed to behave identically.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Thresholds and weight constants for one network build.
///
/// All values lie in `[0, 1]`. The defaults are the documented constants the
/// artifacts are reproducible under; a TOML file can override any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Weight for a level-adjacency edge between entities at the same level.
    pub level_same_weight: f64,
    /// Weight for a level-adjacency edge between entities one level apart.
    pub level_adjacent_weight: f64,
    /// Minimum gloss-similarity score for a semantic edge to be proposed.
    /// Pairs below this produce nothing; thresholding happens in the
    /// extractor, not just at aggregation.
    pub semantic_threshold: f64,
    /// Per-distinct-occurrence confidence for cross-reference edges,
    /// capped at 1.0 overall.
    pub crossref_occurrence_weight: f64,
    /// Weight for a guidebook lesson-affinity edge.
    pub guidebook_weight: f64,
    /// Aggregated edges below this weight are dropped, not emitted.
    pub min_edge_weight: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            level_same_weight: 1.0,
            level_adjacent_weight: 0.8,
            semantic_threshold: 0.3,
            crossref_occurrence_weight: 0.45,
            guidebook_weight: 0.6,
            min_edge_weight: 0.2,
        }
    }
}

impl NetworkConfig {
    /// Load overrides from a TOML file on top of the defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject any weight or threshold outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields: [(&'static str, f64); 6] = [
            ("level_same_weight", self.level_same_weight),
            ("level_adjacent_weight", self.level_adjacent_weight),
            ("semantic_threshold", self.semantic_threshold),
            ("crossref_occurrence_weight", self.crossref_occurrence_weight),
            ("guidebook_weight", self.guidebook_weight),
            ("min_edge_weight", self.min_edge_weight),
        ];
        for (field, value) in fields {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(ConfigError::ThresholdOutOfRange { field, value });
            }
        }
        Ok(())
    }
}
