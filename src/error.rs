//! Rich diagnostic error types for the kotoami pipeline.
//!
//! Each stage defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly
//! what went wrong and how to fix it. Per-record problems are handled inside
//! the stages (skip, warn, count); these types cover the systemic failures
//! that abort a run.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the kotoami pipeline.
///
/// Each variant wraps a stage-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum KotoamiError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Eval(#[from] EvalError),
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    #[diagnostic(
        code(kotoami::config::io),
        help("Check that the config file exists and is readable.")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {message}", path.display())]
    #[diagnostic(
        code(kotoami::config::parse),
        help("The file must be valid TOML with kotoami's threshold fields.")
    )]
    Parse { path: PathBuf, message: String },

    #[error("invalid threshold {field} = {value}")]
    #[diagnostic(
        code(kotoami::config::threshold),
        help("Thresholds and weights must lie in [0, 1]. Adjust the field and retry.")
    )]
    ThresholdOutOfRange { field: &'static str, value: f64 },
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("cannot read input file {}: {source}", path.display())]
    #[diagnostic(
        code(kotoami::load::io),
        help(
            "The input file could not be read at all. Check the path and \
             permissions; this is a systemic failure, not a bad record."
        )
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {message}", path.display())]
    #[diagnostic(
        code(kotoami::load::parse),
        help(
            "The file is not a valid JSON array of validated records. \
             Re-run the upstream cleaning pipeline to regenerate it."
        )
    )]
    Parse { path: PathBuf, message: String },

    #[error("record \"{id}\" is missing required field {field}")]
    #[diagnostic(
        code(kotoami::load::missing_field),
        help(
            "The upstream validator should have guaranteed this field. \
             The record was produced by a cleaner that violated its contract."
        )
    )]
    MissingField { id: String, field: &'static str },
}

// ---------------------------------------------------------------------------
// Extraction errors
// ---------------------------------------------------------------------------

/// Extractors degrade to "no candidate" on unscorable data; these variants
/// exist only for programmer-error conditions.
#[derive(Debug, Error, Diagnostic)]
pub enum ExtractError {
    #[error("semantic scorer returned {score} outside [0, 1]")]
    #[diagnostic(
        code(kotoami::extract::score_range),
        help(
            "A SemanticScorer implementation must return scores in [0, 1]. \
             Clamp or renormalize inside the scorer."
        )
    )]
    ScoreOutOfRange { score: f64 },
}

// ---------------------------------------------------------------------------
// Aggregation errors
// ---------------------------------------------------------------------------

/// Structurally invalid candidates are dropped with a warning, not raised;
/// this type covers surfaces where the aggregator itself cannot proceed.
#[derive(Debug, Error, Diagnostic)]
pub enum AggregateError {
    #[error("aggregation retained zero edges and --strict-edges is set")]
    #[diagnostic(
        code(kotoami::aggregate::no_edges),
        help(
            "Every candidate was dropped or no extractor proposed any. This \
             is valid for tiny inputs; run without --strict-edges to emit an \
             edgeless graph."
        )
    )]
    NoEdgesRetained,
}

// ---------------------------------------------------------------------------
// Serialization errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SerializeError {
    #[error("cannot create output directory {}: {source}", path.display())]
    #[diagnostic(
        code(kotoami::serialize::out_dir),
        help("Check that the parent directory exists and is writable.")
    )]
    OutDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write artifact {}: {source}", path.display())]
    #[diagnostic(
        code(kotoami::serialize::write),
        help(
            "Writing the graph artifact failed. No partial artifact was left \
             behind; check disk space and permissions, then re-run."
        )
    )]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot encode artifact {artifact}: {message}")]
    #[diagnostic(
        code(kotoami::serialize::encode),
        help("JSON encoding failed. This indicates a bug; please report it.")
    )]
    Encode {
        artifact: &'static str,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Evaluation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EvalError {
    #[error("cannot read artifact {}: {source}", path.display())]
    #[diagnostic(
        code(kotoami::eval::io),
        help(
            "The evaluator needs the nodes.json and edges.json a build run \
             produced. Run `kotoami build` first, or check --artifacts."
        )
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact {}: {message}", path.display())]
    #[diagnostic(
        code(kotoami::eval::parse),
        help(
            "The artifact is not in the format the serializer emits. \
             Regenerate it with `kotoami build`."
        )
    )]
    Parse { path: PathBuf, message: String },
}

/// Convenience alias for functions returning kotoami results.
pub type KotoamiResult<T> = std::result::Result<T, KotoamiError>;
