//! Edge aggregator: the single owner of the consolidated edge set.
//!
//! Extractors return candidate lists; only this stage merges them. Grouping
//! is by (canonical pair, relation kind). Duplicates from near-overlapping
//! heuristics keep the *maximum* confidence rather than summing, so two
//! extractors agreeing never inflates a weight past either one's belief.
//! Relation kinds are never merged into one another: a pair connected by
//! both a level and a POS edge keeps both, distinguished by kind.
//!
//! A structurally invalid candidate (self-loop, out-of-range score) is
//! logged and dropped — a single bad candidate must not block the run.

use std::collections::BTreeMap;

use crate::config::NetworkConfig;
use crate::edge::{CandidateEdge, Edge, EdgeKey};

/// Counts from one aggregation pass, reported at the end of the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    /// Candidates received from all extractors.
    pub candidates: usize,
    /// Candidates merged into an existing (pair, kind) slot.
    pub merged_duplicates: usize,
    /// Structurally invalid candidates dropped (self-loops, bad scores).
    pub dropped_invalid: usize,
    /// Merged edges dropped for falling below the minimum weight.
    pub dropped_below_threshold: usize,
    /// Edges retained in the final graph.
    pub retained: usize,
}

/// Merge candidates into the final, frozen, deterministically ordered edges.
pub fn aggregate(
    candidates: Vec<CandidateEdge>,
    cfg: &NetworkConfig,
) -> (Vec<Edge>, AggregateReport) {
    let mut report = AggregateReport {
        candidates: candidates.len(),
        ..Default::default()
    };

    let mut slots: BTreeMap<EdgeKey, CandidateEdge> = BTreeMap::new();
    for candidate in candidates {
        if candidate.is_self_loop() {
            tracing::warn!(
                id = %candidate.source,
                kind = %candidate.kind,
                "dropping self-loop candidate"
            );
            report.dropped_invalid += 1;
            continue;
        }
        if !(0.0..=1.0).contains(&candidate.score) || candidate.score.is_nan() {
            tracing::warn!(
                source = %candidate.source,
                target = %candidate.target,
                score = candidate.score,
                "dropping candidate with out-of-range score"
            );
            report.dropped_invalid += 1;
            continue;
        }

        match slots.entry(candidate.key()) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            std::collections::btree_map::Entry::Occupied(mut slot) => {
                report.merged_duplicates += 1;
                // Max wins; on a tie the earlier candidate (fixed extractor
                // merge order) keeps the slot, so ties are deterministic too.
                if candidate.score > slot.get().score {
                    slot.insert(candidate);
                }
            }
        }
    }

    // BTreeMap iteration order is the artifact order: (source, target, kind).
    let edges: Vec<Edge> = slots
        .into_values()
        .filter(|c| {
            let keep = c.score > 0.0 && c.score >= cfg.min_edge_weight;
            if !keep {
                report.dropped_below_threshold += 1;
            }
            keep
        })
        .map(Edge::from_candidate)
        .collect();

    report.retained = edges.len();
    tracing::info!(
        candidates = report.candidates,
        retained = report.retained,
        merged = report.merged_duplicates,
        invalid = report.dropped_invalid,
        below_threshold = report.dropped_below_threshold,
        "aggregated candidate edges"
    );

    (edges, report)
}
