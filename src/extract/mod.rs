//! Relation extractors: independent heuristics proposing candidate edges.
//!
//! Each extractor is a pure pass over the immutable corpus. They share no
//! mutable state, so the fan-out runs them in parallel with rayon; results
//! are concatenated in fixed declaration order, which keeps the candidate
//! stream — and therefore the whole artifact — independent of scheduling.
//!
//! Finding zero candidates is a valid outcome, not an error. An extractor
//! that cannot score a record degrades to "no candidate" for that record.

pub mod crossref;
pub mod lesson;
pub mod level;
pub mod pos;
pub mod semantic;

use rayon::prelude::*;

use crate::config::NetworkConfig;
use crate::edge::CandidateEdge;
use crate::entity::{Entity, GuidebookLesson};

pub use crossref::CrossReferenceExtractor;
pub use lesson::LessonAffinityExtractor;
pub use level::LevelAdjacencyExtractor;
pub use pos::PosSimilarityExtractor;
pub use semantic::{SemanticExtractor, SemanticScorer, TokenOverlapScorer};

/// Immutable view of the loaded corpus shared by all extractors.
#[derive(Debug, Clone, Copy)]
pub struct CorpusView<'a> {
    /// Entities, stably sorted by id.
    pub entities: &'a [Entity],
    /// Guidebook lessons; empty when no lesson file was supplied.
    pub lessons: &'a [GuidebookLesson],
}

/// A single relation heuristic: corpus in, candidate edges out.
pub trait RelationExtractor: Sync {
    /// Stable name used in reports and candidate accounting.
    fn name(&self) -> &'static str;

    /// Propose candidate edges. Pure: no side effects, no shared state.
    fn extract(&self, corpus: &CorpusView<'_>, cfg: &NetworkConfig) -> Vec<CandidateEdge>;
}

/// The full extractor battery in its fixed merge order.
pub fn default_extractors() -> Vec<Box<dyn RelationExtractor>> {
    vec![
        Box::new(LevelAdjacencyExtractor),
        Box::new(PosSimilarityExtractor),
        Box::new(SemanticExtractor::default()),
        Box::new(CrossReferenceExtractor),
        Box::new(LessonAffinityExtractor),
    ]
}

/// Candidate counts per extractor plus the merged candidate stream.
#[derive(Debug)]
pub struct ExtractionOutcome {
    /// (extractor name, candidates proposed), in merge order.
    pub per_extractor: Vec<(&'static str, usize)>,
    /// All candidates, concatenated in extractor merge order.
    pub candidates: Vec<CandidateEdge>,
}

/// Run every extractor over the shared corpus and merge deterministically.
///
/// The extractors run concurrently, but `collect` preserves slice order, so
/// completion order never leaks into the candidate stream.
pub fn extract_all(
    extractors: &[Box<dyn RelationExtractor>],
    corpus: &CorpusView<'_>,
    cfg: &NetworkConfig,
) -> ExtractionOutcome {
    let results: Vec<(&'static str, Vec<CandidateEdge>)> = extractors
        .par_iter()
        .map(|extractor| {
            let candidates = extractor.extract(corpus, cfg);
            tracing::debug!(
                extractor = extractor.name(),
                candidates = candidates.len(),
                "extractor pass complete"
            );
            (extractor.name(), candidates)
        })
        .collect();

    let mut per_extractor = Vec::with_capacity(results.len());
    let mut candidates = Vec::new();
    for (name, mut batch) in results {
        per_extractor.push((name, batch.len()));
        candidates.append(&mut batch);
    }

    ExtractionOutcome {
        per_extractor,
        candidates,
    }
}
