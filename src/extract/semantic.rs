//! Semantic-relation extractor: connects entities whose gloss text overlaps.
//!
//! The similarity function is a pluggable strategy behind [`SemanticScorer`]
//! so an embedding-based scorer can replace the token-overlap default
//! without touching the extractor. Whatever the strategy, the contract is
//! fixed: symmetric, scores in [0, 1], and threshold-gated here — pairs
//! below `semantic_threshold` produce nothing rather than near-zero edges.

use std::collections::BTreeSet;

use crate::config::NetworkConfig;
use crate::edge::{CandidateEdge, Evidence, RelationKind};
use crate::entity::Entity;

use super::{CorpusView, RelationExtractor};

/// Symmetric text-similarity strategy returning scores in [0, 1].
pub trait SemanticScorer: Send + Sync {
    fn score(&self, a: &str, b: &str) -> f64;
}

/// Default scorer: Jaccard index over lowercase alphanumeric tokens.
pub struct TokenOverlapScorer;

impl TokenOverlapScorer {
    fn tokens(text: &str) -> BTreeSet<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect()
    }
}

impl SemanticScorer for TokenOverlapScorer {
    fn score(&self, a: &str, b: &str) -> f64 {
        let ta = Self::tokens(a);
        let tb = Self::tokens(b);
        if ta.is_empty() || tb.is_empty() {
            return 0.0;
        }
        let shared = ta.intersection(&tb).count();
        let union = ta.union(&tb).count();
        shared as f64 / union as f64
    }
}

pub struct SemanticExtractor {
    scorer: Box<dyn SemanticScorer>,
}

impl SemanticExtractor {
    /// Use a custom similarity strategy.
    pub fn with_scorer(scorer: Box<dyn SemanticScorer>) -> Self {
        Self { scorer }
    }
}

impl Default for SemanticExtractor {
    fn default() -> Self {
        Self {
            scorer: Box::new(TokenOverlapScorer),
        }
    }
}

impl RelationExtractor for SemanticExtractor {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn extract(&self, corpus: &CorpusView<'_>, cfg: &NetworkConfig) -> Vec<CandidateEdge> {
        // Entities without gloss text cannot be scored and drop out.
        let glossed: Vec<(&Entity, String)> = corpus
            .entities
            .iter()
            .map(|e| (e, e.gloss_text()))
            .filter(|(_, gloss)| !gloss.trim().is_empty())
            .collect();

        let mut candidates = Vec::new();
        for (i, (a, gloss_a)) in glossed.iter().enumerate() {
            for (b, gloss_b) in &glossed[i + 1..] {
                let score = self.scorer.score(gloss_a, gloss_b).clamp(0.0, 1.0);
                if score < cfg.semantic_threshold {
                    continue;
                }
                candidates.push(CandidateEdge::new(
                    a.id().clone(),
                    b.id().clone(),
                    RelationKind::Semantic,
                    score,
                    Evidence::GlossOverlap { score },
                ));
            }
        }
        candidates
    }
}
