//! POS-similarity extractor: connects entities sharing part-of-speech tags.
//!
//! Confidence is the Jaccard index of the two tag sets, so identical tag
//! sets score 1.0 and a single shared tag among many scores low.

use std::collections::BTreeSet;

use crate::config::NetworkConfig;
use crate::edge::{CandidateEdge, Evidence, RelationKind};
use crate::entity::{Entity, PosTag};

use super::{CorpusView, RelationExtractor};

pub struct PosSimilarityExtractor;

impl RelationExtractor for PosSimilarityExtractor {
    fn name(&self) -> &'static str {
        "pos_similarity"
    }

    fn extract(&self, corpus: &CorpusView<'_>, _cfg: &NetworkConfig) -> Vec<CandidateEdge> {
        // Pre-compute informative tag sets; entities without any drop out.
        let tagged: Vec<(&Entity, BTreeSet<&PosTag>)> = corpus
            .entities
            .iter()
            .map(|e| {
                let tags: BTreeSet<&PosTag> =
                    e.pos_tags().iter().filter(|t| t.is_known()).collect();
                (e, tags)
            })
            .filter(|(_, tags)| !tags.is_empty())
            .collect();

        let mut candidates = Vec::new();
        for (i, (a, tags_a)) in tagged.iter().enumerate() {
            for (b, tags_b) in &tagged[i + 1..] {
                let shared = tags_a.intersection(tags_b).count();
                if shared == 0 {
                    continue;
                }
                let total = tags_a.union(tags_b).count();
                candidates.push(CandidateEdge::new(
                    a.id().clone(),
                    b.id().clone(),
                    RelationKind::PosSimilarity,
                    shared as f64 / total as f64,
                    Evidence::SharedPos { shared, total },
                ));
            }
        }
        candidates
    }
}
