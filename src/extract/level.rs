//! Level-adjacency extractor: connects entities at the same or neighboring
//! JLPT level.
//!
//! Entities with an unknown level never participate — connecting everything
//! unlevelled to everything else would be pure noise.

use crate::config::NetworkConfig;
use crate::edge::{CandidateEdge, Evidence, RelationKind};
use crate::entity::Entity;

use super::{CorpusView, RelationExtractor};

pub struct LevelAdjacencyExtractor;

impl RelationExtractor for LevelAdjacencyExtractor {
    fn name(&self) -> &'static str {
        "level_adjacency"
    }

    fn extract(&self, corpus: &CorpusView<'_>, cfg: &NetworkConfig) -> Vec<CandidateEdge> {
        // Only levelled entities can pair up.
        let levelled: Vec<&Entity> = corpus
            .entities
            .iter()
            .filter(|e| e.level().ordinal().is_some())
            .collect();

        let mut candidates = Vec::new();
        for (i, a) in levelled.iter().enumerate() {
            for b in &levelled[i + 1..] {
                let (la, lb) = (a.level(), b.level());
                if !la.is_adjacent(lb) {
                    continue;
                }
                let (score, evidence) = if la == lb {
                    (cfg.level_same_weight, Evidence::SharedLevel { level: la })
                } else {
                    (
                        cfg.level_adjacent_weight,
                        Evidence::AdjacentLevels {
                            source_level: la,
                            target_level: lb,
                        },
                    )
                };
                candidates.push(CandidateEdge::new(
                    a.id().clone(),
                    b.id().clone(),
                    RelationKind::LevelAdjacency,
                    score,
                    evidence,
                ));
            }
        }
        candidates
    }
}
