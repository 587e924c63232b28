//! Typed, weighted relations between entities.
//!
//! Extractors propose [`CandidateEdge`]s; the aggregator merges them into
//! frozen [`Edge`]s. Every edge carries [`Evidence`] explaining why it was
//! proposed, which is what makes the graph explainable and lets the
//! evaluator sample edges for precision judging.

use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, JlptLevel};

// ---------------------------------------------------------------------------
// Relation taxonomy
// ---------------------------------------------------------------------------

/// Why two nodes are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Both entities sit at the same or adjacent JLPT levels.
    LevelAdjacency,
    /// The entities share part-of-speech tags.
    PosSimilarity,
    /// Gloss/translation text overlaps above threshold.
    Semantic,
    /// A vocabulary surface form occurs inside a grammar pattern's examples.
    /// The only directed kind: vocabulary → pattern.
    CrossReference,
    /// Both grammar patterns are taught in the same guidebook lesson.
    Guidebook,
}

impl RelationKind {
    /// Cross-reference edges point vocabulary → pattern; everything else is
    /// symmetric and stored with its node pair in canonical order.
    pub fn is_directed(self) -> bool {
        matches!(self, Self::CrossReference)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LevelAdjacency => "level_adjacency",
            Self::PosSimilarity => "pos_similarity",
            Self::Semantic => "semantic",
            Self::CrossReference => "cross_reference",
            Self::Guidebook => "guidebook",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

/// Why an extractor proposed an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evidence {
    /// Both entities sit at exactly this level.
    SharedLevel { level: JlptLevel },
    /// The entities are one level apart.
    AdjacentLevels {
        source_level: JlptLevel,
        target_level: JlptLevel,
    },
    /// Tag-set overlap: `shared` tags out of `total` in the union.
    SharedPos { shared: usize, total: usize },
    /// Gloss token-overlap similarity score.
    GlossOverlap { score: f64 },
    /// The vocabulary surface form matched in this many distinct examples.
    SurfaceMatch { surface: String, occurrences: usize },
    /// Both patterns are linked to this lesson.
    SharedLesson { lesson: String },
}

impl Evidence {
    /// One-line human-readable summary for artifacts and logs.
    pub fn summary(&self) -> String {
        match self {
            Self::SharedLevel { level } => format!("both at {level}"),
            Self::AdjacentLevels {
                source_level,
                target_level,
            } => format!("adjacent levels {source_level}/{target_level}"),
            Self::SharedPos { shared, total } => {
                format!("{shared} of {total} POS tags shared")
            }
            Self::GlossOverlap { score } => format!("gloss overlap {score:.2}"),
            Self::SurfaceMatch {
                surface,
                occurrences,
            } => format!("\"{surface}\" in {occurrences} example(s)"),
            Self::SharedLesson { lesson } => format!("both in lesson {lesson}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Candidate and frozen edges
// ---------------------------------------------------------------------------

/// Key identifying an edge slot after direction rules are applied:
/// (source, target, relation kind), with undirected pairs canonicalized.
pub type EdgeKey = (EntityId, EntityId, RelationKind);

/// An unmerged, extractor-proposed relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEdge {
    pub source: EntityId,
    pub target: EntityId,
    pub kind: RelationKind,
    /// Raw extractor confidence in [0, 1].
    pub score: f64,
    pub evidence: Evidence,
}

impl CandidateEdge {
    pub fn new(
        source: EntityId,
        target: EntityId,
        kind: RelationKind,
        score: f64,
        evidence: Evidence,
    ) -> Self {
        Self {
            source,
            target,
            kind,
            score,
            evidence,
        }
    }

    /// Self-loops are structurally invalid and dropped at aggregation.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// The aggregation key, with the node pair canonicalized (sorted) for
    /// undirected kinds so A→B and B→A land in the same slot.
    pub fn key(&self) -> EdgeKey {
        if self.kind.is_directed() || self.source <= self.target {
            (self.source.clone(), self.target.clone(), self.kind)
        } else {
            (self.target.clone(), self.source.clone(), self.kind)
        }
    }
}

/// A merged, frozen edge as emitted into the `edges.json` artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: EntityId,
    pub target: EntityId,
    pub kind: RelationKind,
    /// Final combined weight in (0, 1].
    pub weight: f64,
    pub directed: bool,
    pub evidence: Evidence,
}

impl Edge {
    /// Freeze a candidate into its final form. The caller has already
    /// applied direction canonicalization via [`CandidateEdge::key`].
    pub fn from_candidate(candidate: CandidateEdge) -> Self {
        let (source, target, kind) = candidate.key();
        Self {
            source,
            target,
            kind,
            weight: candidate.score,
            directed: kind.is_directed(),
            evidence: candidate.evidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> EntityId {
        EntityId::new(s)
    }

    #[test]
    fn only_cross_reference_is_directed() {
        assert!(RelationKind::CrossReference.is_directed());
        assert!(!RelationKind::LevelAdjacency.is_directed());
        assert!(!RelationKind::PosSimilarity.is_directed());
        assert!(!RelationKind::Semantic.is_directed());
        assert!(!RelationKind::Guidebook.is_directed());
    }

    #[test]
    fn undirected_key_is_canonical() {
        let forward = CandidateEdge::new(
            id("a"),
            id("b"),
            RelationKind::Semantic,
            0.5,
            Evidence::GlossOverlap { score: 0.5 },
        );
        let reverse = CandidateEdge::new(
            id("b"),
            id("a"),
            RelationKind::Semantic,
            0.6,
            Evidence::GlossOverlap { score: 0.6 },
        );
        assert_eq!(forward.key(), reverse.key());
    }

    #[test]
    fn directed_key_preserves_orientation() {
        let forward = CandidateEdge::new(
            id("vocab_z"),
            id("grammar_a"),
            RelationKind::CrossReference,
            0.9,
            Evidence::SurfaceMatch {
                surface: "食べる".into(),
                occurrences: 2,
            },
        );
        let (source, target, _) = forward.key();
        assert_eq!(source, id("vocab_z"));
        assert_eq!(target, id("grammar_a"));
    }

    #[test]
    fn self_loop_detection() {
        let edge = CandidateEdge::new(
            id("a"),
            id("a"),
            RelationKind::PosSimilarity,
            1.0,
            Evidence::SharedPos { shared: 1, total: 1 },
        );
        assert!(edge.is_self_loop());
    }

    #[test]
    fn evidence_summaries_read_naturally() {
        let ev = Evidence::SurfaceMatch {
            surface: "犬".into(),
            occurrences: 2,
        };
        assert_eq!(ev.summary(), "\"犬\" in 2 example(s)");

        let ev = Evidence::SharedLevel {
            level: JlptLevel::N3,
        };
        assert_eq!(ev.summary(), "both at N3");
    }
}
