//! Cluster assignment: derived layout hints, not graph semantics.
//!
//! A cluster label is a pure function of (JLPT level, primary POS tag),
//! recomputed every run. It never feeds back into edge weights — viewers
//! use it for grouping and color, nothing else. Total: every entity gets
//! exactly one label, with `unclustered` for unknown levels.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// The label an unlevelled entity receives.
pub const UNCLUSTERED: &str = "unclustered";

/// A derived grouping label, e.g. `n3-particle`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterLabel(String);

impl ClusterLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Assign the cluster label for an entity.
///
/// Unknown level → `unclustered` (level is the primary layout axis; POS
/// alone doesn't place a node). Known level with no informative POS tag
/// clusters by level alone.
pub fn assign(entity: &Entity) -> ClusterLabel {
    let Some(_) = entity.level().ordinal() else {
        return ClusterLabel(UNCLUSTERED.to_string());
    };
    let level = entity.level().to_string().to_lowercase();
    match entity.primary_pos() {
        Some(pos) => ClusterLabel(format!("{level}-{pos}")),
        None => ClusterLabel(level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{
        Entity, EntityId, GrammarPattern, JlptLevel, PosTag, Provenance, VocabularyEntry,
    };

    fn vocab(level: JlptLevel, pos: Vec<PosTag>) -> Entity {
        Entity::VocabularyEntry(VocabularyEntry {
            id: EntityId::new("vocab_x"),
            level,
            lemma: "犬".into(),
            reading: "いぬ".into(),
            pos,
            glosses: vec!["dog".into()],
            examples: vec![],
            provenance: Provenance::Anki,
        })
    }

    #[test]
    fn level_and_pos_form_the_label() {
        let label = assign(&vocab(JlptLevel::N3, vec![PosTag::Particle]));
        assert_eq!(label.as_str(), "n3-particle");
    }

    #[test]
    fn known_level_unknown_pos_clusters_by_level() {
        let label = assign(&vocab(JlptLevel::N4, vec![]));
        assert_eq!(label.as_str(), "n4");
    }

    #[test]
    fn unknown_level_is_unclustered_even_with_pos() {
        let label = assign(&vocab(JlptLevel::Unknown, vec![PosTag::Noun]));
        assert_eq!(label.as_str(), UNCLUSTERED);
    }

    #[test]
    fn grammar_patterns_cluster_too() {
        let entity = Entity::GrammarPattern(GrammarPattern {
            id: EntityId::new("grammar_x"),
            level: JlptLevel::N5,
            pattern: "です".into(),
            pos: vec![PosTag::Grammar],
            gloss: String::new(),
            examples: vec![],
            provenance: Provenance::Jlpt,
            lesson: None,
        });
        assert_eq!(assign(&entity).as_str(), "n5-grammar");
    }
}
