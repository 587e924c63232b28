//! Cross-reference extractor: finds vocabulary surface forms inside grammar
//! pattern examples.
//!
//! The one directed heuristic: a match means the word appears *within* the
//! pattern's example, so the edge points vocabulary → pattern. Confidence
//! grows with the number of distinct examples containing the form, capped
//! at 1.0.

use crate::config::NetworkConfig;
use crate::edge::{CandidateEdge, Evidence, RelationKind};
use crate::entity::{Entity, normalize};

use super::{CorpusView, RelationExtractor};

pub struct CrossReferenceExtractor;

impl RelationExtractor for CrossReferenceExtractor {
    fn name(&self) -> &'static str {
        "cross_reference"
    }

    fn extract(&self, corpus: &CorpusView<'_>, cfg: &NetworkConfig) -> Vec<CandidateEdge> {
        // Normalize lemmas once; entities without examples simply never match.
        let vocab: Vec<(&Entity, String)> = corpus
            .entities
            .iter()
            .filter(|e| matches!(e, Entity::VocabularyEntry(_)))
            .map(|e| (e, normalize(e.label())))
            .filter(|(_, lemma)| !lemma.is_empty())
            .collect();

        let mut candidates = Vec::new();
        for entity in corpus.entities {
            let Entity::GrammarPattern(pattern) = entity else {
                continue;
            };
            if pattern.examples.is_empty() {
                continue;
            }
            let examples: Vec<String> = pattern
                .examples
                .iter()
                .map(|ex| normalize(&ex.text))
                .collect();

            for (vocab_entity, lemma) in &vocab {
                let occurrences = examples.iter().filter(|ex| ex.contains(lemma)).count();
                if occurrences == 0 {
                    continue;
                }
                let score = (occurrences as f64 * cfg.crossref_occurrence_weight).min(1.0);
                candidates.push(CandidateEdge::new(
                    vocab_entity.id().clone(),
                    pattern.id.clone(),
                    RelationKind::CrossReference,
                    score,
                    Evidence::SurfaceMatch {
                        surface: lemma.clone(),
                        occurrences,
                    },
                ));
            }
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::entity::{JlptLevel, PosTag};

    fn run(entities: &[Entity]) -> Vec<CandidateEdge> {
        let corpus = CorpusView {
            entities,
            lessons: &[],
        };
        CrossReferenceExtractor.extract(&corpus, &NetworkConfig::default())
    }

    #[test]
    fn match_points_vocabulary_to_pattern() {
        let entities = vec![
            pattern(
                "grammar_temiru",
                JlptLevel::N4,
                "てみる",
                &[PosTag::Grammar],
                "try doing",
                &["寿司を食べてみる"],
            ),
            vocab("vocab_taberu", JlptLevel::N5, "食べ", &[PosTag::Verb], &["to eat"]),
        ];
        let candidates = run(&entities);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source.as_str(), "vocab_taberu");
        assert_eq!(candidates[0].target.as_str(), "grammar_temiru");
        assert_eq!(candidates[0].kind, RelationKind::CrossReference);
    }

    #[test]
    fn two_occurrences_raise_confidence_capped() {
        let entities = vec![
            pattern(
                "grammar_tai",
                JlptLevel::N5,
                "たい",
                &[PosTag::Grammar],
                "want to",
                &["水を飲みたい", "もっと飲みたいです", "寝たい"],
            ),
            vocab("vocab_nomu", JlptLevel::N5, "飲み", &[PosTag::Verb], &["to drink"]),
        ];
        let candidates = run(&entities);
        assert_eq!(candidates.len(), 1);
        // two distinct matching examples at 0.45 each
        assert!((candidates[0].score - 0.9).abs() < 1e-9);
        assert!(matches!(
            candidates[0].evidence,
            Evidence::SurfaceMatch { occurrences: 2, .. }
        ));
    }

    #[test]
    fn many_occurrences_cap_at_one() {
        let examples = ["犬だ", "犬です", "犬がいる", "犬も犬"];
        let entities = vec![
            pattern(
                "grammar_da",
                JlptLevel::N5,
                "だ",
                &[PosTag::Grammar],
                "copula",
                &examples,
            ),
            vocab("vocab_inu", JlptLevel::N5, "犬", &[PosTag::Noun], &["dog"]),
        ];
        let candidates = run(&entities);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].score, 1.0);
    }

    #[test]
    fn width_variants_still_match() {
        // Half-width katakana in the example, full-width lemma.
        let entities = vec![
            pattern(
                "grammar_x",
                JlptLevel::N5,
                "です",
                &[PosTag::Grammar],
                "",
                &["ﾃﾚﾋﾞを見ます"],
            ),
            vocab("vocab_terebi", JlptLevel::N5, "テレビ", &[PosTag::Noun], &["TV"]),
        ];
        let candidates = run(&entities);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn patterns_without_examples_never_participate() {
        let entities = vec![
            pattern("grammar_a", JlptLevel::N5, "です", &[PosTag::Grammar], "", &[]),
            vocab("vocab_inu", JlptLevel::N5, "犬", &[PosTag::Noun], &["dog"]),
        ];
        assert!(run(&entities).is_empty());
    }

    #[test]
    fn no_reverse_edges_ever() {
        let entities = vec![
            pattern(
                "grammar_a",
                JlptLevel::N5,
                "です",
                &[PosTag::Grammar],
                "",
                &["犬です"],
            ),
            vocab("vocab_inu", JlptLevel::N5, "犬", &[PosTag::Noun], &["dog"]),
        ];
        for c in run(&entities) {
            assert!(c.source.as_str().starts_with("vocab_"));
            assert!(c.target.as_str().starts_with("grammar_"));
        }
    }
}
