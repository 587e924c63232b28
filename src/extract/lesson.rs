//! Lesson-affinity extractor: connects grammar patterns taught in the same
//! guidebook lesson.
//!
//! Only active when lesson records were loaded; the lesson linkage on a
//! pattern must name a lesson that actually exists. Produces the
//! `guidebook` relation kind, undirected.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::NetworkConfig;
use crate::edge::{CandidateEdge, Evidence, RelationKind};
use crate::entity::Entity;

use super::{CorpusView, RelationExtractor};

pub struct LessonAffinityExtractor;

impl RelationExtractor for LessonAffinityExtractor {
    fn name(&self) -> &'static str {
        "guidebook"
    }

    fn extract(&self, corpus: &CorpusView<'_>, cfg: &NetworkConfig) -> Vec<CandidateEdge> {
        if corpus.lessons.is_empty() {
            return Vec::new();
        }
        let known: BTreeSet<&str> = corpus.lessons.iter().map(|l| l.id.as_str()).collect();

        // Group patterns by the lesson they link to.
        let mut by_lesson: BTreeMap<&str, Vec<&Entity>> = BTreeMap::new();
        for entity in corpus.entities {
            let Entity::GrammarPattern(pattern) = entity else {
                continue;
            };
            if let Some(lesson) = pattern.lesson.as_deref()
                && known.contains(lesson)
            {
                by_lesson.entry(lesson).or_default().push(entity);
            }
        }

        let mut candidates = Vec::new();
        for (lesson, members) in by_lesson {
            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    candidates.push(CandidateEdge::new(
                        a.id().clone(),
                        b.id().clone(),
                        RelationKind::Guidebook,
                        cfg.guidebook_weight,
                        Evidence::SharedLesson {
                            lesson: lesson.to_string(),
                        },
                    ));
                }
            }
        }
        candidates
    }
}
