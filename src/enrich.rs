//! Enrichment pass: attaches guidebook lesson metadata to pattern nodes.
//!
//! Strictly additive. The pass reads entities and lessons and returns a
//! metadata map keyed by entity id — it never sees the edge set, so it
//! cannot alter weights or topology, and structural tests stay independent
//! of enrichment content. Vocabulary nodes get no direct attachment;
//! viewers reach lesson content through the edges a vocabulary node
//! already holds to enriched patterns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, Example, GuidebookLesson, normalize};

/// Lesson metadata attached to an enriched pattern node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonAttachment {
    /// The lesson this came from.
    pub lesson_id: String,
    /// Lesson title.
    pub title: String,
    /// Lesson description / topic text.
    pub description: String,
    /// A representative example from the lesson, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Example>,
}

impl LessonAttachment {
    fn from_lesson(lesson: &GuidebookLesson) -> Self {
        Self {
            lesson_id: lesson.id.clone(),
            title: lesson.title.clone(),
            description: lesson.description.clone(),
            example: lesson.examples.first().cloned(),
        }
    }
}

/// Match grammar patterns to lessons and collect their attachments.
///
/// A pattern is enriched when its lesson linkage names a loaded lesson, or
/// when its surface text appears in one of a lesson's examples. Lessons are
/// scanned in id order and the first match wins, so the output is
/// deterministic for identical input.
pub fn enrich(
    entities: &[Entity],
    lessons: &[GuidebookLesson],
) -> BTreeMap<EntityId, LessonAttachment> {
    if lessons.is_empty() {
        return BTreeMap::new();
    }

    let by_id: BTreeMap<&str, &GuidebookLesson> =
        lessons.iter().map(|l| (l.id.as_str(), l)).collect();

    let mut attachments = BTreeMap::new();
    for entity in entities {
        let Entity::GrammarPattern(pattern) = entity else {
            continue;
        };

        // Explicit linkage first.
        if let Some(lesson) = pattern.lesson.as_deref().and_then(|l| by_id.get(l)) {
            attachments.insert(pattern.id.clone(), LessonAttachment::from_lesson(lesson));
            continue;
        }

        // Otherwise match the pattern text inside lesson examples.
        let surface = normalize(&pattern.pattern);
        if surface.is_empty() {
            continue;
        }
        let matched = lessons.iter().find(|lesson| {
            lesson
                .examples
                .iter()
                .any(|ex| normalize(&ex.text).contains(&surface))
        });
        if let Some(lesson) = matched {
            attachments.insert(pattern.id.clone(), LessonAttachment::from_lesson(lesson));
        }
    }

    tracing::info!(enriched = attachments.len(), "attached lesson metadata");
    attachments
}
