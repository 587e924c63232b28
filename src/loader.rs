//! Entity loader: validated JSON records → unified, deduplicated entities.
//!
//! The loader is the single point where input files are read. It consumes the
//! arrays the upstream cleaning pipeline emits (`grammar_pattern.json`,
//! `vocabulary_entry.json`, optionally `guidebook_lesson.json`), converts
//! them into typed [`Entity`] values, deduplicates by id, and returns them
//! stably sorted by id so every downstream artifact is byte-for-byte
//! reproducible.
//!
//! Contract violations in a single record (the validator should have caught
//! them) are skipped with a warning and counted; only an unreadable file or
//! a malformed JSON document aborts the run.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::entity::{
    Entity, EntityId, Example, GrammarPattern, GuidebookLesson, JlptLevel, PosTag, Provenance,
    VocabularyEntry, normalize,
};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Raw record shapes (the cleaner's output schema)
// ---------------------------------------------------------------------------

/// `pos` arrives as a single string from some cleaners and a list from others.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PosField {
    One(String),
    Many(Vec<String>),
}

impl Default for PosField {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl PosField {
    fn into_tags(self) -> Vec<PosTag> {
        let raw = match self {
            Self::One(s) => vec![s],
            Self::Many(v) => v,
        };
        let mut tags: Vec<PosTag> = raw
            .iter()
            .map(|s| PosTag::parse(s))
            .filter(|t| t.is_known())
            .collect();
        tags.dedup();
        tags
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SourceRef {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RawGrammarRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    jlpt_level: String,
    #[serde(default)]
    pos: PosField,
    #[serde(default)]
    examples: Vec<Example>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    sources: Vec<SourceRef>,
    #[serde(default)]
    lesson: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawVocabularyRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    lemma: String,
    #[serde(default)]
    reading: String,
    #[serde(default)]
    pos: PosField,
    #[serde(default)]
    meanings: Vec<String>,
    #[serde(default)]
    examples: Vec<Example>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    sources: Vec<SourceRef>,
}

// ---------------------------------------------------------------------------
// Load report
// ---------------------------------------------------------------------------

/// Counts from one load pass, reported at the end of the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Grammar patterns loaded.
    pub grammar: usize,
    /// Vocabulary entries loaded.
    pub vocabulary: usize,
    /// Guidebook lessons loaded.
    pub lessons: usize,
    /// Records dropped because an earlier record claimed the same id.
    pub duplicates: usize,
    /// Records skipped for violating the upstream contract.
    pub skipped: usize,
}

/// Everything the loader hands to the rest of the pipeline.
#[derive(Debug)]
pub struct LoadedCorpus {
    /// Unified entity sequence, stably sorted by id.
    pub entities: Vec<Entity>,
    /// Guidebook lessons, sorted by id. Empty when no lesson file was given.
    pub lessons: Vec<GuidebookLesson>,
    /// Load counts.
    pub report: LoadReport,
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Pick provenance from the explicit sources list, falling back to tags.
fn resolve_provenance(sources: &[SourceRef], tags: &[String]) -> Provenance {
    sources
        .iter()
        .find_map(|s| Provenance::parse(&s.name))
        .or_else(|| tags.iter().find_map(|t| Provenance::parse(t)))
        .unwrap_or(Provenance::Jlpt)
}

/// Level from the explicit field, falling back to a `jlpt_n*` tag.
fn resolve_level(field: &str, tags: &[String]) -> JlptLevel {
    let level = JlptLevel::parse(field);
    if level != JlptLevel::Unknown {
        return level;
    }
    tags.iter()
        .filter(|t| t.starts_with("jlpt_"))
        .map(|t| JlptLevel::parse(t))
        .find(|l| *l != JlptLevel::Unknown)
        .unwrap_or(JlptLevel::Unknown)
}

/// Defensive re-clean of an example list: drop empties and duplicates the
/// upstream filter should already have removed.
fn clean_examples(examples: Vec<Example>) -> Vec<Example> {
    let mut seen = std::collections::BTreeSet::new();
    examples
        .into_iter()
        .filter(|ex| !ex.text.trim().is_empty())
        .filter(|ex| seen.insert(normalize(&ex.text)))
        .collect()
}

fn convert_grammar(raw: RawGrammarRecord) -> Result<GrammarPattern, LoadError> {
    let pattern = normalize(&raw.title);
    if pattern.is_empty() {
        return Err(LoadError::MissingField {
            id: raw.id.unwrap_or_default(),
            field: "title",
        });
    }
    let id = match raw.id {
        Some(id) if !id.trim().is_empty() => EntityId::new(id.trim()),
        _ => EntityId::derive("grammar", &pattern),
    };
    let mut pos = raw.pos.into_tags();
    if pos.is_empty() {
        pos.push(PosTag::Grammar);
    }
    Ok(GrammarPattern {
        id,
        level: resolve_level(&raw.jlpt_level, &raw.tags),
        pattern,
        pos,
        gloss: raw.description.trim().to_string(),
        examples: clean_examples(raw.examples),
        provenance: resolve_provenance(&raw.sources, &raw.tags),
        lesson: raw.lesson.filter(|l| !l.trim().is_empty()),
    })
}

fn convert_vocabulary(raw: RawVocabularyRecord) -> Result<VocabularyEntry, LoadError> {
    let lemma = normalize(&raw.lemma);
    if lemma.is_empty() {
        return Err(LoadError::MissingField {
            id: raw.id.unwrap_or_default(),
            field: "lemma",
        });
    }
    let id = match raw.id {
        Some(id) if !id.trim().is_empty() => EntityId::new(id.trim()),
        _ => EntityId::derive("vocab", &format!("{lemma}|{}", raw.reading.trim())),
    };
    Ok(VocabularyEntry {
        id,
        level: resolve_level("", &raw.tags),
        lemma,
        reading: raw.reading.trim().to_string(),
        pos: raw.pos.into_tags(),
        glosses: raw
            .meanings
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect(),
        examples: clean_examples(raw.examples),
        provenance: resolve_provenance(&raw.sources, &raw.tags),
    })
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

/// Read a file as a JSON array of loose values.
///
/// An unreadable file or a document that isn't an array is systemic and
/// aborts; a single malformed record inside the array is handled later,
/// per record.
fn read_values(path: &Path) -> Result<Vec<serde_json::Value>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Deserialize records one at a time so a bad record skips, not aborts.
fn parse_records<T: serde::de::DeserializeOwned>(
    values: Vec<serde_json::Value>,
    what: &'static str,
    skipped: &mut usize,
) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(record = what, error = %e, "skipping malformed record");
                *skipped += 1;
                None
            }
        })
        .collect()
}

/// Load and unify the validated record files.
///
/// `lessons_path` is optional; without it the corpus simply carries no
/// lesson material and neither enrichment nor guidebook edges occur.
pub fn load_corpus(
    grammar_path: &Path,
    vocab_path: &Path,
    lessons_path: Option<&Path>,
) -> Result<LoadedCorpus, LoadError> {
    let grammar_values = read_values(grammar_path)?;
    let vocab_values = read_values(vocab_path)?;

    let mut report = LoadReport::default();
    let grammar_raw: Vec<RawGrammarRecord> =
        parse_records(grammar_values, "grammar_pattern", &mut report.skipped);
    let vocab_raw: Vec<RawVocabularyRecord> =
        parse_records(vocab_values, "vocabulary_entry", &mut report.skipped);

    let mut by_id: BTreeMap<EntityId, Entity> = BTreeMap::new();

    for raw in grammar_raw {
        match convert_grammar(raw) {
            Ok(pattern) => {
                if by_id.contains_key(&pattern.id) {
                    tracing::warn!(id = %pattern.id, "duplicate grammar record dropped");
                    report.duplicates += 1;
                } else {
                    report.grammar += 1;
                    by_id.insert(pattern.id.clone(), Entity::GrammarPattern(pattern));
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "skipping grammar record");
                report.skipped += 1;
            }
        }
    }

    for raw in vocab_raw {
        match convert_vocabulary(raw) {
            Ok(entry) => {
                if by_id.contains_key(&entry.id) {
                    tracing::warn!(id = %entry.id, "duplicate vocabulary record dropped");
                    report.duplicates += 1;
                } else {
                    report.vocabulary += 1;
                    by_id.insert(entry.id.clone(), Entity::VocabularyEntry(entry));
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "skipping vocabulary record");
                report.skipped += 1;
            }
        }
    }

    let mut lessons: Vec<GuidebookLesson> = match lessons_path {
        Some(path) => parse_records(read_values(path)?, "guidebook_lesson", &mut report.skipped),
        None => Vec::new(),
    };
    lessons.retain(|l| !l.id.trim().is_empty());
    lessons.sort_by(|a, b| a.id.cmp(&b.id));
    lessons.dedup_by(|a, b| a.id == b.id);
    report.lessons = lessons.len();

    // BTreeMap iteration gives the stable id order downstream stages rely on.
    let entities: Vec<Entity> = by_id.into_values().collect();

    tracing::info!(
        grammar = report.grammar,
        vocabulary = report.vocabulary,
        lessons = report.lessons,
        duplicates = report.duplicates,
        skipped = report.skipped,
        "loaded validated records"
    );

    Ok(LoadedCorpus {
        entities,
        lessons,
        report,
    })
}
