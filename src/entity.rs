//! Core entity types for the kotoami network.
//!
//! Entities are the records eligible to become graph nodes: grammar patterns
//! and vocabulary entries, both already cleaned and validated upstream.
//! Identifiers are stable across runs because they derive from normalized
//! record content, never from row order.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Stable, content-derived identifier for an entity.
///
/// Upstream cleaners usually assign these; records arriving without one get
/// a `{prefix}_{digest}` id via [`EntityId::derive`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap an upstream-assigned identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Derive a stable identifier from normalized content.
    ///
    /// The digest is the first 8 hex chars of the blake3 hash of the
    /// NFKC-normalized content, so the same record always maps to the same
    /// id regardless of input ordering.
    pub fn derive(prefix: &str, content: &str) -> Self {
        let digest = blake3::hash(normalize(content).as_bytes());
        Self(format!("{prefix}_{}", &digest.to_hex()[..8]))
    }

    /// The underlying string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// NFKC-fold and trim a text fragment.
///
/// Japanese sources mix full-width and half-width forms; folding before
/// hashing or substring matching keeps both comparisons stable.
pub fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().trim().to_string()
}

// ---------------------------------------------------------------------------
// JLPT levels
// ---------------------------------------------------------------------------

/// JLPT proficiency level, from N5 (beginner) to N1 (advanced).
///
/// `Unknown` is an explicit sentinel, never an absent field: every extractor
/// has exactly one branch to take for unlevelled entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JlptLevel {
    N5,
    N4,
    N3,
    N2,
    N1,
    Unknown,
}

impl JlptLevel {
    /// Ordinal position on the difficulty axis: N5 → 1 up to N1 → 5.
    /// `Unknown` has no ordinal.
    pub fn ordinal(self) -> Option<u8> {
        match self {
            Self::N5 => Some(1),
            Self::N4 => Some(2),
            Self::N3 => Some(3),
            Self::N2 => Some(4),
            Self::N1 => Some(5),
            Self::Unknown => None,
        }
    }

    /// Parse the level encodings seen in source data: `"N3"`, `"n3"`,
    /// `"jlpt_n3"`, a bare ordinal `"3"`, or empty/unrecognized → `Unknown`.
    pub fn parse(raw: &str) -> Self {
        let key = raw.trim().to_lowercase();
        let key = key.strip_prefix("jlpt_").unwrap_or(&key);
        match key {
            "n5" | "5" => Self::N5,
            "n4" | "4" => Self::N4,
            "n3" | "3" => Self::N3,
            "n2" | "2" => Self::N2,
            "n1" | "1" => Self::N1,
            _ => Self::Unknown,
        }
    }

    /// Whether two levels are both known and differ by at most one step.
    pub fn is_adjacent(self, other: Self) -> bool {
        match (self.ordinal(), other.ordinal()) {
            (Some(a), Some(b)) => a.abs_diff(b) <= 1,
            _ => false,
        }
    }
}

impl std::fmt::Display for JlptLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::N5 => write!(f, "N5"),
            Self::N4 => write!(f, "N4"),
            Self::N3 => write!(f, "N3"),
            Self::N2 => write!(f, "N2"),
            Self::N1 => write!(f, "N1"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ---------------------------------------------------------------------------
// Part-of-speech tags
// ---------------------------------------------------------------------------

/// Canonicalized part-of-speech tag.
///
/// The upstream tagger emits a small canonical set; anything outside it is
/// preserved verbatim in `Other` rather than dropped, so no record loses
/// information on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PosTag {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Particle,
    Conjunction,
    Counter,
    Expression,
    Grammar,
    Other(String),
}

impl PosTag {
    /// Case-insensitive parse covering the tagger's common spellings.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "noun" | "n" | "kanji" | "katakana" => Self::Noun,
            "verb" | "v" | "verbal noun" => Self::Verb,
            "adjective" | "adj" | "adjectival noun" => Self::Adjective,
            "adverb" | "adv" => Self::Adverb,
            "pronoun" | "pron" => Self::Pronoun,
            "particle" | "part" => Self::Particle,
            "conjunction" | "conj" => Self::Conjunction,
            "counter" => Self::Counter,
            "expression" => Self::Expression,
            "grammar" => Self::Grammar,
            "" => Self::Other(String::new()),
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Canonical lowercase name used in cluster labels and artifacts.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::Adverb => "adverb",
            Self::Pronoun => "pronoun",
            Self::Particle => "particle",
            Self::Conjunction => "conjunction",
            Self::Counter => "counter",
            Self::Expression => "expression",
            Self::Grammar => "grammar",
            Self::Other(s) => s,
        }
    }

    /// Whether this tag carries usable information for clustering.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(s) if s.is_empty())
    }
}

impl From<String> for PosTag {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<PosTag> for String {
    fn from(tag: PosTag) -> Self {
        tag.as_str().to_string()
    }
}

impl std::fmt::Display for PosTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Examples and provenance
// ---------------------------------------------------------------------------

/// An example sentence: source text plus optional translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Source-language sentence.
    #[serde(rename = "ja")]
    pub text: String,
    /// Optional translation.
    #[serde(rename = "en", default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

impl Example {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            translation: None,
        }
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }
}

/// Which source collection a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Jlpt,
    Duolingo,
    Anki,
    Guidebook,
}

impl Provenance {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "jlpt" => Some(Self::Jlpt),
            "duolingo" | "duo" => Some(Self::Duolingo),
            "anki" => Some(Self::Anki),
            "guidebook" => Some(Self::Guidebook),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jlpt => write!(f, "jlpt"),
            Self::Duolingo => write!(f, "duolingo"),
            Self::Anki => write!(f, "anki"),
            Self::Guidebook => write!(f, "guidebook"),
        }
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A grammar pattern record (e.g. てみる, なければならない).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarPattern {
    /// Stable identifier.
    pub id: EntityId,
    /// JLPT level, or the explicit unknown sentinel.
    pub level: JlptLevel,
    /// The surface pattern text.
    pub pattern: String,
    /// Part-of-speech tags (usually just `grammar`, sometimes more specific).
    pub pos: Vec<PosTag>,
    /// English description of the pattern's meaning.
    pub gloss: String,
    /// Example sentences illustrating the pattern.
    pub examples: Vec<Example>,
    /// Which source collection the record came from.
    pub provenance: Provenance,
    /// Guidebook lesson this pattern was taught in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson: Option<String>,
}

/// A vocabulary entry record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Stable identifier.
    pub id: EntityId,
    /// JLPT level, or the explicit unknown sentinel.
    pub level: JlptLevel,
    /// The dictionary form of the word.
    pub lemma: String,
    /// Kana reading.
    pub reading: String,
    /// Part-of-speech tags.
    pub pos: Vec<PosTag>,
    /// English glosses.
    pub glosses: Vec<String>,
    /// Example sentences using the word.
    pub examples: Vec<Example>,
    /// Which source collection the record came from.
    pub provenance: Provenance,
}

/// A record eligible to become a graph node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entity {
    GrammarPattern(GrammarPattern),
    VocabularyEntry(VocabularyEntry),
}

impl Entity {
    /// The entity's stable identifier.
    pub fn id(&self) -> &EntityId {
        match self {
            Self::GrammarPattern(g) => &g.id,
            Self::VocabularyEntry(v) => &v.id,
        }
    }

    /// The entity's JLPT level.
    pub fn level(&self) -> JlptLevel {
        match self {
            Self::GrammarPattern(g) => g.level,
            Self::VocabularyEntry(v) => v.level,
        }
    }

    /// Part-of-speech tags.
    pub fn pos_tags(&self) -> &[PosTag] {
        match self {
            Self::GrammarPattern(g) => &g.pos,
            Self::VocabularyEntry(v) => &v.pos,
        }
    }

    /// The primary (first) POS tag, if one is present and informative.
    pub fn primary_pos(&self) -> Option<&PosTag> {
        self.pos_tags().iter().find(|t| t.is_known())
    }

    /// Display label: the surface pattern or lemma.
    pub fn label(&self) -> &str {
        match self {
            Self::GrammarPattern(g) => &g.pattern,
            Self::VocabularyEntry(v) => &v.lemma,
        }
    }

    /// Example sentences.
    pub fn examples(&self) -> &[Example] {
        match self {
            Self::GrammarPattern(g) => &g.examples,
            Self::VocabularyEntry(v) => &v.examples,
        }
    }

    /// All gloss/translation text joined for similarity scoring.
    pub fn gloss_text(&self) -> String {
        match self {
            Self::GrammarPattern(g) => g.gloss.clone(),
            Self::VocabularyEntry(v) => v.glosses.join(" "),
        }
    }

    /// Artifact type tag: `pattern` or `vocabulary`.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::GrammarPattern(_) => "pattern",
            Self::VocabularyEntry(_) => "vocabulary",
        }
    }
}

// ---------------------------------------------------------------------------
// Guidebook lessons
// ---------------------------------------------------------------------------

/// A guidebook lesson: input-only enrichment material, never a graph node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidebookLesson {
    /// Lesson identifier (e.g. `guidebook_s1u3`).
    pub id: String,
    /// Lesson title.
    pub title: String,
    /// Lesson description / topic text.
    #[serde(default)]
    pub description: String,
    /// Example sentences taught in the lesson.
    #[serde(default)]
    pub examples: Vec<Example>,
}
