//! T2D Core - Domain models, errors and shared configuration
//!
//! This crate defines the value types that flow through the labeling
//! pipeline:
//! - Entity labels, candidates and flat dataset records
//! - Span-aligned training records
//! - Extraction mode and output format selectors
//! - Common error types
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, ConfigError, FallbackPolicy, LoggingConfig, PipelineConfig, RecognizerConfig,
    SegmenterKind,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for t2d operations
#[derive(Error, Debug)]
pub enum T2dError {
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, T2dError>;

// ============================================================================
// Labels
// ============================================================================

/// Document-level category assigned by the smart strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Technology,
    Sports,
    Politics,
    Business,
    Health,
    Entertainment,
    General,
}

impl Category {
    /// Every category, in classification precedence order
    pub const ALL: [Category; 7] = [
        Self::Technology,
        Self::Sports,
        Self::Politics,
        Self::Business,
        Self::Health,
        Self::Entertainment,
        Self::General,
    ];

    /// Label form, e.g. `CATEGORY_TECHNOLOGY`
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Technology => "CATEGORY_TECHNOLOGY",
            Self::Sports => "CATEGORY_SPORTS",
            Self::Politics => "CATEGORY_POLITICS",
            Self::Business => "CATEGORY_BUSINESS",
            Self::Health => "CATEGORY_HEALTH",
            Self::Entertainment => "CATEGORY_ENTERTAINMENT",
            Self::General => "CATEGORY_GENERAL",
        }
    }

    /// Parse a `CATEGORY_*` label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_label() == label)
    }
}

/// Coarse entity label.
///
/// Not a closed set: labels produced by a recognizer that are not one of the
/// known categories are carried through as [`EntityLabel::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    Person,
    Org,
    Gpe,
    Date,
    Money,
    Email,
    Phone,
    /// Whole sentence emitted when no finer extraction is available
    Sentence,
    Category(Category),
    Other(String),
}

impl EntityLabel {
    /// Get the string representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Person => "PERSON",
            Self::Org => "ORG",
            Self::Gpe => "GPE",
            Self::Date => "DATE",
            Self::Money => "MONEY",
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::Sentence => "SENTENCE",
            Self::Category(category) => category.as_label(),
            Self::Other(label) => label,
        }
    }

    pub fn is_money(&self) -> bool {
        matches!(self, Self::Money)
    }

    pub fn is_category(&self) -> bool {
        matches!(self, Self::Category(_))
    }
}

impl From<&str> for EntityLabel {
    fn from(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "PERSON" => Self::Person,
            "ORG" => Self::Org,
            "GPE" => Self::Gpe,
            "DATE" => Self::Date,
            "MONEY" => Self::Money,
            "EMAIL" => Self::Email,
            "PHONE" => Self::Phone,
            "SENTENCE" => Self::Sentence,
            upper => match Category::from_label(upper) {
                Some(category) => Self::Category(category),
                None => Self::Other(s.to_string()),
            },
        }
    }
}

impl From<String> for EntityLabel {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        match label {
            EntityLabel::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl From<Category> for EntityLabel {
    fn from(category: Category) -> Self {
        Self::Category(category)
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Candidates and Records
// ============================================================================

/// An entity proposed by a recognizer or a fallback pattern.
///
/// Candidates are never modified after creation; the quality filter only
/// decides whether one is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityCandidate {
    /// Sentence the entity was found in
    pub source_sentence: String,

    /// Normalized entity text
    pub entity_text: String,

    /// Assigned label
    pub label: EntityLabel,
}

impl EntityCandidate {
    /// Create a new candidate
    pub fn new(
        source_sentence: impl Into<String>,
        entity_text: impl Into<String>,
        label: impl Into<EntityLabel>,
    ) -> Self {
        Self {
            source_sentence: source_sentence.into(),
            entity_text: entity_text.into(),
            label: label.into(),
        }
    }

    /// Candidate covering the whole sentence (categories, SENTENCE fallback)
    pub fn whole_sentence(sentence: &str, label: impl Into<EntityLabel>) -> Self {
        Self::new(sentence, sentence, label)
    }
}

/// One row of the flat dataset (`text`, `entity`, `label`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub text: String,
    pub entity: String,
    pub label: EntityLabel,
}

impl From<EntityCandidate> for EntityRecord {
    fn from(candidate: EntityCandidate) -> Self {
        Self {
            text: candidate.source_sentence,
            entity: candidate.entity_text,
            label: candidate.label,
        }
    }
}

// ============================================================================
// Span Format
// ============================================================================

/// A labeled character range, serialized as `[start, end, label]`.
///
/// Offsets count Unicode scalar values, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "(usize, usize, EntityLabel)",
    into = "(usize, usize, EntityLabel)"
)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: EntityLabel,
}

impl Span {
    pub fn new(start: usize, end: usize, label: impl Into<EntityLabel>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<(usize, usize, EntityLabel)> for Span {
    fn from((start, end, label): (usize, usize, EntityLabel)) -> Self {
        Self { start, end, label }
    }
}

impl From<Span> for (usize, usize, EntityLabel) {
    fn from(span: Span) -> Self {
        (span.start, span.end, span.label)
    }
}

/// The `{"entities": [...]}` half of a serialized span record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanEntities {
    pub entities: Vec<Span>,
}

/// A training record: a sentence with its labeled spans.
///
/// Serialized as `[text, {"entities": [[start, end, label], ...]}]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, SpanEntities)", into = "(String, SpanEntities)")]
pub struct SpanRecord {
    pub text: String,
    pub spans: Vec<Span>,
}

impl SpanRecord {
    /// Create an empty record for a sentence
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    /// Text covered by a span, or `None` if it falls outside the sentence
    pub fn slice(&self, span: &Span) -> Option<String> {
        if span.start > span.end || span.end > self.text.chars().count() {
            return None;
        }
        Some(
            self.text
                .chars()
                .skip(span.start)
                .take(span.len())
                .collect(),
        )
    }
}

impl From<(String, SpanEntities)> for SpanRecord {
    fn from((text, entities): (String, SpanEntities)) -> Self {
        Self {
            text,
            spans: entities.entities,
        }
    }
}

impl From<SpanRecord> for (String, SpanEntities) {
    fn from(record: SpanRecord) -> Self {
        (
            record.text,
            SpanEntities {
                entities: record.spans,
            },
        )
    }
}

// ============================================================================
// Selectors
// ============================================================================

/// Extraction strategy selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Entities only
    #[default]
    Fast,
    /// Entities plus one document category per sentence
    Smart,
}

impl std::str::FromStr for ExtractionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "smart" => Ok(Self::Smart),
            _ => Err(ConfigError::InvalidValue {
                key: "mode".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fast => write!(f, "fast"),
            Self::Smart => write!(f, "smart"),
        }
    }
}

/// Dataset output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    /// Span-aligned training format
    Spacy,
}

impl OutputFormat {
    /// File extension for datasets in this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::Spacy => "json",
        }
    }

    /// Whether this format carries spans rather than flat rows
    pub fn is_span_format(&self) -> bool {
        matches!(self, Self::Spacy)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "spacy" | "spacy-json" | "spans" => Ok(Self::Spacy),
            _ => Err(ConfigError::InvalidValue {
                key: "output_format".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
            Self::Spacy => write!(f, "spacy"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
