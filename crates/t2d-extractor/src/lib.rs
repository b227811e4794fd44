//! T2D Extractor - Entity extraction pipeline
//!
//! Turns sentences into labeled entity candidates. A model-backed
//! [`Recognizer`] is tried first; regex patterns take over when no
//! recognizer is available or it fails on a sentence. Every candidate passes
//! the heuristic quality filter before it reaches any output.

use std::path::PathBuf;

use t2d_core::EntityLabel;
use thiserror::Error;

pub mod classify;
pub mod extract;
pub mod patterns;
pub mod pipeline;
pub mod quality;
pub mod recognizer;
pub mod stats;

pub use classify::KeywordClassifier;
pub use extract::{EntityExtractor, Extraction, ExtractionPath};
pub use patterns::PatternExtractor;
pub use pipeline::{ExtractionStrategy, LabelingOutput, LabelingPipeline};
pub use quality::{is_acceptable, rejection_reason, Rejection};
pub use recognizer::{load_recognizer, GazetteerEntry, GazetteerModel, GazetteerRecognizer};
pub use stats::LabelingStats;

/// Errors raised by the primary recognition step
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Recognizer '{recognizer}' failed: {message}")]
    RecognizerFailed { recognizer: String, message: String },

    #[error("Input too long for recognizer: {length} characters (limit {limit})")]
    InputTooLong { length: usize, limit: usize },

    #[error("Failed to load recognizer model {path}: {message}")]
    ModelLoad { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, ExtractionError>;

impl From<ExtractionError> for t2d_core::T2dError {
    fn from(e: ExtractionError) -> Self {
        t2d_core::T2dError::Extraction(e.to_string())
    }
}

/// Entity span reported by a recognizer
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedEntity {
    pub text: String,
    pub label: EntityLabel,
    /// Byte offset into the sentence
    pub start: usize,
    /// Byte offset into the sentence (exclusive)
    pub end: usize,
    pub confidence: f32,
}

/// Trait for model-backed named-entity recognizers.
///
/// Implementations are built once per process and shared read-only across
/// pipeline runs, so they must be safe for concurrent use.
pub trait Recognizer: Send + Sync {
    /// Recognize entities in a single sentence
    fn recognize(&self, sentence: &str) -> Result<Vec<RecognizedEntity>>;

    /// Get recognizer name for logging
    fn name(&self) -> &str;
}
