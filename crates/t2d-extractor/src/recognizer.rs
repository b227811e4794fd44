//! Gazetteer-backed recognizer
//!
//! Loads a JSON list of known terms and their aliases and reports every
//! case-insensitive, word-bounded occurrence in a sentence. Overlapping
//! matches are resolved in favor of the longest one.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use t2d_core::{EntityLabel, RecognizerConfig};

use crate::{ExtractionError, RecognizedEntity, Recognizer, Result};

const TERM_CONFIDENCE: f32 = 0.95;
const ALIAS_CONFIDENCE: f32 = 0.9;

// ============================================================================
// Model File
// ============================================================================

/// Known term with its label and alternative spellings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazetteerEntry {
    pub term: String,
    pub label: EntityLabel,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// On-disk gazetteer model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazetteerModel {
    #[serde(default = "default_model_name")]
    pub name: String,
    pub entries: Vec<GazetteerEntry>,
}

fn default_model_name() -> String {
    "gazetteer".to_string()
}

// ============================================================================
// Recognizer
// ============================================================================

struct TermMatcher {
    regex: Regex,
    label: EntityLabel,
    confidence: f32,
}

/// Dictionary recognizer built from a [`GazetteerModel`]
pub struct GazetteerRecognizer {
    name: String,
    matchers: Vec<TermMatcher>,
    max_input_chars: usize,
}

impl GazetteerRecognizer {
    /// Compile a model into matchers
    pub fn new(model: GazetteerModel) -> Result<Self> {
        let mut recognizer = Self {
            name: model.name,
            matchers: Vec::new(),
            max_input_chars: RecognizerConfig::default().max_input_chars,
        };

        for entry in &model.entries {
            recognizer.add_term(&entry.term, entry.label.clone(), TERM_CONFIDENCE)?;
            for alias in &entry.aliases {
                recognizer.add_term(alias, entry.label.clone(), ALIAS_CONFIDENCE)?;
            }
        }

        Ok(recognizer)
    }

    /// Load a model from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let model_load = |message: String| ExtractionError::ModelLoad {
            path: path.to_path_buf(),
            message,
        };

        let content = std::fs::read_to_string(path).map_err(|e| model_load(e.to_string()))?;
        let model: GazetteerModel =
            serde_json::from_str(&content).map_err(|e| model_load(e.to_string()))?;

        if model.entries.is_empty() {
            return Err(model_load("model has no entries".to_string()));
        }

        Self::new(model)
    }

    /// Set the longest sentence (in characters) the recognizer accepts
    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    /// Number of compiled terms and aliases
    pub fn term_count(&self) -> usize {
        self.matchers.len()
    }

    fn add_term(&mut self, term: &str, label: EntityLabel, confidence: f32) -> Result<()> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(());
        }

        let regex = RegexBuilder::new(&bounded_pattern(term))
            .case_insensitive(true)
            .build()
            .map_err(|e| ExtractionError::RecognizerFailed {
                recognizer: self.name.clone(),
                message: format!("invalid term '{}': {}", term, e),
            })?;

        self.matchers.push(TermMatcher {
            regex,
            label,
            confidence,
        });
        Ok(())
    }

    fn find_matches(&self, sentence: &str) -> Vec<RecognizedEntity> {
        let mut entities = Vec::new();

        for matcher in &self.matchers {
            for mat in matcher.regex.find_iter(sentence) {
                entities.push(RecognizedEntity {
                    text: mat.as_str().to_string(),
                    label: matcher.label.clone(),
                    start: mat.start(),
                    end: mat.end(),
                    confidence: matcher.confidence,
                });
            }
        }

        entities
    }

    /// Remove overlapping entities, keeping the longest then most confident
    fn deduplicate(&self, mut entities: Vec<RecognizedEntity>) -> Vec<RecognizedEntity> {
        entities.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then((b.end - b.start).cmp(&(a.end - a.start)))
                .then(b.confidence.total_cmp(&a.confidence))
        });

        let mut result = Vec::new();
        let mut covered: HashSet<usize> = HashSet::new();

        for entity in entities {
            let overlaps = (entity.start..entity.end).any(|i| covered.contains(&i));

            if !overlaps {
                covered.extend(entity.start..entity.end);
                result.push(entity);
            }
        }

        result.sort_by_key(|e| e.start);
        result
    }
}

impl Recognizer for GazetteerRecognizer {
    fn recognize(&self, sentence: &str) -> Result<Vec<RecognizedEntity>> {
        let length = sentence.chars().count();
        if length > self.max_input_chars {
            return Err(ExtractionError::InputTooLong {
                length,
                limit: self.max_input_chars,
            });
        }

        Ok(self.deduplicate(self.find_matches(sentence)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Escape a term and anchor it on word boundaries where the term itself
/// starts or ends with a word character
fn bounded_pattern(term: &str) -> String {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');

    let mut pattern = String::new();
    if is_word(term.chars().next()) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(term));
    if is_word(term.chars().last()) {
        pattern.push_str(r"\b");
    }
    pattern
}

// ============================================================================
// Loading
// ============================================================================

/// Build the configured recognizer.
///
/// Returns `None` when no model is configured or the model cannot be loaded;
/// extraction then runs on fallback patterns for the whole run.
pub fn load_recognizer(config: &RecognizerConfig) -> Option<Arc<dyn Recognizer>> {
    let Some(path) = &config.gazetteer_path else {
        tracing::info!("No recognizer model configured, using fallback patterns");
        return None;
    };

    match GazetteerRecognizer::from_file(path) {
        Ok(recognizer) => {
            let recognizer = recognizer.with_max_input_chars(config.max_input_chars);
            tracing::info!(
                "Loaded recognizer '{}' with {} terms from {}",
                recognizer.name(),
                recognizer.term_count(),
                path.display()
            );
            Some(Arc::new(recognizer))
        }
        Err(e) => {
            tracing::warn!("Recognizer unavailable, using fallback patterns: {}", e);
            None
        }
    }
}
