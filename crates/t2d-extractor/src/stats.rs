//! Labeling run statistics
//!
//! Counters collected while a pipeline processes a document: how many
//! sentences went through each extraction path, how many candidates the
//! quality filter kept, and how the kept rows are distributed over labels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use t2d_core::{EntityLabel, ExtractionMode};
use t2d_text::Language;

use crate::extract::{Extraction, ExtractionPath};

/// Statistics for one labeling run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelingStats {
    /// Strategy used for the run
    pub mode: ExtractionMode,
    /// Detected input language, when the run started from raw text
    pub language: Option<Language>,
    /// Non-blank sentences processed
    pub sentences: usize,
    /// Sentences handled by the recognizer
    pub primary_sentences: usize,
    /// Sentences handled by the fallback path
    pub fallback_sentences: usize,
    /// Entity candidates kept by the quality filter
    pub accepted: usize,
    /// Entity candidates discarded by the quality filter
    pub rejected: usize,
    /// Category rows added by the smart strategy
    pub categories: usize,
    /// Output rows per label
    pub label_counts: BTreeMap<String, usize>,
}

impl LabelingStats {
    pub fn new(mode: ExtractionMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Record the outcome of one sentence
    pub fn record(&mut self, extraction: &Extraction) {
        self.sentences += 1;
        match extraction.path {
            ExtractionPath::Primary => self.primary_sentences += 1,
            ExtractionPath::Fallback => self.fallback_sentences += 1,
        }

        self.accepted += extraction.candidates.len();
        self.rejected += extraction.rejected;
        for candidate in &extraction.candidates {
            self.count_label(&candidate.label);
        }
    }

    /// Record a category row
    pub fn record_category(&mut self, label: &EntityLabel) {
        self.categories += 1;
        self.count_label(label);
    }

    fn count_label(&mut self, label: &EntityLabel) {
        *self.label_counts.entry(label.to_string()).or_insert(0) += 1;
    }

    /// Total output rows
    pub fn total_rows(&self) -> usize {
        self.accepted + self.categories
    }

    /// Fraction of candidates kept by the quality filter (accepted / offered)
    pub fn acceptance_rate(&self) -> f32 {
        let offered = self.accepted + self.rejected;
        if offered == 0 {
            0.0
        } else {
            self.accepted as f32 / offered as f32
        }
    }

    /// Fraction of sentences handled by the fallback path
    pub fn fallback_rate(&self) -> f32 {
        if self.sentences == 0 {
            0.0
        } else {
            self.fallback_sentences as f32 / self.sentences as f32
        }
    }
}
