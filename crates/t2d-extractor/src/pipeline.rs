//! Labeling pipeline
//!
//! Wires normalization, segmentation, extraction and format conversion into
//! a single run over a block of text:
//!
//! ```text
//! raw text -> normalize -> segment -> extract (per sentence) -> records | spans
//! ```

use std::sync::Arc;

use t2d_core::{
    EntityCandidate, EntityLabel, EntityRecord, ExtractionMode, OutputFormat, PipelineConfig,
    SpanRecord,
};
use t2d_export::{build_dataset, to_records, to_spans, Dataset};
use t2d_text::{detect_language, normalize, validate_text_length, InputSource, Segmenter};

use crate::classify::KeywordClassifier;
use crate::extract::EntityExtractor;
use crate::stats::LabelingStats;
use crate::Recognizer;

// ============================================================================
// Strategy
// ============================================================================

/// What is emitted per sentence besides entities
#[derive(Debug, Clone, Default)]
pub enum ExtractionStrategy {
    /// Entities only
    #[default]
    Fast,
    /// Entities plus one `CATEGORY_*` row per sentence
    Smart(KeywordClassifier),
}

impl ExtractionStrategy {
    /// Build the strategy for a mode selector
    pub fn from_mode(mode: ExtractionMode) -> Self {
        match mode {
            ExtractionMode::Fast => Self::Fast,
            ExtractionMode::Smart => Self::Smart(KeywordClassifier::new()),
        }
    }

    pub fn mode(&self) -> ExtractionMode {
        match self {
            Self::Fast => ExtractionMode::Fast,
            Self::Smart(_) => ExtractionMode::Smart,
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Candidates and statistics from one run
#[derive(Debug, Clone, Default)]
pub struct LabelingOutput {
    /// Accepted candidates and category rows, in sentence order
    pub candidates: Vec<EntityCandidate>,
    pub stats: LabelingStats,
}

impl LabelingOutput {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Flat `text`/`entity`/`label` rows
    pub fn records(&self) -> Vec<EntityRecord> {
        to_records(self.candidates.clone())
    }

    /// Span-aligned training records
    pub fn spans(&self) -> Vec<SpanRecord> {
        to_spans(&self.candidates)
    }

    /// Consume the output into the dataset shape `format` expects
    pub fn into_dataset(self, format: OutputFormat) -> Dataset {
        build_dataset(self.candidates, format)
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// End-to-end labeling pipeline. The strategy is fixed at construction.
pub struct LabelingPipeline {
    segmenter: Segmenter,
    extractor: EntityExtractor,
    strategy: ExtractionStrategy,
    max_text_length: usize,
}

impl LabelingPipeline {
    /// Create a pipeline with the default segmenter
    pub fn new(extractor: EntityExtractor, strategy: ExtractionStrategy) -> Self {
        Self {
            segmenter: Segmenter::default(),
            extractor,
            strategy,
            max_text_length: PipelineConfig::default().max_text_length,
        }
    }

    /// Build a pipeline from configuration and an optional recognizer
    pub fn from_config(config: &PipelineConfig, recognizer: Option<Arc<dyn Recognizer>>) -> Self {
        let extractor = EntityExtractor::new(recognizer).with_fallback(config.fallback);

        Self::new(extractor, ExtractionStrategy::from_mode(config.mode))
            .with_segmenter(Segmenter::from_kind(config.segmenter))
            .with_max_text_length(config.max_text_length)
    }

    pub fn with_segmenter(mut self, segmenter: Segmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn with_max_text_length(mut self, max_text_length: usize) -> Self {
        self.max_text_length = max_text_length;
        self
    }

    pub fn mode(&self) -> ExtractionMode {
        self.strategy.mode()
    }

    /// Normalize raw text and split it into sentences
    pub fn prepare(&self, raw: &str) -> Vec<String> {
        self.segmenter.segment(&normalize(raw))
    }

    /// Extract candidates from already-segmented sentences
    pub fn extract_sentences<S: AsRef<str>>(&self, sentences: &[S]) -> LabelingOutput {
        let mut output = LabelingOutput {
            candidates: Vec::new(),
            stats: LabelingStats::new(self.mode()),
        };

        for sentence in sentences {
            let sentence = sentence.as_ref();
            if sentence.trim().is_empty() {
                continue;
            }

            let extraction = self.extractor.extract(sentence);
            tracing::debug!(
                "Sentence via {:?}: {} accepted, {} rejected",
                extraction.path,
                extraction.candidates.len(),
                extraction.rejected
            );
            output.stats.record(&extraction);
            output.candidates.extend(extraction.candidates);

            if let ExtractionStrategy::Smart(classifier) = &self.strategy {
                let label = EntityLabel::from(classifier.classify(sentence));
                output.stats.record_category(&label);
                output
                    .candidates
                    .push(EntityCandidate::whole_sentence(sentence, label));
            }
        }

        output
    }

    /// Flat records for already-segmented sentences
    pub fn label_entities<S: AsRef<str>>(&self, sentences: &[S]) -> Vec<EntityRecord> {
        to_records(self.extract_sentences(sentences).candidates)
    }

    /// Span records for already-segmented sentences
    pub fn convert_to_span_format<S: AsRef<str>>(&self, sentences: &[S]) -> Vec<SpanRecord> {
        to_spans(&self.extract_sentences(sentences).candidates)
    }

    /// Run the whole pipeline over raw text
    pub fn label_text(&self, raw: &str) -> LabelingOutput {
        let sentences = self.prepare(raw);
        let mut output = self.extract_sentences(&sentences);
        output.stats.language = Some(detect_language(raw));

        tracing::info!(
            "Labeled {} sentences ({} via fallback): {} entities kept, {} rejected, {} categories",
            output.stats.sentences,
            output.stats.fallback_sentences,
            output.stats.accepted,
            output.stats.rejected,
            output.stats.categories
        );
        output
    }

    /// Span records for raw text
    pub fn span_text(&self, raw: &str) -> Vec<SpanRecord> {
        self.label_text(raw).spans()
    }

    /// Read, validate and label an input source
    pub fn process(&self, input: &InputSource) -> t2d_core::Result<LabelingOutput> {
        let text = input.read()?;
        validate_text_length(&text, self.max_text_length)?;

        tracing::info!(
            "Processing {} ({} characters, mode {})",
            input.describe(),
            text.chars().count(),
            self.mode()
        );
        Ok(self.label_text(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use t2d_core::{Category, FallbackPolicy};

    #[test]
    fn test_strategy_from_mode() {
        assert_eq!(
            ExtractionStrategy::from_mode(ExtractionMode::Fast).mode(),
            ExtractionMode::Fast
        );
        assert_eq!(
            ExtractionStrategy::from_mode(ExtractionMode::Smart).mode(),
            ExtractionMode::Smart
        );
    }

    #[test]
    fn test_fast_pipeline_money() {
        let pipeline = LabelingPipeline::new(EntityExtractor::new(None), ExtractionStrategy::Fast);
        let output = pipeline.label_text("Â£60,000, Â£2,000, Â£5.60 an hour");

        let entities: Vec<(&str, &str)> = output
            .candidates
            .iter()
            .map(|c| (c.entity_text.as_str(), c.label.as_str()))
            .collect();
        assert_eq!(
            entities,
            vec![("£60,000", "MONEY"), ("£2,000", "MONEY"), ("£5.60", "MONEY")]
        );
        assert_eq!(output.candidates[0].source_sentence, "£60,000, £2,000, £5.60 an hour");
    }

    #[test]
    fn test_smart_adds_category_rows() {
        let pipeline = LabelingPipeline::new(
            EntityExtractor::new(None),
            ExtractionStrategy::from_mode(ExtractionMode::Smart),
        );
        let records = pipeline.label_entities(&["The stock fell $5.00 today."]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].entity, "$5.00");
        assert_eq!(records[1].entity, records[1].text);
        assert_eq!(records[1].label, EntityLabel::Category(Category::Business));
    }

    #[test]
    fn test_blank_sentences_skipped() {
        let pipeline = LabelingPipeline::new(
            EntityExtractor::new(None).with_fallback(FallbackPolicy::WholeSentence),
            ExtractionStrategy::Fast,
        );
        let output = pipeline.extract_sentences(&["", "   ", "Hello there."]);

        assert_eq!(output.candidates.len(), 1);
        assert_eq!(output.stats.sentences, 1);
    }

    #[test]
    fn test_empty_input() {
        let pipeline = LabelingPipeline::new(EntityExtractor::new(None), ExtractionStrategy::Fast);
        assert!(pipeline.label_text("").is_empty());
        assert!(pipeline.span_text("").is_empty());
        assert!(pipeline.label_entities::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_process_rejects_long_input() {
        let pipeline = LabelingPipeline::new(EntityExtractor::new(None), ExtractionStrategy::Fast)
            .with_max_text_length(5);
        let result = pipeline.process(&InputSource::Inline("far too long".to_string()));

        assert!(matches!(result, Err(t2d_core::T2dError::Input(_))));
    }
}
