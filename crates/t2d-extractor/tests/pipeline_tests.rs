//! Labeling pipeline integration tests
//!
//! Exercise the full path from raw text to records and spans, with and
//! without a gazetteer recognizer.

use std::io::Write;
use std::sync::Arc;

use t2d_core::{
    Category, EntityLabel, ExtractionMode, FallbackPolicy, OutputFormat, PipelineConfig,
    RecognizerConfig, SegmenterKind, Span,
};
use t2d_export::Dataset;
use t2d_extractor::{
    load_recognizer, EntityExtractor, ExtractionError, ExtractionStrategy, LabelingPipeline,
    RecognizedEntity, Recognizer,
};
use t2d_text::InputSource;

/// Helper to write a gazetteer model to a temp file
fn gazetteer_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "name": "companies",
            "entries": [
                {{"term": "Apple Inc.", "label": "ORG", "aliases": ["Apple"]}},
                {{"term": "Steve Jobs", "label": "PERSON"}},
                {{"term": "Cupertino", "label": "GPE"}}
            ]
        }}"#
    )
    .unwrap();
    file
}

fn pipeline_with_gazetteer(mode: ExtractionMode) -> (LabelingPipeline, tempfile::NamedTempFile) {
    let file = gazetteer_file();
    let recognizer = load_recognizer(&RecognizerConfig {
        gazetteer_path: Some(file.path().to_path_buf()),
        ..Default::default()
    });
    assert!(recognizer.is_some());

    let config = PipelineConfig {
        mode,
        ..Default::default()
    };
    (LabelingPipeline::from_config(&config, recognizer), file)
}

/// Recognizer that fails on sentences containing a marker word
struct FlakyRecognizer;

impl Recognizer for FlakyRecognizer {
    fn recognize(&self, sentence: &str) -> Result<Vec<RecognizedEntity>, ExtractionError> {
        if sentence.contains("overflow") {
            return Err(ExtractionError::InputTooLong {
                length: sentence.chars().count(),
                limit: 5,
            });
        }
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

// =============================================================================
// End-to-end Scenarios
// =============================================================================

#[test]
fn test_mojibake_money_without_recognizer() {
    let pipeline = LabelingPipeline::from_config(&PipelineConfig::default(), None);
    let records = pipeline.label_text("Â£60,000, Â£2,000, Â£5.60 an hour").records();

    assert_eq!(records.len(), 3);
    for (record, expected) in records.iter().zip(["£60,000", "£2,000", "£5.60"]) {
        assert_eq!(record.text, "£60,000, £2,000, £5.60 an hour");
        assert_eq!(record.entity, expected);
        assert_eq!(record.label, EntityLabel::Money);
    }
}

#[test]
fn test_spans_with_gazetteer() {
    let (pipeline, _file) = pipeline_with_gazetteer(ExtractionMode::Fast);
    let spans = pipeline.span_text("Apple Inc. was founded by Steve Jobs.");

    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].text, "Apple Inc. was founded by Steve Jobs.");
    assert_eq!(
        spans[0].spans,
        vec![
            Span::new(0, 10, EntityLabel::Org),
            Span::new(26, 36, EntityLabel::Person)
        ]
    );
}

#[test]
fn test_span_json_shape() {
    let (pipeline, _file) = pipeline_with_gazetteer(ExtractionMode::Fast);
    let spans = pipeline.convert_to_span_format(&["Steve Jobs lived in Cupertino."]);

    let json = serde_json::to_value(&spans).unwrap();
    assert_eq!(
        json,
        serde_json::json!([[
            "Steve Jobs lived in Cupertino.",
            {"entities": [[0, 10, "PERSON"], [20, 29, "GPE"]]}
        ]])
    );
}

#[test]
fn test_empty_input() {
    let pipeline = LabelingPipeline::from_config(&PipelineConfig::default(), None);

    assert!(pipeline.label_text("").is_empty());
    assert!(pipeline.span_text("   \n ").is_empty());
    assert!(pipeline
        .process(&InputSource::Inline(String::new()))
        .unwrap()
        .is_empty());
}

// =============================================================================
// Strategy and Fallback Tests
// =============================================================================

#[test]
fn test_smart_mode_category_rows() {
    let (pipeline, _file) = pipeline_with_gazetteer(ExtractionMode::Smart);
    let output = pipeline.label_text("Apple Inc. sells software. Steve Jobs liked tennis.");

    let rows: Vec<(&str, &str)> = output
        .candidates
        .iter()
        .map(|c| (c.entity_text.as_str(), c.label.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Apple Inc.", "ORG"),
            ("Apple Inc. sells software.", "CATEGORY_TECHNOLOGY"),
            ("Steve Jobs", "PERSON"),
            ("Steve Jobs liked tennis.", "CATEGORY_SPORTS"),
        ]
    );
    assert_eq!(output.stats.categories, 2);
    assert_eq!(output.stats.primary_sentences, 2);
}

#[test]
fn test_category_rows_in_spans() {
    let pipeline = LabelingPipeline::new(
        EntityExtractor::new(None),
        ExtractionStrategy::from_mode(ExtractionMode::Smart),
    );
    let spans = pipeline.convert_to_span_format(&["Nothing here."]);

    assert_eq!(
        spans[0].spans,
        vec![Span::new(0, 13, Category::General)]
    );
}

#[test]
fn test_per_sentence_fallback() {
    let pipeline = LabelingPipeline::new(
        EntityExtractor::new(Some(Arc::new(FlakyRecognizer))),
        ExtractionStrategy::Fast,
    );
    let output = pipeline.extract_sentences(&[
        "Stack overflow paid $100.00 to a@b.io.",
        "Calm sentence paid $100.00.",
    ]);

    // The failing sentence is reprocessed by patterns; the other stays primary
    assert_eq!(output.stats.fallback_sentences, 1);
    assert_eq!(output.stats.primary_sentences, 1);
    let labels: Vec<&str> = output.candidates.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["EMAIL", "MONEY"]);
}

#[test]
fn test_whole_sentence_policy() {
    let config = PipelineConfig {
        fallback: FallbackPolicy::WholeSentence,
        segmenter: SegmenterKind::Punctuation,
        ..Default::default()
    };
    let pipeline = LabelingPipeline::from_config(&config, None);
    let records = pipeline.label_text("First one. Second one!").records();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].entity, "First one");
    assert_eq!(records[1].label, EntityLabel::Sentence);
}

#[test]
fn test_missing_gazetteer_uses_fallback() {
    let recognizer = load_recognizer(&RecognizerConfig {
        gazetteer_path: Some("/nonexistent/gazetteer.json".into()),
        ..Default::default()
    });
    let pipeline = LabelingPipeline::from_config(&PipelineConfig::default(), recognizer);
    let output = pipeline.label_text("Write to team@example.org.");

    assert_eq!(output.stats.fallback_rate(), 1.0);
    assert_eq!(output.candidates.len(), 1);
    assert_eq!(output.candidates[0].entity_text, "team@example.org");
}

#[test]
fn test_into_dataset_matches_format() {
    let pipeline = LabelingPipeline::from_config(&PipelineConfig::default(), None);

    let dataset = pipeline.label_text("Pay $5.00 now.").into_dataset(OutputFormat::Spacy);
    assert!(matches!(dataset, Dataset::Spans(ref spans) if spans.len() == 1));

    let dataset = pipeline.label_text("Pay $5.00 now.").into_dataset(OutputFormat::Csv);
    assert!(matches!(dataset, Dataset::Records(ref records) if records.len() == 1));
}
