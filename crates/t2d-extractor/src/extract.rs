//! Per-sentence entity extraction
//!
//! Each sentence is processed on one of two paths:
//! - PRIMARY: the injected recognizer, when present and successful
//! - FALLBACK: regex patterns (or the whole sentence, per [`FallbackPolicy`])
//!
//! A recognizer error on one sentence sends only that sentence to FALLBACK.

use std::sync::Arc;

use serde::Serialize;
use t2d_core::{EntityCandidate, EntityLabel, FallbackPolicy};
use t2d_text::{canonicalize_currency, normalize};

use crate::patterns::PatternExtractor;
use crate::quality::rejection_reason;
use crate::{Recognizer, Result};

/// Which path produced an extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionPath {
    Primary,
    Fallback,
}

/// Result of extracting one sentence
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Candidates that passed the quality filter, in discovery order
    pub candidates: Vec<EntityCandidate>,
    /// Number of candidates discarded by the quality filter
    pub rejected: usize,
    pub path: ExtractionPath,
}

impl Extraction {
    fn new(path: ExtractionPath) -> Self {
        Self {
            candidates: Vec::new(),
            rejected: 0,
            path,
        }
    }

    /// Normalize and filter one raw entity
    fn offer(&mut self, sentence: &str, raw_text: &str, label: EntityLabel) {
        let text = if label.is_money() {
            normalize(&canonicalize_currency(raw_text))
        } else {
            normalize(raw_text)
        };

        match rejection_reason(&text, &label) {
            None => self
                .candidates
                .push(EntityCandidate::new(sentence, text, label)),
            Some(reason) => {
                tracing::debug!("Rejected {} '{}': {}", label, text, reason);
                self.rejected += 1;
            }
        }
    }
}

/// Sentence-level entity extractor
pub struct EntityExtractor {
    recognizer: Option<Arc<dyn Recognizer>>,
    patterns: PatternExtractor,
    fallback: FallbackPolicy,
}

impl EntityExtractor {
    /// Create an extractor; `None` runs every sentence on the fallback path
    pub fn new(recognizer: Option<Arc<dyn Recognizer>>) -> Self {
        Self {
            recognizer,
            patterns: PatternExtractor::new(),
            fallback: FallbackPolicy::Patterns,
        }
    }

    /// Set the fallback policy
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn has_recognizer(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Extract entities from one sentence
    pub fn extract(&self, sentence: &str) -> Extraction {
        if let Some(recognizer) = &self.recognizer {
            match self.extract_primary(recognizer.as_ref(), sentence) {
                Ok(extraction) => return extraction,
                Err(e) => {
                    tracing::warn!(
                        "Recognizer '{}' failed, using fallback for sentence: {}",
                        recognizer.name(),
                        e
                    );
                }
            }
        }

        self.extract_fallback(sentence)
    }

    fn extract_primary(&self, recognizer: &dyn Recognizer, sentence: &str) -> Result<Extraction> {
        let entities = recognizer.recognize(sentence)?;

        let mut extraction = Extraction::new(ExtractionPath::Primary);
        for entity in entities {
            extraction.offer(sentence, &entity.text, entity.label);
        }
        Ok(extraction)
    }

    fn extract_fallback(&self, sentence: &str) -> Extraction {
        let mut extraction = Extraction::new(ExtractionPath::Fallback);

        match self.fallback {
            FallbackPolicy::Patterns => {
                for (raw_text, label) in self.patterns.find(sentence) {
                    extraction.offer(sentence, &raw_text, label);
                }
            }
            FallbackPolicy::WholeSentence => {
                extraction
                    .candidates
                    .push(EntityCandidate::whole_sentence(sentence, EntityLabel::Sentence));
            }
        }

        extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExtractionError, RecognizedEntity};

    /// Recognizer returning fixed spans
    struct FixedRecognizer(Vec<(&'static str, EntityLabel)>);

    impl Recognizer for FixedRecognizer {
        fn recognize(&self, sentence: &str) -> Result<Vec<RecognizedEntity>> {
            Ok(self
                .0
                .iter()
                .filter_map(|(text, label)| {
                    sentence.find(text).map(|start| RecognizedEntity {
                        text: text.to_string(),
                        label: label.clone(),
                        start,
                        end: start + text.len(),
                        confidence: 1.0,
                    })
                })
                .collect())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct BrokenRecognizer;

    impl Recognizer for BrokenRecognizer {
        fn recognize(&self, _sentence: &str) -> Result<Vec<RecognizedEntity>> {
            Err(ExtractionError::RecognizerFailed {
                recognizer: "broken".to_string(),
                message: "model crashed".to_string(),
            })
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[test]
    fn test_primary_path() {
        let extractor = EntityExtractor::new(Some(Arc::new(FixedRecognizer(vec![
            ("Steve Jobs", EntityLabel::Person),
            ("the", EntityLabel::Org),
        ]))));

        let sentence = "Apple was founded by Steve Jobs in the garage.";
        let extraction = extractor.extract(sentence);

        assert_eq!(extraction.path, ExtractionPath::Primary);
        assert_eq!(
            extraction.candidates,
            vec![EntityCandidate::new(sentence, "Steve Jobs", EntityLabel::Person)]
        );
        assert_eq!(extraction.rejected, 1);
    }

    #[test]
    fn test_fallback_without_recognizer() {
        let extractor = EntityExtractor::new(None);
        assert!(!extractor.has_recognizer());

        let sentence = "Salaries are £60,000, £2,000, £5.60 an hour.";
        let extraction = extractor.extract(sentence);

        assert_eq!(extraction.path, ExtractionPath::Fallback);
        let texts: Vec<&str> = extraction
            .candidates
            .iter()
            .map(|c| c.entity_text.as_str())
            .collect();
        assert_eq!(texts, vec!["£60,000", "£2,000", "£5.60"]);
        assert!(extraction.candidates.iter().all(|c| c.label == EntityLabel::Money));
    }

    #[test]
    fn test_recognizer_error_falls_back() {
        let extractor = EntityExtractor::new(Some(Arc::new(BrokenRecognizer)));
        let extraction = extractor.extract("Contact me at jane@example.com today.");

        assert_eq!(extraction.path, ExtractionPath::Fallback);
        assert_eq!(extraction.candidates.len(), 1);
        assert_eq!(extraction.candidates[0].entity_text, "jane@example.com");
        assert_eq!(extraction.candidates[0].label, EntityLabel::Email);
    }

    #[test]
    fn test_numeric_fallback_matches_rejected() {
        let extraction = EntityExtractor::new(None).extract("Founded in 1976.");

        assert!(extraction.candidates.is_empty());
        assert_eq!(extraction.rejected, 1);
    }

    #[test]
    fn test_whole_sentence_fallback() {
        let extractor =
            EntityExtractor::new(None).with_fallback(FallbackPolicy::WholeSentence);
        let extraction = extractor.extract("No entities here.");

        assert_eq!(
            extraction.candidates,
            vec![EntityCandidate::whole_sentence(
                "No entities here.",
                EntityLabel::Sentence
            )]
        );
    }

    #[test]
    fn test_money_mojibake_repaired() {
        let extractor = EntityExtractor::new(Some(Arc::new(FixedRecognizer(vec![(
            "Â£500",
            EntityLabel::Money,
        )]))));
        let extraction = extractor.extract("It cost Â£500.");

        assert_eq!(extraction.candidates.len(), 1);
        assert_eq!(extraction.candidates[0].entity_text, "£500");
    }
}
