//! Sentence segmentation
//!
//! A [`Segmenter`] asks its [`SentenceDetector`] for boundaries and falls
//! back to splitting on terminal punctuation when no detector is configured
//! or the detector fails.

use once_cell::sync::Lazy;
use regex::Regex;
use t2d_core::SegmenterKind;
use unicode_segmentation::UnicodeSegmentation;

use crate::Result;

static SENTENCE_TERMINATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Trait for sentence boundary detectors
pub trait SentenceDetector: Send + Sync {
    /// Split text into trimmed, non-empty sentences
    fn split(&self, text: &str) -> Result<Vec<String>>;

    /// Get detector name for logging
    fn name(&self) -> &'static str;
}

/// Unicode (UAX #29) sentence boundary detector
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeSentenceDetector;

impl SentenceDetector for UnicodeSentenceDetector {
    fn split(&self, text: &str) -> Result<Vec<String>> {
        Ok(text
            .split_sentence_bounds()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn name(&self) -> &'static str {
        "unicode"
    }
}

/// Sentence segmenter with punctuation fallback
pub struct Segmenter {
    detector: Option<Box<dyn SentenceDetector>>,
}

impl Segmenter {
    /// Create a segmenter with a primary detector
    pub fn new(detector: impl SentenceDetector + 'static) -> Self {
        Self {
            detector: Some(Box::new(detector)),
        }
    }

    /// Segmenter that only splits on terminal punctuation
    pub fn punctuation_only() -> Self {
        Self { detector: None }
    }

    /// Build from configuration
    pub fn from_kind(kind: SegmenterKind) -> Self {
        match kind {
            SegmenterKind::Unicode => Self::new(UnicodeSentenceDetector),
            SegmenterKind::Punctuation => Self::punctuation_only(),
        }
    }

    /// Name of the primary detector, if any
    pub fn detector_name(&self) -> Option<&'static str> {
        self.detector.as_ref().map(|d| d.name())
    }

    /// Split normalized text into sentences
    pub fn segment(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        if let Some(detector) = &self.detector {
            match detector.split(text) {
                Ok(sentences) => return sentences,
                Err(e) => {
                    tracing::warn!(
                        "Sentence detector '{}' failed, splitting on punctuation: {}",
                        detector.name(),
                        e
                    );
                }
            }
        }

        split_on_punctuation(text)
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(UnicodeSentenceDetector)
    }
}

/// Split on runs of `.`, `!` and `?`, dropping the terminators
pub fn split_on_punctuation(text: &str) -> Vec<String> {
    SENTENCE_TERMINATORS
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Detector that always fails; exercises the fallback path
#[cfg(test)]
pub(crate) struct FailingDetector;

#[cfg(test)]
impl SentenceDetector for FailingDetector {
    fn split(&self, _text: &str) -> Result<Vec<String>> {
        Err(crate::TextError::Segmentation(
            "model not loaded".to_string(),
        ))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
