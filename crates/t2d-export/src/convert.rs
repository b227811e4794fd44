//! Candidate to dataset conversion

use std::collections::HashMap;

use t2d_core::{EntityCandidate, EntityRecord, OutputFormat, Span, SpanRecord};

/// A dataset in one of the two output shapes
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Records(Vec<EntityRecord>),
    Spans(Vec<SpanRecord>),
}

impl Dataset {
    /// Shape name for logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Records(_) => "record",
            Self::Spans(_) => "span",
        }
    }

    /// Number of top-level rows
    pub fn len(&self) -> usize {
        match self {
            Self::Records(records) => records.len(),
            Self::Spans(spans) => spans.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Flat records, one per candidate, order preserved
pub fn to_records(candidates: impl IntoIterator<Item = EntityCandidate>) -> Vec<EntityRecord> {
    candidates.into_iter().map(EntityRecord::from).collect()
}

/// Group candidates by sentence and locate each entity in its sentence.
///
/// Sentences keep first-encounter order. Each entity maps to the first
/// occurrence of its text; offsets are character positions. Entities that
/// do not occur verbatim in their sentence are dropped.
pub fn to_spans(candidates: &[EntityCandidate]) -> Vec<SpanRecord> {
    let mut records: Vec<SpanRecord> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for candidate in candidates {
        let sentence = candidate.source_sentence.as_str();
        let position = *index.entry(sentence).or_insert_with(|| {
            records.push(SpanRecord::new(sentence));
            records.len() - 1
        });

        match locate(sentence, &candidate.entity_text) {
            Some((start, end)) => records[position]
                .spans
                .push(Span::new(start, end, candidate.label.clone())),
            None => tracing::debug!(
                "Entity '{}' not found in sentence, dropping span",
                candidate.entity_text
            ),
        }
    }

    records
}

/// Character offsets of the first occurrence of `entity` in `sentence`
fn locate(sentence: &str, entity: &str) -> Option<(usize, usize)> {
    let byte_start = sentence.find(entity)?;
    let start = sentence[..byte_start].chars().count();
    Some((start, start + entity.chars().count()))
}

/// Convert candidates into the shape `format` expects
pub fn build_dataset(candidates: Vec<EntityCandidate>, format: OutputFormat) -> Dataset {
    if format.is_span_format() {
        Dataset::Spans(to_spans(&candidates))
    } else {
        Dataset::Records(to_records(candidates))
    }
}
