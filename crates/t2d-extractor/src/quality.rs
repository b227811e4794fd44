//! Entity quality filter
//!
//! Heuristic rules that discard candidates unlikely to be useful training
//! data. Rules are evaluated in order and the first decisive rule wins.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use t2d_core::EntityLabel;

/// Currency symbols recognized in MONEY entities
pub const CURRENCY_SYMBOLS: [char; 4] = ['$', '£', '€', '¥'];

/// Currency words recognized in MONEY entities
pub const CURRENCY_WORDS: &[&str] = &[
    "dollar", "pound", "euro", "yen", "usd", "gbp", "eur", "jpy",
];

/// English function words that are never entities on their own
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "must", "can",
];

/// Closed-class words that cannot end a multi-word entity. Modal verbs and
/// `a` are left out since they close names like `1 May` or `Vitamin A`.
pub const DANGLING_WORDS: &[&str] = &[
    "the", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

static STOP_WORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOP_WORDS.iter().copied().collect());

/// Why a candidate was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    TooShort,
    NumericOrSymbolic,
    StopWord,
    DanglingStopWord,
    ExcessivePunctuation,
    MissingCurrency,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::Empty => "empty",
            Self::TooShort => "too short",
            Self::NumericOrSymbolic => "only digits and symbols",
            Self::StopWord => "stop word",
            Self::DanglingStopWord => "ends with a function word",
            Self::ExcessivePunctuation => "mostly punctuation",
            Self::MissingCurrency => "money without currency",
        };
        f.write_str(reason)
    }
}

/// Decide whether a normalized entity is worth keeping
pub fn is_acceptable(entity_text: &str, label: &EntityLabel) -> bool {
    rejection_reason(entity_text, label).is_none()
}

/// The first rule that rejects `entity_text`, or `None` if it is accepted
pub fn rejection_reason(entity_text: &str, label: &EntityLabel) -> Option<Rejection> {
    if entity_text.trim().is_empty() {
        return Some(Rejection::Empty);
    }

    let is_money = label.is_money();
    let has_currency_symbol = entity_text.contains(CURRENCY_SYMBOLS);

    if entity_text.trim().chars().count() <= 1 {
        if is_money && has_currency_symbol {
            return None;
        }
        return Some(Rejection::TooShort);
    }

    let numeric_or_symbolic = entity_text
        .chars()
        .all(|c| c.is_ascii_digit() || !is_word_char(c));
    if numeric_or_symbolic {
        if is_money && has_currency_symbol {
            return None;
        }
        return Some(Rejection::NumericOrSymbolic);
    }

    let lowered = entity_text.to_lowercase();
    if STOP_WORD_SET.contains(lowered.as_str()) {
        return Some(Rejection::StopWord);
    }

    let mut tokens = lowered.split_whitespace();
    if let (Some(_), Some(last)) = (tokens.next(), tokens.next_back()) {
        if DANGLING_WORDS.contains(&last) {
            return Some(Rejection::DanglingStopWord);
        }
    }

    let total = entity_text.chars().count();
    let punctuation = entity_text
        .chars()
        .filter(|c| !is_word_char(*c) && !c.is_whitespace())
        .count();
    if punctuation * 2 > total {
        return Some(Rejection::ExcessivePunctuation);
    }

    if is_money && !has_currency_symbol && !CURRENCY_WORDS.iter().any(|w| lowered.contains(w)) {
        return Some(Rejection::MissingCurrency);
    }

    None
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
