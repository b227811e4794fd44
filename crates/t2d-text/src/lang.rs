//! Heuristic language detection
//!
//! Script ranges identify CJK, Korean and Arabic text; European languages are
//! told apart by overlap with a handful of high-frequency function words.
//! Anything else is reported as English.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").unwrap());

const SPANISH_WORDS: &[&str] = &["el", "la", "de", "que", "y", "a", "en", "un", "es", "se"];
const FRENCH_WORDS: &[&str] = &["le", "la", "de", "et", "est", "en", "un", "que", "je", "il"];
const GERMAN_WORDS: &[&str] = &["der", "die", "und", "in", "den", "von", "zu", "das", "mit", "ist"];

/// Detected language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    German,
    Chinese,
    Japanese,
    Korean,
    Arabic,
}

impl Language {
    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::German => "de",
            Self::Chinese => "zh",
            Self::Japanese => "ja",
            Self::Korean => "ko",
            Self::Arabic => "ar",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Detect the dominant language of `text`
pub fn detect_language(text: &str) -> Language {
    if let Some(language) = detect_by_script(text) {
        return language;
    }

    let lowered = text.to_lowercase();
    let words: HashSet<&str> = WORDS.find_iter(&lowered).map(|m| m.as_str()).collect();
    let overlap = |list: &[&str]| list.iter().filter(|w| words.contains(*w)).count();

    let spanish = overlap(SPANISH_WORDS);
    let french = overlap(FRENCH_WORDS);
    let german = overlap(GERMAN_WORDS);

    if spanish > french && spanish > german {
        Language::Spanish
    } else if french > spanish && french > german {
        Language::French
    } else if german > spanish && german > french {
        Language::German
    } else {
        Language::English
    }
}

fn detect_by_script(text: &str) -> Option<Language> {
    // Checked in this order: a Japanese text usually contains kanji too
    let has = |range: std::ops::RangeInclusive<char>| text.chars().any(|c| range.contains(&c));

    if has('\u{4e00}'..='\u{9fff}') {
        Some(Language::Chinese)
    } else if has('\u{3040}'..='\u{30ff}') {
        Some(Language::Japanese)
    } else if has('\u{ac00}'..='\u{d7af}') {
        Some(Language::Korean)
    } else if has('\u{0600}'..='\u{06ff}') {
        Some(Language::Arabic)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_scripts() {
        assert_eq!(detect_language("北京是中国的首都"), Language::Chinese);
        assert_eq!(detect_language("こんにちは"), Language::Japanese);
        assert_eq!(detect_language("안녕하세요"), Language::Korean);
        assert_eq!(detect_language("مرحبا"), Language::Arabic);
    }

    #[test]
    fn test_detect_european() {
        assert_eq!(
            detect_language("Der Hund und die Katze sind in den Garten gegangen"),
            Language::German
        );
        assert_eq!(
            detect_language("Je pense que il est là et le chat aussi"),
            Language::French
        );
        assert_eq!(
            detect_language("El perro y el gato se fueron a la casa"),
            Language::Spanish
        );
    }

    #[test]
    fn test_default_english() {
        assert_eq!(detect_language("Apple Inc. was founded by Steve Jobs."), Language::English);
        assert_eq!(detect_language(""), Language::English);
        assert_eq!(Language::English.code(), "en");
    }
}
