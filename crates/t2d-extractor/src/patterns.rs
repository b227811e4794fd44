//! Fallback pattern extraction
//!
//! Regex families for entities that can be recognized from surface form
//! alone. Used whenever the primary recognizer is unavailable or fails.

use regex::Regex;
use t2d_core::EntityLabel;

/// Regex extractor for dates, emails, phone numbers and money amounts
pub struct PatternExtractor {
    /// Pattern rules (regex -> label), applied in insertion order
    patterns: Vec<(Regex, EntityLabel)>,
}

impl PatternExtractor {
    /// Create an extractor with the default pattern families
    pub fn new() -> Self {
        let mut extractor = Self {
            patterns: Vec::new(),
        };

        extractor.init_date_patterns();
        extractor.init_contact_patterns();
        extractor.init_money_patterns();
        extractor
    }

    fn init_date_patterns(&mut self) {
        // 12/03/2024, 1-2-24
        self.add_pattern(r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b", EntityLabel::Date);
        // Bare year
        self.add_pattern(r"\b\d{4}\b", EntityLabel::Date);
        // March 3, 2024
        self.add_pattern(
            r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]* \d{1,2},? \d{4}\b",
            EntityLabel::Date,
        );
    }

    fn init_contact_patterns(&mut self) {
        self.add_pattern(
            r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
            EntityLabel::Email,
        );
        self.add_pattern(
            r"(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}",
            EntityLabel::Phone,
        );
    }

    fn init_money_patterns(&mut self) {
        // Thousands groups only when followed by three digits, so a list
        // separator after an amount is never captured
        self.add_pattern(r"[$£€¥]\d+(?:,\d{3})*(?:\.\d{2})?", EntityLabel::Money);
        self.add_pattern(
            r"(?i)\b\d+(?:,\d{3})*(?:\.\d{2})?\s*(?:dollars|usd|pounds|gbp|euros|eur|yen|jpy)\b",
            EntityLabel::Money,
        );
    }

    /// Add a regex pattern
    fn add_pattern(&mut self, pattern: &str, label: EntityLabel) {
        if let Ok(regex) = Regex::new(pattern) {
            self.patterns.push((regex, label));
        }
    }

    /// Number of compiled patterns
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// All raw matches in pattern order, then match order
    pub fn find(&self, sentence: &str) -> Vec<(String, EntityLabel)> {
        let mut matches = Vec::new();

        for (regex, label) in &self.patterns {
            for mat in regex.find_iter(sentence) {
                matches.push((mat.as_str().to_string(), label.clone()));
            }
        }

        matches
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}
