//! Keyword-based sentence categorization for smart mode

use t2d_core::Category;

/// Assigns a document category by keyword substring match.
///
/// Rules are checked in order; the first category with a keyword contained
/// in the lower-cased text wins. Text matching no rule is `General`.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<(Category, Vec<String>)>,
}

impl KeywordClassifier {
    /// Create a classifier with the default keyword lists
    pub fn new() -> Self {
        let mut classifier = Self { rules: Vec::new() };

        classifier.add_rule(
            Category::Technology,
            &["tech", "computer", "software", "digital", "internet", "app", "ai", "artificial"],
        );
        classifier.add_rule(
            Category::Sports,
            &["sport", "game", "football", "basketball", "tennis", "olympic", "championship"],
        );
        classifier.add_rule(
            Category::Politics,
            &["politic", "government", "election", "president", "minister", "senator", "congress"],
        );
        classifier.add_rule(
            Category::Business,
            &["business", "market", "economy", "stock", "finance", "company", "corporation"],
        );
        classifier.add_rule(
            Category::Health,
            &["health", "medical", "doctor", "hospital", "disease", "treatment"],
        );
        classifier.add_rule(
            Category::Entertainment,
            &["entertain", "movie", "film", "actor", "celebrity", "music", "concert"],
        );

        classifier
    }

    /// Classifier with no rules; everything is `General`
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule, checked after all existing ones
    pub fn with_rule(mut self, category: Category, keywords: &[&str]) -> Self {
        self.add_rule(category, keywords);
        self
    }

    fn add_rule(&mut self, category: Category, keywords: &[&str]) {
        self.rules.push((
            category,
            keywords.iter().map(|k| k.to_lowercase()).collect(),
        ));
    }

    /// Categorize a sentence
    pub fn classify(&self, text: &str) -> Category {
        let lowered = text.to_lowercase();

        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k.as_str())))
            .map(|(category, _)| *category)
            .unwrap_or(Category::General)
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}
