//! Knowledge base entries

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::Category;

/// Pre-authored topic entry used to enrich a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    pub topic: String,
    pub content: String,
    /// Ordered, de-duplicated keyword list
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Author confidence in [0, 1]
    #[serde(alias = "confidence")]
    pub confidence_level: f64,
    #[serde(alias = "category")]
    pub category_id: Category,
}

impl KnowledgeEntry {
    /// Whether any keyword equals one of `terms` (case-insensitive)
    ///
    /// `terms` must already be lower-cased.
    pub fn has_any_keyword(&self, terms: &[String]) -> bool {
        self.keywords
            .iter()
            .any(|k| terms.iter().any(|t| k.trim().eq_ignore_ascii_case(t)))
    }

    /// Case-insensitive free-text match over topic, content and keywords
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return false;
        }
        self.topic.to_lowercase().contains(&term)
            || self.content.to_lowercase().contains(&term)
            || self.keywords.iter().any(|k| k.to_lowercase() == term)
    }

    /// Confidence descending, then topic ascending, then id
    pub fn by_confidence(a: &Self, b: &Self) -> Ordering {
        b.confidence_level
            .total_cmp(&a.confidence_level)
            .then_with(|| a.topic.cmp(&b.topic))
            .then_with(|| a.id.cmp(&b.id))
    }

    /// Clamp confidence into [0, 1] and normalize keywords
    pub fn normalized(mut self) -> Self {
        if !self.confidence_level.is_finite() {
            self.confidence_level = 0.0;
        }
        self.confidence_level = self.confidence_level.clamp(0.0, 1.0);
        let mut seen = Vec::with_capacity(self.keywords.len());
        for keyword in self.keywords.drain(..) {
            let keyword = keyword.trim().to_lowercase();
            if !keyword.is_empty() && !seen.contains(&keyword) {
                seen.push(keyword);
            }
        }
        self.keywords = seen;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(topic: &str, confidence: f64) -> KnowledgeEntry {
        KnowledgeEntry {
            id: topic.to_lowercase().replace(' ', "_"),
            topic: topic.to_string(),
            content: format!("{} content", topic),
            keywords: vec!["Anxiety".to_string(), "panic".to_string()],
            confidence_level: confidence,
            category_id: Category::MentalHealth,
        }
    }

    #[test]
    fn test_keyword_intersection_is_case_insensitive() {
        let e = entry("Anxiety Management", 0.9);
        assert!(e.has_any_keyword(&["anxiety".to_string()]));
        assert!(!e.has_any_keyword(&["career".to_string()]));
    }

    #[test]
    fn test_confidence_ordering() {
        let mut entries = vec![entry("B", 0.8), entry("A", 0.8), entry("C", 0.95)];
        entries.sort_by(KnowledgeEntry::by_confidence);
        let topics: Vec<_> = entries.iter().map(|e| e.topic.as_str()).collect();
        assert_eq!(topics, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_normalized() {
        let mut e = entry("X", 1.7);
        e.keywords = vec![" Panic ".into(), "panic".into(), "".into()];
        let e = e.normalized();
        assert_eq!(e.confidence_level, 1.0);
        assert_eq!(e.keywords, vec!["panic".to_string()]);
    }

    #[test]
    fn test_matches_term() {
        let e = entry("Anxiety Management", 0.9);
        assert!(e.matches_term("management"));
        assert!(e.matches_term("PANIC"));
        assert!(!e.matches_term("  "));
    }
}
