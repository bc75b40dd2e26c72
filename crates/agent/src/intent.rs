//! Intent classification
//!
//! Keyword-table classifier with a fixed priority: crisis phrases first,
//! then voice requests, then categories in configured order, then generic.
//! Classification is synchronous and has no side effects.

use peer_support_config::ClassifierConfig;
use peer_support_core::{Intent, Urgency};

/// Stateless classifier over immutable keyword tables
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    tables: ClassifierConfig,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl IntentClassifier {
    pub fn new(tables: ClassifierConfig) -> Self {
        Self {
            tables: tables.normalized(),
        }
    }

    pub fn tables(&self) -> &ClassifierConfig {
        &self.tables
    }

    /// Classify one utterance
    pub fn classify(&self, utterance: &str) -> Intent {
        let text = utterance.trim().to_lowercase();
        if text.is_empty() {
            return Intent::generic();
        }

        // Crisis always wins
        if self
            .tables
            .crisis_phrases
            .iter()
            .any(|phrase| text.contains(phrase.as_str()))
        {
            return Intent::crisis();
        }

        if self
            .tables
            .voice_terms
            .iter()
            .any(|term| text.contains(term.as_str()))
        {
            return Intent::voice_request();
        }

        for entry in &self.tables.categories {
            let matched: Vec<&String> = entry
                .triggers
                .iter()
                .filter(|trigger| text.contains(trigger.as_str()))
                .collect();
            if matched.is_empty() {
                continue;
            }

            let urgency = if self
                .tables
                .urgency_terms
                .iter()
                .any(|term| text.contains(term.as_str()))
            {
                Urgency::Elevated
            } else {
                Urgency::None
            };

            let mut keywords: Vec<String> = Vec::with_capacity(matched.len() + entry.topics.len());
            for keyword in matched.into_iter().chain(entry.topics.iter()) {
                if !keywords.contains(keyword) {
                    keywords.push(keyword.clone());
                }
            }

            return Intent::category_topic(entry.category, urgency, keywords);
        }

        Intent::generic()
    }
}
