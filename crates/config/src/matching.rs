//! Classifier keyword tables
//!
//! Tables default to [`crate::constants`] and can be replaced wholesale from a
//! YAML file. The order of `categories` is the classifier priority order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use peer_support_core::Category;

use crate::constants::{self, CATEGORY_KEYWORDS, CRISIS_PHRASES, URGENCY_TERMS, VOICE_TERMS};
use crate::ConfigError;

/// Trigger and topic keywords for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub category: Category,
    /// Words that select this category when found in an utterance
    pub triggers: Vec<String>,
    /// Knowledge keywords considered relevant once the category is selected
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Keyword tables used by the intent classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_crisis_phrases")]
    pub crisis_phrases: Vec<String>,
    #[serde(default = "default_voice_terms")]
    pub voice_terms: Vec<String>,
    #[serde(default = "default_urgency_terms")]
    pub urgency_terms: Vec<String>,
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryKeywords>,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_crisis_phrases() -> Vec<String> {
    to_strings(CRISIS_PHRASES)
}

fn default_voice_terms() -> Vec<String> {
    to_strings(VOICE_TERMS)
}

fn default_urgency_terms() -> Vec<String> {
    to_strings(URGENCY_TERMS)
}

fn default_categories() -> Vec<CategoryKeywords> {
    CATEGORY_KEYWORDS
        .iter()
        .filter_map(|(slug, triggers, topics)| {
            let category = slug.parse::<Category>().ok()?;
            Some(CategoryKeywords {
                category,
                triggers: to_strings(triggers),
                topics: to_strings(topics),
            })
        })
        .collect()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            crisis_phrases: default_crisis_phrases(),
            voice_terms: default_voice_terms(),
            urgency_terms: default_urgency_terms(),
            categories: default_categories(),
        }
    }
}

impl ClassifierConfig {
    /// Load tables from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.display(), e)))?;
        let tables: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        tables.validate()?;
        Ok(tables.normalized())
    }

    /// Lower-case and trim every keyword, dropping blanks
    pub fn normalized(mut self) -> Self {
        fn clean(list: &mut Vec<String>) {
            *list = list
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }
        clean(&mut self.crisis_phrases);
        clean(&mut self.voice_terms);
        clean(&mut self.urgency_terms);
        for entry in &mut self.categories {
            clean(&mut entry.triggers);
            clean(&mut entry.topics);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crisis_phrases.iter().all(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "matching.classifier.crisis_phrases".to_string(),
                message: "At least one crisis phrase is required".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for entry in &self.categories {
            if !seen.insert(entry.category) {
                return Err(ConfigError::InvalidValue {
                    field: "matching.classifier.categories".to_string(),
                    message: format!("Category {} listed more than once", entry.category),
                });
            }
            if entry.triggers.iter().all(|t| t.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("matching.classifier.categories.{}", entry.category),
                    message: "Trigger keyword list is empty".to_string(),
                });
            }
        }

        if self.categories.len() < Category::ALL.len() {
            tracing::warn!(
                configured = self.categories.len(),
                "Classifier tables omit some categories; they will never be matched"
            );
        }

        Ok(())
    }

    /// Category priority order as configured
    pub fn priority(&self) -> Vec<Category> {
        self.categories.iter().map(|c| c.category).collect()
    }
}

/// Matching and composition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Budget for each knowledge/contact/helper store call
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// History turns kept when a conversation is extended
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,

    /// Optional YAML file replacing the built-in keyword tables
    #[serde(default)]
    pub keywords_path: Option<String>,

    #[serde(default)]
    pub classifier: ClassifierConfig,
}

fn default_store_timeout_ms() -> u64 {
    constants::timeouts::STORE_MS
}

fn default_max_history_turns() -> usize {
    constants::MAX_HISTORY_TURNS
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: default_store_timeout_ms(),
            max_history_turns: default_max_history_turns(),
            keywords_path: None,
            classifier: ClassifierConfig::default(),
        }
    }
}

impl MatchingConfig {
    /// Effective classifier tables: the YAML file when configured, else inline tables
    pub fn resolve_classifier(&self) -> Result<ClassifierConfig, ConfigError> {
        match &self.keywords_path {
            Some(path) => ClassifierConfig::load(path),
            None => Ok(self.classifier.clone().normalized()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_tables_cover_all_categories_in_order() {
        let tables = ClassifierConfig::default();
        assert_eq!(tables.priority(), Category::ALL.to_vec());
        assert!(tables.validate().is_ok());
        assert!(tables.crisis_phrases.contains(&"kill myself".to_string()));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let mut tables = ClassifierConfig::default();
        let first = tables.categories[0].clone();
        tables.categories.push(first);
        assert!(tables.validate().is_err());
    }

    #[test]
    fn test_empty_crisis_phrases_rejected() {
        let tables = ClassifierConfig {
            crisis_phrases: vec!["  ".to_string()],
            ..Default::default()
        };
        assert!(tables.validate().is_err());
    }

    #[test]
    fn test_load_from_yaml_normalizes() {
        let yaml = r#"
crisis_phrases: ["Suicide"]
categories:
  - category: career
    triggers: ["  Job ", "Interview"]
    topics: ["resume"]
  - category: mental-health
    triggers: ["anxious"]
"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let tables = ClassifierConfig::load(file.path()).unwrap();
        assert_eq!(tables.crisis_phrases, vec!["suicide"]);
        assert_eq!(tables.priority(), vec![Category::Career, Category::MentalHealth]);
        assert_eq!(tables.categories[0].triggers, vec!["job", "interview"]);
        // Omitted lists fall back to defaults
        assert_eq!(tables.voice_terms, vec!["voice", "speak"]);
    }

    #[test]
    fn test_missing_keywords_file() {
        let config = MatchingConfig {
            keywords_path: Some("/nonexistent/keywords.yaml".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.resolve_classifier(),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
