//! Classified purpose of a user message

use serde::{Deserialize, Serialize};

use crate::Category;

/// Kind of intent, in classifier priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentKind {
    Crisis,
    CategoryTopic,
    VoiceRequest,
    Generic,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::Crisis => "crisis",
            IntentKind::CategoryTopic => "category_topic",
            IntentKind::VoiceRequest => "voice_request",
            IntentKind::Generic => "generic",
        }
    }
}

/// Severity attached to an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    #[default]
    None,
    Elevated,
    Critical,
}

/// Classifier output for one utterance. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_category: Option<Category>,
    #[serde(default)]
    pub urgency: Urgency,
    /// Lower-cased keyword subset used to select knowledge entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl Intent {
    pub fn crisis() -> Self {
        Self {
            kind: IntentKind::Crisis,
            matched_category: None,
            urgency: Urgency::Critical,
            keywords: Vec::new(),
        }
    }

    pub fn voice_request() -> Self {
        Self {
            kind: IntentKind::VoiceRequest,
            matched_category: None,
            urgency: Urgency::None,
            keywords: Vec::new(),
        }
    }

    pub fn generic() -> Self {
        Self {
            kind: IntentKind::Generic,
            matched_category: None,
            urgency: Urgency::None,
            keywords: Vec::new(),
        }
    }

    pub fn category_topic(category: Category, urgency: Urgency, keywords: Vec<String>) -> Self {
        Self {
            kind: IntentKind::CategoryTopic,
            matched_category: Some(category),
            urgency,
            keywords,
        }
    }

    pub fn is_urgent(&self) -> bool {
        self.urgency != Urgency::None
    }
}
