//! Composed assistant replies and recoverable degradations

use serde::{Deserialize, Serialize};

use crate::{EmergencyContact, IntentKind, KnowledgeEntry};

/// Maximum knowledge entries attached to one reply
pub const MAX_KNOWLEDGE: usize = 2;
/// Maximum emergency contacts attached to one reply
pub const MAX_CONTACTS: usize = 3;

/// A failure that was recovered locally instead of surfaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Degradation {
    /// Knowledge, contact or helper fetch failed or timed out; an empty collection was used
    StoreUnavailable(String),
    /// A filter field was malformed or out of range and treated as unset
    InvalidCriteria(String),
    /// Speech capability absent or failed; the reply stayed silent
    SpeechUnavailable(String),
}

impl Degradation {
    pub fn kind(&self) -> &'static str {
        match self {
            Degradation::StoreUnavailable(_) => "store_unavailable",
            Degradation::InvalidCriteria(_) => "invalid_criteria",
            Degradation::SpeechUnavailable(_) => "speech_unavailable",
        }
    }
}

/// Structured reply for one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedResponse {
    pub text: String,
    #[serde(default)]
    pub knowledge: Vec<KnowledgeEntry>,
    #[serde(default)]
    pub contacts: Vec<EmergencyContact>,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degradations: Vec<Degradation>,
}

impl ComposedResponse {
    /// Text-only reply
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            knowledge: Vec::new(),
            contacts: Vec::new(),
            urgent: false,
            degradations: Vec::new(),
        }
    }

    pub fn with_knowledge(mut self, mut knowledge: Vec<KnowledgeEntry>) -> Self {
        knowledge.truncate(MAX_KNOWLEDGE);
        self.knowledge = knowledge;
        self
    }

    pub fn with_contacts(mut self, mut contacts: Vec<EmergencyContact>) -> Self {
        contacts.truncate(MAX_CONTACTS);
        self.contacts = contacts;
        self
    }

    pub fn urgent(mut self, urgent: bool) -> Self {
        self.urgent = urgent;
        self
    }

    pub fn degraded(&self) -> bool {
        !self.degradations.is_empty()
    }

    /// Voice the reply when the user asked for voice or the reply is urgent
    pub fn should_speak(&self, kind: IntentKind) -> bool {
        kind == IntentKind::VoiceRequest || self.urgent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, ContactCategory};

    #[test]
    fn test_builders_cap_collections() {
        let entry = KnowledgeEntry {
            id: "k".into(),
            topic: "t".into(),
            content: "c".into(),
            keywords: vec![],
            confidence_level: 0.5,
            category_id: Category::Career,
        };
        let contact = EmergencyContact {
            id: "c".into(),
            name: "n".into(),
            description: String::new(),
            phone: Some("1".into()),
            website: None,
            country: "Global".into(),
            category: ContactCategory::Crisis,
            available_24x7: true,
            languages: vec![],
        };
        let response = ComposedResponse::text("hi")
            .with_knowledge(vec![entry; 5])
            .with_contacts(vec![contact; 7])
            .urgent(true);
        assert_eq!(response.knowledge.len(), MAX_KNOWLEDGE);
        assert_eq!(response.contacts.len(), MAX_CONTACTS);
        assert!(response.urgent);
        assert!(!response.degraded());
        assert!(response.should_speak(IntentKind::Generic));
        assert!(ComposedResponse::text("hi").should_speak(IntentKind::VoiceRequest));
        assert!(!ComposedResponse::text("hi").should_speak(IntentKind::CategoryTopic));
    }

    #[test]
    fn test_degradations_skipped_when_empty() {
        let json = serde_json::to_value(ComposedResponse::text("ok")).unwrap();
        assert!(json.get("degradations").is_none());
        let d = Degradation::StoreUnavailable("timeout".into());
        assert_eq!(serde_json::to_value(&d).unwrap()["kind"], "store_unavailable");
    }
}
