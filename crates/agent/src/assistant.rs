//! Support assistant turns
//!
//! Ties the classifier and composer together over caller-owned history:
//! the history comes in by value and the extended copy goes back out.

use std::sync::Arc;

use serde::Serialize;

use peer_support_config::MatchingConfig;
use peer_support_core::{
    Category, ComposedResponse, ContactStore, Conversation, HelperRecord, Intent, KnowledgeStore,
    Turn, TurnMetadata,
};

use crate::{AgentError, IntentClassifier, ResponseComposer};

/// Result of one assistant turn
#[derive(Debug, Clone, Serialize)]
pub struct AssistantTurn {
    /// `None` when the utterance was blank
    pub response: Option<ComposedResponse>,
    pub intent: Intent,
    pub history: Conversation,
    /// Whether the reply should be read aloud
    pub speak: bool,
}

/// Classifies, composes and records one turn at a time
pub struct SupportAssistant {
    classifier: IntentClassifier,
    composer: ResponseComposer,
    knowledge: Arc<dyn KnowledgeStore>,
    contacts: Arc<dyn ContactStore>,
    max_history_turns: usize,
}

impl SupportAssistant {
    pub fn new(
        classifier: IntentClassifier,
        composer: ResponseComposer,
        knowledge: Arc<dyn KnowledgeStore>,
        contacts: Arc<dyn ContactStore>,
    ) -> Self {
        Self {
            classifier,
            composer,
            knowledge,
            contacts,
            max_history_turns: peer_support_config::constants::MAX_HISTORY_TURNS,
        }
    }

    /// Build from matching settings, loading the keyword file if one is configured
    pub fn from_config(
        config: &MatchingConfig,
        knowledge: Arc<dyn KnowledgeStore>,
        contacts: Arc<dyn ContactStore>,
    ) -> Result<Self, AgentError> {
        let classifier = IntentClassifier::new(config.resolve_classifier()?);
        let composer = ResponseComposer::from_config(config);
        Ok(Self::new(classifier, composer, knowledge, contacts)
            .with_max_history(config.max_history_turns))
    }

    pub fn with_max_history(mut self, max_turns: usize) -> Self {
        self.max_history_turns = max_turns.max(2);
        self
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn composer(&self) -> &ResponseComposer {
        &self.composer
    }

    /// Classify `utterance`, compose a reply and append both turns to `history`
    pub async fn respond(&self, history: Conversation, utterance: &str) -> AssistantTurn {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return AssistantTurn {
                response: None,
                intent: Intent::generic(),
                history,
                speak: false,
            };
        }

        let intent = self.classifier.classify(utterance);
        metrics::counter!("peer_support_intents_total", "kind" => intent.kind.as_str())
            .increment(1);

        let response = self
            .composer
            .compose(&intent, self.knowledge.as_ref(), self.contacts.as_ref())
            .await;

        tracing::info!(
            intent = intent.kind.as_str(),
            category = intent.matched_category.map(|c| c.slug()).unwrap_or("-"),
            urgent = response.urgent,
            history_turns = history.turn_count(),
            "Assistant turn"
        );

        let speak = response.should_speak(intent.kind);
        let history = history
            .with_turn(Turn::user(utterance))
            .with_turn(Turn::assistant(response.text.clone()).with_metadata(TurnMetadata {
                intent: intent.kind,
                urgent: response.urgent,
            }))
            .truncated(self.max_history_turns);

        AssistantTurn {
            response: Some(response),
            intent,
            history,
            speak,
        }
    }

    /// Opening assistant message
    pub fn greeting(&self, helper: Option<&HelperRecord>, category: Option<Category>) -> String {
        match (helper, category) {
            (Some(helper), category) => format!(
                "Hello! I'm {}'s AI assistant with specialized knowledge in {}. I have access to \
                 expert information and emergency resources. How can I help you today?",
                helper.display_name,
                category
                    .unwrap_or(helper.category_id)
                    .display_name()
                    .to_lowercase(),
            ),
            (None, Some(category)) => format!(
                "Hello! I'm your AI support assistant with specialized knowledge in {}. I can \
                 provide expert guidance and emergency resources. What would you like to explore?",
                category.display_name().to_lowercase(),
            ),
            (None, None) => "Hello! I'm your AI support assistant with access to comprehensive \
                 knowledge across mental health, career, relationships, and more. I can provide \
                 expert guidance and emergency resources. What would you like to explore?"
                .to_string(),
        }
    }
}
