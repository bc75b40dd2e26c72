//! Response composition
//!
//! Turns a classified [`Intent`] into a [`ComposedResponse`]. Every store
//! call runs under the composer's timeout; a failed or slow store degrades
//! to an empty collection and is recorded, never returned as an error.

use std::future::Future;
use std::time::Duration;

use peer_support_config::MatchingConfig;
use peer_support_core::{
    Category, ComposedResponse, ContactCategory, ContactStore, Degradation, EmergencyContact,
    Intent, IntentKind, KnowledgeEntry, KnowledgeStore, StoreError,
};

pub const CRISIS_TEXT: &str = "I'm very concerned about you. Your life has value and help is \
    available right now. Please reach out to these immediate crisis resources. You don't have \
    to go through this alone.";

pub const VOICE_TEXT: &str = "I'd love to speak with you! Voice conversations can feel more \
    personal and supportive, and I can read my replies aloud for you. How would you like to \
    continue our conversation?";

pub const GENERIC_TEXT: &str = "Thank you for sharing that with me. I want you to know that your \
    feelings are valid, and seeking support shows strength. Let me provide some helpful \
    information that might be relevant to your situation.";

const URGENT_NOTE: &str = "If you feel unsafe or overwhelmed right now, please reach out to one \
    of the crisis resources below.";

/// Category-appropriate opening sentence
pub fn lead_in(category: Category) -> &'static str {
    match category {
        Category::MentalHealth => {
            "I understand you're feeling anxious or overwhelmed. Feelings like these are very \
             common and there are effective techniques to help manage them. Let me share some \
             evidence-based strategies."
        },
        Category::Career => {
            "Career challenges can feel overwhelming, but with the right strategies, you can \
             navigate them successfully. Let me share some expert insights."
        },
        Category::Relationships => {
            "Relationships require ongoing effort and good communication skills. I can share \
             some proven techniques for building stronger, healthier connections with others."
        },
        Category::LifeTransitions => {
            "Big life changes can be unsettling, even when they're welcome. It's normal to need \
             time to adjust. Here are some ideas that have helped others through similar \
             transitions."
        },
        Category::Education => {
            "Academic pressure is something many people struggle with. A few practical study \
             and preparation techniques can make a real difference. Here's what tends to help."
        },
        Category::Community => {
            "Feeling disconnected is more common than you might think, and meaningful \
             connections can be built step by step. Here are some ways to start."
        },
    }
}

/// Composes replies from intents and store snapshots
#[derive(Debug, Clone)]
pub struct ResponseComposer {
    store_timeout: Duration,
}

impl Default for ResponseComposer {
    fn default() -> Self {
        Self::from_config(&MatchingConfig::default())
    }
}

impl ResponseComposer {
    pub fn new(store_timeout: Duration) -> Self {
        Self { store_timeout }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(Duration::from_millis(config.store_timeout_ms))
    }

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    /// Compose the reply for `intent`
    ///
    /// Always returns a well-formed response with non-empty text.
    pub async fn compose(
        &self,
        intent: &Intent,
        knowledge: &dyn KnowledgeStore,
        contacts: &dyn ContactStore,
    ) -> ComposedResponse {
        let mut degradations = Vec::new();

        let mut response = match (intent.kind, intent.matched_category) {
            (IntentKind::Crisis, _) => {
                let found = self
                    .contacts_in(contacts, ContactCategory::Suicide, &mut degradations)
                    .await;
                ComposedResponse::text(CRISIS_TEXT)
                    .with_contacts(found)
                    .urgent(true)
            },
            (IntentKind::CategoryTopic, Some(category)) => {
                self.compose_topic(intent, category, knowledge, contacts, &mut degradations)
                    .await
            },
            (IntentKind::VoiceRequest, _) => ComposedResponse::text(VOICE_TEXT),
            (IntentKind::CategoryTopic, None) | (IntentKind::Generic, _) => {
                let mut best = self.best_knowledge(knowledge, &mut degradations).await;
                best.truncate(1);
                ComposedResponse::text(GENERIC_TEXT).with_knowledge(best)
            },
        };

        for degradation in &degradations {
            metrics::counter!("peer_support_degradations_total", "kind" => degradation.kind())
                .increment(1);
        }
        response.degradations = degradations;

        tracing::debug!(
            intent = intent.kind.as_str(),
            knowledge = response.knowledge.len(),
            contacts = response.contacts.len(),
            urgent = response.urgent,
            degraded = response.degraded(),
            "Composed response"
        );

        response
    }

    async fn compose_topic(
        &self,
        intent: &Intent,
        category: Category,
        knowledge: &dyn KnowledgeStore,
        contacts: &dyn ContactStore,
        degradations: &mut Vec<Degradation>,
    ) -> ComposedResponse {
        let urgent = intent.is_urgent();

        let (entries, crisis_contacts) = if urgent {
            let (entries, found) = tokio::join!(
                self.guarded("knowledge", knowledge.list_knowledge(Some(category))),
                self.guarded("contacts", contacts.list_contacts(Some(ContactCategory::Crisis))),
            );
            (settle(entries, degradations), settle(found, degradations))
        } else {
            let entries = self
                .guarded("knowledge", knowledge.list_knowledge(Some(category)))
                .await;
            (settle(entries, degradations), Vec::new())
        };

        let mut relevant: Vec<KnowledgeEntry> = entries
            .into_iter()
            .filter(|k| k.category_id == category && k.has_any_keyword(&intent.keywords))
            .collect();
        relevant.sort_by(KnowledgeEntry::by_confidence);

        if !urgent {
            return ComposedResponse::text(lead_in(category)).with_knowledge(relevant);
        }

        ComposedResponse::text(format!("{} {}", lead_in(category), URGENT_NOTE))
            .with_knowledge(relevant)
            .with_contacts(ordered_contacts(crisis_contacts, ContactCategory::Crisis))
            .urgent(true)
    }

    async fn contacts_in(
        &self,
        store: &dyn ContactStore,
        category: ContactCategory,
        degradations: &mut Vec<Degradation>,
    ) -> Vec<EmergencyContact> {
        let found = self
            .guarded("contacts", store.list_contacts(Some(category)))
            .await;
        ordered_contacts(settle(found, degradations), category)
    }

    async fn best_knowledge(
        &self,
        store: &dyn KnowledgeStore,
        degradations: &mut Vec<Degradation>,
    ) -> Vec<KnowledgeEntry> {
        let found = self.guarded("knowledge", store.list_knowledge(None)).await;
        let mut entries = settle(found, degradations);
        entries.sort_by(KnowledgeEntry::by_confidence);
        entries
    }

    async fn guarded<T, F>(&self, source: &str, call: F) -> Result<Vec<T>, Degradation>
    where
        F: Future<Output = Result<Vec<T>, StoreError>>,
    {
        guarded_fetch(self.store_timeout, source, call).await
    }
}

/// Run a store call under `timeout`
///
/// A failed or slow call becomes a [`Degradation::StoreUnavailable`] naming
/// the source; the caller decides how to surface it.
pub async fn guarded_fetch<T, F>(
    timeout: Duration,
    source: &str,
    call: F,
) -> Result<Vec<T>, Degradation>
where
    F: Future<Output = Result<Vec<T>, StoreError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(records)) => Ok(records),
        Ok(Err(e)) => {
            tracing::warn!(source, error = %e, "Store call failed, continuing without it");
            Err(Degradation::StoreUnavailable(format!("{}: {}", source, e)))
        },
        Err(_) => {
            let timeout_ms = timeout.as_millis() as u64;
            tracing::warn!(source, timeout_ms, "Store call timed out, continuing without it");
            Err(Degradation::StoreUnavailable(
                StoreError::Timeout(timeout_ms).to_string(),
            ))
        },
    }
}

fn settle<T>(result: Result<Vec<T>, Degradation>, degradations: &mut Vec<Degradation>) -> Vec<T> {
    result.unwrap_or_else(|degradation| {
        degradations.push(degradation);
        Vec::new()
    })
}

/// Re-apply the category filter and order 24/7 first, then by name
fn ordered_contacts(
    contacts: Vec<EmergencyContact>,
    category: ContactCategory,
) -> Vec<EmergencyContact> {
    let mut contacts: Vec<_> = contacts
        .into_iter()
        .filter(|c| c.category == category)
        .collect();
    contacts.sort_by(EmergencyContact::by_availability);
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_texts_are_non_empty() {
        assert!(!CRISIS_TEXT.trim().is_empty());
        assert!(!VOICE_TEXT.trim().is_empty());
        assert!(!GENERIC_TEXT.trim().is_empty());
        for category in Category::ALL {
            assert!(!lead_in(category).trim().is_empty());
        }
    }

    #[test]
    fn test_continuation_lines_have_single_spaces() {
        assert!(!CRISIS_TEXT.contains("  "));
        assert!(!lead_in(Category::Career).contains("  "));
    }

    #[tokio::test]
    async fn test_guarded_fetch_outcomes() {
        let timeout = Duration::from_millis(20);

        let ok = guarded_fetch(timeout, "knowledge", async { Ok(vec![1, 2]) }).await;
        assert_eq!(ok.unwrap(), vec![1, 2]);

        let failed = guarded_fetch(timeout, "contacts", async {
            Err::<Vec<u8>, _>(StoreError::Unavailable("offline".into()))
        })
        .await;
        match failed {
            Err(Degradation::StoreUnavailable(detail)) => {
                assert!(detail.starts_with("contacts: "));
                assert!(detail.contains("offline"));
            },
            other => panic!("expected degradation, got {:?}", other),
        }

        let slow = guarded_fetch(timeout, "helpers", async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(vec![1u8])
        })
        .await;
        match slow {
            Err(Degradation::StoreUnavailable(detail)) => {
                assert_eq!(detail, StoreError::Timeout(20).to_string());
            },
            other => panic!("expected timeout degradation, got {:?}", other),
        }
    }

    #[test]
    fn test_default_timeout_from_config() {
        assert_eq!(
            ResponseComposer::default().store_timeout(),
            Duration::from_millis(2000)
        );
    }
}
