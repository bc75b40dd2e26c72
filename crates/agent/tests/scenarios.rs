//! End-to-end classification and composition scenarios

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use peer_support_agent::{
    lead_in, IntentClassifier, ResponseComposer, SupportAssistant, CRISIS_TEXT, GENERIC_TEXT,
};
use peer_support_core::{
    Category, ContactCategory, ContactStore, Conversation, Degradation, EmergencyContact,
    IntentKind, KnowledgeEntry, KnowledgeStore, StoreError, TurnRole, Urgency,
};
use peer_support_persistence::SeedStore;

fn contact(id: &str, name: &str, category: ContactCategory, always_on: bool) -> EmergencyContact {
    EmergencyContact {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        phone: Some("000".to_string()),
        website: None,
        country: "Global".to_string(),
        category,
        available_24x7: always_on,
        languages: vec!["English".to_string()],
    }
}

fn entry(id: &str, topic: &str, category: Category, keywords: &[&str], confidence: f64) -> KnowledgeEntry {
    KnowledgeEntry {
        id: id.to_string(),
        topic: topic.to_string(),
        content: format!("{} content", topic),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        confidence_level: confidence,
        category_id: category,
    }
}

/// Store that ignores the category argument so the composer has to filter
struct LeakyStore {
    knowledge: Vec<KnowledgeEntry>,
    contacts: Vec<EmergencyContact>,
}

#[async_trait]
impl KnowledgeStore for LeakyStore {
    async fn list_knowledge(&self, _: Option<Category>) -> Result<Vec<KnowledgeEntry>, StoreError> {
        Ok(self.knowledge.clone())
    }

    async fn search(&self, _: &str) -> Result<Vec<KnowledgeEntry>, StoreError> {
        Ok(self.knowledge.clone())
    }
}

#[async_trait]
impl ContactStore for LeakyStore {
    async fn list_contacts(
        &self,
        _: Option<ContactCategory>,
    ) -> Result<Vec<EmergencyContact>, StoreError> {
        Ok(self.contacts.clone())
    }

    async fn search_contacts(
        &self,
        _: &str,
        _: Option<&str>,
    ) -> Result<Vec<EmergencyContact>, StoreError> {
        Ok(self.contacts.clone())
    }
}

struct FailingStore;

#[async_trait]
impl KnowledgeStore for FailingStore {
    async fn list_knowledge(&self, _: Option<Category>) -> Result<Vec<KnowledgeEntry>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn search(&self, _: &str) -> Result<Vec<KnowledgeEntry>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

#[async_trait]
impl ContactStore for FailingStore {
    async fn list_contacts(
        &self,
        _: Option<ContactCategory>,
    ) -> Result<Vec<EmergencyContact>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn search_contacts(
        &self,
        _: &str,
        _: Option<&str>,
    ) -> Result<Vec<EmergencyContact>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Store that never answers within the composer's budget
struct SlowStore;

#[async_trait]
impl KnowledgeStore for SlowStore {
    async fn list_knowledge(&self, _: Option<Category>) -> Result<Vec<KnowledgeEntry>, StoreError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(vec![entry("late", "Late", Category::Career, &["job"], 1.0)])
    }

    async fn search(&self, _: &str) -> Result<Vec<KnowledgeEntry>, StoreError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Vec::new())
    }
}

#[async_trait]
impl ContactStore for SlowStore {
    async fn list_contacts(
        &self,
        _: Option<ContactCategory>,
    ) -> Result<Vec<EmergencyContact>, StoreError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(vec![contact("late", "Late Line", ContactCategory::Suicide, true)])
    }

    async fn search_contacts(
        &self,
        _: &str,
        _: Option<&str>,
    ) -> Result<Vec<EmergencyContact>, StoreError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Vec::new())
    }
}

fn fast_composer() -> ResponseComposer {
    ResponseComposer::new(Duration::from_millis(50))
}

#[tokio::test]
async fn test_scenario_crisis_returns_suicide_contacts() {
    let classifier = IntentClassifier::default();
    let intent = classifier.classify("I want to kill myself");
    assert_eq!(intent.kind, IntentKind::Crisis);
    assert_eq!(intent.urgency, Urgency::Critical);

    let store = LeakyStore {
        knowledge: Vec::new(),
        contacts: vec![
            contact("4", "Zeta Line", ContactCategory::Suicide, true),
            contact("1", "Alpha Line", ContactCategory::Suicide, false),
            contact("2", "Beta Line", ContactCategory::Suicide, true),
            contact("3", "Gamma Crisis", ContactCategory::Crisis, true),
            contact("5", "Delta Line", ContactCategory::Suicide, true),
        ],
    };

    let response = fast_composer().compose(&intent, &store, &store).await;
    assert!(response.urgent);
    assert_eq!(response.text, CRISIS_TEXT);
    assert!(response.knowledge.is_empty());
    let names: Vec<_> = response.contacts.iter().map(|c| c.name.as_str()).collect();
    // 24/7 first, then name; crisis-only contact excluded; capped at three
    assert_eq!(names, vec!["Beta Line", "Delta Line", "Zeta Line"]);
}

#[tokio::test]
async fn test_crisis_with_no_contacts_is_still_well_formed() {
    let store = LeakyStore {
        knowledge: Vec::new(),
        contacts: Vec::new(),
    };
    let intent = IntentClassifier::default().classify("I want to die");
    let response = fast_composer().compose(&intent, &store, &store).await;
    assert!(response.urgent);
    assert!(response.contacts.is_empty());
    assert!(!response.degraded());
    assert!(!response.text.is_empty());
}

#[tokio::test]
async fn test_scenario_anxious_about_job_uses_mental_health_knowledge() {
    let classifier = IntentClassifier::default();
    let intent = classifier.classify("I'm feeling anxious about my new job");
    assert_eq!(intent.matched_category, Some(Category::MentalHealth));

    let store = LeakyStore {
        knowledge: vec![
            entry("a", "Breathing", Category::MentalHealth, &["breathing"], 0.8),
            entry("b", "Anxiety Basics", Category::MentalHealth, &["Anxiety"], 0.9),
            entry("c", "Anxiety Advanced", Category::MentalHealth, &["anxiety"], 0.9),
            entry("d", "Job Search", Category::Career, &["job", "anxious"], 1.0),
            entry("e", "Mindfulness", Category::MentalHealth, &["meditation"], 0.99),
        ],
        contacts: vec![contact("1", "Line", ContactCategory::Crisis, true)],
    };

    let response = fast_composer().compose(&intent, &store, &store).await;
    assert!(!response.urgent);
    assert!(response.contacts.is_empty());
    assert_eq!(response.text, lead_in(Category::MentalHealth));
    let topics: Vec<_> = response.knowledge.iter().map(|k| k.topic.as_str()).collect();
    // Confidence descending, ties by topic ascending; other categories never leak in
    assert_eq!(topics, vec!["Anxiety Advanced", "Anxiety Basics"]);
}

#[tokio::test]
async fn test_elevated_topic_attaches_crisis_contacts() {
    let intent = IntentClassifier::default().classify("help, my relationship is falling apart");
    assert_eq!(intent.urgency, Urgency::Elevated);

    let store = SeedStore::builtin().unwrap();
    let response = fast_composer().compose(&intent, &store, &store).await;
    assert!(response.urgent);
    assert!(!response.contacts.is_empty());
    assert!(response.contacts.len() <= 3);
    assert!(response
        .contacts
        .iter()
        .all(|c| c.category == ContactCategory::Crisis));
    assert!(response
        .knowledge
        .iter()
        .all(|k| k.category_id == Category::Relationships));
}

#[tokio::test]
async fn test_generic_suggests_single_best_entry() {
    let store = LeakyStore {
        knowledge: vec![
            entry("a", "Low", Category::Career, &[], 0.2),
            entry("b", "High", Category::Community, &[], 0.95),
            entry("c", "Mid", Category::Education, &[], 0.5),
        ],
        contacts: Vec::new(),
    };
    let intent = IntentClassifier::default().classify("hello there");
    let response = fast_composer().compose(&intent, &store, &store).await;
    assert_eq!(response.text, GENERIC_TEXT);
    assert_eq!(response.knowledge.len(), 1);
    assert_eq!(response.knowledge[0].topic, "High");
    assert!(!response.urgent);
}

#[tokio::test]
async fn test_voice_request_has_no_attachments() {
    let store = SeedStore::builtin().unwrap();
    let intent = IntentClassifier::default().classify("can you speak to me?");
    let response = fast_composer().compose(&intent, &store, &store).await;
    assert_eq!(intent.kind, IntentKind::VoiceRequest);
    assert!(response.knowledge.is_empty());
    assert!(response.contacts.is_empty());
    assert!(!response.urgent);
    assert!(response.should_speak(intent.kind));
}

#[tokio::test]
async fn test_scenario_store_failure_degrades_to_text() {
    let classifier = IntentClassifier::default();
    for utterance in [
        "I want to kill myself",
        "emergency, I lost my job",
        "I'm so stressed",
        "hello",
    ] {
        let intent = classifier.classify(utterance);
        let response = fast_composer()
            .compose(&intent, &FailingStore, &FailingStore)
            .await;
        assert!(!response.text.is_empty(), "{}", utterance);
        assert!(response.knowledge.is_empty());
        assert!(response.contacts.is_empty());
        assert!(response.degraded());
        assert!(response
            .degradations
            .iter()
            .all(|d| matches!(d, Degradation::StoreUnavailable(_))));
    }
}

#[tokio::test]
async fn test_scenario_store_timeout_degrades_to_text() {
    let classifier = IntentClassifier::default();
    let intent = classifier.classify("I want to end it all");

    let started = std::time::Instant::now();
    let response = fast_composer().compose(&intent, &SlowStore, &SlowStore).await;
    assert!(started.elapsed() < Duration::from_secs(2));

    assert!(response.urgent);
    assert!(response.contacts.is_empty());
    assert_eq!(response.text, CRISIS_TEXT);
    assert_eq!(response.degradations.len(), 1);

    let intent = classifier.classify("help, my interview went badly");
    let response = fast_composer().compose(&intent, &SlowStore, &SlowStore).await;
    assert!(response.knowledge.is_empty());
    assert!(response.contacts.is_empty());
    // Knowledge and contacts both timed out
    assert_eq!(response.degradations.len(), 2);
}

#[test]
fn test_crisis_phrase_always_wins() {
    let classifier = IntentClassifier::default();
    let phrases = ["suicide", "kill myself", "end it all", "want to die"];
    let noise = [
        "",
        "voice",
        "speak",
        "anxious",
        "job interview",
        "relationship",
        "divorce",
        "exam",
        "lonely",
        "help emergency",
    ];
    for phrase in phrases {
        for before in noise {
            for after in noise {
                let utterance = format!("{} {} {}", before, phrase, after);
                assert_eq!(
                    classifier.classify(&utterance).kind,
                    IntentKind::Crisis,
                    "{}",
                    utterance
                );
            }
        }
    }
}

#[test]
fn test_no_keywords_is_generic() {
    let classifier = IntentClassifier::default();
    for utterance in [
        "good morning",
        "what's the weather like",
        "I had pasta for lunch",
        "the train is late",
        "12345",
        "¿qué tal?",
    ] {
        assert_eq!(classifier.classify(utterance).kind, IntentKind::Generic, "{}", utterance);
    }
}

#[tokio::test]
async fn test_assistant_turn_extends_history() {
    let store = Arc::new(SeedStore::builtin().unwrap());
    let assistant = SupportAssistant::new(
        IntentClassifier::default(),
        fast_composer(),
        store.clone(),
        store,
    );

    let first = assistant
        .respond(Conversation::new(), "I'm worried about my exam")
        .await;
    assert_eq!(first.intent.matched_category, Some(Category::Education));
    assert!(!first.speak);
    assert_eq!(first.history.turn_count(), 2);
    assert_eq!(first.history.turns()[0].role, TurnRole::User);
    assert_eq!(first.history.turns()[1].role, TurnRole::Assistant);

    let second = assistant.respond(first.history, "I want to kill myself").await;
    assert!(second.speak);
    assert_eq!(second.history.turn_count(), 4);
    let last = second.history.last().unwrap();
    assert_eq!(last.content, CRISIS_TEXT);
    assert_eq!(last.metadata.as_ref().unwrap().intent, IntentKind::Crisis);
}

#[tokio::test]
async fn test_assistant_blank_input_leaves_history_unchanged() {
    let store = Arc::new(SeedStore::builtin().unwrap());
    let assistant = SupportAssistant::new(
        IntentClassifier::default(),
        fast_composer(),
        store.clone(),
        store,
    );
    let history = assistant
        .respond(Conversation::new(), "hello")
        .await
        .history;

    let turn = assistant.respond(history.clone(), "   ").await;
    assert!(turn.response.is_none());
    assert_eq!(turn.intent.kind, IntentKind::Generic);
    assert_eq!(turn.history, history);
    assert!(!turn.speak);
}

#[tokio::test]
async fn test_assistant_history_is_capped() {
    let store = Arc::new(SeedStore::builtin().unwrap());
    let assistant = SupportAssistant::new(
        IntentClassifier::default(),
        fast_composer(),
        store.clone(),
        store,
    )
    .with_max_history(4);

    let mut history = Conversation::new();
    for n in 0..5 {
        history = assistant.respond(history, &format!("message {}", n)).await.history;
    }
    assert_eq!(history.turn_count(), 4);
    assert_eq!(history.turns()[0].content, "message 3");
}

#[test]
fn test_greetings() {
    let store = Arc::new(SeedStore::builtin().unwrap());
    let assistant = SupportAssistant::new(
        IntentClassifier::default(),
        fast_composer(),
        store.clone(),
        store,
    );

    let generic = assistant.greeting(None, None);
    assert!(generic.starts_with("Hello!"));

    let categorized = assistant.greeting(None, Some(Category::Career));
    assert!(categorized.contains("career development"));
}
