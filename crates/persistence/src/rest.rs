//! Managed-database store over a PostgREST-style HTTP API
//!
//! Reads three tables: `ai_knowledge_base`, `emergency_contacts` and
//! `demo_helpers_with_stats`. Rows are mapped into core records; rows that
//! cannot be mapped are skipped and logged rather than failing the call.
//! Text search is done locally so user input never reaches a filter string.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use peer_support_config::RestStoreConfig;
use peer_support_core::{
    AvailabilityStatus, Category, ContactCategory, ContactStore, EmergencyContact, HelperRecord,
    HelperStore, KnowledgeEntry, KnowledgeStore, StoreError, GLOBAL_COUNTRY,
};

use crate::PersistenceError;

const KNOWLEDGE_TABLE: &str = "ai_knowledge_base";
const CONTACTS_TABLE: &str = "emergency_contacts";
const HELPERS_TABLE: &str = "demo_helpers_with_stats";

#[derive(Debug, Deserialize)]
struct CategoryRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct KnowledgeRow {
    id: String,
    topic: String,
    content: String,
    #[serde(default)]
    keywords: Option<Vec<String>>,
    #[serde(default)]
    confidence_level: Option<f64>,
    #[serde(default)]
    category_id: Option<String>,
    #[serde(default)]
    category_name: Option<String>,
    #[serde(default)]
    categories: Option<CategoryRef>,
}

impl KnowledgeRow {
    fn into_entry(self) -> Option<KnowledgeEntry> {
        let category = self
            .categories
            .as_ref()
            .map(|c| c.name.as_str())
            .into_iter()
            .chain(self.category_name.as_deref())
            .chain(self.category_id.as_deref())
            .find_map(Category::from_name)?;

        Some(
            KnowledgeEntry {
                id: self.id,
                topic: self.topic,
                content: self.content,
                keywords: self.keywords.unwrap_or_default(),
                confidence_level: self.confidence_level.unwrap_or(0.0),
                category_id: category,
            }
            .normalized(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct ContactRow {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    country: Option<String>,
    category: String,
    #[serde(default)]
    available_24_7: Option<bool>,
    #[serde(default)]
    languages: Option<Vec<String>>,
}

impl ContactRow {
    fn into_contact(self) -> Option<EmergencyContact> {
        let category: ContactCategory = self.category.parse().ok()?;
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let contact = EmergencyContact {
            id: self.id,
            name: self.name,
            description: self.description.unwrap_or_default(),
            phone: non_blank(self.phone),
            website: non_blank(self.website),
            country: self.country.unwrap_or_else(|| GLOBAL_COUNTRY.to_string()),
            category,
            available_24x7: self.available_24_7.unwrap_or(false),
            languages: self.languages.unwrap_or_default(),
        };
        contact.validate().ok()?;
        Some(contact)
    }
}

#[derive(Debug, Deserialize)]
struct HelperRow {
    id: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    average_rating: Option<f64>,
    #[serde(default)]
    computed_rating: Option<f64>,
    #[serde(default)]
    total_reviews: Option<u32>,
    #[serde(default)]
    computed_reviews: Option<u32>,
    #[serde(default)]
    hourly_rate: Option<f64>,
    #[serde(default)]
    languages: Option<Vec<String>>,
    #[serde(default)]
    specialties: Option<Vec<String>>,
    #[serde(default)]
    category_name: Option<String>,
    #[serde(default)]
    experience_years: Option<u32>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    availability_status: Option<String>,
    #[serde(default)]
    verified: Option<bool>,
    #[serde(default)]
    video_enabled: Option<bool>,
    #[serde(default)]
    voice_enabled: Option<bool>,
}

impl HelperRow {
    fn into_helper(self) -> Option<HelperRecord> {
        let category = self.category_name.as_deref().and_then(Category::from_name)?;
        let display_name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let availability_status = match self.availability_status.as_deref() {
            Some("online") => AvailabilityStatus::Online,
            Some("busy") => AvailabilityStatus::Busy,
            _ => AvailabilityStatus::Offline,
        };

        Some(HelperRecord {
            id: self.id,
            display_name,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            rating: self
                .average_rating
                .filter(|r| *r > 0.0)
                .or(self.computed_rating)
                .unwrap_or(0.0),
            review_count: self
                .total_reviews
                .filter(|r| *r > 0)
                .or(self.computed_reviews)
                .unwrap_or(0),
            hourly_rate: self.hourly_rate.unwrap_or(0.0),
            languages: self.languages.unwrap_or_default(),
            specialties: self.specialties.unwrap_or_default(),
            category_id: category,
            experience_years: self.experience_years.unwrap_or(0),
            location: self
                .location
                .unwrap_or_else(|| GLOBAL_COUNTRY.to_string()),
            availability_status,
            verified: self.verified.unwrap_or(false),
            video_enabled: self.video_enabled.unwrap_or(false),
            voice_enabled: self.voice_enabled.unwrap_or(false),
        })
    }
}

/// Map rows, logging and skipping the ones that do not fit the record model
fn map_rows<R, T>(table: &str, rows: Vec<R>, map: impl Fn(R) -> Option<T>) -> Vec<T> {
    let total = rows.len();
    let records: Vec<T> = rows.into_iter().filter_map(map).collect();
    if records.len() < total {
        tracing::warn!(
            table,
            skipped = total - records.len(),
            "Skipped rows that could not be mapped"
        );
    }
    records
}

/// REST table client
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestStore {
    pub fn new(config: &RestStoreConfig) -> Result<Self, PersistenceError> {
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(PersistenceError::InvalidConfig(
                "REST store URL is empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        tracing::info!(url = %base_url, "REST store configured");

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, PersistenceError> {
        let mut request = self
            .client
            .get(format!("{}/{}", self.base_url, table))
            .query(query)
            .header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PersistenceError::Status {
                table: table.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PersistenceError::Parse {
            file: table.to_string(),
            message: e.to_string(),
        })
    }

    async fn fetch_knowledge(&self) -> Result<Vec<KnowledgeEntry>, PersistenceError> {
        let rows: Vec<KnowledgeRow> = self
            .fetch(
                KNOWLEDGE_TABLE,
                &[("select", "*,categories(name)".to_string())],
            )
            .await?;
        Ok(map_rows(KNOWLEDGE_TABLE, rows, KnowledgeRow::into_entry))
    }

    async fn fetch_contacts(
        &self,
        category: Option<ContactCategory>,
    ) -> Result<Vec<EmergencyContact>, PersistenceError> {
        let mut query = vec![("select", "*".to_string()), ("order", "name".to_string())];
        if let Some(category) = category {
            query.push(("category", format!("eq.{}", category.as_str())));
        }
        let rows: Vec<ContactRow> = self.fetch(CONTACTS_TABLE, &query).await?;
        Ok(map_rows(CONTACTS_TABLE, rows, ContactRow::into_contact))
    }
}

#[async_trait]
impl KnowledgeStore for RestStore {
    async fn list_knowledge(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<KnowledgeEntry>, StoreError> {
        let mut entries = self.fetch_knowledge().await?;
        entries.retain(|k| category.map_or(true, |c| k.category_id == c));
        entries.sort_by(|a, b| a.topic.cmp(&b.topic));
        Ok(entries)
    }

    async fn search(&self, term: &str) -> Result<Vec<KnowledgeEntry>, StoreError> {
        let mut entries = self.fetch_knowledge().await?;
        entries.retain(|k| k.matches_term(term));
        entries.sort_by(KnowledgeEntry::by_confidence);
        Ok(entries)
    }
}

#[async_trait]
impl ContactStore for RestStore {
    async fn list_contacts(
        &self,
        category: Option<ContactCategory>,
    ) -> Result<Vec<EmergencyContact>, StoreError> {
        let mut contacts = self.fetch_contacts(category).await?;
        contacts.retain(|c| category.map_or(true, |wanted| c.category == wanted));
        Ok(contacts)
    }

    async fn search_contacts(
        &self,
        term: &str,
        country: Option<&str>,
    ) -> Result<Vec<EmergencyContact>, StoreError> {
        let mut contacts = self.fetch_contacts(None).await?;
        contacts.retain(|c| c.matches_term(term));
        if let Some(country) = country {
            contacts.retain(|c| c.serves_country(country));
        }
        contacts.sort_by(EmergencyContact::by_availability);
        Ok(contacts)
    }
}

#[async_trait]
impl HelperStore for RestStore {
    async fn list_helpers(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<HelperRecord>, StoreError> {
        let rows: Vec<HelperRow> = self
            .fetch(HELPERS_TABLE, &[("select", "*".to_string())])
            .await?;
        let mut helpers = map_rows(HELPERS_TABLE, rows, HelperRow::into_helper);
        helpers.retain(|h| category.map_or(true, |c| h.category_id == c));
        Ok(helpers)
    }

    fn name(&self) -> &str {
        "rest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> RestStore {
        RestStore::new(&RestStoreConfig {
            url: format!("{}/rest/v1/", server.uri()),
            api_key: Some("anon-key".to_string()),
            timeout_ms: 1000,
        })
        .unwrap()
    }

    #[test]
    fn test_empty_url_rejected() {
        let config = RestStoreConfig {
            url: "  ".to_string(),
            api_key: None,
            timeout_ms: 1000,
        };
        assert!(RestStore::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_contacts_mapped_and_invalid_rows_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/emergency_contacts"))
            .and(header("apikey", "anon-key"))
            .and(query_param("category", "eq.suicide"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1", "name": "Lifeline", "phone": "988", "country": "United States",
                 "category": "suicide", "available_24_7": true, "languages": ["English"]},
                {"id": "2", "name": "No Contact", "category": "suicide"},
                {"id": "3", "name": "Odd", "phone": "1", "category": "astrology"}
            ])))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let contacts = store
            .list_contacts(Some(ContactCategory::Suicide))
            .await
            .unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].name, "Lifeline");
        assert!(contacts[0].available_24x7);
    }

    #[tokio::test]
    async fn test_knowledge_category_from_join() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/ai_knowledge_base"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "a", "topic": "Study Strategies", "content": "Spaced repetition",
                 "keywords": ["Study", "focus"], "confidence_level": 0.9,
                 "categories": {"name": "Education"}},
                {"id": "b", "topic": "Job Search", "content": "Network",
                 "keywords": ["job"], "confidence_level": 0.8, "category_name": "career"},
                {"id": "c", "topic": "Unmapped", "content": "x", "keywords": []}
            ])))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let education = store
            .list_knowledge(Some(Category::Education))
            .await
            .unwrap();
        assert_eq!(education.len(), 1);
        assert_eq!(education[0].keywords, vec!["study", "focus"]);

        let all = store.list_knowledge(None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_helper_rows_mapped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/demo_helpers_with_stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "h1", "first_name": "Sarah", "last_name": "Chen", "title": "Counselor",
                 "average_rating": 0, "computed_rating": 4.8, "total_reviews": 12,
                 "hourly_rate": 75, "category_name": "mental-health",
                 "availability_status": "online", "experience_years": 12}
            ])))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let helpers = store.list_helpers(None).await.unwrap();
        assert_eq!(helpers.len(), 1);
        let helper = &helpers[0];
        assert_eq!(helper.display_name, "Sarah Chen");
        assert_eq!(helper.rating, 4.8);
        assert_eq!(helper.review_count, 12);
        assert!(helper.is_online());
        assert_eq!(helper.location, "Global");
    }

    #[tokio::test]
    async fn test_server_error_becomes_store_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let result = store.search("anxiety").await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_malformed_body_becomes_malformed_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let result = store.list_helpers(None).await;
        assert!(matches!(result, Err(StoreError::Malformed(_))));
    }
}
