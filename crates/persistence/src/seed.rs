//! In-memory store backed by YAML/JSON seed files
//!
//! Each seed file may carry any of three arrays:
//!
//! ```yaml
//! knowledge: [...]   # KnowledgeEntry
//! contacts: [...]    # EmergencyContact
//! helpers: [...]     # HelperRecord
//! ```
//!
//! Loading a file overlays its records on top of what is already present,
//! replacing records with the same `id`.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;

use peer_support_core::{
    Category, ContactCategory, ContactStore, EmergencyContact, HelperRecord, HelperStore,
    KnowledgeEntry, KnowledgeStore, StoreError,
};

use crate::PersistenceError;

const BUILTIN_SEED: &str = include_str!("../seed/default.yaml");

/// Seed file format
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SeedFile {
    /// Version for format compatibility
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub knowledge: Vec<KnowledgeEntry>,
    #[serde(default)]
    pub contacts: Vec<EmergencyContact>,
    #[serde(default)]
    pub helpers: Vec<HelperRecord>,
}

impl SeedFile {
    pub fn record_count(&self) -> usize {
        self.knowledge.len() + self.contacts.len() + self.helpers.len()
    }
}

#[derive(Debug, Default)]
struct SeedData {
    knowledge: Vec<KnowledgeEntry>,
    contacts: Vec<EmergencyContact>,
    helpers: Vec<HelperRecord>,
}

fn upsert<T>(records: &mut Vec<T>, incoming: T, id: impl Fn(&T) -> &str) {
    match records.iter().position(|r| id(r) == id(&incoming)) {
        Some(pos) => records[pos] = incoming,
        None => records.push(incoming),
    }
}

/// In-memory knowledge, contact and helper store
pub struct SeedStore {
    data: RwLock<SeedData>,
}

impl Default for SeedStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl SeedStore {
    pub fn empty() -> Self {
        Self {
            data: RwLock::new(SeedData::default()),
        }
    }

    /// Store preloaded with the bundled records for all six categories
    pub fn builtin() -> Result<Self, PersistenceError> {
        let store = Self::empty();
        let file = Self::parse(BUILTIN_SEED, "yaml", "builtin")?;
        store.merge(file);
        Ok(store)
    }

    /// Store holding exactly the given records
    pub fn from_records(
        knowledge: Vec<KnowledgeEntry>,
        contacts: Vec<EmergencyContact>,
        helpers: Vec<HelperRecord>,
    ) -> Self {
        let store = Self::empty();
        store.merge(SeedFile {
            version: None,
            knowledge,
            contacts,
            helpers,
        });
        store
    }

    fn parse(content: &str, extension: &str, origin: &str) -> Result<SeedFile, PersistenceError> {
        let parsed = match extension {
            "json" => serde_json::from_str(content).map_err(|e| e.to_string()),
            _ => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| PersistenceError::Parse {
            file: origin.to_string(),
            message,
        })
    }

    /// Overlay records, dropping unreachable contacts and helpers with
    /// impossible ratings or rates
    fn merge(&self, file: SeedFile) -> usize {
        let mut data = self.data.write();
        let mut merged = 0;

        for entry in file.knowledge {
            upsert(&mut data.knowledge, entry.normalized(), |k| k.id.as_str());
            merged += 1;
        }

        for contact in file.contacts {
            if let Err(e) = contact.validate() {
                tracing::warn!(contact = %contact.id, error = %e, "Dropping invalid emergency contact");
                continue;
            }
            upsert(&mut data.contacts, contact, |c| c.id.as_str());
            merged += 1;
        }

        for helper in file.helpers {
            if let Err(e) = helper.validate() {
                tracing::warn!(helper = %helper.id, error = %e, "Dropping invalid helper");
                continue;
            }
            upsert(&mut data.helpers, helper, |h| h.id.as_str());
            merged += 1;
        }

        merged
    }

    /// Load a single seed file
    pub fn load_file(&self, path: &Path) -> Result<usize, PersistenceError> {
        let content = std::fs::read_to_string(path)?;
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let file = Self::parse(&content, extension, &path.display().to_string())?;
        Ok(self.merge(file))
    }

    /// Load every YAML and JSON file in a directory
    ///
    /// Files that fail to parse are logged and skipped.
    ///
    /// # Returns
    /// Number of records merged
    pub fn load_directory(&self, dir: &Path) -> Result<usize, PersistenceError> {
        if !dir.exists() {
            tracing::warn!(path = %dir.display(), "Seed directory does not exist");
            return Ok(0);
        }

        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("yaml" | "yml" | "json")
                )
            })
            .collect();
        // Later files win on id collisions, so load in a stable order
        paths.sort();

        let mut total = 0;
        for path in paths {
            match self.load_file(&path) {
                Ok(count) => {
                    tracing::info!(file = %path.display(), records = count, "Loaded seed file");
                    total += count;
                },
                Err(e) => {
                    tracing::error!(file = %path.display(), error = %e, "Failed to load seed file");
                },
            }
        }

        tracing::info!(directory = %dir.display(), total_records = total, "Seed loading complete");
        Ok(total)
    }

    /// (knowledge, contacts, helpers) record counts
    pub fn counts(&self) -> (usize, usize, usize) {
        let data = self.data.read();
        (data.knowledge.len(), data.contacts.len(), data.helpers.len())
    }
}

#[async_trait]
impl KnowledgeStore for SeedStore {
    async fn list_knowledge(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<KnowledgeEntry>, StoreError> {
        let data = self.data.read();
        let mut entries: Vec<_> = data
            .knowledge
            .iter()
            .filter(|k| category.map_or(true, |c| k.category_id == c))
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.topic.cmp(&b.topic));
        Ok(entries)
    }

    async fn search(&self, term: &str) -> Result<Vec<KnowledgeEntry>, StoreError> {
        let data = self.data.read();
        let mut entries: Vec<_> = data
            .knowledge
            .iter()
            .filter(|k| k.matches_term(term))
            .cloned()
            .collect();
        entries.sort_by(KnowledgeEntry::by_confidence);
        Ok(entries)
    }
}

#[async_trait]
impl ContactStore for SeedStore {
    async fn list_contacts(
        &self,
        category: Option<ContactCategory>,
    ) -> Result<Vec<EmergencyContact>, StoreError> {
        let data = self.data.read();
        let mut contacts: Vec<_> = data
            .contacts
            .iter()
            .filter(|c| category.map_or(true, |wanted| c.category == wanted))
            .cloned()
            .collect();
        contacts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(contacts)
    }

    async fn search_contacts(
        &self,
        term: &str,
        country: Option<&str>,
    ) -> Result<Vec<EmergencyContact>, StoreError> {
        let data = self.data.read();
        let mut contacts: Vec<_> = data
            .contacts
            .iter()
            .filter(|c| c.matches_term(term))
            .filter(|c| country.map_or(true, |wanted| c.serves_country(wanted)))
            .cloned()
            .collect();
        contacts.sort_by(EmergencyContact::by_availability);
        Ok(contacts)
    }
}

#[async_trait]
impl HelperStore for SeedStore {
    async fn list_helpers(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<HelperRecord>, StoreError> {
        let data = self.data.read();
        Ok(data
            .helpers
            .iter()
            .filter(|h| category.map_or(true, |c| h.category_id == c))
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "seed"
    }
}
