//! Data-access traits for the external managed database
//!
//! Stores return unranked, unfiltered snapshots. Filtering and ordering is
//! done by the caller, which also normalizes any `Err` to an empty result.

use async_trait::async_trait;

use crate::{Category, ContactCategory, EmergencyContact, HelperRecord, KnowledgeEntry, StoreError};

/// Read-only knowledge base
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// All entries, optionally restricted to one category
    async fn list_knowledge(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<KnowledgeEntry>, StoreError>;

    /// Free-text search over topic, content and keywords
    async fn search(&self, term: &str) -> Result<Vec<KnowledgeEntry>, StoreError>;
}

/// Read-only emergency contact directory
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// All contacts, optionally restricted to one category
    async fn list_contacts(
        &self,
        category: Option<ContactCategory>,
    ) -> Result<Vec<EmergencyContact>, StoreError>;

    /// Contacts matching `term`, limited to `country` or global resources when given
    async fn search_contacts(
        &self,
        term: &str,
        country: Option<&str>,
    ) -> Result<Vec<EmergencyContact>, StoreError>;
}

/// Helper listings
#[async_trait]
pub trait HelperStore: Send + Sync {
    async fn list_helpers(&self, category: Option<Category>)
        -> Result<Vec<HelperRecord>, StoreError>;

    /// Store name for logging
    fn name(&self) -> &str;
}
