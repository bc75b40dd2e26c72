//! Storage layer for the peer support engine
//!
//! Provides implementations of the core store traits:
//! - [`SeedStore`]: in-memory records from bundled and YAML/JSON seed files
//! - [`RestStore`]: managed-database tables over a PostgREST-style API

pub mod error;
pub mod rest;
pub mod seed;

pub use error::PersistenceError;
pub use rest::RestStore;
pub use seed::{SeedFile, SeedStore};

use std::path::Path;
use std::sync::Arc;

use peer_support_config::{StoreBackend, StoreConfig};
use peer_support_core::{ContactStore, HelperStore, KnowledgeStore};

/// Initialize the configured store backend
pub fn init(config: &StoreConfig) -> Result<StoreLayer, PersistenceError> {
    match config.backend {
        StoreBackend::Seed => {
            let store = SeedStore::builtin()?;
            if let Some(dir) = &config.seed_dir {
                store.load_directory(Path::new(dir))?;
            }
            let (knowledge, contacts, helpers) = store.counts();
            tracing::info!(knowledge, contacts, helpers, "Seed store ready");
            Ok(StoreLayer::shared(Arc::new(store)))
        },
        StoreBackend::Rest => {
            let store = RestStore::new(&config.rest)?;
            Ok(StoreLayer::shared(Arc::new(store)))
        },
    }
}

/// Store handles used by the assistant and the ranking endpoints
#[derive(Clone)]
pub struct StoreLayer {
    pub knowledge: Arc<dyn KnowledgeStore>,
    pub contacts: Arc<dyn ContactStore>,
    pub helpers: Arc<dyn HelperStore>,
}

impl StoreLayer {
    /// One backend serving all three record kinds
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: KnowledgeStore + ContactStore + HelperStore + 'static,
    {
        Self {
            knowledge: store.clone(),
            contacts: store.clone(),
            helpers: store,
        }
    }
}
