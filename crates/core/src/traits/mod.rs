//! Core traits
//!
//! ```text
//! Data access:
//!   - KnowledgeStore: knowledge base entries
//!   - ContactStore: emergency contact directory
//!   - HelperStore: helper listings
//!
//! Speech:
//!   - SpeechSynthesizer: Text → Audio, with silent degrade
//! ```

mod speech;
mod store;

pub use speech::{SpeechStatus, SpeechSynthesizer};
pub use store::{ContactStore, HelperStore, KnowledgeStore};
