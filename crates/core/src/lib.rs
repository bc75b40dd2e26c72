//! Core traits and types for the peer support engine
//!
//! This crate provides foundational types used across all other crates:
//! - Support categories (closed set, priority ordered)
//! - Knowledge entries, emergency contacts and helper records
//! - Intents, composed responses and recoverable degradations
//! - Helper search criteria
//! - Conversation history values
//! - Store and speech traits
//! - Error types

pub mod category;
pub mod contact;
pub mod conversation;
pub mod criteria;
pub mod error;
pub mod helper;
pub mod intent;
pub mod knowledge;
pub mod response;
pub mod traits;
pub mod voice_config;

pub use category::{Category, CategoryInfo, ContactCategory, UnknownCategory};
pub use contact::{EmergencyContact, GLOBAL_COUNTRY};
pub use conversation::{Conversation, Turn, TurnMetadata, TurnRole};
pub use criteria::{FilterCriteria, SortKey, UNSET_MAX_RATE, UNSET_MIN_RATING};
pub use error::{Error, Result, SpeechError, StoreError};
pub use helper::{AvailabilityStatus, HelperRecord};
pub use intent::{Intent, IntentKind, Urgency};
pub use knowledge::KnowledgeEntry;
pub use response::{ComposedResponse, Degradation, MAX_CONTACTS, MAX_KNOWLEDGE};
pub use voice_config::{SpeechAudio, VoiceInfo, VoiceOptions};

pub use traits::{
    ContactStore, HelperStore, KnowledgeStore, SpeechStatus, SpeechSynthesizer,
};
