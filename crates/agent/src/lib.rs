//! Intent resolution and response composition
//!
//! Features:
//! - Keyword-table intent classifier with fixed safety-first priority
//! - Response composer with store timeouts and graceful degradation
//! - Support assistant turns over caller-owned conversation history

pub mod assistant;
pub mod intent;
pub mod response;

pub use assistant::{AssistantTurn, SupportAssistant};
pub use intent::IntentClassifier;
pub use response::{guarded_fetch, lead_in, ResponseComposer, CRISIS_TEXT, GENERIC_TEXT, VOICE_TEXT};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(#[from] peer_support_config::ConfigError),
}
