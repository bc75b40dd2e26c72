//! Configuration management for the peer support engine
//!
//! Supports loading configuration from:
//! - YAML files under `config/` (`default`, then the environment name)
//! - Environment variables (`PEER_SUPPORT__` prefix, `__` separator)
//! - An optional classifier keyword file (`matching.keywords_path`)

pub mod constants;
pub mod matching;
pub mod settings;

pub use matching::{CategoryKeywords, ClassifierConfig, MatchingConfig};
pub use settings::{
    load_settings, ObservabilityConfig, RestStoreConfig, RuntimeEnvironment, ServerConfig,
    Settings, SpeechConfig, StoreBackend, StoreConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
