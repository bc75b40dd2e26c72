//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{speech, timeouts};
use crate::{ConfigError, MatchingConfig};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Knowledge, contact and helper storage
    #[serde(default)]
    pub stores: StoreConfig,

    /// Hosted speech provider
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Classifier tables and composition budgets
    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_stores()?;
        self.validate_speech()?;
        self.validate_matching()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        if self.environment.is_production() && server.cors_enabled && server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 This may block legitimate requests."
            );
        }

        Ok(())
    }

    fn validate_stores(&self) -> Result<(), ConfigError> {
        if self.stores.backend != StoreBackend::Rest {
            return Ok(());
        }

        let rest = &self.stores.rest;
        if rest.url.trim().is_empty() {
            return Err(ConfigError::MissingField("stores.rest.url".to_string()));
        }
        if !rest.url.starts_with("http://") && !rest.url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "stores.rest.url".to_string(),
                message: format!("Expected an http(s) URL, got {}", rest.url),
            });
        }
        if rest.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "stores.rest.timeout_ms".to_string(),
                message: "Timeout must be positive".to_string(),
            });
        }
        if rest.api_key.is_none() {
            if self.environment.is_strict() {
                return Err(ConfigError::MissingField("stores.rest.api_key".to_string()));
            }
            tracing::warn!("REST store configured without an API key");
        }

        Ok(())
    }

    fn validate_speech(&self) -> Result<(), ConfigError> {
        let speech = &self.speech;
        if !speech.enabled {
            return Ok(());
        }

        if speech.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "speech.timeout_ms".to_string(),
                message: "Timeout must be positive".to_string(),
            });
        }
        if speech.default_voice_id.trim().is_empty() {
            return Err(ConfigError::MissingField("speech.default_voice_id".to_string()));
        }
        if speech.api_key.is_none() {
            // Missing key only downgrades speech to the fallback voices
            tracing::info!("Speech enabled without an API key; fallback voices will be used");
        }

        Ok(())
    }

    fn validate_matching(&self) -> Result<(), ConfigError> {
        let matching = &self.matching;

        if matching.store_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "matching.store_timeout_ms".to_string(),
                message: "Store timeout must be positive".to_string(),
            });
        }
        if matching.store_timeout_ms > 30_000 {
            return Err(ConfigError::InvalidValue {
                field: "matching.store_timeout_ms".to_string(),
                message: format!(
                    "Store timeout too high (maximum 30000ms), got {}",
                    matching.store_timeout_ms
                ),
            });
        }
        if matching.max_history_turns == 0 {
            return Err(ConfigError::InvalidValue {
                field: "matching.max_history_turns".to_string(),
                message: "Must keep at least one turn".to_string(),
            });
        }

        matching.classifier.validate()
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Where knowledge, contacts and helpers come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-memory records, optionally overlaid from `seed_dir`
    #[default]
    Seed,
    /// Hosted REST tables
    Rest,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Directory of YAML/JSON seed files
    #[serde(default)]
    pub seed_dir: Option<String>,

    #[serde(default)]
    pub rest: RestStoreConfig,
}

/// REST table endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestStoreConfig {
    /// Base URL of the REST endpoint, e.g. `https://project.example.co/rest/v1`
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_rest_api_key")]
    pub api_key: Option<String>,

    #[serde(default = "default_rest_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_rest_api_key() -> Option<String> {
    std::env::var("PEER_SUPPORT_REST_API_KEY").ok()
}

fn default_rest_timeout_ms() -> u64 {
    timeouts::REST_MS
}

impl Default for RestStoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: default_rest_api_key(),
            timeout_ms: default_rest_timeout_ms(),
        }
    }
}

/// Hosted speech configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Allow hosted synthesis at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_speech_api_key")]
    pub api_key: Option<String>,

    #[serde(default = "default_speech_base_url")]
    pub base_url: String,

    #[serde(default = "default_voice_id")]
    pub default_voice_id: String,

    #[serde(default = "default_model_id")]
    pub model_id: String,

    #[serde(default = "default_speech_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_speech_api_key() -> Option<String> {
    std::env::var("ELEVENLABS_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
}
fn default_speech_base_url() -> String {
    speech::BASE_URL.to_string()
}
fn default_voice_id() -> String {
    speech::DEFAULT_VOICE_ID.to_string()
}
fn default_model_id() -> String {
    speech::MODEL_ID.to_string()
}
fn default_speech_timeout_ms() -> u64 {
    timeouts::SPEECH_MS
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: default_speech_api_key(),
            base_url: default_speech_base_url(),
            default_voice_id: default_voice_id(),
            model_id: default_model_id(),
            timeout_ms: default_speech_timeout_ms(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable the Prometheus endpoint
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from `config/default`, `config/{env}` and `PEER_SUPPORT__*` variables
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("PEER_SUPPORT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let mut settings: Settings = config.try_deserialize()?;

    settings.matching.classifier = settings.matching.resolve_classifier()?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.stores.backend, StoreBackend::Seed);
        assert_eq!(settings.matching.store_timeout_ms, 2000);
        assert_eq!(settings.speech.default_voice_id, "21m00Tcm4TlvDq8ikWAM");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_server_validation() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());

        settings.server.port = 9000;
        settings.server.timeout_seconds = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_matching_validation() {
        let mut settings = Settings::default();
        settings.matching.store_timeout_ms = 0;
        assert!(settings.validate().is_err());

        settings.matching.store_timeout_ms = 60_000;
        assert!(settings.validate().is_err());

        settings.matching.store_timeout_ms = 1500;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rest_store_requires_url() {
        let mut settings = Settings::default();
        settings.stores.backend = StoreBackend::Rest;
        settings.stores.rest.url = String::new();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::MissingField(_))
        ));

        settings.stores.rest.url = "ftp://example.com".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rest_store_api_key_strict_in_production() {
        let mut settings = Settings::default();
        settings.environment = RuntimeEnvironment::Production;
        settings.stores.backend = StoreBackend::Rest;
        settings.stores.rest.url = "https://db.example.com/rest/v1".to_string();
        settings.stores.rest.api_key = None;
        assert!(settings.validate().is_err());

        settings.stores.rest.api_key = Some("anon".to_string());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_runtime_environment() {
        assert!(RuntimeEnvironment::Production.is_production());
        assert!(RuntimeEnvironment::Staging.is_strict());
        assert!(!RuntimeEnvironment::Development.is_strict());
    }

    #[test]
    fn test_deserialize_partial_yaml() {
        let yaml = r#"
environment: staging
server:
  port: 9100
matching:
  store_timeout_ms: 500
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.environment, RuntimeEnvironment::Staging);
        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.matching.store_timeout_ms, 500);
        assert_eq!(settings.matching.classifier.categories.len(), 6);
    }
}
