//! Application State
//!
//! Shared state across all handlers.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;

use peer_support_agent::{guarded_fetch, SupportAssistant};
use peer_support_config::Settings;
use peer_support_core::{Degradation, SpeechSynthesizer, StoreError};
use peer_support_persistence::StoreLayer;

use crate::metrics::record_degradation;
use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub stores: StoreLayer,
    pub assistant: Arc<SupportAssistant>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    /// Prometheus handle; `None` when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state over already-initialized stores and speech
    pub fn new(
        settings: Settings,
        stores: StoreLayer,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Result<Self, ServerError> {
        let assistant = SupportAssistant::from_config(
            &settings.matching,
            stores.knowledge.clone(),
            stores.contacts.clone(),
        )?;

        Ok(Self {
            settings: Arc::new(settings),
            stores,
            assistant: Arc::new(assistant),
            speech,
            metrics: None,
        })
    }

    /// Initialize stores and speech from settings
    pub fn from_settings(settings: Settings) -> Result<Self, ServerError> {
        let stores = peer_support_persistence::init(&settings.stores)?;
        let speech = peer_support_speech::build_synthesizer(&settings.speech);
        tracing::info!(
            store = stores.helpers.name(),
            speech = speech.name(),
            speech_status = ?speech.status(),
            "Initialized application state"
        );
        Self::new(settings, stores, speech)
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.settings.matching.store_timeout_ms)
    }

    /// Run a store call under the configured timeout
    ///
    /// Failures and timeouts become an empty collection plus a degradation.
    pub async fn fetch<T, F>(&self, source: &str, call: F) -> (Vec<T>, Option<Degradation>)
    where
        F: Future<Output = Result<Vec<T>, StoreError>>,
    {
        match guarded_fetch(self.store_timeout(), source, call).await {
            Ok(records) => (records, None),
            Err(degradation) => {
                record_degradation(&degradation);
                (Vec::new(), Some(degradation))
            },
        }
    }
}
