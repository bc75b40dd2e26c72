//! Speech synthesis for the peer support engine
//!
//! Provides:
//! - `HostedSpeech` - ElevenLabs-compatible text-to-speech over HTTP
//! - `SilentSpeech` - no-op synthesizer used when nothing is configured
//! - `FallbackSpeech` - wraps a provider so failures degrade to silence
//!
//! Callers normally go through [`build_synthesizer`], which picks the right
//! combination from [`SpeechConfig`].

pub mod fallback;
pub mod hosted;

pub use fallback::{fallback_voices, FallbackSpeech, SilentSpeech};
pub use hosted::HostedSpeech;

use std::sync::Arc;

use peer_support_config::SpeechConfig;
use peer_support_core::SpeechSynthesizer;

/// Build the synthesizer described by `config`
///
/// - disabled: silent, reporting `Unavailable`
/// - enabled without an API key: silent, reporting `Fallback`
/// - enabled with a key: hosted provider behind a silent fallback
pub fn build_synthesizer(config: &SpeechConfig) -> Arc<dyn SpeechSynthesizer> {
    if !config.enabled {
        tracing::info!("Speech synthesis disabled");
        return Arc::new(SilentSpeech::unavailable());
    }

    match HostedSpeech::new(config) {
        Ok(hosted) => {
            tracing::info!(base_url = %config.base_url, "Hosted speech configured");
            Arc::new(FallbackSpeech::new(Arc::new(hosted)))
        },
        Err(e) => {
            tracing::warn!(error = %e, "Hosted speech unavailable, using silent fallback");
            Arc::new(SilentSpeech::fallback())
        },
    }
}
