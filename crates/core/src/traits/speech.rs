//! Speech synthesis capability

use async_trait::async_trait;
use serde::Serialize;

use crate::{SpeechAudio, SpeechError, VoiceInfo, VoiceOptions};

/// Human-readable capability state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechStatus {
    /// Hosted provider configured
    Connected,
    /// Only the silent fallback is available
    Fallback,
    /// No speech at all
    Unavailable,
}

impl SpeechStatus {
    pub fn message(&self) -> &'static str {
        match self {
            SpeechStatus::Connected => "Hosted speech API connected",
            SpeechStatus::Fallback => "Using fallback speech (silent)",
            SpeechStatus::Unavailable => "Speech synthesis not available",
        }
    }
}

/// Text-to-speech interface
///
/// Implementations:
/// - `HostedSpeech` - ElevenLabs-compatible HTTP API
/// - `SilentSpeech` - no-op fallback
///
/// Callers use [`SpeechSynthesizer::speak`], which never fails; `synthesize`
/// exposes the underlying error for implementations that chain fallbacks.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// Synthesize `text`; `Ok(None)` means the capability degraded silently
    async fn synthesize(
        &self,
        text: &str,
        options: &VoiceOptions,
    ) -> Result<Option<SpeechAudio>, SpeechError>;

    /// Voices this provider can use
    async fn voices(&self) -> Vec<VoiceInfo>;

    fn status(&self) -> SpeechStatus;

    /// Provider name for logging
    fn name(&self) -> &str;

    fn is_available(&self) -> bool {
        self.status() != SpeechStatus::Unavailable
    }

    /// Synthesize, swallowing any failure
    async fn speak(&self, text: &str, options: &VoiceOptions) -> Option<SpeechAudio> {
        match self.synthesize(text, options).await {
            Ok(audio) => audio,
            Err(e) => {
                tracing::warn!(provider = self.name(), error = %e, "Speech synthesis failed");
                None
            },
        }
    }
}
