//! Silent fallback synthesis
//!
//! When the hosted provider is missing or failing, speech degrades to
//! "no audio" and the client uses its own built-in voices instead.

use async_trait::async_trait;
use std::sync::Arc;

use peer_support_core::{
    SpeechAudio, SpeechError, SpeechStatus, SpeechSynthesizer, VoiceInfo, VoiceOptions,
};

/// Voices every client can render locally
pub fn fallback_voices() -> Vec<VoiceInfo> {
    vec![
        VoiceInfo {
            voice_id: "web-speech-female".to_string(),
            name: "System Female Voice".to_string(),
            category: "generated".to_string(),
            description: Some("Browser built-in female voice".to_string()),
        },
        VoiceInfo {
            voice_id: "web-speech-male".to_string(),
            name: "System Male Voice".to_string(),
            category: "generated".to_string(),
            description: Some("Browser built-in male voice".to_string()),
        },
    ]
}

/// Synthesizer that never produces audio
#[derive(Debug, Clone, Copy)]
pub struct SilentSpeech {
    status: SpeechStatus,
}

impl SilentSpeech {
    /// Speech enabled but no hosted provider
    pub fn fallback() -> Self {
        Self {
            status: SpeechStatus::Fallback,
        }
    }

    /// Speech switched off
    pub fn unavailable() -> Self {
        Self {
            status: SpeechStatus::Unavailable,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for SilentSpeech {
    async fn synthesize(
        &self,
        _text: &str,
        _options: &VoiceOptions,
    ) -> Result<Option<SpeechAudio>, SpeechError> {
        Ok(None)
    }

    async fn voices(&self) -> Vec<VoiceInfo> {
        fallback_voices()
    }

    fn status(&self) -> SpeechStatus {
        self.status
    }

    fn name(&self) -> &str {
        "silent"
    }
}

/// Wraps a provider so any synthesis error becomes `Ok(None)`
pub struct FallbackSpeech {
    primary: Arc<dyn SpeechSynthesizer>,
}

impl FallbackSpeech {
    pub fn new(primary: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { primary }
    }
}

#[async_trait]
impl SpeechSynthesizer for FallbackSpeech {
    async fn synthesize(
        &self,
        text: &str,
        options: &VoiceOptions,
    ) -> Result<Option<SpeechAudio>, SpeechError> {
        match self.primary.synthesize(text, options).await {
            Ok(audio) => Ok(audio),
            Err(e) => {
                tracing::warn!(
                    provider = self.primary.name(),
                    error = %e,
                    "Speech provider failed, falling back to silence"
                );
                Ok(None)
            },
        }
    }

    async fn voices(&self) -> Vec<VoiceInfo> {
        self.primary.voices().await
    }

    fn status(&self) -> SpeechStatus {
        self.primary.status()
    }

    fn name(&self) -> &str {
        self.primary.name()
    }
}
