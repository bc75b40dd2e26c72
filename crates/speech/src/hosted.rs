//! ElevenLabs-compatible hosted text-to-speech

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use peer_support_config::constants::speech;
use peer_support_config::SpeechConfig;
use peer_support_core::{
    SpeechAudio, SpeechError, SpeechStatus, SpeechSynthesizer, VoiceInfo, VoiceOptions,
};

use crate::fallback::fallback_voices;

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

impl VoiceSettings {
    fn from_options(options: &VoiceOptions) -> Self {
        Self {
            stability: options.stability.unwrap_or(speech::STABILITY),
            similarity_boost: options.similarity_boost.unwrap_or(speech::SIMILARITY_BOOST),
            style: options.style.unwrap_or(speech::STYLE),
            use_speaker_boost: options.use_speaker_boost.unwrap_or(true),
        }
    }
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Deserialize)]
struct VoicesResponse {
    #[serde(default)]
    voices: Vec<VoiceInfo>,
}

/// Hosted speech provider
pub struct HostedSpeech {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    default_voice_id: String,
    model_id: String,
}

impl HostedSpeech {
    /// Create a provider; fails with `NotConfigured` when no API key is set
    pub fn new(config: &SpeechConfig) -> Result<Self, SpeechError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(SpeechError::NotConfigured)?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SpeechError::Provider(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            default_voice_id: config.default_voice_id.clone(),
            model_id: config.model_id.clone(),
        })
    }

    fn map_error(err: reqwest::Error) -> SpeechError {
        if err.is_timeout() {
            SpeechError::Timeout
        } else {
            SpeechError::Provider(err.to_string())
        }
    }

    async fn fetch_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        let response = self
            .client
            .get(format!("{}/voices", self.base_url))
            .header("xi-api-key", &self.api_key)
            .send()
            .await
            .map_err(Self::map_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Provider(format!("voices returned {}", status)));
        }

        let body: VoicesResponse = response.json().await.map_err(Self::map_error)?;
        Ok(body.voices)
    }
}

#[async_trait]
impl SpeechSynthesizer for HostedSpeech {
    async fn synthesize(
        &self,
        text: &str,
        options: &VoiceOptions,
    ) -> Result<Option<SpeechAudio>, SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let voice_id = options
            .voice_id
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(&self.default_voice_id);

        let request = SynthesisRequest {
            text,
            model_id: &self.model_id,
            voice_settings: VoiceSettings::from_options(options),
        };

        let response = self
            .client
            .post(format!("{}/text-to-speech/{}", self.base_url, voice_id))
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&request)
            .send()
            .await
            .map_err(Self::map_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Provider(format!(
                "text-to-speech returned {}",
                status
            )));
        }

        let bytes = response.bytes().await.map_err(Self::map_error)?;
        tracing::debug!(voice_id, bytes = bytes.len(), "Synthesized speech");
        Ok(Some(SpeechAudio::mpeg(bytes.to_vec())))
    }

    async fn voices(&self) -> Vec<VoiceInfo> {
        match self.fetch_voices().await {
            Ok(voices) if !voices.is_empty() => voices,
            Ok(_) => fallback_voices(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not list hosted voices");
                fallback_voices()
            },
        }
    }

    fn status(&self) -> SpeechStatus {
        SpeechStatus::Connected
    }

    fn name(&self) -> &str {
        "hosted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_not_configured() {
        let config = SpeechConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            HostedSpeech::new(&config),
            Err(SpeechError::NotConfigured)
        ));
    }

    #[test]
    fn test_voice_settings_defaults() {
        let settings = VoiceSettings::from_options(&VoiceOptions::default());
        assert_eq!(settings.stability, speech::STABILITY);
        assert_eq!(settings.similarity_boost, speech::SIMILARITY_BOOST);
        assert!(settings.use_speaker_boost);

        let custom = VoiceSettings::from_options(&VoiceOptions {
            stability: Some(0.9),
            use_speaker_boost: Some(false),
            ..Default::default()
        });
        assert_eq!(custom.stability, 0.9);
        assert!(!custom.use_speaker_boost);
    }

    #[tokio::test]
    async fn test_blank_text_skips_request() {
        let config = SpeechConfig {
            api_key: Some("key".to_string()),
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let speech = HostedSpeech::new(&config).unwrap();
        let audio = speech.synthesize("  ", &VoiceOptions::default()).await;
        assert!(matches!(audio, Ok(None)));
    }
}
