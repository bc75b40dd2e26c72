//! Voice options and synthesized audio

use serde::{Deserialize, Serialize};

/// Per-request voice settings; unset fields take provider defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_boost: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_speaker_boost: Option<bool>,
}

impl VoiceOptions {
    pub fn with_voice(voice_id: impl Into<String>) -> Self {
        Self {
            voice_id: Some(voice_id.into()),
            ..Default::default()
        }
    }
}

/// Voice offered by a speech provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub voice_id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Encoded audio returned by a synthesizer
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechAudio {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl SpeechAudio {
    pub fn mpeg(data: Vec<u8>) -> Self {
        Self {
            data,
            mime_type: "audio/mpeg".to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
