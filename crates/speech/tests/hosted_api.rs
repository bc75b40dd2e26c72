//! Hosted speech against a mock provider

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use peer_support_config::SpeechConfig;
use peer_support_core::{SpeechError, SpeechStatus, SpeechSynthesizer, VoiceOptions};
use peer_support_speech::{build_synthesizer, HostedSpeech};

fn config_for(server: &MockServer) -> SpeechConfig {
    SpeechConfig {
        enabled: true,
        api_key: Some("test-key".to_string()),
        base_url: server.uri(),
        default_voice_id: "voice-default".to_string(),
        timeout_ms: 2000,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_synthesize_returns_mpeg_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text-to-speech/voice-default"))
        .and(header("xi-api-key", "test-key"))
        .and(header("accept", "audio/mpeg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3, 4]))
        .mount(&server)
        .await;

    let speech = HostedSpeech::new(&config_for(&server)).unwrap();
    let audio = speech
        .synthesize("Hello there", &VoiceOptions::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(audio.data, vec![1, 2, 3, 4]);
    assert_eq!(audio.mime_type, "audio/mpeg");
}

#[tokio::test]
async fn test_synthesize_uses_requested_voice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text-to-speech/custom-voice"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![9u8]))
        .mount(&server)
        .await;

    let speech = HostedSpeech::new(&config_for(&server)).unwrap();
    let audio = speech
        .synthesize("Hi", &VoiceOptions::with_voice("custom-voice"))
        .await
        .unwrap();

    assert!(audio.is_some());
}

#[tokio::test]
async fn test_provider_error_surfaces_then_degrades() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let hosted = HostedSpeech::new(&config).unwrap();
    let err = hosted
        .synthesize("Hi", &VoiceOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SpeechError::Provider(_)));

    let synth = build_synthesizer(&config);
    assert_eq!(synth.status(), SpeechStatus::Connected);
    let audio = synth.synthesize("Hi", &VoiceOptions::default()).await;
    assert!(matches!(audio, Ok(None)));
}

#[tokio::test]
async fn test_voices_listed_from_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "voices": [
                {"voice_id": "abc", "name": "Rachel", "category": "premade"},
                {"voice_id": "def", "name": "Adam"}
            ]
        })))
        .mount(&server)
        .await;

    let speech = HostedSpeech::new(&config_for(&server)).unwrap();
    let voices = speech.voices().await;
    assert_eq!(voices.len(), 2);
    assert_eq!(voices[0].name, "Rachel");
    assert_eq!(voices[1].category, "");
}

#[tokio::test]
async fn test_voices_fall_back_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/voices"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let speech = HostedSpeech::new(&config_for(&server)).unwrap();
    let voices = speech.voices().await;
    assert_eq!(voices.len(), 2);
    assert_eq!(voices[0].voice_id, "web-speech-female");
}
