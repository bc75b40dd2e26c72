//! Centralized defaults
//!
//! Keyword tables and limits live here so the classifier, the config
//! validation and the tests all agree on one set of values.

/// Self-harm phrases that always classify as crisis
pub const CRISIS_PHRASES: &[&str] = &["suicide", "kill myself", "end it all", "want to die"];

/// Terms that request a spoken reply
pub const VOICE_TERMS: &[&str] = &["voice", "speak"];

/// Terms that raise a category topic to elevated urgency
pub const URGENCY_TERMS: &[&str] = &["crisis", "emergency", "help"];

/// Category keyword tables, in priority order: (slug, triggers, topics)
pub const CATEGORY_KEYWORDS: &[(&str, &[&str], &[&str])] = &[
    (
        "mental-health",
        &["anxious", "anxiety", "panic", "depressed", "depression", "stress"],
        &["anxiety", "panic", "stress", "breathing"],
    ),
    (
        "career",
        &["career", "job", "interview", "work"],
        &["career", "job", "interview", "resume", "networking"],
    ),
    (
        "relationships",
        &["relationship", "communication", "dating", "partner"],
        &["relationship", "communication", "dating", "trust"],
    ),
    (
        "life-transitions",
        &["transition", "divorce", "moving", "retirement", "grief"],
        &["change", "transition", "adaptation", "resilience"],
    ),
    (
        "education",
        &["study", "exam", "school", "college", "homework"],
        &["study", "learning", "preparation", "focus"],
    ),
    (
        "community",
        &["lonely", "loneliness", "friends", "social", "community"],
        &["social connections", "friendship", "community", "belonging"],
    ),
];

/// Store and speech timeouts
pub mod timeouts {
    /// Per-call budget for knowledge/contact/helper fetches
    pub const STORE_MS: u64 = 2_000;

    /// Hosted speech request budget
    pub const SPEECH_MS: u64 = 10_000;

    /// HTTP request budget for the REST store client
    pub const REST_MS: u64 = 5_000;
}

/// Hosted speech provider defaults
pub mod speech {
    pub const BASE_URL: &str = "https://api.elevenlabs.io/v1";
    pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
    pub const MODEL_ID: &str = "eleven_monolingual_v1";
    pub const STABILITY: f32 = 0.5;
    pub const SIMILARITY_BOOST: f32 = 0.5;
    pub const STYLE: f32 = 0.0;
}

/// Conversation limits
pub const MAX_HISTORY_TURNS: usize = 50;
