//! HTTP Endpoints
//!
//! REST API for the support assistant, helper search and speech.

use std::str::FromStr;
use std::time::Duration;

use axum::{
    extract::{Json, Query, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use peer_support_agent::AssistantTurn;
use peer_support_core::{
    Category, ContactCategory, Conversation, Degradation, EmergencyContact, FilterCriteria,
    HelperRecord, KnowledgeEntry, VoiceInfo, VoiceOptions,
};
use peer_support_search::{
    apply_quick_filters, category_summaries, rank_with_diagnostics, CategorySummary, QuickFilter,
};

use crate::metrics::{metrics_handler, record_degradation, record_request};
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.settings.server.cors_origins,
        state.settings.server.cors_enabled,
    );
    let timeout = Duration::from_secs(state.settings.server.timeout_seconds);

    Router::new()
        // Assistant
        .route("/api/chat", post(chat))
        .route("/api/greeting", get(greeting))
        // Helpers
        .route("/api/helpers/search", post(search_helpers))
        .route("/api/categories", get(list_categories))
        // Resources
        .route("/api/emergency-contacts", get(emergency_contacts))
        .route("/api/knowledge", get(knowledge))
        // Speech
        .route("/api/speech", post(synthesize_speech))
        .route("/api/speech/status", get(speech_status))
        .route("/api/speech/voices", get(speech_voices))
        // Operations
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout))
                .layer(cors_layer),
        )
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - disabled: permissive, for local development
/// - no valid origins: localhost:3000 only
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS checks disabled, allowing all origins");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin = %origin, "Invalid CORS origin");
                None
            })
        })
        .collect();

    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if parsed_origins.is_empty() {
        tracing::info!("No CORS origins configured, defaulting to localhost:3000");
        return base.allow_origin(HeaderValue::from_static("http://localhost:3000"));
    }

    tracing::info!(count = parsed_origins.len(), "CORS origins configured");
    base.allow_origin(parsed_origins)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse an optional category, treating blank and `all` as unset
fn parse_category(value: Option<&str>) -> Result<Option<Category>, ServerError> {
    match non_blank(value) {
        None => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => Category::from_name(v)
            .map(Some)
            .ok_or_else(|| ServerError::InvalidRequest(format!("unknown category '{}'", v))),
    }
}

/// Parse a contact category; a support category maps to its default contact category
fn parse_contact_category(value: Option<&str>) -> Result<Option<ContactCategory>, ServerError> {
    match non_blank(value) {
        None => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => ContactCategory::from_str(v)
            .ok()
            .or_else(|| Category::from_name(v).map(|c| c.emergency_category()))
            .map(Some)
            .ok_or_else(|| ServerError::InvalidRequest(format!("unknown category '{}'", v))),
    }
}

/// Chat request
#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    /// Prior turns, owned by the client
    #[serde(default)]
    history: Conversation,
}

/// POST /api/chat
async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Json<AssistantTurn> {
    record_request("chat");
    let turn = state.assistant.respond(request.history, &request.message).await;
    tracing::debug!(
        intent = turn.intent.kind.as_str(),
        speak = turn.speak,
        turns = turn.history.turn_count(),
        "Chat turn"
    );
    Json(turn)
}

#[derive(Debug, Deserialize)]
struct GreetingQuery {
    helper_id: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Serialize)]
struct GreetingResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    helper: Option<HelperRecord>,
}

/// GET /api/greeting
async fn greeting(
    State(state): State<AppState>,
    Query(query): Query<GreetingQuery>,
) -> Result<Json<GreetingResponse>, ServerError> {
    record_request("greeting");
    let category = parse_category(query.category.as_deref())?;

    let helper = match non_blank(query.helper_id.as_deref()) {
        None => None,
        Some(id) => {
            let (helpers, degradation) = state
                .fetch("helpers", state.stores.helpers.list_helpers(None))
                .await;
            let found = helpers.into_iter().find(|h| h.id == id);
            if found.is_none() && degradation.is_none() {
                return Err(ServerError::NotFound(format!("helper '{}'", id)));
            }
            found
        },
    };

    Ok(Json(GreetingResponse {
        message: state.assistant.greeting(helper.as_ref(), category),
        helper,
    }))
}

#[derive(Debug, Default, Deserialize)]
struct SearchRequest {
    #[serde(default)]
    criteria: FilterCriteria,
    #[serde(default)]
    quick_filters: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    helpers: Vec<HelperRecord>,
    total: usize,
    active_filters: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    degradations: Vec<Degradation>,
}

/// POST /api/helpers/search
async fn search_helpers(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ServerError> {
    record_request("helpers_search");

    let quick = request
        .quick_filters
        .iter()
        .map(|name| QuickFilter::from_str(name))
        .collect::<Result<Vec<_>, _>>()?;
    let criteria = apply_quick_filters(request.criteria, &quick);

    let (helpers, degradation) = state
        .fetch("helpers", state.stores.helpers.list_helpers(None))
        .await;

    let outcome = rank_with_diagnostics(&helpers, &criteria);
    let mut degradations: Vec<Degradation> = degradation.into_iter().collect();
    for d in &outcome.degradations {
        record_degradation(d);
    }
    degradations.extend(outcome.degradations);

    Ok(Json(SearchResponse {
        total: outcome.helpers.len(),
        helpers: outcome.helpers,
        active_filters: criteria.active_filter_count(),
        degradations,
    }))
}

#[derive(Debug, Serialize)]
struct CategoriesResponse {
    categories: Vec<CategorySummary>,
}

/// GET /api/categories
async fn list_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    record_request("categories");
    let (helpers, _) = state
        .fetch("helpers", state.stores.helpers.list_helpers(None))
        .await;
    Json(CategoriesResponse {
        categories: category_summaries(&helpers),
    })
}

#[derive(Debug, Deserialize)]
struct ContactQuery {
    category: Option<String>,
    country: Option<String>,
    q: Option<String>,
}

#[derive(Debug, Serialize)]
struct ContactsResponse {
    contacts: Vec<EmergencyContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    degradation: Option<Degradation>,
}

/// GET /api/emergency-contacts
async fn emergency_contacts(
    State(state): State<AppState>,
    Query(query): Query<ContactQuery>,
) -> Result<Json<ContactsResponse>, ServerError> {
    record_request("emergency_contacts");

    let category = parse_contact_category(query.category.as_deref())?;
    let term = non_blank(query.q.as_deref());
    let country = non_blank(query.country.as_deref());

    let (mut contacts, degradation) = if term.is_some() || country.is_some() {
        state
            .fetch(
                "contacts",
                state
                    .stores
                    .contacts
                    .search_contacts(term.unwrap_or_default(), country),
            )
            .await
    } else {
        state
            .fetch("contacts", state.stores.contacts.list_contacts(category))
            .await
    };

    if let Some(category) = category {
        contacts.retain(|c| c.category == category);
    }
    contacts.sort_by(EmergencyContact::by_availability);

    Ok(Json(ContactsResponse {
        contacts,
        degradation,
    }))
}

#[derive(Debug, Deserialize)]
struct KnowledgeQuery {
    category: Option<String>,
    q: Option<String>,
}

#[derive(Debug, Serialize)]
struct KnowledgeResponse {
    entries: Vec<KnowledgeEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    degradation: Option<Degradation>,
}

/// GET /api/knowledge
async fn knowledge(
    State(state): State<AppState>,
    Query(query): Query<KnowledgeQuery>,
) -> Result<Json<KnowledgeResponse>, ServerError> {
    record_request("knowledge");
    let category = parse_category(query.category.as_deref())?;

    let (mut entries, degradation) = match non_blank(query.q.as_deref()) {
        Some(term) => {
            state
                .fetch("knowledge", state.stores.knowledge.search(term))
                .await
        },
        None => {
            state
                .fetch("knowledge", state.stores.knowledge.list_knowledge(category))
                .await
        },
    };

    if let Some(category) = category {
        entries.retain(|e| e.category_id == category);
    }
    entries.sort_by(KnowledgeEntry::by_confidence);

    Ok(Json(KnowledgeResponse {
        entries,
        degradation,
    }))
}

#[derive(Debug, Deserialize)]
struct SpeechRequest {
    text: String,
    #[serde(flatten)]
    options: VoiceOptions,
}

#[derive(Debug, Serialize)]
struct SpeechResponse {
    /// Base64 audio; `None` when speech degraded to silence
    audio: Option<String>,
    mime_type: Option<String>,
    provider: String,
}

/// POST /api/speech
async fn synthesize_speech(
    State(state): State<AppState>,
    Json(request): Json<SpeechRequest>,
) -> Result<Json<SpeechResponse>, ServerError> {
    record_request("speech");
    let text = request.text.trim();
    if text.is_empty() {
        return Err(ServerError::InvalidRequest("text is empty".to_string()));
    }

    let provider = state.speech.name().to_string();
    match state.speech.speak(text, &request.options).await {
        Some(audio) if !audio.is_empty() => Ok(Json(SpeechResponse {
            audio: Some(BASE64.encode(&audio.data)),
            mime_type: Some(audio.mime_type),
            provider,
        })),
        _ => {
            record_degradation(&Degradation::SpeechUnavailable(provider.clone()));
            Ok(Json(SpeechResponse {
                audio: None,
                mime_type: None,
                provider,
            }))
        },
    }
}

/// GET /api/speech/status
async fn speech_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    record_request("speech_status");
    let status = state.speech.status();
    Json(serde_json::json!({
        "status": status,
        "message": status.message(),
        "available": state.speech.is_available(),
        "provider": state.speech.name(),
    }))
}

#[derive(Debug, Serialize)]
struct VoicesResponse {
    voices: Vec<VoiceInfo>,
}

/// GET /api/speech/voices
async fn speech_voices(State(state): State<AppState>) -> Json<VoicesResponse> {
    record_request("speech_voices");
    Json(VoicesResponse {
        voices: state.speech.voices().await,
    })
}

/// Health check over the helper store and speech capability
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let (_, degradation) = state
        .fetch("helpers", state.stores.helpers.list_helpers(None))
        .await;
    let stores_ok = degradation.is_none();
    let speech = state.speech.status();

    let status_code = if stores_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if stores_ok { "healthy" } else { "degraded" },
            "version": env!("CARGO_PKG_VERSION"),
            "checks": {
                "stores": {
                    "status": if stores_ok { "ok" } else { "unavailable" },
                    "backend": state.stores.helpers.name(),
                },
                "speech": {
                    "status": speech,
                    "message": speech.message(),
                },
            }
        })),
    )
}
