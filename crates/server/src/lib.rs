//! Peer Support Server
//!
//! HTTP surface over the classifier, composer and helper ranking engine.

pub mod http;
pub mod metrics;
pub mod state;

pub use crate::http::create_router;
pub use crate::metrics::{init_metrics, record_degradation, record_request};
pub use crate::state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(#[from] peer_support_config::ConfigError),

    #[error("Store initialization failed: {0}")]
    Persistence(#[from] peer_support_persistence::PersistenceError),

    #[error("Agent error: {0}")]
    Agent(#[from] peer_support_agent::AgentError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Config(_) | ServerError::Persistence(_) | ServerError::Agent(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }
}

impl From<peer_support_search::SearchError> for ServerError {
    fn from(err: peer_support_search::SearchError) -> Self {
        ServerError::InvalidRequest(err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
