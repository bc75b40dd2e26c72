//! Persistence error types

use peer_support_core::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to read seed data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {file}: {message}")]
    Parse { file: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response status {status} from {table}")]
    Status { table: String, status: u16 },

    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Http(e) if e.is_timeout() => StoreError::Unavailable(format!("timeout: {}", e)),
            PersistenceError::Parse { .. } => StoreError::Malformed(err.to_string()),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}
