//! Error types shared across crates

use thiserror::Error;

/// Failure reported by a knowledge, contact or helper store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store request timed out after {0}ms")]
    Timeout(u64),

    #[error("Malformed store data: {0}")]
    Malformed(String),
}

/// Failure reported by a speech capability
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Speech capability not configured")]
    NotConfigured,

    #[error("Speech provider error: {0}")]
    Provider(String),

    #[error("Speech request timed out")]
    Timeout,
}

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
