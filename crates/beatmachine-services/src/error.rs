//! Error types for beatmachine services

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Beat error: {0}")]
    Core(#[from] beatmachine_core::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error("Encoder error: {0}")]
    Encoder(String),
    #[error("Cache error: {0}")]
    Cache(String),
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
