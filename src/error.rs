//! Error types shared by the transport, configuration and UI layers.

use thiserror::Error;

/// Message shown to the user for every failed upload, whatever the cause.
pub const UPLOAD_FAILED_MESSAGE: &str = "Error occurred during upload. Please try again.";

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("File processing error: {0}")]
    FileProcessing(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
