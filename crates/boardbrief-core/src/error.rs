use std::time::Duration;

use thiserror::Error;

/// Application-wide error types for Boardbrief.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed (fetching a page).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Inference backend rejected or failed the call.
    #[error("LLM error (HTTP {status_code}): {message}")]
    LlmError {
        message: String,
        status_code: u16,
        retryable: bool,
    },

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Request timed out.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Missing or invalid configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Extracted text is too short to be worth summarizing.
    #[error("Insufficient text content extracted from HTML ({chars} chars, need {min})")]
    InsufficientContent { chars: usize, min: usize },

    /// The summarize endpoint answered with a non-success status.
    #[error("Endpoint error (HTTP {status}): {message}")]
    EndpointError { status: u16, message: String },

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkError(_) | AppError::Timeout(_) | AppError::RateLimitExceeded => true,
            AppError::LlmError { retryable, .. } => *retryable,
            AppError::HttpError(msg) => {
                msg.contains("timeout") || msg.contains("connect") || msg.contains("reset")
            }
            AppError::EndpointError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
