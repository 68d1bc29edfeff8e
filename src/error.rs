//! Error types for transcript management

use thiserror::Error;

/// Result type alias using [`TranscriptError`]
pub type Result<T> = std::result::Result<T, TranscriptError>;

/// Transcript management errors
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// No tokenizer is available for the requested model.
    ///
    /// Fatal for the call: budget decisions made with a wrong tokenizer
    /// would silently mis-fire, so there is no fallback.
    #[error("No tokenizer available for model '{model}'")]
    UnsupportedModel { model: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Chat API error: {0}")]
    Api(String),
}

impl From<config::ConfigError> for TranscriptError {
    fn from(err: config::ConfigError) -> Self {
        TranscriptError::Configuration(err.to_string())
    }
}
