//! Error types for completion providers

use thiserror::Error;

/// Errors raised while talking to a completion provider.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing API key for provider '{0}'")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    pub fn provider_error(message: impl Into<String>) -> Self {
        Self::ProviderError(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
