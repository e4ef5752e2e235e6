//! Generation error types

use thiserror::Error;

/// Caller-visible failures of the generation flows.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Caller-supplied parameters failed basic checks. Not retryable as-is.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The completion call itself failed (network, auth, quota, timeout).
    #[error("Completion service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The completion call succeeded but carried no text.
    #[error("No response from AI model")]
    UpstreamEmpty,

    /// No JSON value could be recovered from the model output.
    #[error("Failed to parse AI response as JSON")]
    UnparseableResponse { raw_text: String },

    /// A JSON value was recovered but lacks the required fields.
    #[error("AI response has an invalid shape: {reason}")]
    InvalidResponseShape { reason: String, raw_text: String },
}

impl GenerationError {
    /// Whether resubmitting the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, GenerationError::InvalidRequest(_))
    }

    /// Raw model output attached for diagnostics, if any.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            GenerationError::UnparseableResponse { raw_text }
            | GenerationError::InvalidResponseShape { raw_text, .. } => Some(raw_text),
            _ => None,
        }
    }

    /// Pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            GenerationError::InvalidRequest(_) => "request",
            GenerationError::UpstreamUnavailable(_) | GenerationError::UpstreamEmpty => {
                "completion"
            }
            GenerationError::UnparseableResponse { .. } => "parse",
            GenerationError::InvalidResponseShape { .. } => "validate",
        }
    }
}

impl From<prep_llms::Error> for GenerationError {
    fn from(err: prep_llms::Error) -> Self {
        GenerationError::UpstreamUnavailable(err.to_string())
    }
}

/// Why a recovered value could not be turned into an [`Explanation`](crate::Explanation).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("expected a JSON object")]
    NotAnObject,

    #[error("missing or non-string field '{0}'")]
    MissingField(&'static str),
}

pub type Result<T> = std::result::Result<T, GenerationError>;
