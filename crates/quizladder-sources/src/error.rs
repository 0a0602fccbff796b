//! Source error types.

use thiserror::Error;

/// Errors that can occur when fetching questions from a source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The remote service could not be reached.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The API answered but had no questions for the request.
    #[error("no questions available (response code {0})")]
    NoResults(u8),

    /// The payload could not be turned into questions.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl SourceError {
    /// Returns `true` if retrying the same request cannot help.
    pub fn is_permanent(&self) -> bool {
        match self {
            SourceError::NoResults(_) | SourceError::InvalidPayload(_) => true,
            // Client errors other than rate limiting will not change on retry.
            SourceError::ApiError { status, .. } => (400..500).contains(status) && *status != 429,
            SourceError::NetworkError(_) | SourceError::Timeout(_) => false,
        }
    }
}
