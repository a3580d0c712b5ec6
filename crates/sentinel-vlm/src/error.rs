//! Error types for vision-language queries.

use thiserror::Error;

/// Result type for vision-language queries.
pub type InferenceResult<T> = Result<T, InferenceError>;

/// Errors raised by a vision-language query.
///
/// Callers treat every variant as scoped to the single question that
/// produced it.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Request to vision service failed: {0}")]
    Request(String),

    #[error("Vision service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode vision service response: {0}")]
    Decode(String),

    #[error("Vision service returned an empty answer")]
    EmptyAnswer,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl InferenceError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the service itself is unreachable or overloaded, rather than
    /// rejecting this particular question.
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_classification() {
        assert!(InferenceError::request("connection refused").is_unavailable());
        assert!(InferenceError::Status { status: 429, body: String::new() }.is_unavailable());
        assert!(!InferenceError::Status { status: 400, body: String::new() }.is_unavailable());
        assert!(!InferenceError::EmptyAnswer.is_unavailable());
    }

    #[test]
    fn test_display() {
        let err = InferenceError::Status { status: 502, body: "bad gateway".to_string() };
        assert_eq!(err.to_string(), "Vision service returned 502: bad gateway");
    }
}
