//! Error types shared by the generation pipeline and the library store.
//!
//! Every error is scoped to the operation that raised it. Nothing here is
//! fatal to the process and nothing is retried internally.

use thiserror::Error;

/// Errors produced while composing, requesting or validating generated content
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The caller supplied unusable input (empty topic, bad image count, ...)
    #[error("Invalid generation request: {0}")]
    InvalidRequest(String),

    /// The generative service could not be reached or refused the call
    #[error("Generative service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The service understood the call and rejected it as invalid (HTTP 4xx
    /// other than auth and quota); sending it again fails the same way
    #[error("Generative service rejected the request: {0}")]
    Rejected(String),

    /// The service answered but the body is not a JSON document
    #[error("Generative service returned malformed JSON: {0}")]
    MalformedResponse(String),

    /// The JSON is missing required fields or has fields of the wrong shape
    #[error("Generated content violates the response schema: {}", fields.join(", "))]
    SchemaViolation { fields: Vec<String> },
}

impl GenerationError {
    /// Build a schema violation for a single field path
    pub fn violation(field: impl Into<String>) -> Self {
        Self::SchemaViolation {
            fields: vec![field.into()],
        }
    }

    /// Whether the caller may reasonably try the same request again
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ServiceUnavailable(_))
    }
}

/// Errors from the durable key-value storage
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable for key '{key}': {source}")]
    Unavailable {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(key: &str, source: std::io::Error) -> Self {
        Self::Unavailable {
            key: key.to_string(),
            source,
        }
    }
}
