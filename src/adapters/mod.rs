//! Adapter interfaces for external generative services.
//!
//! Adapters only move a request to the service and bring raw text back.
//! Parsing and validation happen in [`crate::core::generator`].

pub mod gemini;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::ImageAttachment;

// Re-export the Gemini adapter
pub use gemini::GeminiBackend;

/// A single schema-constrained generation call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Model selector understood by the backend
    pub model: String,

    /// Natural-language instruction
    pub prompt: String,

    /// Ordered image attachments (may be empty)
    pub images: Vec<ImageAttachment>,

    /// Declared output shape as a self-contained JSON Schema
    pub response_schema: Value,
}

/// A call the service answered with an error status.
///
/// Backends return this inside their `anyhow::Error` so the client can tell
/// a transient failure from a request the service will never accept.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct BackendError {
    /// HTTP status, when the service answered at all
    pub status: Option<u16>,
    pub message: String,
}

impl BackendError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Transport failures, auth, quota and server errors may clear up;
    /// any other 4xx means the request itself is wrong
    pub fn is_transient(&self) -> bool {
        match self.status {
            None | Some(401 | 403 | 429) => true,
            Some(status) => !(400..500).contains(&status),
        }
    }
}

/// Trait for generative service backends
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Run one request and return the raw response text.
    ///
    /// Any error means the call did not complete. Errors carrying a
    /// [`BackendError`] are classified by status; anything else is treated
    /// as transient.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_classification() {
        for status in [None, Some(401), Some(403), Some(429), Some(500), Some(503)] {
            assert!(BackendError::new(status, "x").is_transient(), "{:?}", status);
        }
        for status in [400, 404, 413, 422] {
            assert!(!BackendError::new(Some(status), "x").is_transient(), "{}", status);
        }
    }
}
