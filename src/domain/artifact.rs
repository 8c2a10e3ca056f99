//! Identity and lifecycle fields shared by every generated artifact.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque artifact identifier, assigned once when the artifact is generated
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArtifactId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ArtifactId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Editorial status of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentStatus {
    #[serde(rename = "Rascunho")]
    Draft,

    #[serde(rename = "Pronto")]
    Ready,

    #[serde(rename = "Publicado")]
    Published,
}

impl Default for ContentStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentStatus::Draft => write!(f, "Rascunho"),
            ContentStatus::Ready => write!(f, "Pronto"),
            ContentStatus::Published => write!(f, "Publicado"),
        }
    }
}
