//! Library items: the tagged union stored in the content library.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::artifact::{ArtifactId, ContentStatus};
use super::post::PostArtifact;
use super::script::ScriptArtifact;

/// Discriminant of a [`LibraryItem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Script,
    Post,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Script => write!(f, "script"),
            ItemKind::Post => write!(f, "post"),
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "script" | "roteiro" => Ok(ItemKind::Script),
            "post" => Ok(ItemKind::Post),
            _ => anyhow::bail!("Unknown item kind: {}", s),
        }
    }
}

/// A stored artifact.
///
/// Serialized as the artifact's own fields plus a `kind` tag, e.g.
/// `{"kind": "script", "id": "...", "title": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LibraryItem {
    Script(ScriptArtifact),
    Post(PostArtifact),
}

impl LibraryItem {
    pub fn id(&self) -> &ArtifactId {
        match self {
            LibraryItem::Script(s) => &s.id,
            LibraryItem::Post(p) => &p.id,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            LibraryItem::Script(_) => ItemKind::Script,
            LibraryItem::Post(_) => ItemKind::Post,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            LibraryItem::Script(s) => &s.title,
            LibraryItem::Post(p) => &p.title,
        }
    }

    pub fn status(&self) -> ContentStatus {
        match self {
            LibraryItem::Script(s) => s.status,
            LibraryItem::Post(p) => p.status,
        }
    }

    pub fn is_used(&self) -> bool {
        match self {
            LibraryItem::Script(s) => s.is_used,
            LibraryItem::Post(p) => p.is_used,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            LibraryItem::Script(s) => s.created_at,
            LibraryItem::Post(p) => p.created_at,
        }
    }

    /// Flip the used flag in place
    pub(crate) fn toggle_used(&mut self) -> bool {
        let flag = match self {
            LibraryItem::Script(s) => &mut s.is_used,
            LibraryItem::Post(p) => &mut p.is_used,
        };
        *flag = !*flag;
        *flag
    }

    pub fn as_script(&self) -> Option<&ScriptArtifact> {
        match self {
            LibraryItem::Script(s) => Some(s),
            LibraryItem::Post(_) => None,
        }
    }
}

impl From<ScriptArtifact> for LibraryItem {
    fn from(script: ScriptArtifact) -> Self {
        LibraryItem::Script(script)
    }
}

impl From<PostArtifact> for LibraryItem {
    fn from(post: PostArtifact) -> Self {
        LibraryItem::Post(post)
    }
}
