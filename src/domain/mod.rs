//! Domain types for generated content.
//!
//! This module contains the shared typed shapes:
//! - Profile: the creator's positioning, input to every generation
//! - Script and Post artifacts and their sub-structures
//! - LibraryItem: the tagged union persisted by the library

pub mod artifact;
pub mod item;
pub mod post;
pub mod profile;
pub mod script;

// Re-export commonly used types
pub use artifact::{ArtifactId, ContentStatus};
pub use item::{ItemKind, LibraryItem};
pub use post::{ImageAttachment, PostArtifact, PostSlide, MAX_CAROUSEL_IMAGES};
pub use profile::Profile;
pub use script::{ScriptArtifact, ScriptLength, Segment, ThemeSuggestion};
