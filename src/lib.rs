//! alurio - Structured content generation and library for creators
//!
//! Turns a creator profile plus a topic (or a set of images) into a
//! validated short-video script or social post, keeps generated artifacts
//! in a durable library, and renders scripts as printable PDFs.
//!
//! # Architecture
//!
//! Generation is a strict pipeline: compose a prompt with a declared
//! response schema, call the generative service, parse, validate, and only
//! then build an artifact. Nothing is persisted during generation; saving
//! is a separate, idempotent library operation.
//!
//! # Modules
//!
//! - `adapters`: Generative service integrations (Gemini)
//! - `core`: Prompt composition, schemas and the generation client
//! - `domain`: Data structures (Profile, ScriptArtifact, PostArtifact, LibraryItem)
//! - `library`: Durable storage, the library store and statistics
//! - `export`: Script layout and PDF output
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Describe yourself once
//! alurio profile set --name Ana --niche Produtividade \
//!     --objective "Construir autoridade" --tone Educativo
//!
//! # Generate and save a script
//! alurio script "5 erros de produtividade" --length medium
//!
//! # Export it
//! alurio export <id>
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod export;
pub mod library;

// Re-export main types at crate root for convenience
pub use crate::core::{ContentGenerator, ModelSelection};
pub use domain::{
    ArtifactId, ContentStatus, ImageAttachment, ItemKind, LibraryItem, PostArtifact, Profile,
    ScriptArtifact, ScriptLength,
};
pub use error::{GenerationError, StorageError};
pub use export::{render_script_document, ScriptDocument};
pub use library::{FileStore, LibraryFilter, LibraryStore, MemoryStore, ProfileStore};
