//! Printable script documents.
//!
//! Layout and serialization are separate: [`render_script_document`] is a
//! pure function producing positioned text, [`ScriptDocument::to_pdf`] turns
//! that into bytes.

pub mod layout;
pub mod metrics;
pub mod pdf;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::ScriptArtifact;

pub use layout::{file_name, render_script_document, DrawOp, Page, ScriptDocument, PRODUCT_TAG};

/// Render a script and write it to `dir`, returning the written path
pub fn export_script(script: &ScriptArtifact, dir: &Path) -> Result<PathBuf> {
    let document = render_script_document(script);

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    let path = dir.join(document.file_name());
    std::fs::write(&path, document.to_pdf())
        .with_context(|| format!("Failed to write PDF: {}", path.display()))?;

    info!(
        id = %script.id,
        pages = document.page_count(),
        path = %path.display(),
        "Script exported"
    );
    Ok(path)
}
