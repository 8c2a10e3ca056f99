//! In-memory library sequence mirrored to durable storage.
//!
//! The sequence is loaded once, mutated only through [`LibraryStore`]
//! operations and persisted in full after every mutation. A mutation is
//! committed to memory only after the write succeeded, so a failed save or
//! toggle leaves the sequence exactly as it was.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::{ArtifactId, ItemKind, LibraryItem};
use crate::error::StorageError;

use super::stats::LibraryStats;
use super::storage::{KeyValueStore, LIBRARY_KEY};

/// Result of a save call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Item was prepended and the sequence persisted
    Inserted,
    /// An item with this id already exists; nothing changed
    AlreadyPresent,
}

/// Read-only query over the library
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryFilter {
    /// `None` matches every kind
    pub kind: Option<ItemKind>,
    /// Case-insensitive substring of the title; empty matches everything
    pub search: String,
}

impl LibraryFilter {
    pub fn kind(mut self, kind: ItemKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    fn matches(&self, item: &LibraryItem, needle: &str) -> bool {
        self.kind.map_or(true, |k| item.kind() == k)
            && item.title().to_lowercase().contains(needle)
    }
}

/// The content library
pub struct LibraryStore<S: KeyValueStore> {
    storage: S,
    items: Vec<LibraryItem>,
}

impl<S: KeyValueStore> LibraryStore<S> {
    /// Load the library; absent or unreadable data yields an empty library
    pub fn load(storage: S) -> Self {
        let items = match storage.get(LIBRARY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<LibraryItem>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    warn!(error = %e, "Stored library is corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Library storage unavailable, starting empty");
                Vec::new()
            }
        };

        debug!(items = items.len(), "Library loaded");
        Self { storage, items }
    }

    /// Insert an item at the front unless its id is already present
    pub fn save(&mut self, item: impl Into<LibraryItem>) -> Result<SaveOutcome, StorageError> {
        let item = item.into();

        if self.contains(item.id()) {
            debug!(id = %item.id(), "Item already in library, skipping save");
            return Ok(SaveOutcome::AlreadyPresent);
        }

        let mut next = Vec::with_capacity(self.items.len() + 1);
        next.push(item);
        next.extend(self.items.iter().cloned());

        self.persist(&next)?;
        info!(id = %next[0].id(), kind = %next[0].kind(), "Item saved to library");
        self.items = next;

        Ok(SaveOutcome::Inserted)
    }

    /// Flip the used flag; `Ok(None)` for an unknown id (nothing persisted)
    pub fn toggle_used(&mut self, id: &ArtifactId) -> Result<Option<bool>, StorageError> {
        let Some(pos) = self.items.iter().position(|i| i.id() == id) else {
            debug!(%id, "Toggle for unknown item ignored");
            return Ok(None);
        };

        let mut next = self.items.clone();
        let used = next[pos].toggle_used();

        self.persist(&next)?;
        info!(%id, used, "Item usage toggled");
        self.items = next;

        Ok(Some(used))
    }

    /// Items matching the filter, in library order
    pub fn filter(&self, filter: &LibraryFilter) -> Vec<&LibraryItem> {
        let needle = filter.search.to_lowercase();
        self.items
            .iter()
            .filter(|item| filter.matches(item, &needle))
            .collect()
    }

    /// The full sequence, most recent first
    pub fn items(&self) -> &[LibraryItem] {
        &self.items
    }

    /// Get an item by id
    pub fn get(&self, id: &ArtifactId) -> Option<&LibraryItem> {
        self.items.iter().find(|i| i.id() == id)
    }

    pub fn contains(&self, id: &ArtifactId) -> bool {
        self.get(id).is_some()
    }

    /// The `n` most recently saved items
    pub fn recent(&self, n: usize) -> &[LibraryItem] {
        &self.items[..n.min(self.items.len())]
    }

    /// Dashboard counters relative to `now`
    pub fn stats(&self, now: DateTime<Utc>) -> LibraryStats {
        LibraryStats::compute(&self.items, now)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn persist(&self, items: &[LibraryItem]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items)?;
        self.storage.set(LIBRARY_KEY, &raw).map_err(|e| {
            warn!(error = %e, "Failed to persist library");
            e
        })
    }
}
