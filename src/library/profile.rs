//! Creator profile persistence.

use tracing::{debug, warn};

use crate::domain::Profile;
use crate::error::StorageError;

use super::storage::{KeyValueStore, PROFILE_KEY};

/// Reads and writes the single stored profile
pub struct ProfileStore;

impl ProfileStore {
    /// Load the stored profile; absent or unreadable data yields `None`
    pub fn load<S: KeyValueStore + ?Sized>(storage: &S) -> Option<Profile> {
        let raw = match storage.get(PROFILE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Profile storage unavailable");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "Stored profile is corrupt, ignoring");
                None
            }
        }
    }

    /// Replace the stored profile
    pub fn save<S: KeyValueStore + ?Sized>(
        storage: &S,
        profile: &Profile,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(profile)?;
        storage.set(PROFILE_KEY, &raw)?;
        debug!(name = %profile.name, "Profile saved");
        Ok(())
    }
}
