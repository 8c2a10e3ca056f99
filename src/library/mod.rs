//! Content library: durable storage of generated artifacts and the profile.
//!
//! # Storage Layout
//!
//! ```text
//! ~/.alurio/
//! ├── alurio_user.json      # Creator profile
//! ├── alurio_library.json   # [{"kind": "script", ...}, {"kind": "post", ...}]
//! └── exports/              # Rendered PDF scripts
//! ```

pub mod profile;
pub mod stats;
pub mod storage;
pub mod store;

pub use profile::ProfileStore;
pub use stats::LibraryStats;
pub use storage::{FileStore, KeyValueStore, MemoryStore, LIBRARY_KEY, PROFILE_KEY};
pub use store::{LibraryFilter, LibraryStore, SaveOutcome};
