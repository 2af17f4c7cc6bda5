//! Media synchronization into a flashcard profile's media directory

pub mod media_synchronizer;
pub mod profile_selector;

pub use media_synchronizer::{list_profiles, MediaSynchronizer, SyncReport};
pub use profile_selector::{parse_selection, FixedSelection, ProfileSelector, PromptSelector};

use std::path::PathBuf;
use thiserror::Error;

/// Directory name prefixes that never denote a profile (hidden dirs, add-ons)
pub const RESERVED_PROFILE_PREFIXES: [&str; 2] = [".", "addon"];

/// Media subdirectory inside each profile
pub const MEDIA_SUBDIRECTORY: &str = "collection.media";

/// Precondition and I/O failures that abort one sync operation
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Destination root does not exist: {}", .0.display())]
    RootMissing(PathBuf),

    #[error("No profiles found under {}", .0.display())]
    NoProfiles(PathBuf),

    #[error("Invalid profile selection '{input}' (expected 1-{count})")]
    InvalidSelection { input: String, count: usize },

    #[error("Profile media directory does not exist: {}", .0.display())]
    MediaDirMissing(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
