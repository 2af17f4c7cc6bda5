//! Copy generated media into a profile's media directory
//!
//! The destination is owned by the flashcard application. Existing files are
//! never deleted; a file with the same name is overwritten. The operation is
//! not transactional: files copied before a failure stay in place.

use super::profile_selector::ProfileSelector;
use super::{SyncError, MEDIA_SUBDIRECTORY, RESERVED_PROFILE_PREFIXES};
use crate::config::EnrichConfig;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

/// Outcome of one sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Profile that received the files
    pub profile: String,
    pub copied: usize,
    pub failed: usize,
    /// Source directories that did not exist
    pub skipped_sources: Vec<PathBuf>,
}

/// Eligible profile directories under `root`, sorted by name
pub fn list_profiles(root: &Path) -> Result<Vec<String>, SyncError> {
    if !root.is_dir() {
        return Err(SyncError::RootMissing(root.to_path_buf()));
    }

    let mut profiles = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if RESERVED_PROFILE_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
        {
            debug!(dir = %name, "Skipping reserved directory");
            continue;
        }
        profiles.push(name);
    }

    profiles.sort();
    Ok(profiles)
}

/// Media synchronizer over the local audio and image directories
pub struct MediaSynchronizer {
    audio_dir: PathBuf,
    image_dir: PathBuf,
}

impl MediaSynchronizer {
    pub fn new(audio_dir: PathBuf, image_dir: PathBuf) -> Self {
        Self {
            audio_dir,
            image_dir,
        }
    }

    pub fn from_config(config: &EnrichConfig) -> Self {
        Self::new(config.audios_folder.clone(), config.images_folder.clone())
    }

    /// Copy every audio and image file into the selected profile
    ///
    /// **Algorithm:**
    /// 1. Check the destination root exists and holds at least one profile
    /// 2. Let `selector` pick a profile (1-based ordinal)
    /// 3. Check the profile's media subdirectory exists
    /// 4. Copy audio files, then image files; a missing source directory is
    ///    skipped and a failed file is logged, neither stops the rest
    ///
    /// Steps 1-3 abort the whole operation before any file is copied.
    pub fn sync(
        &self,
        destination_root: &Path,
        selector: &mut dyn ProfileSelector,
    ) -> Result<SyncReport, SyncError> {
        let profiles = list_profiles(destination_root)?;
        if profiles.is_empty() {
            return Err(SyncError::NoProfiles(destination_root.to_path_buf()));
        }

        let profile = profiles[selector.select(&profiles)?].clone();
        let media_dir = destination_root.join(&profile).join(MEDIA_SUBDIRECTORY);
        if !media_dir.is_dir() {
            return Err(SyncError::MediaDirMissing(media_dir));
        }

        info!(profile = %profile, destination = %media_dir.display(), "Synchronizing media");

        let mut report = SyncReport {
            profile,
            ..Default::default()
        };

        for source in [&self.audio_dir, &self.image_dir] {
            if !source.is_dir() {
                warn!(source = %source.display(), "Source directory does not exist, skipping");
                report.skipped_sources.push(source.clone());
                continue;
            }
            copy_directory_files(source, &media_dir, &mut report);
        }

        info!(
            profile = %report.profile,
            copied = report.copied,
            failed = report.failed,
            "Media synchronization finished"
        );

        Ok(report)
    }
}

/// Copy the regular files of `source` into `destination`, counting results
fn copy_directory_files(source: &Path, destination: &Path, report: &mut SyncReport) {
    let entries = match fs::read_dir(source) {
        Ok(entries) => entries,
        Err(e) => {
            error!(source = %source.display(), error = %e, "Cannot read source directory");
            report.failed += 1;
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!(source = %source.display(), error = %e, "Cannot read directory entry");
                report.failed += 1;
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let target = destination.join(entry.file_name());
        match copy_replacing(&path, &target) {
            Ok(()) => {
                debug!(file = %path.display(), "Copied");
                report.copied += 1;
            }
            Err(e) => {
                error!(file = %path.display(), error = %e, "Copy failed");
                report.failed += 1;
            }
        }
    }
}

/// Copy through a temp file in the target directory, then rename over the target
///
/// A failed copy never leaves a truncated file under the final name.
fn copy_replacing(source: &Path, target: &Path) -> io::Result<()> {
    let dir = target
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "target has no parent"))?;

    let mut temp = NamedTempFile::new_in(dir)?;
    let mut reader = fs::File::open(source)?;
    io::copy(&mut reader, temp.as_file_mut())?;
    temp.as_file().sync_all()?;

    let permissions = reader.metadata()?.permissions();
    fs::set_permissions(temp.path(), permissions)?;

    temp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
