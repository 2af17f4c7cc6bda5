//! Error types for lexdeck-enrich
//!
//! Lookups never surface these: they degrade to sentinels inside the
//! components. These errors cover building the pipeline and writing output.

use crate::dataset::DatasetError;
use crate::services::{DictionaryError, DownloadError, ImageSearchError, SpeechError, TranslateError};
use crate::sync::SyncError;
use thiserror::Error;

/// Pipeline-level error type
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Dictionary client could not be built
    #[error("Dictionary client: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error("Translation client: {0}")]
    Translate(#[from] TranslateError),

    #[error("Image search client: {0}")]
    ImageSearch(#[from] ImageSearchError),

    #[error("Speech client: {0}")]
    Speech(#[from] SpeechError),

    #[error("Media fetcher: {0}")]
    Download(#[from] DownloadError),

    /// Reading or writing a dataset file
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// lexdeck-common error
    #[error("Common error: {0}")]
    Common(#[from] lexdeck_common::Error),
}

pub type Result<T> = std::result::Result<T, EnrichError>;
