//! Media acquisition: pronunciation audio and a representative image per term
//!
//! # Audio
//! One strategy per deployment ([`AudioStrategy`]):
//! - **Dictionary**: every audio lead from lexical enrichment is run through an
//!   ordered chain of [`AudioSourceAttempt`]s; the first attempt that yields a
//!   reference wins. The clip is downloaded to `<audios>/<stem>.mp3`. A
//!   decomposed phrase therefore produces one file per word.
//! - **Synthesized**: speech for the whole term is synthesized and written to
//!   `<audios>/<stem>.mp3`.
//!
//! # Image
//! The top image-search result is downloaded to `<images>/<stem>.jpg`.
//!
//! Every failure degrades to "no audio" / "no image" with a warning.

use crate::config::{AudioStrategy, EnrichConfig};
use crate::services::{ImageSearch, MediaFetcher, SpeechSynthesizer};
use crate::types::{media_stem, AudioLead, AudioReferences, LexicalOutcome, MediaBundle, Term};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Path fragments stripped from a source URL before matching it to a word
const AUDIO_PATH_NOISE: [&str; 2] = ["/us/media/english/us_pron/", ".mp3"];

// ============================================================================
// Audio source fallback chain
// ============================================================================

/// One way of picking an audio reference out of a dictionary page
pub trait AudioSourceAttempt: Send + Sync {
    /// Attempt name for logs
    fn name(&self) -> &'static str;

    /// Reference found by this attempt, if any
    fn attempt(&self, lookup: &str, references: &AudioReferences) -> Option<String>;
}

/// Primary `audio/mpeg` sources: the one whose path mentions the word, else the first
pub struct MatchingSource;

impl AudioSourceAttempt for MatchingSource {
    fn name(&self) -> &'static str {
        "matching source"
    }

    fn attempt(&self, lookup: &str, references: &AudioReferences) -> Option<String> {
        let key: String = lookup
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        references
            .sources
            .iter()
            .find(|src| {
                let mut fragment = src.to_string();
                for noise in AUDIO_PATH_NOISE {
                    fragment = fragment.replace(noise, "");
                }
                fragment.replace('/', "").to_lowercase().contains(&key)
            })
            .or_else(|| references.sources.first())
            .cloned()
    }
}

/// Source inside the hidden `<audio>` element
pub struct HiddenAudioTag;

impl AudioSourceAttempt for HiddenAudioTag {
    fn name(&self) -> &'static str {
        "hidden audio tag"
    }

    fn attempt(&self, _lookup: &str, references: &AudioReferences) -> Option<String> {
        references.hidden_audio.clone()
    }
}

/// `data-src-mp3` attribute of the play button
pub struct PlayButton;

impl AudioSourceAttempt for PlayButton {
    fn name(&self) -> &'static str {
        "play button"
    }

    fn attempt(&self, _lookup: &str, references: &AudioReferences) -> Option<String> {
        references.play_button.clone()
    }
}

/// Matching source → hidden audio tag → play button
pub fn default_audio_chain() -> Vec<Box<dyn AudioSourceAttempt>> {
    vec![
        Box::new(MatchingSource),
        Box::new(HiddenAudioTag),
        Box::new(PlayButton),
    ]
}

/// Run the chain, short-circuiting on the first attempt that yields a reference
pub fn select_audio_source(
    chain: &[Box<dyn AudioSourceAttempt>],
    lead: &AudioLead,
) -> Option<(&'static str, String)> {
    chain.iter().find_map(|attempt| {
        attempt
            .attempt(&lead.lookup, &lead.references)
            .filter(|reference| !reference.trim().is_empty())
            .map(|reference| (attempt.name(), reference))
    })
}

/// Resolve a page-relative reference against the dictionary origin
pub fn resolve_reference(origin: &str, reference: &str) -> String {
    if reference.starts_with("//") {
        format!("https:{}", reference)
    } else if reference.starts_with('/') {
        format!("{}{}", origin.trim_end_matches('/'), reference)
    } else {
        reference.to_string()
    }
}

// ============================================================================
// Media acquirer
// ============================================================================

/// Acquires audio and image files for terms
pub struct MediaAcquirer {
    strategy: AudioStrategy,
    dictionary_origin: String,
    audio_dir: PathBuf,
    image_dir: PathBuf,
    fetcher: Arc<dyn MediaFetcher>,
    speech: Arc<dyn SpeechSynthesizer>,
    images: Option<Arc<dyn ImageSearch>>,
    audio_chain: Vec<Box<dyn AudioSourceAttempt>>,
}

impl MediaAcquirer {
    /// Create a media acquirer
    ///
    /// `images` is `None` when no image-search credential is configured.
    pub fn new(
        config: &EnrichConfig,
        dictionary_origin: &str,
        fetcher: Arc<dyn MediaFetcher>,
        speech: Arc<dyn SpeechSynthesizer>,
        images: Option<Arc<dyn ImageSearch>>,
    ) -> Self {
        Self {
            strategy: config.audio_strategy,
            dictionary_origin: dictionary_origin.to_string(),
            audio_dir: config.audios_folder.clone(),
            image_dir: config.images_folder.clone(),
            fetcher,
            speech,
            images,
            audio_chain: default_audio_chain(),
        }
    }

    pub fn strategy(&self) -> AudioStrategy {
        self.strategy
    }

    /// Acquire audio and image for one term
    pub async fn acquire(&self, term: &Term, lexical: &LexicalOutcome) -> MediaBundle {
        let (audio, image) = tokio::join!(self.acquire_audio(term, lexical), self.acquire_image(term));
        MediaBundle { audio, image }
    }

    /// Audio file names for a term under the active strategy
    pub async fn acquire_audio(&self, term: &Term, lexical: &LexicalOutcome) -> Vec<String> {
        match self.strategy {
            AudioStrategy::Dictionary => {
                let mut files = Vec::new();
                for lead in &lexical.audio_leads {
                    if let Some(file) = self.download_dictionary_audio(lead).await {
                        files.push(file);
                    }
                }
                files
            }
            AudioStrategy::Synthesized => self.synthesize_audio(term).await.into_iter().collect(),
        }
    }

    async fn download_dictionary_audio(&self, lead: &AudioLead) -> Option<String> {
        let (attempt, reference) = match select_audio_source(&self.audio_chain, lead) {
            Some(found) => found,
            None => {
                debug!(lookup = %lead.lookup, "No dictionary audio reference");
                return None;
            }
        };

        let url = resolve_reference(&self.dictionary_origin, &reference);
        debug!(lookup = %lead.lookup, via = attempt, url = %url, "Selected dictionary audio");

        let bytes = match self.fetcher.fetch(&url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(lookup = %lead.lookup, url = %url, error = %e, "Audio download failed");
                return None;
            }
        };

        let file_name = format!("{}.mp3", media_stem(&lead.lookup));
        self.persist(&self.audio_dir, &file_name, &bytes).await
    }

    async fn synthesize_audio(&self, term: &Term) -> Option<String> {
        let bytes = match self.speech.synthesize(term.as_str()).await {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => {
                warn!(term = %term, "Speech synthesis returned no audio");
                return None;
            }
            Err(e) => {
                warn!(term = %term, error = %e, "Speech synthesis failed");
                return None;
            }
        };

        let file_name = format!("{}.mp3", term.media_stem());
        self.persist(&self.audio_dir, &file_name, &bytes).await
    }

    /// Image file name for a term (top search result only, no retry)
    pub async fn acquire_image(&self, term: &Term) -> Option<String> {
        let Some(images) = &self.images else {
            debug!(term = %term, "Image search not configured");
            return None;
        };

        let url = match images.top_image_url(term.as_str()).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                debug!(term = %term, "No image results");
                return None;
            }
            Err(e) => {
                warn!(term = %term, error = %e, "Image search failed");
                return None;
            }
        };

        let bytes = match self.fetcher.fetch(&url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(term = %term, url = %url, error = %e, "Image download failed");
                return None;
            }
        };

        let file_name = format!("{}.jpg", term.media_stem());
        self.persist(&self.image_dir, &file_name, &bytes).await
    }

    /// Write media bytes, overwriting any earlier file of the same name
    async fn persist(&self, dir: &Path, file_name: &str, bytes: &[u8]) -> Option<String> {
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            warn!(dir = %dir.display(), error = %e, "Cannot create media directory");
            return None;
        }

        let path = dir.join(file_name);
        match tokio::fs::write(&path, bytes).await {
            Ok(()) => {
                debug!(path = %path.display(), bytes = bytes.len(), "Saved media file");
                Some(file_name.to_string())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot write media file");
                None
            }
        }
    }
}
