//! Record assembly: one complete [`EnrichmentRecord`] per term
//!
//! Three independent branches run concurrently for a term:
//! 1. Lexical enrichment, then dictionary/synthesized audio (audio consumes the
//!    lexical side channel)
//! 2. Translation
//! 3. Image acquisition
//!
//! No branch can fail the record; each degrades to its sentinel.

use super::lexical_enricher::LexicalEnricher;
use super::media_acquirer::MediaAcquirer;
use crate::services::Translator;
use crate::types::{EnrichmentRecord, MediaBundle, Term, TRANSLATION_FAILED};
use std::sync::Arc;
use tracing::{info, warn};

/// Combines lexical enrichment, translation and media into records
pub struct RecordAssembler {
    lexical: LexicalEnricher,
    translator: Arc<dyn Translator>,
    media: MediaAcquirer,
}

impl RecordAssembler {
    pub fn new(lexical: LexicalEnricher, translator: Arc<dyn Translator>, media: MediaAcquirer) -> Self {
        Self {
            lexical,
            translator,
            media,
        }
    }

    pub fn media(&self) -> &MediaAcquirer {
        &self.media
    }

    /// Assemble the record for one term
    pub async fn assemble(&self, term: &Term) -> EnrichmentRecord {
        let lexical_and_audio = async {
            let outcome = self.lexical.enrich(term).await;
            let audio = self.media.acquire_audio(term, &outcome).await;
            (outcome.pronunciation, audio)
        };

        let ((pronunciation, audio), translation, image) = tokio::join!(
            lexical_and_audio,
            self.translate(term),
            self.media.acquire_image(term)
        );

        let record = EnrichmentRecord {
            term: term.clone(),
            translation,
            pronunciation,
            media: MediaBundle { audio, image },
        };

        info!(
            term = %record.term,
            ipa = %record.pronunciation.transcription.render(),
            pos = %record.pronunciation.category.render(),
            translation = %record.translation,
            audio = record.media.audio.len(),
            image = record.media.image.is_some(),
            "Enriched term"
        );

        record
    }

    async fn translate(&self, term: &Term) -> String {
        match self.translator.translate(term.as_str()).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(term = %term, "Empty translation");
                TRANSLATION_FAILED.to_string()
            }
            Err(e) => {
                warn!(term = %term, error = %e, "Translation failed");
                TRANSLATION_FAILED.to_string()
            }
        }
    }
}
