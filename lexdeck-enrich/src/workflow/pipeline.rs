//! Pipeline orchestrator
//!
//! # Passes
//! - **Enrich**: every term is assembled into a record and handed to a
//!   [`RecordSink`] before the next term starts. Cancellation is checked
//!   between terms; records written before it stay valid.
//! - **Export**: rows of an existing intermediate dataset are rendered into the
//!   export dataset, acquiring an image for rows that have none.
//!
//! # Error Handling
//! Lookups never fail a term (see [`RecordAssembler`]). Only output I/O
//! errors end a pass early.

use crate::config::EnrichConfig;
use crate::dataset::{DatasetError, ExportWriter, IntermediateRow, RecordSink};
use crate::enrichment::{LexicalEnricher, MediaAcquirer, RecordAssembler};
use crate::error::Result;
use crate::services::{
    CambridgeClient, DictionarySource, GoogleTranslateClient, GoogleTtsClient, HttpMediaFetcher,
    ImageSearch, MediaFetcher, SpeechSynthesizer, Translator, UnsplashClient,
};
use crate::types::Term;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// External collaborators the pipeline is built from
pub struct Collaborators {
    pub dictionary: Arc<dyn DictionarySource>,
    pub translator: Arc<dyn Translator>,
    pub fetcher: Arc<dyn MediaFetcher>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    /// `None` when no image-search credential is configured
    pub images: Option<Arc<dyn ImageSearch>>,
}

impl Collaborators {
    /// Real network clients for the configured providers
    pub fn from_config(config: &EnrichConfig) -> Result<Self> {
        let dictionary = CambridgeClient::new(
            config.request_timeout,
            config.dictionary_requests_per_second,
        )?;
        let translator = GoogleTranslateClient::new(
            &config.source_language,
            &config.target_language,
            config.request_timeout,
        )?;
        let fetcher = HttpMediaFetcher::new(config.request_timeout)?;
        let speech = GoogleTtsClient::new(&config.source_language, config.request_timeout)?;

        let images = match &config.unsplash_access_key {
            Some(key) => {
                let client: Arc<dyn ImageSearch> =
                    Arc::new(UnsplashClient::new(key.clone(), config.request_timeout)?);
                Some(client)
            }
            None => None,
        };

        Ok(Self {
            dictionary: Arc::new(dictionary),
            translator: Arc::new(translator),
            fetcher: Arc::new(fetcher),
            speech: Arc::new(speech),
            images,
        })
    }
}

/// Result of an enrich pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSummary {
    pub processed: usize,
    pub total: usize,
    pub cancelled: bool,
}

/// Result of an export pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub rows: usize,
    pub images_acquired: usize,
}

/// Enrichment pipeline
pub struct Pipeline {
    assembler: RecordAssembler,
}

impl Pipeline {
    pub fn new(config: &EnrichConfig, collaborators: Collaborators) -> Self {
        let lexical = LexicalEnricher::new(collaborators.dictionary);
        let media = MediaAcquirer::new(
            config,
            lexical.dictionary_origin(),
            collaborators.fetcher,
            collaborators.speech,
            collaborators.images,
        );
        Self {
            assembler: RecordAssembler::new(lexical, collaborators.translator, media),
        }
    }

    /// Pipeline over the real network clients
    pub fn from_config(config: &EnrichConfig) -> Result<Self> {
        Ok(Self::new(config, Collaborators::from_config(config)?))
    }

    /// Enrich terms in order, writing each record as soon as it is assembled
    pub async fn run(
        &self,
        terms: &[Term],
        sink: &mut dyn RecordSink,
        cancel_token: &CancellationToken,
    ) -> std::result::Result<PipelineSummary, DatasetError> {
        let total = terms.len();
        info!(
            total = total,
            audio_strategy = %self.assembler.media().strategy(),
            "Starting enrichment"
        );

        let mut processed = 0;
        for term in terms {
            if cancel_token.is_cancelled() {
                warn!(processed = processed, total = total, "Enrichment cancelled");
                return Ok(PipelineSummary {
                    processed,
                    total,
                    cancelled: true,
                });
            }

            let record = self.assembler.assemble(term).await;
            sink.write_record(&record)?;
            processed += 1;
            debug!(processed = processed, total = total, "Record written");
        }

        info!(processed = processed, "Enrichment complete");
        Ok(PipelineSummary {
            processed,
            total,
            cancelled: false,
        })
    }

    /// Render intermediate rows into the export dataset
    pub async fn rebuild_export(
        &self,
        rows: Vec<IntermediateRow>,
        writer: &mut ExportWriter,
        cancel_token: &CancellationToken,
    ) -> std::result::Result<ExportSummary, DatasetError> {
        let mut summary = ExportSummary {
            rows: 0,
            images_acquired: 0,
        };

        for mut row in rows {
            if cancel_token.is_cancelled() {
                warn!(rows = summary.rows, "Export cancelled");
                break;
            }

            if row.image.is_none() {
                if let Some(term) = Term::new(&row.word) {
                    row.image = self.assembler.media().acquire_image(&term).await;
                    if row.image.is_some() {
                        summary.images_acquired += 1;
                    }
                }
            }

            writer.append(&row)?;
            summary.rows += 1;
        }

        info!(
            rows = summary.rows,
            images_acquired = summary.images_acquired,
            "Export complete"
        );
        Ok(summary)
    }
}
