//! Per-term enrichment components

pub mod lexical_enricher;
pub mod media_acquirer;
pub mod record_assembler;

pub use lexical_enricher::{is_phrase_entry, LexicalEnricher};
pub use media_acquirer::{
    default_audio_chain, resolve_reference, select_audio_source, AudioSourceAttempt,
    HiddenAudioTag, MatchingSource, MediaAcquirer, PlayButton,
};
pub use record_assembler::RecordAssembler;
