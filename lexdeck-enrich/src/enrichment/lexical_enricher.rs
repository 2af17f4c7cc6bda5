//! Lexical enrichment: pronunciation and grammatical category per term
//!
//! **Words** get one dictionary lookup.
//!
//! **Phrases** first try the whole phrase. The dictionary is taken to know the
//! phrase only when the transcription it returned holds at least as many
//! `/…/` groups as the phrase has words. Otherwise every constituent word is
//! looked up on its own and the results are merged in word order.
//!
//! Constituent words contain no whitespace, so their lookups are always the
//! single-word case and the decomposition is never more than two levels deep.

use crate::services::{DictionaryEntry, DictionarySource};
use crate::types::{
    AudioLead, Category, CategoryTag, LexicalOutcome, PronunciationResult, Term, Transcription,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

static TRANSCRIPTION_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/[^/]+/").expect("static regex"));

/// Result of looking up one word or phrase string
#[derive(Debug, Clone)]
struct Lookup {
    pronunciation: PronunciationResult,
    lead: AudioLead,
}

/// Lexical enricher over a dictionary source
pub struct LexicalEnricher {
    dictionary: Arc<dyn DictionarySource>,
}

impl LexicalEnricher {
    pub fn new(dictionary: Arc<dyn DictionarySource>) -> Self {
        Self { dictionary }
    }

    /// Origin of the underlying dictionary (for resolving audio references)
    pub fn dictionary_origin(&self) -> &str {
        self.dictionary.origin()
    }

    /// Enrich one term; never fails, degrading to the not-found sentinel
    pub async fn enrich(&self, term: &Term) -> LexicalOutcome {
        let words = term.words();
        let whole = self.lookup(term.as_str()).await;

        if words.len() < 2 || is_phrase_entry(&whole.pronunciation.transcription, words.len()) {
            return LexicalOutcome {
                pronunciation: whole.pronunciation,
                audio_leads: vec![whole.lead],
            };
        }

        debug!(
            term = %term,
            words = words.len(),
            "Phrase not a dictionary entry, enriching words individually"
        );

        let mut parts = Vec::with_capacity(words.len());
        for word in words {
            parts.push(self.lookup(word).await);
        }

        merge(parts)
    }

    /// Single dictionary lookup mapped into the result types
    async fn lookup(&self, text: &str) -> Lookup {
        let entry = match self.dictionary.lookup(text).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    text = %text,
                    source = self.dictionary.source_id(),
                    error = %e,
                    "Dictionary lookup failed, treating as not found"
                );
                DictionaryEntry::default()
            }
        };

        Lookup {
            pronunciation: pronunciation_from_entry(&entry),
            lead: AudioLead {
                lookup: text.to_string(),
                references: entry.audio,
            },
        }
    }
}

/// Map a parsed entry into the fixed result shape
///
/// A missing transcription means "not found" regardless of the category.
fn pronunciation_from_entry(entry: &DictionaryEntry) -> PronunciationResult {
    match &entry.transcription {
        Some(transcription) => PronunciationResult {
            transcription: Transcription::Found(transcription.clone()),
            category: Category::Single(
                entry
                    .part_of_speech
                    .as_deref()
                    .map(CategoryTag::from_dictionary_label)
                    .unwrap_or(CategoryTag::Other),
            ),
        },
        None => PronunciationResult::not_found(),
    }
}

/// Whether a whole-phrase transcription looks like a genuine phrase entry
///
/// Heuristic: count `/…/` groups and require one per word. This is a textual
/// proxy for "the dictionary has an entry for the phrase itself".
pub fn is_phrase_entry(transcription: &Transcription, word_count: usize) -> bool {
    match transcription {
        Transcription::Found(text) => TRANSCRIPTION_GROUP.find_iter(text).count() >= word_count,
        Transcription::NotFound => false,
    }
}

/// Merge per-word lookups of a decomposed phrase
///
/// Transcriptions are space-joined in word order, missing ones rendered as the
/// sentinel, so the merged result is always `Found`. Categories are the
/// distinct tags in first-seen order.
fn merge(parts: Vec<Lookup>) -> LexicalOutcome {
    let transcription = Transcription::Found(
        parts
            .iter()
            .map(|p| p.pronunciation.transcription.render())
            .collect::<Vec<_>>()
            .join(" "),
    );

    let mut tags: Vec<CategoryTag> = Vec::new();
    for part in &parts {
        let part_tags: Vec<CategoryTag> = match &part.pronunciation.category {
            Category::Single(tag) => vec![*tag],
            Category::Merged(inner) => inner.clone(),
        };
        for tag in part_tags {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }

    LexicalOutcome {
        pronunciation: PronunciationResult {
            transcription,
            category: Category::Merged(tags),
        },
        audio_leads: parts.into_iter().map(|p| p.lead).collect(),
    }
}
