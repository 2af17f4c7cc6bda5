//! Core types for the term enrichment pipeline
//!
//! A [`Term`] flows through three independent enrichment steps (lexical lookup,
//! translation, media acquisition) and ends up as one [`EnrichmentRecord`].
//! Every field of a record has a defined "not found" sentinel, so a record is
//! always complete even when every lookup failed.

use std::fmt;

/// Rendered transcription when no pronunciation was found
pub const TRANSCRIPTION_NOT_FOUND: &str = "(IPA not found)";

/// Rendered translation when the translator failed
pub const TRANSLATION_FAILED: &str = "(translation failed)";

// ============================================================================
// Terms
// ============================================================================

/// Normalized unit of enrichment
///
/// Text is case-folded with internal whitespace collapsed to single spaces,
/// so two terms are equal exactly when their normalized text is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Term {
    text: String,
}

impl Term {
    /// Normalize raw text into a term; `None` when nothing remains
    pub fn new(raw: &str) -> Option<Self> {
        let text = raw
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");

        if text.is_empty() {
            None
        } else {
            Some(Self { text })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Constituent words in order (a single element for a word term)
    pub fn words(&self) -> Vec<&str> {
        self.text.split(' ').collect()
    }

    /// Deterministic file stem for media generated for this term
    ///
    /// Whitespace becomes `_`; characters that are unsafe in file names
    /// become `_` as well. Distinct terms may share a stem (last writer wins).
    pub fn media_stem(&self) -> String {
        media_stem(&self.text)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// File stem for arbitrary term text (see [`Term::media_stem`])
pub fn media_stem(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

// ============================================================================
// Pronunciation
// ============================================================================

/// Grammatical category from the fixed tag set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryTag {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Determiner,
    Exclamation,
    Other,
}

impl CategoryTag {
    /// Map a dictionary part-of-speech label; unknown labels become `Other`
    pub fn from_dictionary_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "noun" => CategoryTag::Noun,
            "verb" => CategoryTag::Verb,
            "adjective" => CategoryTag::Adjective,
            "adverb" => CategoryTag::Adverb,
            "pronoun" => CategoryTag::Pronoun,
            "preposition" => CategoryTag::Preposition,
            "conjunction" => CategoryTag::Conjunction,
            "determiner" => CategoryTag::Determiner,
            "exclamation" => CategoryTag::Exclamation,
            _ => CategoryTag::Other,
        }
    }

    /// Short label used in the datasets
    pub fn label(&self) -> &'static str {
        match self {
            CategoryTag::Noun => "(n)",
            CategoryTag::Verb => "(v)",
            CategoryTag::Adjective => "(adj)",
            CategoryTag::Adverb => "(adv)",
            CategoryTag::Pronoun => "(pron)",
            CategoryTag::Preposition => "(prep)",
            CategoryTag::Conjunction => "(conj)",
            CategoryTag::Determiner => "(det)",
            CategoryTag::Exclamation => "(excl)",
            CategoryTag::Other => "(other)",
        }
    }
}

/// Phonetic transcription or the not-found sentinel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcription {
    Found(String),
    NotFound,
}

impl Transcription {
    pub fn render(&self) -> &str {
        match self {
            Transcription::Found(text) => text,
            Transcription::NotFound => TRANSCRIPTION_NOT_FOUND,
        }
    }
}

/// Category of a term: one tag, or the distinct tags of a decomposed phrase
///
/// Merged tags keep the order in which each tag first appeared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Single(CategoryTag),
    Merged(Vec<CategoryTag>),
}

impl Category {
    pub fn render(&self) -> String {
        match self {
            Category::Single(tag) => tag.label().to_string(),
            Category::Merged(tags) => tags
                .iter()
                .map(|t| t.label())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Pronunciation and category for one term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PronunciationResult {
    pub transcription: Transcription,
    pub category: Category,
}

impl PronunciationResult {
    pub fn not_found() -> Self {
        Self {
            transcription: Transcription::NotFound,
            category: Category::Single(CategoryTag::Other),
        }
    }
}

// ============================================================================
// Audio side channel
// ============================================================================

/// Raw audio references found on one dictionary page, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioReferences {
    /// `src` of every `audio/mpeg` source element
    pub sources: Vec<String>,
    /// Source inside the hidden audio element
    pub hidden_audio: Option<String>,
    /// `data-src-mp3` of the play button
    pub play_button: Option<String>,
}

/// Audio references discovered for one looked-up word or phrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioLead {
    /// Text the dictionary page was fetched for; names the audio file
    pub lookup: String,
    pub references: AudioReferences,
}

/// Lexical enrichment result plus the audio leads it discovered
///
/// A word (or a phrase the dictionary knows) yields one lead; a decomposed
/// phrase yields one lead per constituent word, in word order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalOutcome {
    pub pronunciation: PronunciationResult,
    pub audio_leads: Vec<AudioLead>,
}

// ============================================================================
// Media and records
// ============================================================================

/// Generated media files, as names relative to the audio/image directories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaBundle {
    /// Audio files; several for a decomposed phrase, empty when none was acquired
    pub audio: Vec<String>,
    pub image: Option<String>,
}

impl MediaBundle {
    /// Audio files as one `;`-delimited field
    pub fn audio_field(&self) -> String {
        self.audio.join(";")
    }
}

/// Per-term output of the enrichment pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentRecord {
    pub term: Term,
    /// Translation text or [`TRANSLATION_FAILED`]
    pub translation: String,
    pub pronunciation: PronunciationResult,
    pub media: MediaBundle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_normalization() {
        let term = Term::new("  Quick\t BROWN ").unwrap();
        assert_eq!(term.as_str(), "quick brown");
        assert_eq!(term.words(), vec!["quick", "brown"]);

        assert!(Term::new("   ").is_none());
        assert_eq!(Term::new("Fox").unwrap().words(), vec!["fox"]);
    }

    #[test]
    fn test_media_stem() {
        assert_eq!(media_stem("quick brown"), "quick_brown");
        assert_eq!(media_stem("and/or"), "and_or");
        assert_eq!(Term::new("fox").unwrap().media_stem(), "fox");
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(CategoryTag::from_dictionary_label("Adjective"), CategoryTag::Adjective);
        assert_eq!(CategoryTag::from_dictionary_label("phrasal verb"), CategoryTag::Other);
        assert_eq!(CategoryTag::Adjective.label(), "(adj)");
    }

    #[test]
    fn test_merged_category_render() {
        let category = Category::Merged(vec![CategoryTag::Adjective, CategoryTag::Noun]);
        assert_eq!(category.render(), "(adj), (n)");
    }

    #[test]
    fn test_not_found_sentinels() {
        let result = PronunciationResult::not_found();
        assert_eq!(result.transcription.render(), TRANSCRIPTION_NOT_FOUND);
        assert_eq!(result.category.render(), "(other)");
    }
}
