//! External collaborators of the enrichment pipeline
//!
//! Each collaborator sits behind a trait so the pipeline can be driven by
//! in-memory fakes in tests. Every call returns a typed error; deciding to
//! fall back to a sentinel is left to the caller.

pub mod cambridge_client;
pub mod dictionary_page;
pub mod http;
pub mod media_fetcher;
pub mod speech_client;
pub mod translate_client;
pub mod unsplash_client;

pub use cambridge_client::{CambridgeClient, DictionaryError, DictionarySource};
pub use dictionary_page::{parse_entry_page, DictionaryEntry};
pub use media_fetcher::{DownloadError, HttpMediaFetcher, MediaFetcher};
pub use speech_client::{GoogleTtsClient, SpeechError, SpeechSynthesizer};
pub use translate_client::{GoogleTranslateClient, TranslateError, Translator};
pub use unsplash_client::{ImageSearch, ImageSearchError, UnsplashClient};
