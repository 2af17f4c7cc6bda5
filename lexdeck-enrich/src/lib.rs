//! lexdeck-enrich library interface
//!
//! Term extraction, per-term enrichment (pronunciation, category, translation,
//! audio, image), dataset output and media synchronization. The binary in
//! `main.rs` drives these as separate passes.

pub mod config;
pub mod dataset;
pub mod enrichment;
pub mod error;
pub mod services;
pub mod sync;
pub mod term_extractor;
pub mod types;
pub mod workflow;

pub use crate::error::{EnrichError, Result};
