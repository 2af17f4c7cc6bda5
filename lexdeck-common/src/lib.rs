//! # Lexdeck Common Library
//!
//! Shared code for the lexdeck tools:
//! - Common error and result types
//! - TOML bootstrap configuration and config-file discovery
//! - Tiered setting resolution (CLI → environment → TOML → default)

pub mod config;
pub mod error;

pub use error::{Error, Result};
