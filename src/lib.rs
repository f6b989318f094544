//! Kotoba - Phrasebook Translation
//!
//! Resolves text between languages with a hand-curated phrasebook, falls back
//! to tagged placeholders for unknown phrases, and records every translation
//! in a pluggable record store alongside the user's favorites.

pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod record;
pub mod catalog;
pub mod store;
pub mod translate;
pub mod history;
pub mod favorites;
pub mod session;
