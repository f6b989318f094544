// Phrasebook translation
//
// - phrasebook: phrase tables, fallback tags and quick phrases
// - resolver: validation, lookup, fallback synthesis and best-effort persistence

pub mod phrasebook;
pub mod resolver;

use serde::Serialize;

use crate::record::Translation;

pub use phrasebook::{FallbackTags, PhraseTable, QUICK_PHRASES};
pub use resolver::TranslationResolver;

/// What happened when the resolver tried to record a translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum Persistence {
    /// Written by the store; the translation carries its id
    Stored,
    /// No store was configured
    Skipped,
    /// The store rejected the write. The translation is still usable.
    Failed(String),
}

/// The result of one translate call
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub translation: Translation,
    pub persistence: Persistence,
}

impl Resolution {
    pub fn is_persisted(&self) -> bool {
        matches!(self.persistence, Persistence::Stored)
    }

    /// Reason the translation was not recorded, if the store failed
    pub fn warning(&self) -> Option<&str> {
        match &self.persistence {
            Persistence::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}
