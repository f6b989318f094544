use std::sync::Arc;
use tracing::info;

use crate::error::{KotobaError, Result};
use crate::record::{Translation, TranslationUpdate};
use crate::store::TranslationStore;
use crate::translate::resolver::validate;

/// Browsing and correcting recorded translations
pub struct History {
    store: Arc<dyn TranslationStore>,
}

impl History {
    pub fn new(store: Arc<dyn TranslationStore>) -> Self {
        Self { store }
    }

    /// All recorded translations, newest first
    pub async fn list(&self) -> Result<Vec<Translation>> {
        self.store.list().await
    }

    pub async fn get(&self, id: u64) -> Result<Translation> {
        self.store.get(id).await
    }

    /// Apply a correction. The corrected record must still be a valid
    /// translation; its timestamp is kept.
    pub async fn correct(&self, id: u64, update: TranslationUpdate) -> Result<Translation> {
        if update.is_empty() {
            return Err(KotobaError::validation("nothing to correct"));
        }

        let mut merged = self.store.get(id).await?;
        update.apply_to(&mut merged);
        validate(&merged.source_text, &merged.source_lang, &merged.target_lang)?;
        if merged.translated_text.trim().is_empty() {
            return Err(KotobaError::validation("translation required"));
        }

        let corrected = self.store.update(id, update).await?;
        info!("Corrected translation {}", id);
        Ok(corrected)
    }

    pub async fn delete(&self, id: u64) -> Result<bool> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            info!("Deleted translation {}", id);
        }
        Ok(deleted)
    }
}
