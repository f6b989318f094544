use async_trait::async_trait;

use crate::error::{KotobaError, Result};
use crate::record::{Favorite, FavoriteUpdate, NewFavorite, NewTranslation, Translation, TranslationUpdate};
use super::{FavoriteStore, TranslationStore};

/// Stand-in for a store that could not be opened. Every call fails with the
/// reason the store was unavailable.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> KotobaError {
        KotobaError::persistence(format!("record store unavailable: {}", self.reason))
    }
}

#[async_trait]
impl TranslationStore for UnavailableStore {
    async fn create(&self, _translation: NewTranslation) -> Result<Translation> {
        Err(self.error())
    }

    async fn get(&self, _id: u64) -> Result<Translation> {
        Err(self.error())
    }

    async fn list(&self) -> Result<Vec<Translation>> {
        Err(self.error())
    }

    async fn update(&self, _id: u64, _update: TranslationUpdate) -> Result<Translation> {
        Err(self.error())
    }

    async fn delete(&self, _id: u64) -> Result<bool> {
        Err(self.error())
    }
}

#[async_trait]
impl FavoriteStore for UnavailableStore {
    async fn create(&self, _favorite: NewFavorite) -> Result<Favorite> {
        Err(self.error())
    }

    async fn get(&self, _id: u64) -> Result<Favorite> {
        Err(self.error())
    }

    async fn list(&self) -> Result<Vec<Favorite>> {
        Err(self.error())
    }

    async fn find_by_translation(&self, _translation_id: u64) -> Result<Option<Favorite>> {
        Err(self.error())
    }

    async fn update(&self, _id: u64, _update: FavoriteUpdate) -> Result<Favorite> {
        Err(self.error())
    }

    async fn delete(&self, _id: u64) -> Result<bool> {
        Err(self.error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_call_reports_reason() {
        let store = UnavailableStore::new("disk full");

        let err = TranslationStore::list(&store).await.unwrap_err();
        assert!(matches!(err, KotobaError::Persistence(ref message) if message.contains("disk full")));
        assert!(FavoriteStore::find_by_translation(&store, 1).await.is_err());
        assert!(TranslationStore::delete(&store, 1).await.is_err());
    }
}
