use std::sync::Arc;
use tracing::info;

use crate::error::{KotobaError, Result};
use crate::record::{Favorite, FavoriteUpdate, NewFavorite};
use crate::store::FavoriteStore;

pub const DEFAULT_CATEGORY: &str = "general";

fn category_or_default(category: &str) -> String {
    let category = category.trim();
    if category.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        category.to_string()
    }
}

/// Favoriting of already resolved translations
pub struct Favorites {
    store: Arc<dyn FavoriteStore>,
}

impl Favorites {
    pub fn new(store: Arc<dyn FavoriteStore>) -> Self {
        Self { store }
    }

    pub async fn add(&self, translation_id: u64, category: &str) -> Result<Favorite> {
        if self.store.find_by_translation(translation_id).await?.is_some() {
            return Err(KotobaError::validation("already a favorite"));
        }

        let favorite = self
            .store
            .create(NewFavorite {
                translation_id,
                category: category_or_default(category),
            })
            .await?;
        info!("Added translation {} to favorites ({})", translation_id, favorite.category);
        Ok(favorite)
    }

    pub async fn remove(&self, id: u64) -> Result<bool> {
        self.store.delete(id).await
    }

    /// Add the translation when it is not a favorite yet, otherwise remove it.
    /// Returns the new favorite, or `None` when one was removed.
    pub async fn toggle(&self, translation_id: u64, category: &str) -> Result<Option<Favorite>> {
        match self.store.find_by_translation(translation_id).await? {
            Some(existing) => {
                self.store.delete(existing.id).await?;
                info!("Removed translation {} from favorites", translation_id);
                Ok(None)
            }
            None => self.add(translation_id, category).await.map(Some),
        }
    }

    pub async fn list(&self) -> Result<Vec<Favorite>> {
        self.store.list().await
    }

    pub async fn for_translation(&self, translation_id: u64) -> Result<Option<Favorite>> {
        self.store.find_by_translation(translation_id).await
    }

    pub async fn recategorize(&self, id: u64, category: &str) -> Result<Favorite> {
        self.store
            .update(
                id,
                FavoriteUpdate {
                    category: Some(category_or_default(category)),
                    ..Default::default()
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, MockFavoriteStore};

    fn favorites() -> Favorites {
        Favorites::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_add_defaults_category() {
        let favorites = favorites();
        let favorite = favorites.add(3, "  ").await.unwrap();
        assert_eq!(favorite.translation_id, 3);
        assert_eq!(favorite.category, DEFAULT_CATEGORY);
    }

    #[tokio::test]
    async fn test_add_twice_is_rejected() {
        let favorites = favorites();
        favorites.add(3, "travel").await.unwrap();
        let err = favorites.add(3, "work").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(favorites.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_toggle() {
        let favorites = favorites();
        let added = favorites.toggle(8, "travel").await.unwrap();
        assert!(added.is_some());
        assert!(favorites.for_translation(8).await.unwrap().is_some());

        let removed = favorites.toggle(8, "travel").await.unwrap();
        assert!(removed.is_none());
        assert!(favorites.for_translation(8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recategorize() {
        let favorites = favorites();
        let favorite = favorites.add(1, "travel").await.unwrap();
        let updated = favorites.recategorize(favorite.id, "food").await.unwrap();
        assert_eq!(updated.category, "food");
        assert_eq!(updated.translation_id, 1);
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let mut store = MockFavoriteStore::new();
        store
            .expect_find_by_translation()
            .returning(|_| Err(KotobaError::persistence("timeout")));
        store.expect_create().never();

        let favorites = Favorites::new(Arc::new(store));
        let err = favorites.add(1, "travel").await.unwrap_err();
        assert!(matches!(err, KotobaError::Persistence(_)));
    }
}
