use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{KotobaError, Result};
use crate::record::{Favorite, FavoriteUpdate, NewFavorite, NewTranslation, Translation, TranslationUpdate};
use super::{FavoriteStore, TranslationStore};

/// Plain record collections shared by the memory and file stores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default)]
    pub translations: Vec<Translation>,
    #[serde(default)]
    pub favorites: Vec<Favorite>,
}

fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().map_or(1, |max| max + 1)
}

fn translation_not_found(id: u64) -> KotobaError {
    KotobaError::NotFound { kind: "Translation", id }
}

fn favorite_not_found(id: u64) -> KotobaError {
    KotobaError::NotFound { kind: "Favorite", id }
}

impl RecordSet {
    pub fn insert_translation(&mut self, translation: NewTranslation) -> Translation {
        let id = next_id(self.translations.iter().filter_map(|t| t.id));
        let saved = translation.into_saved(id, Utc::now());
        self.translations.push(saved.clone());
        saved
    }

    pub fn translation(&self, id: u64) -> Result<Translation> {
        self.translations
            .iter()
            .find(|t| t.id == Some(id))
            .cloned()
            .ok_or_else(|| translation_not_found(id))
    }

    pub fn translations_newest_first(&self) -> Vec<Translation> {
        let mut translations = self.translations.clone();
        translations.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        translations
    }

    pub fn update_translation(&mut self, id: u64, update: &TranslationUpdate) -> Result<Translation> {
        let translation = self
            .translations
            .iter_mut()
            .find(|t| t.id == Some(id))
            .ok_or_else(|| translation_not_found(id))?;
        update.apply_to(translation);
        Ok(translation.clone())
    }

    pub fn remove_translation(&mut self, id: u64) -> bool {
        let before = self.translations.len();
        self.translations.retain(|t| t.id != Some(id));
        self.translations.len() != before
    }

    pub fn insert_favorite(&mut self, favorite: NewFavorite) -> Favorite {
        let saved = Favorite {
            id: next_id(self.favorites.iter().map(|f| f.id)),
            translation_id: favorite.translation_id,
            category: favorite.category,
            added_at: Utc::now(),
        };
        self.favorites.push(saved.clone());
        saved
    }

    pub fn favorite(&self, id: u64) -> Result<Favorite> {
        self.favorites
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| favorite_not_found(id))
    }

    pub fn favorites_newest_first(&self) -> Vec<Favorite> {
        let mut favorites = self.favorites.clone();
        favorites.sort_by(|a, b| b.added_at.cmp(&a.added_at).then(b.id.cmp(&a.id)));
        favorites
    }

    pub fn favorite_for_translation(&self, translation_id: u64) -> Option<Favorite> {
        self.favorites
            .iter()
            .find(|f| f.translation_id == translation_id)
            .cloned()
    }

    pub fn update_favorite(&mut self, id: u64, update: &FavoriteUpdate) -> Result<Favorite> {
        let favorite = self
            .favorites
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| favorite_not_found(id))?;
        update.apply_to(favorite);
        Ok(favorite.clone())
    }

    pub fn remove_favorite(&mut self, id: u64) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|f| f.id != id);
        self.favorites.len() != before
    }
}

/// Record store held entirely in memory.
///
/// The lock is held across id assignment and insert, so concurrent creates
/// never hand out the same id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<RecordSet>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranslationStore for MemoryStore {
    async fn create(&self, translation: NewTranslation) -> Result<Translation> {
        let saved = self.records.lock().await.insert_translation(translation);
        debug!("Stored translation {:?} in memory", saved.id);
        Ok(saved)
    }

    async fn get(&self, id: u64) -> Result<Translation> {
        self.records.lock().await.translation(id)
    }

    async fn list(&self) -> Result<Vec<Translation>> {
        Ok(self.records.lock().await.translations_newest_first())
    }

    async fn update(&self, id: u64, update: TranslationUpdate) -> Result<Translation> {
        self.records.lock().await.update_translation(id, &update)
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        Ok(self.records.lock().await.remove_translation(id))
    }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn create(&self, favorite: NewFavorite) -> Result<Favorite> {
        Ok(self.records.lock().await.insert_favorite(favorite))
    }

    async fn get(&self, id: u64) -> Result<Favorite> {
        self.records.lock().await.favorite(id)
    }

    async fn list(&self) -> Result<Vec<Favorite>> {
        Ok(self.records.lock().await.favorites_newest_first())
    }

    async fn find_by_translation(&self, translation_id: u64) -> Result<Option<Favorite>> {
        Ok(self.records.lock().await.favorite_for_translation(translation_id))
    }

    async fn update(&self, id: u64, update: FavoriteUpdate) -> Result<Favorite> {
        self.records.lock().await.update_favorite(id, &update)
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        Ok(self.records.lock().await.remove_favorite(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn new_translation(text: &str) -> NewTranslation {
        NewTranslation {
            source_text: text.to_string(),
            translated_text: format!("[ES] {}", text),
            source_lang: "en".to_string(),
            target_lang: "es".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_follow_max_existing() {
        let store = MemoryStore::new();
        let first = TranslationStore::create(&store, new_translation("one")).await.unwrap();
        let second = TranslationStore::create(&store, new_translation("two")).await.unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));

        // max + 1, so a deleted lower id is never handed out again
        assert!(TranslationStore::delete(&store, 1).await.unwrap());
        let third = TranslationStore::create(&store, new_translation("three")).await.unwrap();
        assert_eq!(third.id, Some(3));
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let store = Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                TranslationStore::create(store.as_ref(), new_translation(&format!("text {}", i)))
                    .await
                    .unwrap()
                    .id
                    .unwrap()
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }
        assert_eq!(ids.len(), 32);
        assert_eq!(ids.iter().max(), Some(&32));
    }

    #[tokio::test]
    async fn test_get_and_update_missing_id() {
        let store = MemoryStore::new();
        let err = TranslationStore::get(&store, 7).await.unwrap_err();
        assert!(matches!(err, KotobaError::NotFound { kind: "Translation", id: 7 }));

        let err = TranslationStore::update(&store, 7, TranslationUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, KotobaError::NotFound { .. }));
        assert!(!TranslationStore::delete(&store, 7).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryStore::new();
        for text in ["a", "b", "c"] {
            TranslationStore::create(&store, new_translation(text)).await.unwrap();
        }
        let listed: Vec<String> = TranslationStore::list(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.source_text)
            .collect();
        assert_eq!(listed, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_favorite_lookup_by_translation() {
        let store = MemoryStore::new();
        let favorite = FavoriteStore::create(
            &store,
            NewFavorite {
                translation_id: 42,
                category: "travel".to_string(),
            },
        )
        .await
        .unwrap();

        let found = store.find_by_translation(42).await.unwrap();
        assert_eq!(found, Some(favorite.clone()));
        assert_eq!(store.find_by_translation(41).await.unwrap(), None);

        let updated = FavoriteStore::update(
            &store,
            favorite.id,
            FavoriteUpdate {
                category: Some("work".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.category, "work");
        assert_eq!(updated.added_at, favorite.added_at);
    }
}
