use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{KotobaError, Result};
use crate::record::{Favorite, FavoriteUpdate, NewFavorite, NewTranslation, Translation, TranslationUpdate};
use super::memory::RecordSet;
use super::{FavoriteStore, TranslationStore};

/// Record store persisted as a single JSON snapshot.
///
/// Each mutation is applied to a copy of the records, written to disk, and
/// only then committed in memory. A failed write leaves both unchanged.
pub struct JsonFileStore {
    path: PathBuf,
    records: Mutex<RecordSet>,
}

impl JsonFileStore {
    /// Open the snapshot at `path`, starting empty when it does not exist yet
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    KotobaError::persistence(format!(
                        "Failed to create store directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let records = if tokio::fs::try_exists(&path).await? {
            let content = tokio::fs::read_to_string(&path).await?;
            let records: RecordSet = serde_json::from_str(&content).map_err(|e| {
                KotobaError::persistence(format!("Failed to parse {}: {}", path.display(), e))
            })?;
            info!(
                "Loaded {} translations and {} favorites from {}",
                records.translations.len(),
                records.favorites.len(),
                path.display()
            );
            records
        } else {
            RecordSet::default()
        };

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    async fn write_snapshot(&self, records: &RecordSet) -> Result<()> {
        let content = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.path, content).await.map_err(|e| {
            KotobaError::persistence(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        debug!("Wrote record snapshot: {}", self.path.display());
        Ok(())
    }

    /// Apply `change` to a copy of the records, persist it, then commit
    async fn mutate<T>(&self, change: impl FnOnce(&mut RecordSet) -> Result<T>) -> Result<T> {
        let mut records = self.records.lock().await;
        let mut draft = records.clone();
        let value = change(&mut draft)?;
        self.write_snapshot(&draft).await?;
        *records = draft;
        Ok(value)
    }
}

#[async_trait]
impl TranslationStore for JsonFileStore {
    async fn create(&self, translation: NewTranslation) -> Result<Translation> {
        self.mutate(|records| Ok(records.insert_translation(translation))).await
    }

    async fn get(&self, id: u64) -> Result<Translation> {
        self.records.lock().await.translation(id)
    }

    async fn list(&self) -> Result<Vec<Translation>> {
        Ok(self.records.lock().await.translations_newest_first())
    }

    async fn update(&self, id: u64, update: TranslationUpdate) -> Result<Translation> {
        self.mutate(|records| records.update_translation(id, &update)).await
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        self.mutate(|records| Ok(records.remove_translation(id))).await
    }
}

#[async_trait]
impl FavoriteStore for JsonFileStore {
    async fn create(&self, favorite: NewFavorite) -> Result<Favorite> {
        self.mutate(|records| Ok(records.insert_favorite(favorite))).await
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
        self.mutate(|records| records.update_favorite(id, &update)).await
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        self.mutate(|records| Ok(records.remove_favorite(id))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_translation() -> NewTranslation {
        NewTranslation {
            source_text: "good night".to_string(),
            translated_text: "gute nacht".to_string(),
            source_lang: "en".to_string(),
            target_lang: "de".to_string(),
        }
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        let saved = TranslationStore::create(&store, new_translation()).await.unwrap();
        FavoriteStore::create(
            &store,
            NewFavorite {
                translation_id: saved.id.unwrap(),
                category: "general".to_string(),
            },
        )
        .await
        .unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let loaded = TranslationStore::get(&reopened, saved.id.unwrap()).await.unwrap();
        assert_eq!(loaded, saved);
        assert!(reopened.find_by_translation(saved.id.unwrap()).await.unwrap().is_some());

        // Ids continue from the loaded records
        let next = TranslationStore::create(&reopened, new_translation()).await.unwrap();
        assert_eq!(next.id, Some(2));
    }

    #[tokio::test]
    async fn test_rejected_change_leaves_records_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("records.json")).await.unwrap();
        TranslationStore::create(&store, new_translation()).await.unwrap();

        let err = TranslationStore::update(&store, 99, TranslationUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, KotobaError::NotFound { .. }));
        assert_eq!(TranslationStore::list(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_snapshot_write_is_not_committed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        let store = JsonFileStore::open(&path).await.unwrap();

        // A directory in place of the snapshot makes every write fail
        std::fs::create_dir(&path).unwrap();

        let err = TranslationStore::create(&store, new_translation()).await.unwrap_err();
        assert!(matches!(err, KotobaError::Persistence(_)));
        assert!(TranslationStore::list(&store).await.unwrap().is_empty());

        std::fs::remove_dir(&path).unwrap();
        let saved = TranslationStore::create(&store, new_translation()).await.unwrap();
        assert_eq!(saved.id, Some(1));
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::open(&path).await.err().unwrap();
        assert!(matches!(err, KotobaError::Persistence(_)));
    }
}
