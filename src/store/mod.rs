// Record store architecture
//
// Translations and favorites are kept by a record store selected through a factory:
// - Memory: records held for the lifetime of the process
// - File: records snapshotted to a JSON file after every write
// - Remote: records kept by the remote record API
//
// A store that fails to open is replaced by `UnavailableStore` so translation
// keeps working without persistence.

pub mod memory;
pub mod file;
pub mod remote;
pub mod unavailable;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::config::{StoreConfig, StoreMode};
use crate::error::Result;
use crate::record::{Favorite, FavoriteUpdate, NewFavorite, NewTranslation, Translation, TranslationUpdate};

pub use memory::MemoryStore;
pub use file::JsonFileStore;
pub use remote::{RecordClient, RemoteStore};
pub use unavailable::UnavailableStore;

/// CRUD contract for translation records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationStore: Send + Sync {
    /// Store a new translation, assigning its id and timestamp
    async fn create(&self, translation: NewTranslation) -> Result<Translation>;

    async fn get(&self, id: u64) -> Result<Translation>;

    /// All translations, newest first
    async fn list(&self) -> Result<Vec<Translation>>;

    async fn update(&self, id: u64, update: TranslationUpdate) -> Result<Translation>;

    /// Returns false when no record had that id
    async fn delete(&self, id: u64) -> Result<bool>;
}

/// CRUD contract for favorite records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Store a new favorite, assigning its id and `added_at`
    async fn create(&self, favorite: NewFavorite) -> Result<Favorite>;

    async fn get(&self, id: u64) -> Result<Favorite>;

    /// All favorites, most recently added first
    async fn list(&self) -> Result<Vec<Favorite>>;

    async fn find_by_translation(&self, translation_id: u64) -> Result<Option<Favorite>>;

    async fn update(&self, id: u64, update: FavoriteUpdate) -> Result<Favorite>;

    async fn delete(&self, id: u64) -> Result<bool>;
}

/// Both stores of a session, usually backed by the same object
#[derive(Clone)]
pub struct Stores {
    pub translations: Arc<dyn TranslationStore>,
    pub favorites: Arc<dyn FavoriteStore>,
}

impl Stores {
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            translations: store.clone(),
            favorites: store,
        }
    }

    /// Stores that fail every call with `reason`
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let store = Arc::new(UnavailableStore::new(reason));
        Self {
            translations: store.clone(),
            favorites: store,
        }
    }
}

/// Factory for creating record stores
pub struct StoreFactory;

impl StoreFactory {
    /// Create the stores for the configured mode
    pub async fn create(config: &StoreConfig) -> Result<Stores> {
        match config.mode {
            StoreMode::Memory => {
                info!("Using in-memory record store");
                Ok(Stores::in_memory())
            }
            StoreMode::File => {
                info!("Using file record store: {}", config.path.display());
                let store = Arc::new(JsonFileStore::open(&config.path).await?);
                Ok(Stores {
                    translations: store.clone(),
                    favorites: store,
                })
            }
            StoreMode::Remote => {
                info!("Using remote record store: {}", config.endpoint);
                let store = Arc::new(RemoteStore::new(RecordClient::new(config)?));
                Ok(Stores {
                    translations: store.clone(),
                    favorites: store,
                })
            }
        }
    }
}
