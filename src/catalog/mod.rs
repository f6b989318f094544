// Language catalog
//
// The catalog is loaded once per session from a source:
// - Builtin: the language list shipped with kotoba
// - Remote: the language table of the record API

pub mod builtin;
pub mod remote;

use async_trait::async_trait;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::config::{CatalogConfig, CatalogSourceKind, StoreConfig};
use crate::error::{KotobaError, Result};
use crate::language::{is_auto, Language};
use crate::store::RecordClient;

pub use builtin::BuiltinCatalog;
pub use remote::RemoteCatalog;

/// Where the language list comes from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_languages(&self) -> Result<Vec<Language>>;
}

/// The supported languages of a session, sorted by display name
#[derive(Debug, Clone, Default)]
pub struct LanguageCatalog {
    languages: Vec<Language>,
}

impl LanguageCatalog {
    /// Build a catalog from raw records. Duplicate codes keep the first record.
    pub fn new(languages: Vec<Language>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(languages.len());
        for language in languages {
            if seen.insert(language.code.clone()) {
                unique.push(language);
            } else {
                warn!("Ignoring duplicate language code '{}' ({})", language.code, language.name);
            }
        }
        unique.sort_by(|a, b| a.name.cmp(&b.name));
        Self { languages: unique }
    }

    /// Load the full catalog. Any source failure is reported as unavailable.
    pub async fn load(source: &dyn CatalogSource) -> Result<Self> {
        let languages = source.fetch_languages().await.map_err(|e| match e {
            KotobaError::CatalogUnavailable(_) => e,
            other => KotobaError::CatalogUnavailable(other.to_string()),
        })?;

        let catalog = Self::new(languages);
        if catalog.is_empty() {
            warn!("Language catalog is empty");
        } else {
            info!("Loaded {} languages", catalog.len());
        }
        Ok(catalog)
    }

    pub fn list_all(&self) -> &[Language] {
        &self.languages
    }

    /// Languages selectable as a translation target
    pub fn targets(&self) -> impl Iterator<Item = &Language> {
        self.languages.iter().filter(|l| !l.is_auto())
    }

    /// Look up a language by code. `auto` always resolves, to the catalog's own
    /// record when it has one and to [`Language::detect`] otherwise.
    pub fn find_by_code(&self, code: &str) -> Result<Language> {
        if let Some(language) = self.languages.iter().find(|l| l.code == code) {
            return Ok(language.clone());
        }
        if is_auto(code) {
            return Ok(Language::detect());
        }
        Err(KotobaError::LanguageNotFound(code.to_string()))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.languages.iter().any(|l| l.code == code)
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

/// Factory for creating catalog sources
pub struct CatalogSourceFactory;

impl CatalogSourceFactory {
    pub fn create_source(config: &CatalogConfig, store: &StoreConfig) -> Result<Box<dyn CatalogSource>> {
        match config.source {
            CatalogSourceKind::Builtin => Ok(Box::new(BuiltinCatalog)),
            CatalogSourceKind::Remote => Ok(Box::new(RemoteCatalog::new(RecordClient::new(store)?))),
        }
    }
}
