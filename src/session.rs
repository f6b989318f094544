use tracing::{info, warn};

use crate::catalog::{CatalogSourceFactory, LanguageCatalog};
use crate::config::Config;
use crate::error::{KotobaError, Result};
use crate::favorites::Favorites;
use crate::history::History;
use crate::language::{is_auto, LanguagePair};
use crate::store::{StoreFactory, Stores};
use crate::translate::resolver::validate;
use crate::translate::{Resolution, TranslationResolver};

/// Everything a caller needs for one run, built once from configuration
pub struct Session {
    config: Config,
    catalog: LanguageCatalog,
    resolver: TranslationResolver,
    history: History,
    favorites: Favorites,
}

impl Session {
    /// Open the configured stores and load the catalog. A store that cannot
    /// be opened leaves translation working with nothing saved.
    pub async fn open(config: Config) -> Result<Self> {
        let stores = match StoreFactory::create(&config.store).await {
            Ok(stores) => stores,
            Err(e) => {
                warn!("Record store unavailable, translations will not be saved: {}", e);
                Stores::unavailable(e.to_string())
            }
        };
        let source = CatalogSourceFactory::create_source(&config.catalog, &config.store)?;
        let catalog = LanguageCatalog::load(source.as_ref()).await?;
        Self::from_parts(config, catalog, stores)
    }

    pub fn from_parts(config: Config, catalog: LanguageCatalog, stores: Stores) -> Result<Self> {
        let resolver = TranslationResolver::from_config(&config.translate)?
            .with_store(stores.translations.clone());

        info!("Session ready with {} languages", catalog.len());
        Ok(Self {
            config,
            catalog,
            resolver,
            history: History::new(stores.translations),
            favorites: Favorites::new(stores.favorites),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    pub fn resolver(&self) -> &TranslationResolver {
        &self.resolver
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    /// The pair to translate with, missing codes taken from the configured defaults
    pub fn language_pair(&self, source_lang: Option<&str>, target_lang: Option<&str>) -> LanguagePair {
        LanguagePair::new(
            source_lang.unwrap_or(self.config.translate.default_source.as_str()),
            target_lang.unwrap_or(self.config.translate.default_target.as_str()),
        )
    }

    /// Translate with the configured default languages filling in missing
    /// codes. Codes must be known to the catalog and the target cannot be `auto`.
    pub async fn translate(
        &self,
        text: &str,
        source_lang: Option<&str>,
        target_lang: Option<&str>,
    ) -> Result<Resolution> {
        let pair = self.language_pair(source_lang, target_lang);
        self.translate_pair(text, &pair).await
    }

    pub async fn translate_pair(&self, text: &str, pair: &LanguagePair) -> Result<Resolution> {
        let source_lang = pair.source.as_str();
        let target_lang = pair.target.as_str();

        validate(text, source_lang, target_lang)?;
        if is_auto(target_lang) {
            return Err(KotobaError::validation("target language cannot be auto"));
        }
        self.catalog.find_by_code(source_lang)?;
        self.catalog.find_by_code(target_lang)?;

        self.resolver.translate(text, source_lang, target_lang).await
    }
}
