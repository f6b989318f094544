use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::TranslateConfig;
use crate::error::{KotobaError, Result};
use crate::language::LanguagePair;
use crate::record::NewTranslation;
use crate::store::TranslationStore;
use super::phrasebook::{normalize, FallbackTags, PhraseTable};
use super::{Persistence, Resolution};

/// Check a translate request. The first failing rule wins.
pub fn validate(text: &str, source_lang: &str, target_lang: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(KotobaError::validation("text required"));
    }
    if source_lang == target_lang {
        return Err(KotobaError::validation("languages must differ"));
    }
    Ok(())
}

/// Turns text and a language pair into a recorded translation
pub struct TranslationResolver {
    phrases: PhraseTable,
    tags: FallbackTags,
    store: Option<Arc<dyn TranslationStore>>,
}

impl TranslationResolver {
    pub fn new(phrases: PhraseTable, tags: FallbackTags) -> Self {
        Self {
            phrases,
            tags,
            store: None,
        }
    }

    /// Builtin phrasebook plus the configured phrasebook file and fallback tag
    pub fn from_config(config: &TranslateConfig) -> Result<Self> {
        let mut phrases = PhraseTable::builtin();
        if let Some(path) = &config.phrasebook_path {
            phrases.merge_file(path)?;
        }
        Ok(Self::new(phrases, FallbackTags::new(config.fallback_tag.clone())))
    }

    pub fn with_store(mut self, store: Arc<dyn TranslationStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn phrases(&self) -> &PhraseTable {
        &self.phrases
    }

    /// Validate and resolve the translated text without recording anything
    pub fn resolve_text(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        validate(text, source_lang, target_lang)?;

        let pair = LanguagePair::lookup_key(source_lang, target_lang);
        let normalized = normalize(text);

        match self.phrases.lookup(&pair, &normalized) {
            Some(translation) => {
                debug!("Phrasebook hit for {}: {:?}", pair, normalized);
                Ok(translation.to_string())
            }
            None => {
                debug!("No phrasebook entry for {}: {:?}, using fallback", pair, normalized);
                Ok(self.tags.apply(text, target_lang))
            }
        }
    }

    /// Translate `text` and record the result.
    ///
    /// A store failure does not fail the call; the unrecorded translation is
    /// returned with [`Persistence::Failed`].
    pub async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<Resolution> {
        let translated_text = self.resolve_text(text, source_lang, target_lang)?;
        info!("Translated {} -> {}", source_lang, target_lang);

        let draft = NewTranslation {
            source_text: text.to_string(),
            translated_text,
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        };

        let Some(store) = &self.store else {
            return Ok(Resolution {
                translation: draft.into_unsaved(),
                persistence: Persistence::Skipped,
            });
        };

        match store.create(draft.clone()).await {
            Ok(translation) => {
                debug!("Recorded translation {:?}", translation.id);
                Ok(Resolution {
                    translation,
                    persistence: Persistence::Stored,
                })
            }
            Err(e) => {
                warn!("Failed to record translation: {}", e);
                Ok(Resolution {
                    translation: draft.into_unsaved(),
                    persistence: Persistence::Failed(e.to_string()),
                })
            }
        }
    }
}

impl Default for TranslationResolver {
    fn default() -> Self {
        Self::new(PhraseTable::builtin(), FallbackTags::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, MockTranslationStore};
    use tokio_test::{assert_err, assert_ok};

    fn resolver_with_memory() -> TranslationResolver {
        TranslationResolver::default().with_store(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_phrasebook_hit_ignores_case_and_padding() {
        let resolver = resolver_with_memory();
        let resolution = resolver.translate("  Hello, How are you? ", "en", "es").await.unwrap();
        assert_eq!(resolution.translation.translated_text, "hola, ¿cómo estás?");
        assert_eq!(resolution.translation.source_text, "  Hello, How are you? ");
        assert!(resolution.is_persisted());
        assert_eq!(resolution.translation.id, Some(1));
    }

    #[tokio::test]
    async fn test_unknown_phrase_uses_tag_and_original_text() {
        let resolver = resolver_with_memory();
        let resolution = resolver.translate("Purple elephant", "en", "es").await.unwrap();
        assert_eq!(resolution.translation.translated_text, "[ES] Purple elephant");
    }

    #[tokio::test]
    async fn test_auto_source_reads_english_tables() {
        let resolver = resolver_with_memory();
        let resolution = resolver.translate("thank you", "auto", "fr").await.unwrap();
        assert_eq!(resolution.translation.translated_text, "merci");
        assert_eq!(resolution.translation.source_lang, "auto");
    }

    #[tokio::test]
    async fn test_pair_without_table_falls_back() {
        let resolver = resolver_with_memory();
        let to_english = resolver.translate("hola", "es", "en").await.unwrap();
        assert_eq!(to_english.translation.translated_text, "[TRANSLATED] hola");

        let to_italian = resolver.translate("hello", "en", "it").await.unwrap();
        assert_eq!(to_italian.translation.translated_text, "[IT] hello");
    }

    #[tokio::test]
    async fn test_validation_order() {
        let resolver = resolver_with_memory();

        let err = resolver.translate("", "en", "en").await.unwrap_err();
        assert_eq!(err.to_string(), "Validation error: text required");

        let err = resolver.translate("   ", "en", "es").await.unwrap_err();
        assert!(err.is_validation());

        let err = resolver.translate("hello", "en", "en").await.unwrap_err();
        assert_eq!(err.to_string(), "Validation error: languages must differ");

        assert_err!(resolver.translate("hello", "auto", "auto").await);
    }

    #[tokio::test]
    async fn test_repeated_calls_create_distinct_records() {
        let store = Arc::new(MemoryStore::new());
        let resolver = TranslationResolver::default().with_store(store.clone());

        let first = assert_ok!(resolver.translate("good night", "en", "de").await);
        let second = assert_ok!(resolver.translate("good night", "en", "de").await);

        assert_ne!(first.translation.id, second.translation.id);
        assert_eq!(first.translation.translated_text, second.translation.translated_text);
        assert_eq!(TranslationStore::list(store.as_ref()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_returns_unrecorded_translation() {
        let mut store = MockTranslationStore::new();
        store
            .expect_create()
            .times(1)
            .returning(|_| Err(KotobaError::persistence("Invalid public key")));

        let resolver = TranslationResolver::default().with_store(Arc::new(store));
        let resolution = resolver.translate("yes", "en", "fr").await.unwrap();

        assert_eq!(resolution.translation.translated_text, "oui");
        assert_eq!(resolution.translation.id, None);
        assert!(!resolution.is_persisted());
        assert_eq!(resolution.warning(), Some("Persistence error: Invalid public key"));
    }

    #[tokio::test]
    async fn test_validation_failure_never_touches_store() {
        let mut store = MockTranslationStore::new();
        store.expect_create().never();

        let resolver = TranslationResolver::default().with_store(Arc::new(store));
        assert_err!(resolver.translate(" ", "en", "fr").await);
    }

    #[tokio::test]
    async fn test_without_store_is_skipped() {
        let resolver = TranslationResolver::default();
        let resolution = resolver.translate("please", "en", "de").await.unwrap();
        assert_eq!(resolution.translation.translated_text, "bitte");
        assert_eq!(resolution.persistence, Persistence::Skipped);
        assert_eq!(resolution.warning(), None);
    }

    #[test]
    fn test_from_config_merges_phrasebook_and_tag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phrases.toml");
        std::fs::write(
            &path,
            "[[table]]\nsource = \"en\"\ntarget = \"it\"\n[table.phrases]\nhello = \"ciao\"\n",
        )
        .unwrap();

        let mut config = crate::config::Config::default().translate;
        config.phrasebook_path = Some(path);
        config.fallback_tag = "[?] ".to_string();

        let resolver = TranslationResolver::from_config(&config).unwrap();
        assert_eq!(resolver.resolve_text("Hello", "auto", "it").unwrap(), "ciao");
        assert_eq!(resolver.resolve_text("hello", "en", "eo").unwrap(), "[?] hello");
    }
}
