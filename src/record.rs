use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resolved translation as kept by the record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    /// Assigned by the store; `None` when the translation was never persisted
    pub id: Option<u64>,
    pub source_text: String,
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub timestamp: DateTime<Utc>,
}

/// Fields supplied on create. Id and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTranslation {
    pub source_text: String,
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl NewTranslation {
    /// Materialize without a store, stamped with the current time
    pub fn into_unsaved(self) -> Translation {
        Translation {
            id: None,
            source_text: self.source_text,
            translated_text: self.translated_text,
            source_lang: self.source_lang,
            target_lang: self.target_lang,
            timestamp: Utc::now(),
        }
    }

    pub fn into_saved(self, id: u64, timestamp: DateTime<Utc>) -> Translation {
        Translation {
            id: Some(id),
            source_text: self.source_text,
            translated_text: self.translated_text,
            source_lang: self.source_lang,
            target_lang: self.target_lang,
            timestamp,
        }
    }
}

/// Partial update used for corrections. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationUpdate {
    pub source_text: Option<String>,
    pub translated_text: Option<String>,
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
}

impl TranslationUpdate {
    pub fn is_empty(&self) -> bool {
        self.source_text.is_none()
            && self.translated_text.is_none()
            && self.source_lang.is_none()
            && self.target_lang.is_none()
    }

    pub fn apply_to(&self, translation: &mut Translation) {
        if let Some(text) = &self.source_text {
            translation.source_text = text.clone();
        }
        if let Some(text) = &self.translated_text {
            translation.translated_text = text.clone();
        }
        if let Some(lang) = &self.source_lang {
            translation.source_lang = lang.clone();
        }
        if let Some(lang) = &self.target_lang {
            translation.target_lang = lang.clone();
        }
    }
}

/// A translation the user marked as a favorite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: u64,
    pub translation_id: u64,
    pub category: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFavorite {
    pub translation_id: u64,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteUpdate {
    pub translation_id: Option<u64>,
    pub category: Option<String>,
}

impl FavoriteUpdate {
    pub fn apply_to(&self, favorite: &mut Favorite) {
        if let Some(translation_id) = self.translation_id {
            favorite.translation_id = translation_id;
        }
        if let Some(category) = &self.category {
            favorite.category = category.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Translation {
        NewTranslation {
            source_text: "hello".to_string(),
            translated_text: "hola".to_string(),
            source_lang: "en".to_string(),
            target_lang: "es".to_string(),
        }
        .into_saved(1, Utc::now())
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut translation = sample();
        let before = translation.timestamp;

        let update = TranslationUpdate {
            translated_text: Some("¡hola!".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut translation);

        assert_eq!(translation.translated_text, "¡hola!");
        assert_eq!(translation.source_text, "hello");
        assert_eq!(translation.timestamp, before);
    }

    #[test]
    fn test_empty_update() {
        assert!(TranslationUpdate::default().is_empty());
        assert!(!TranslationUpdate {
            target_lang: Some("fr".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
