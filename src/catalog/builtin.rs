use async_trait::async_trait;

use crate::error::Result;
use crate::language::Language;
use super::CatalogSource;

// (code, English name, native name, flag)
const LANGUAGES: &[(&str, &str, &str, &str)] = &[
    ("en", "English", "English", "🇺🇸"),
    ("es", "Spanish", "Español", "🇪🇸"),
    ("fr", "French", "Français", "🇫🇷"),
    ("de", "German", "Deutsch", "🇩🇪"),
    ("it", "Italian", "Italiano", "🇮🇹"),
    ("pt", "Portuguese", "Português", "🇵🇹"),
    ("ru", "Russian", "Русский", "🇷🇺"),
    ("ja", "Japanese", "日本語", "🇯🇵"),
    ("ko", "Korean", "한국어", "🇰🇷"),
    ("zh", "Chinese", "中文", "🇨🇳"),
    ("ar", "Arabic", "العربية", "🇸🇦"),
    ("hi", "Hindi", "हिन्दी", "🇮🇳"),
    ("tr", "Turkish", "Türkçe", "🇹🇷"),
    ("nl", "Dutch", "Nederlands", "🇳🇱"),
    ("pl", "Polish", "Polski", "🇵🇱"),
    ("sv", "Swedish", "Svenska", "🇸🇪"),
    ("da", "Danish", "Dansk", "🇩🇰"),
    ("no", "Norwegian", "Norsk", "🇳🇴"),
    ("fi", "Finnish", "Suomi", "🇫🇮"),
];

/// The language list shipped with kotoba, including the detection pseudo-language
pub struct BuiltinCatalog;

impl BuiltinCatalog {
    pub fn languages() -> Vec<Language> {
        let mut languages = vec![Language::detect()];
        languages.extend(LANGUAGES.iter().map(|(code, name, native, flag)| {
            Language::new(*code, *name)
                .with_native_name(*native)
                .with_flag(*flag)
        }));
        languages
    }
}

#[async_trait]
impl CatalogSource for BuiltinCatalog {
    async fn fetch_languages(&self) -> Result<Vec<Language>> {
        Ok(Self::languages())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LanguageCatalog;
    use std::collections::HashSet;

    #[test]
    fn test_codes_unique() {
        let languages = BuiltinCatalog::languages();
        let codes: HashSet<&str> = languages.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes.len(), languages.len());
    }

    #[tokio::test]
    async fn test_loads_into_sorted_catalog() {
        let catalog = LanguageCatalog::load(&BuiltinCatalog).await.unwrap();
        assert_eq!(catalog.len(), LANGUAGES.len() + 1);

        let names: Vec<&str> = catalog.list_all().iter().map(|l| l.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(catalog.find_by_code("hi").unwrap().native_name.as_deref(), Some("हिन्दी"));
    }
}
