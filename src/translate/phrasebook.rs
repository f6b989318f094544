use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::error::{KotobaError, Result};
use crate::language::LanguagePair;

/// Suggestions offered to the user as one-click inputs
pub const QUICK_PHRASES: &[&str] = &[
    "Hello, how are you?",
    "Thank you very much",
    "Good morning",
    "Excuse me",
    "Where is the bathroom?",
    "How much does it cost?",
    "I don't understand",
    "Can you help me?",
    "Good night",
    "See you later",
];

const EN_ES: &[(&str, &str)] = &[
    ("hello", "hola"),
    ("goodbye", "adiós"),
    ("thank you", "gracias"),
    ("please", "por favor"),
    ("yes", "sí"),
    ("no", "no"),
    ("good morning", "buenos días"),
    ("good night", "buenas noches"),
    ("how are you", "cómo estás"),
    ("hello, how are you?", "hola, ¿cómo estás?"),
    ("thank you very much", "muchas gracias"),
    ("excuse me", "disculpe"),
    ("where is the bathroom?", "¿dónde está el baño?"),
    ("how much does it cost?", "¿cuánto cuesta?"),
    ("i don't understand", "no entiendo"),
    ("can you help me?", "¿puedes ayudarme?"),
    ("see you later", "hasta luego"),
];

const EN_FR: &[(&str, &str)] = &[
    ("hello", "bonjour"),
    ("goodbye", "au revoir"),
    ("thank you", "merci"),
    ("please", "s'il vous plaît"),
    ("yes", "oui"),
    ("no", "non"),
    ("good morning", "bonjour"),
    ("good night", "bonne nuit"),
    ("how are you", "comment allez-vous"),
    ("hello, how are you?", "bonjour, comment allez-vous?"),
    ("thank you very much", "merci beaucoup"),
    ("excuse me", "excusez-moi"),
    ("where is the bathroom?", "où sont les toilettes?"),
    ("how much does it cost?", "combien ça coûte?"),
    ("i don't understand", "je ne comprends pas"),
    ("can you help me?", "pouvez-vous m'aider?"),
    ("see you later", "à plus tard"),
];

const EN_DE: &[(&str, &str)] = &[
    ("hello", "hallo"),
    ("goodbye", "auf wiedersehen"),
    ("thank you", "danke"),
    ("please", "bitte"),
    ("yes", "ja"),
    ("no", "nein"),
    ("good morning", "guten morgen"),
    ("good night", "gute nacht"),
    ("how are you", "wie geht es dir"),
    ("hello, how are you?", "hallo, wie geht es dir?"),
    ("thank you very much", "vielen dank"),
    ("excuse me", "entschuldigung"),
    ("where is the bathroom?", "wo ist das badezimmer?"),
    ("how much does it cost?", "wie viel kostet das?"),
    ("i don't understand", "ich verstehe nicht"),
    ("can you help me?", "können sie mir helfen?"),
    ("see you later", "bis später"),
];

const EN_HI: &[(&str, &str)] = &[
    ("hello", "नमस्ते"),
    ("goodbye", "अलविदा"),
    ("thank you", "धन्यवाद"),
    ("please", "कृपया"),
    ("yes", "हाँ"),
    ("no", "नहीं"),
    ("good morning", "सुप्रभात"),
    ("good night", "शुभ रात्रि"),
    ("how are you", "आप कैसे हैं"),
    ("hello, how are you?", "नमस्ते, आप कैसे हैं?"),
    ("thank you very much", "बहुत धन्यवाद"),
    ("excuse me", "माफ़ कीजिये"),
    ("where is the bathroom?", "बाथरूम कहाँ है?"),
    ("how much does it cost?", "यह कितने का है?"),
    ("i don't understand", "मुझे समझ नहीं आया"),
    ("can you help me?", "क्या आप मेरी मदद कर सकते हैं?"),
    ("see you later", "बाद में मिलते हैं"),
];

// Target codes with their own fallback tag
const FALLBACK_TAGS: &[&str] = &[
    "es", "fr", "de", "it", "pt", "ru", "ja", "ko", "zh", "ar", "hi", "tr", "nl", "pl", "sv", "da",
    "no", "fi",
];

/// Lookup form of a phrase: trimmed and lowercased
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Hand-curated phrase translations keyed by language pair
#[derive(Debug, Clone, Default)]
pub struct PhraseTable {
    tables: HashMap<LanguagePair, HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct PhrasebookFile {
    #[serde(default)]
    table: Vec<PhrasebookEntry>,
}

#[derive(Debug, Deserialize)]
struct PhrasebookEntry {
    source: String,
    target: String,
    #[serde(default)]
    phrases: HashMap<String, String>,
}

impl PhraseTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The phrasebook shipped with kotoba: en-es, en-fr, en-de, en-hi
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (target, phrases) in [("es", EN_ES), ("fr", EN_FR), ("de", EN_DE), ("hi", EN_HI)] {
            let pair = LanguagePair::new("en", target);
            for (phrase, translation) in phrases {
                table.insert(&pair, phrase, translation);
            }
        }
        table
    }

    pub fn insert(&mut self, pair: &LanguagePair, phrase: &str, translation: &str) {
        self.tables
            .entry(pair.clone())
            .or_default()
            .insert(normalize(phrase), translation.to_string());
    }

    /// Merge the tables of a TOML phrasebook file, returning the number of phrases read.
    ///
    /// ```toml
    /// [[table]]
    /// source = "en"
    /// target = "it"
    /// [table.phrases]
    /// hello = "ciao"
    /// ```
    pub fn merge_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            KotobaError::Config(format!("Failed to read phrasebook {}: {}", path.display(), e))
        })?;
        let count = self.merge_str(&content)?;
        info!("Merged {} phrases from {}", count, path.display());
        Ok(count)
    }

    pub fn merge_str(&mut self, content: &str) -> Result<usize> {
        let file: PhrasebookFile = toml::from_str(content)
            .map_err(|e| KotobaError::Config(format!("Failed to parse phrasebook: {}", e)))?;

        let mut count = 0;
        for entry in file.table {
            let pair = LanguagePair::new(entry.source, entry.target);
            if pair.is_same_language() {
                return Err(KotobaError::Config(format!(
                    "Phrasebook table {} maps a language onto itself",
                    pair
                )));
            }
            for (phrase, translation) in &entry.phrases {
                self.insert(&pair, phrase, translation);
                count += 1;
            }
        }
        Ok(count)
    }

    /// Exact lookup of an already normalized phrase
    pub fn lookup(&self, pair: &LanguagePair, normalized: &str) -> Option<&str> {
        self.tables
            .get(pair)
            .and_then(|phrases| phrases.get(normalized))
            .map(String::as_str)
    }

    pub fn pairs(&self) -> impl Iterator<Item = &LanguagePair> {
        self.tables.keys()
    }
}

/// Markers prepended to text that has no phrasebook entry
#[derive(Debug, Clone)]
pub struct FallbackTags {
    tags: HashMap<String, String>,
    generic: String,
}

impl FallbackTags {
    pub fn new(generic: impl Into<String>) -> Self {
        let tags = FALLBACK_TAGS
            .iter()
            .map(|code| (code.to_string(), format!("[{}] ", code.to_uppercase())))
            .collect();
        Self {
            tags,
            generic: generic.into(),
        }
    }

    pub fn tag_for(&self, target: &str) -> &str {
        self.tags.get(target).map(String::as_str).unwrap_or(self.generic.as_str())
    }

    /// Tag `text` exactly as given, without trimming or recasing it
    pub fn apply(&self, text: &str, target: &str) -> String {
        format!("{}{}", self.tag_for(target), text)
    }
}

impl Default for FallbackTags {
    fn default() -> Self {
        Self::new("[TRANSLATED] ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let table = PhraseTable::builtin();
        let en_es = LanguagePair::new("en", "es");
        assert_eq!(table.lookup(&en_es, "hello, how are you?"), Some("hola, ¿cómo estás?"));
        assert_eq!(table.lookup(&en_es, "purple elephant"), None);
        assert!(!table.pairs().any(|pair| pair == &LanguagePair::new("es", "en")));
        assert_eq!(table.pairs().count(), 4);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Thank You \n"), "thank you");
    }

    #[test]
    fn test_merge_str_normalizes_phrases() {
        let mut table = PhraseTable::builtin();
        let count = table
            .merge_str(
                r#"
                [[table]]
                source = "en"
                target = "it"
                [table.phrases]
                "Hello" = "ciao"
                "thank you" = "grazie"

                [[table]]
                source = "en"
                target = "es"
                [table.phrases]
                "see you tomorrow" = "hasta mañana"
                "#,
            )
            .unwrap();

        assert_eq!(count, 3);
        assert_eq!(table.lookup(&LanguagePair::new("en", "it"), "hello"), Some("ciao"));
        assert_eq!(
            table.lookup(&LanguagePair::new("en", "es"), "see you tomorrow"),
            Some("hasta mañana")
        );
        // builtin entries are kept
        assert_eq!(table.lookup(&LanguagePair::new("en", "es"), "hello"), Some("hola"));
    }

    #[test]
    fn test_merge_rejects_same_language_table() {
        let mut table = PhraseTable::empty();
        let err = table
            .merge_str("[[table]]\nsource = \"en\"\ntarget = \"en\"\n")
            .unwrap_err();
        assert!(matches!(err, KotobaError::Config(_)));
    }

    #[test]
    fn test_fallback_tags() {
        let tags = FallbackTags::default();
        assert_eq!(tags.tag_for("es"), "[ES] ");
        assert_eq!(tags.tag_for("fi"), "[FI] ");
        assert_eq!(tags.tag_for("en"), "[TRANSLATED] ");
        assert_eq!(tags.apply(" Purple elephant ", "fr"), "[FR]  Purple elephant ");
    }
}
