use serde::{Deserialize, Serialize};
use std::fmt;

/// Pseudo-language code for "detect the source language"
pub const AUTO: &str = "auto";

/// Source language assumed when the caller asks for detection
pub const AUTO_SOURCE_FALLBACK: &str = "en";

pub fn is_auto(code: &str) -> bool {
    code == AUTO
}

/// A supported language as listed by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    /// English display name
    pub name: String,
    /// Name in the language's own script
    #[serde(default)]
    pub native_name: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
}

impl Language {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            native_name: None,
            flag: None,
        }
    }

    pub fn with_native_name(mut self, native_name: impl Into<String>) -> Self {
        self.native_name = Some(native_name.into());
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    /// The synthetic record standing in for source detection
    pub fn detect() -> Self {
        Self::new(AUTO, "Detect Language").with_flag("🌐")
    }

    pub fn is_auto(&self) -> bool {
        is_auto(&self.code)
    }

    /// Label for selectors, e.g. "🇪🇸 Spanish (Español)"
    pub fn label(&self) -> String {
        let mut label = String::new();
        if let Some(flag) = &self.flag {
            label.push_str(flag);
            label.push(' ');
        }
        label.push_str(&self.name);
        if let Some(native) = &self.native_name {
            if native != &self.name {
                label.push_str(&format!(" ({})", native));
            }
        }
        label
    }
}

/// An ordered (source, target) pair of language codes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// The pair used for phrase table lookup. An `auto` source reads the
    /// English-sourced tables; there is no detection.
    pub fn lookup_key(source: &str, target: &str) -> Self {
        if is_auto(source) {
            Self::new(AUTO_SOURCE_FALLBACK, target)
        } else {
            Self::new(source, target)
        }
    }

    pub fn is_same_language(&self) -> bool {
        self.source == self.target
    }

    /// Reverse direction. Not possible while the source is `auto`.
    pub fn swapped(&self) -> Option<Self> {
        if is_auto(&self.source) {
            None
        } else {
            Some(Self::new(self.target.clone(), self.source.clone()))
        }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_key_maps_auto_to_english() {
        assert_eq!(LanguagePair::lookup_key("auto", "fr"), LanguagePair::new("en", "fr"));
        assert_eq!(LanguagePair::lookup_key("de", "fr"), LanguagePair::new("de", "fr"));
    }

    #[test]
    fn test_swap_blocked_for_auto_source() {
        assert!(LanguagePair::new("auto", "es").swapped().is_none());
        assert_eq!(
            LanguagePair::new("en", "es").swapped(),
            Some(LanguagePair::new("es", "en"))
        );
    }

    #[test]
    fn test_label() {
        let spanish = Language::new("es", "Spanish")
            .with_native_name("Español")
            .with_flag("🇪🇸");
        assert_eq!(spanish.label(), "🇪🇸 Spanish (Español)");

        let english = Language::new("en", "English").with_native_name("English");
        assert_eq!(english.label(), "English");
    }
}
