use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{KotobaError, Result};

// Default values for optional configuration keys
fn default_timeout_secs() -> u64 {
    30
}

fn default_fallback_tag() -> String {
    "[TRANSLATED] ".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub catalog: CatalogConfig,
    pub translate: TranslateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Storage strategy for translations and favorites
    pub mode: StoreMode,
    /// Snapshot file used by the file store
    pub path: PathBuf,
    /// Base URL of the remote record API
    pub endpoint: String,
    /// Project identifier sent to the record API
    pub project_id: String,
    /// Public key sent to the record API
    pub public_key: String,
    /// HTTP timeout for record API calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    /// Memory: records live for the lifetime of the process
    Memory,
    /// File: in-memory records snapshotted to a JSON file after each write
    File,
    /// Remote: records kept by the remote record API
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Where the language list comes from
    pub source: CatalogSourceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSourceKind {
    /// Builtin: the language list shipped with kotoba
    Builtin,
    /// Remote: the `language_c` table of the record API (uses the store endpoint)
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Source language used when none is given
    pub default_source: String,
    /// Target language used when none is given
    pub default_target: String,
    /// Tag prepended to fallback translations for targets without their own tag
    #[serde(default = "default_fallback_tag")]
    pub fallback_tag: String,
    /// Additional phrase tables merged into the builtin phrasebook
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrasebook_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                mode: StoreMode::File,
                path: PathBuf::from(".kotoba/records.json"),
                endpoint: "http://localhost:8080".to_string(),
                project_id: String::new(),
                public_key: String::new(),
                timeout_secs: default_timeout_secs(),
            },
            catalog: CatalogConfig {
                source: CatalogSourceKind::Builtin,
            },
            translate: TranslateConfig {
                default_source: "auto".to_string(),
                default_target: "es".to_string(),
                fallback_tag: default_fallback_tag(),
                phrasebook_path: None,
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| KotobaError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| KotobaError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| KotobaError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| KotobaError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
