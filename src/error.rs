use thiserror::Error;

#[derive(Error, Debug)]
pub enum KotobaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// User-correctable input problem; never retried automatically
    #[error("Validation error: {0}")]
    Validation(String),

    /// The record store rejected or failed a read or write
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Language not found: {0}")]
    LanguageNotFound(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: u64 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl KotobaError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// True for errors the user can fix by changing the input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, KotobaError>;
