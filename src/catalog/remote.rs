use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{KotobaError, Result};
use crate::language::Language;
use crate::store::remote::{FetchQuery, LANGUAGE_TABLE};
use crate::store::RecordClient;
use super::CatalogSource;

const LANGUAGE_FIELDS: &[&str] = &["Name", "code_c", "native_name_c", "flag_c"];

#[derive(Debug, Clone, Deserialize)]
struct LanguageRow {
    #[serde(rename = "Name")]
    name: String,
    code_c: String,
    native_name_c: Option<String>,
    flag_c: Option<String>,
}

impl From<LanguageRow> for Language {
    fn from(row: LanguageRow) -> Self {
        Self {
            code: row.code_c,
            name: row.name,
            native_name: row.native_name_c.filter(|s| !s.is_empty()),
            flag: row.flag_c.filter(|s| !s.is_empty()),
        }
    }
}

/// Language list read from the record API's language table
pub struct RemoteCatalog {
    client: RecordClient,
}

impl RemoteCatalog {
    pub fn new(client: RecordClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogSource for RemoteCatalog {
    async fn fetch_languages(&self) -> Result<Vec<Language>> {
        let query = FetchQuery::fields(LANGUAGE_FIELDS).ascending("Name");
        let rows: Vec<LanguageRow> = self
            .client
            .fetch_records(LANGUAGE_TABLE, &query)
            .await
            .map_err(|e| KotobaError::CatalogUnavailable(e.to_string()))?;

        debug!("Fetched {} language records", rows.len());
        Ok(rows.into_iter().map(Language::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_maps_to_language() {
        let row: LanguageRow = serde_json::from_value(json!({
            "Id": 4,
            "Name": "Spanish",
            "code_c": "es",
            "native_name_c": "Español",
            "flag_c": ""
        }))
        .unwrap();

        let language = Language::from(row);
        assert_eq!(language.code, "es");
        assert_eq!(language.native_name.as_deref(), Some("Español"));
        assert_eq!(language.flag, None);
    }
}
