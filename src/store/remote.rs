use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::error::{KotobaError, Result};
use crate::record::{Favorite, FavoriteUpdate, NewFavorite, NewTranslation, Translation, TranslationUpdate};
use super::{FavoriteStore, TranslationStore};

pub const TRANSLATION_TABLE: &str = "translation_c";
pub const FAVORITE_TABLE: &str = "favorite_c";
pub const LANGUAGE_TABLE: &str = "language_c";

const TRANSLATION_FIELDS: &[&str] = &[
    "Name",
    "source_text_c",
    "translated_text_c",
    "source_lang_c",
    "target_lang_c",
    "timestamp_c",
];

const FAVORITE_FIELDS: &[&str] = &["Name", "translation_id_c", "category_c", "added_at_c"];

/// Response envelope of the record API
#[derive(Debug, Clone, Deserialize)]
pub struct RecordResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
    pub results: Option<Vec<RecordResult<T>>>,
}

/// Per-record outcome of a create, update or delete
#[derive(Debug, Clone, Deserialize)]
pub struct RecordResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<FieldError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldError {
    #[serde(rename = "fieldLabel")]
    pub field_label: String,
    pub message: String,
}

impl<T> RecordResponse<T> {
    fn check(&self, action: &str) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(KotobaError::persistence(
                self.message
                    .clone()
                    .unwrap_or_else(|| format!("{} failed", action)),
            ))
        }
    }

    /// First failed per-record result as an error
    fn first_failure(results: &[RecordResult<T>]) -> Option<KotobaError> {
        let failed = results.iter().find(|r| !r.success)?;
        let message = failed
            .errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map(|e| format!("{}: {}", e.field_label, e.message))
            .or_else(|| failed.message.clone())
            .unwrap_or_else(|| "record rejected".to_string());
        Some(KotobaError::persistence(message))
    }

    /// The single record written by a create or update
    pub fn into_written(self, action: &str) -> Result<T> {
        self.check(action)?;
        let results = self.results.unwrap_or_default();
        if let Some(err) = Self::first_failure(&results) {
            warn!("{} rejected by record API: {}", action, err);
            return Err(err);
        }
        results
            .into_iter()
            .find_map(|r| if r.success { r.data } else { None })
            .ok_or_else(|| KotobaError::persistence(format!("{} returned no record", action)))
    }

    /// Whether a delete removed anything
    pub fn into_deleted(self, action: &str) -> Result<bool> {
        self.check(action)?;
        let results = self.results.unwrap_or_default();
        if let Some(failed) = results.iter().find(|r| !r.success) {
            if let Some(message) = &failed.message {
                return Err(KotobaError::persistence(message.clone()));
            }
        }
        Ok(results.iter().any(|r| r.success))
    }
}

/// Query parameters of a fetch, in the record API's wire shape
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchQuery {
    fields: Vec<serde_json::Value>,
    #[serde(rename = "orderBy", skip_serializing_if = "Vec::is_empty")]
    order_by: Vec<serde_json::Value>,
    #[serde(rename = "where", skip_serializing_if = "Vec::is_empty")]
    filters: Vec<serde_json::Value>,
}

impl FetchQuery {
    pub fn fields(names: &[&str]) -> Self {
        Self {
            fields: names.iter().map(|name| json!({ "field": { "Name": name } })).collect(),
            ..Default::default()
        }
    }

    pub fn ascending(mut self, field: &str) -> Self {
        self.order_by.push(json!({ "fieldName": field, "sorttype": "ASC" }));
        self
    }

    pub fn descending(mut self, field: &str) -> Self {
        self.order_by.push(json!({ "fieldName": field, "sorttype": "DESC" }));
        self
    }

    pub fn equal_to(mut self, field: &str, value: impl Into<String>) -> Self {
        self.filters.push(json!({
            "FieldName": field,
            "Operator": "EqualTo",
            "Values": [value.into()],
        }));
        self
    }
}

/// HTTP client for the remote record API
pub struct RecordClient {
    client: Client,
    endpoint: String,
    project_id: String,
    public_key: String,
}

impl RecordClient {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            public_key: config.public_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/api/records/{}", self.endpoint, table)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<RecordResponse<T>> {
        let response = request
            .header("X-Project-Id", &self.project_id)
            .header("X-Public-Key", &self.public_key)
            .send()
            .await
            .map_err(|e| KotobaError::persistence(format!("Record API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(KotobaError::persistence(format!(
                "Record API error {}: {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| KotobaError::persistence(format!("Failed to parse record API response: {}", e)))
    }

    pub async fn fetch_records<T: DeserializeOwned>(&self, table: &str, query: &FetchQuery) -> Result<Vec<T>> {
        let url = format!("{}/fetch", self.table_url(table));
        debug!("Fetching records: {}", url);

        let response: RecordResponse<Vec<T>> = self.send(self.client.post(&url).json(query)).await?;
        response.check("Fetch")?;
        Ok(response.data.unwrap_or_default())
    }

    pub async fn get_record<T: DeserializeOwned>(&self, table: &str, id: u64, fields: &[&str]) -> Result<Option<T>> {
        let url = format!("{}/{}", self.table_url(table), id);
        debug!("Fetching record: {}", url);

        let query = FetchQuery::fields(fields);
        let response: RecordResponse<T> = self.send(self.client.post(&url).json(&query)).await?;
        response.check("Get")?;
        Ok(response.data)
    }

    pub async fn create_record<B: Serialize, T: DeserializeOwned>(&self, table: &str, record: &B) -> Result<T> {
        let url = self.table_url(table);
        debug!("Creating record in {}", table);

        let body = json!({ "records": [record] });
        let response: RecordResponse<T> = self.send(self.client.post(&url).json(&body)).await?;
        response.into_written("Create")
    }

    pub async fn update_record<B: Serialize, T: DeserializeOwned>(&self, table: &str, record: &B) -> Result<T> {
        let url = self.table_url(table);
        debug!("Updating record in {}", table);

        let body = json!({ "records": [record] });
        let response: RecordResponse<T> = self.send(self.client.patch(&url).json(&body)).await?;
        response.into_written("Update")
    }

    pub async fn delete_record(&self, table: &str, id: u64) -> Result<bool> {
        let url = self.table_url(table);
        debug!("Deleting record {} from {}", id, table);

        let body = json!({ "RecordIds": [id] });
        let response: RecordResponse<serde_json::Value> =
            self.send(self.client.delete(&url).json(&body)).await?;
        response.into_deleted("Delete")
    }
}

// The record API stores `translation_id_c` as text
fn id_from_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TranslationRow {
    #[serde(rename = "Id")]
    id: u64,
    #[serde(rename = "source_text_c", default)]
    source_text: String,
    #[serde(rename = "translated_text_c", default)]
    translated_text: String,
    #[serde(rename = "source_lang_c", default)]
    source_lang: String,
    #[serde(rename = "target_lang_c", default)]
    target_lang: String,
    #[serde(rename = "timestamp_c")]
    timestamp: DateTime<Utc>,
}

impl From<TranslationRow> for Translation {
    fn from(row: TranslationRow) -> Self {
        Self {
            id: Some(row.id),
            source_text: row.source_text,
            translated_text: row.translated_text,
            source_lang: row.source_lang,
            target_lang: row.target_lang,
            timestamp: row.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct TranslationFields<'a> {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_text_c: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    translated_text_c: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang_c: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_lang_c: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp_c: Option<DateTime<Utc>>,
}

fn record_name<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.is_empty() { fallback } else { text }
}

impl<'a> TranslationFields<'a> {
    fn for_create(translation: &'a NewTranslation, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name: Some(record_name(&translation.source_text, "Translation")),
            source_text_c: Some(&translation.source_text),
            translated_text_c: Some(&translation.translated_text),
            source_lang_c: Some(&translation.source_lang),
            target_lang_c: Some(&translation.target_lang),
            timestamp_c: Some(timestamp),
        }
    }

    fn for_update(id: u64, update: &'a TranslationUpdate) -> Self {
        Self {
            id: Some(id),
            name: update.source_text.as_deref().map(|text| record_name(text, "Translation")),
            source_text_c: update.source_text.as_deref(),
            translated_text_c: update.translated_text.as_deref(),
            source_lang_c: update.source_lang.as_deref(),
            target_lang_c: update.target_lang.as_deref(),
            timestamp_c: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct FavoriteRow {
    #[serde(rename = "Id")]
    id: u64,
    #[serde(rename = "translation_id_c", deserialize_with = "id_from_string_or_number")]
    translation_id: u64,
    #[serde(rename = "category_c", default)]
    category: String,
    #[serde(rename = "added_at_c")]
    added_at: DateTime<Utc>,
}

impl From<FavoriteRow> for Favorite {
    fn from(row: FavoriteRow) -> Self {
        Self {
            id: row.id,
            translation_id: row.translation_id,
            category: row.category,
            added_at: row.added_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct FavoriteFields<'a> {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    translation_id_c: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_c: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    added_at_c: Option<DateTime<Utc>>,
}

/// Record store backed by the remote record API
pub struct RemoteStore {
    client: RecordClient,
}

impl RemoteStore {
    pub fn new(client: RecordClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TranslationStore for RemoteStore {
    async fn create(&self, translation: NewTranslation) -> Result<Translation> {
        let fields = TranslationFields::for_create(&translation, Utc::now());
        let row: TranslationRow = self.client.create_record(TRANSLATION_TABLE, &fields).await?;
        Ok(row.into())
    }

    async fn get(&self, id: u64) -> Result<Translation> {
        let row: Option<TranslationRow> = self
            .client
            .get_record(TRANSLATION_TABLE, id, TRANSLATION_FIELDS)
            .await?;
        row.map(Translation::from)
            .ok_or(KotobaError::NotFound { kind: "Translation", id })
    }

    async fn list(&self) -> Result<Vec<Translation>> {
        let query = FetchQuery::fields(TRANSLATION_FIELDS).descending("timestamp_c");
        let rows: Vec<TranslationRow> = self.client.fetch_records(TRANSLATION_TABLE, &query).await?;
        Ok(rows.into_iter().map(Translation::from).collect())
    }

    async fn update(&self, id: u64, update: TranslationUpdate) -> Result<Translation> {
        let fields = TranslationFields::for_update(id, &update);
        let row: TranslationRow = self.client.update_record(TRANSLATION_TABLE, &fields).await?;
        Ok(row.into())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        self.client.delete_record(TRANSLATION_TABLE, id).await
    }
}

#[async_trait]
impl FavoriteStore for RemoteStore {
    async fn create(&self, favorite: NewFavorite) -> Result<Favorite> {
        let fields = FavoriteFields {
            id: None,
            name: Some(record_name(&favorite.category, "Favorite")),
            translation_id_c: Some(favorite.translation_id.to_string()),
            category_c: Some(&favorite.category),
            added_at_c: Some(Utc::now()),
        };
        let row: FavoriteRow = self.client.create_record(FAVORITE_TABLE, &fields).await?;
        Ok(row.into())
    }

    async fn get(&self, id: u64) -> Result<Favorite> {
        let row: Option<FavoriteRow> = self.client.get_record(FAVORITE_TABLE, id, FAVORITE_FIELDS).await?;
        row.map(Favorite::from)
            .ok_or(KotobaError::NotFound { kind: "Favorite", id })
    }

    async fn list(&self) -> Result<Vec<Favorite>> {
        let query = FetchQuery::fields(FAVORITE_FIELDS).descending("added_at_c");
        let rows: Vec<FavoriteRow> = self.client.fetch_records(FAVORITE_TABLE, &query).await?;
        Ok(rows.into_iter().map(Favorite::from).collect())
    }

    async fn find_by_translation(&self, translation_id: u64) -> Result<Option<Favorite>> {
        let query = FetchQuery::fields(FAVORITE_FIELDS).equal_to("translation_id_c", translation_id.to_string());
        let rows: Vec<FavoriteRow> = self.client.fetch_records(FAVORITE_TABLE, &query).await?;
        Ok(rows.into_iter().next().map(Favorite::from))
    }

    async fn update(&self, id: u64, update: FavoriteUpdate) -> Result<Favorite> {
        let fields = FavoriteFields {
            id: Some(id),
            name: update.category.as_deref().map(|c| record_name(c, "Favorite")),
            translation_id_c: update.translation_id.map(|t| t.to_string()),
            category_c: update.category.as_deref(),
            added_at_c: None,
        };
        let row: FavoriteRow = self.client.update_record(FAVORITE_TABLE, &fields).await?;
        Ok(row.into())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        self.client.delete_record(FAVORITE_TABLE, id).await
    }
}
