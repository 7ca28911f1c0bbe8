//! Azure Table storage implementation
//!
//! Implements the [`TableStore`] trait over the Azure Table service REST
//! API with AAD bearer authentication. There is no dedicated crate for the
//! Table service in the current Azure SDK line, so this adapter drives the
//! REST API directly with `reqwest`, the same way the rest of the Azure
//! surface is reached.

use super::{TableRecord, TableStore};
use crate::adapters::auth::{TokenProvider, STORAGE_SCOPE};
use crate::domain::{Result, TableStoreError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;

const API_VERSION: &str = "2019-02-02";

/// Azure Table service client
pub struct AzureTableStore {
    /// Table service endpoint, e.g. `https://account.table.core.windows.net`
    endpoint: String,

    /// AAD token provider
    token_provider: Arc<dyn TokenProvider>,

    /// HTTP client for API calls
    http_client: reqwest::Client,
}

impl AzureTableStore {
    /// Create a new Table service client
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Table service endpoint URL
    /// * `token_provider` - AAD token provider
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(endpoint: &str, token_provider: Arc<dyn TokenProvider>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                TableStoreError::ConnectionFailed(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token_provider,
            http_client,
        })
    }

    /// Build a request with the headers every Table service call needs
    async fn request(&self, method: reqwest::Method, url: String) -> Result<reqwest::RequestBuilder> {
        let token = self.token_provider.bearer_token(STORAGE_SCOPE).await?;

        Ok(self
            .http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {token}"))
            .header("x-ms-version", API_VERSION)
            .header("x-ms-date", chrono::Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string())
            .header("DataServiceVersion", "3.0;NetFx")
            .header("Accept", "application/json;odata=fullmetadata"))
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> std::result::Result<reqwest::Response, TableStoreError> {
        request
            .send()
            .await
            .map_err(|e| TableStoreError::ConnectionFailed(e.to_string()))
    }

    fn entity_to_record(entity: &Map<String, Value>) -> TableRecord {
        let string_of = |v: &Value| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        let mut record = TableRecord::new(
            entity
                .get("PartitionKey")
                .map(string_of)
                .unwrap_or_default(),
            entity.get("RowKey").map(string_of).unwrap_or_default(),
        );

        record.etag = entity
            .get("odata.etag")
            .and_then(Value::as_str)
            .map(str::to_string);

        for (name, value) in entity {
            // System properties and odata annotations are not user data.
            if name == "PartitionKey"
                || name == "RowKey"
                || name == "Timestamp"
                || name.contains("odata.")
            {
                continue;
            }
            record.set(name, string_of(value));
        }

        record
    }

    fn record_to_entity(record: &TableRecord) -> Value {
        let mut entity = Map::new();
        entity.insert("PartitionKey".to_string(), json!(record.partition_key));
        entity.insert("RowKey".to_string(), json!(record.row_key));
        for (name, value) in &record.properties {
            entity.insert(name.clone(), json!(value));
        }
        Value::Object(entity)
    }
}

#[async_trait]
impl TableStore for AzureTableStore {
    async fn exists(&self, table: &str) -> Result<bool> {
        let url = format!("{}/Tables('{}')", self.endpoint, table);
        let response = self.send(self.request(reqwest::Method::GET, url).await?).await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(
                TableStoreError::AuthenticationFailed(format!(
                    "Table service returned {}",
                    response.status()
                ))
                .into(),
            ),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(TableStoreError::QueryFailed(format!(
                    "Table existence check returned {status}: {body}"
                ))
                .into())
            }
        }
    }

    async fn create_if_not_exists(&self, table: &str) -> Result<bool> {
        let url = format!("{}/Tables", self.endpoint);
        let response = self
            .send(
                self.request(reqwest::Method::POST, url)
                    .await?
                    .header("Prefer", "return-no-content")
                    .json(&json!({ "TableName": table })),
            )
            .await?;

        match response.status() {
            StatusCode::CREATED | StatusCode::NO_CONTENT => {
                tracing::debug!(table = %table, "Created table");
                Ok(true)
            }
            StatusCode::CONFLICT => Ok(false),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(TableStoreError::CreateFailed {
                    table: table.to_string(),
                    message: format!("service returned {status}: {body}"),
                }
                .into())
            }
        }
    }

    async fn get_first_record(&self, table: &str) -> Result<Option<TableRecord>> {
        let url = format!("{}/{}()?$top=1", self.endpoint, table);
        let response = self.send(self.request(reqwest::Method::GET, url).await?).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TableStoreError::QueryFailed(format!(
                "Entity query returned {status}: {body}"
            ))
            .into());
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TableStoreError::InvalidResponse(e.to_string()))?;

        let first = body
            .get("value")
            .and_then(Value::as_array)
            .and_then(|entities| entities.first())
            .and_then(Value::as_object);

        Ok(first.map(Self::entity_to_record))
    }

    async fn insert(&self, table: &str, record: &TableRecord) -> Result<()> {
        let url = format!("{}/{}", self.endpoint, table);
        let response = self
            .send(
                self.request(reqwest::Method::POST, url)
                    .await?
                    .header("Prefer", "return-no-content")
                    .json(&Self::record_to_entity(record)),
            )
            .await?;

        match response.status() {
            StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(()),
            // A concurrent bootstrapper already inserted the record; the
            // end state is identical.
            StatusCode::CONFLICT => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(TableStoreError::InsertFailed(format!(
                    "service returned {status}: {body}"
                ))
                .into())
            }
        }
    }

    async fn replace(&self, table: &str, record: &TableRecord) -> Result<()> {
        let url = format!(
            "{}/{}(PartitionKey='{}',RowKey='{}')",
            self.endpoint, table, record.partition_key, record.row_key
        );
        let if_match = record.etag.as_deref().unwrap_or("*");

        let response = self
            .send(
                self.request(reqwest::Method::PUT, url)
                    .await?
                    .header("If-Match", if_match)
                    .json(&Self::record_to_entity(record)),
            )
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            StatusCode::PRECONDITION_FAILED => {
                Err(TableStoreError::ConcurrencyConflict(table.to_string()).into())
            }
            StatusCode::NOT_FOUND => Err(TableStoreError::RecordNotFound(table.to_string()).into()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(TableStoreError::ReplaceFailed(format!(
                    "service returned {status}: {body}"
                ))
                .into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::StaticTokenProvider;
    use crate::domain::TidemarkError;

    fn store(endpoint: &str) -> AzureTableStore {
        AzureTableStore::new(endpoint, Arc::new(StaticTokenProvider("token".to_string()))).unwrap()
    }

    #[tokio::test]
    async fn test_exists_true_and_false() {
        let mut server = mockito::Server::new_async().await;

        let found = server
            .mock("GET", "/Tables('watermarks')")
            .match_header("authorization", "Bearer token")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let store = store(&server.url());
        assert!(store.exists("watermarks").await.unwrap());
        found.assert_async().await;

        let missing = server
            .mock("GET", "/Tables('watermarks')")
            .with_status(404)
            .create_async()
            .await;

        assert!(!store.exists("watermarks").await.unwrap());
        missing.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_if_not_exists_conflict_means_already_there() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/Tables")
            .with_status(409)
            .create_async()
            .await;

        let store = store(&server.url());
        assert!(!store.create_if_not_exists("watermarks").await.unwrap());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_first_record_parses_entity_and_etag() {
        let mut server = mockito::Server::new_async().await;

        let body = serde_json::json!({
            "value": [{
                "odata.etag": "W/\"datetime'2024-01-01T00%3A00%3A00Z'\"",
                "PartitionKey": "1",
                "RowKey": "1",
                "Timestamp": "2024-01-01T00:00:00Z",
                "LastProcessedDateTimeUtc": "2024-01-01T00:00:00Z",
                "LastProcessedDateTimeUtc@odata.type": "Edm.String"
            }]
        });

        let mock = server
            .mock("GET", "/watermarks()?$top=1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let store = store(&server.url());
        let record = store.get_first_record("watermarks").await.unwrap().unwrap();

        assert_eq!(record.partition_key, "1");
        assert_eq!(record.row_key, "1");
        assert_eq!(
            record.etag.as_deref(),
            Some("W/\"datetime'2024-01-01T00%3A00%3A00Z'\"")
        );
        assert_eq!(
            record.get("LastProcessedDateTimeUtc"),
            Some("2024-01-01T00:00:00Z")
        );
        // System properties and annotations stay out of the flat mapping.
        assert!(record.get("Timestamp").is_none());
        assert!(record.get("LastProcessedDateTimeUtc@odata.type").is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_first_record_empty_table() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/watermarks()?$top=1")
            .with_status(200)
            .with_body(r#"{"value": []}"#)
            .create_async()
            .await;

        let store = store(&server.url());
        assert!(store.get_first_record("watermarks").await.unwrap().is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_insert_conflict_is_success() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/watermarks")
            .with_status(409)
            .create_async()
            .await;

        let store = store(&server.url());
        let record = TableRecord::new("1", "1");
        assert!(store.insert("watermarks", &record).await.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_replace_sends_if_match_and_maps_precondition_failure() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("PUT", "/watermarks(PartitionKey='1',RowKey='1')")
            .match_header("if-match", "W/\"etag-1\"")
            .with_status(412)
            .create_async()
            .await;

        let store = store(&server.url());
        let mut record = TableRecord::new("1", "1");
        record.etag = Some("W/\"etag-1\"".to_string());

        let err = store.replace("watermarks", &record).await.unwrap_err();
        assert!(matches!(
            err,
            TidemarkError::TableStore(TableStoreError::ConcurrencyConflict(_))
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_replace_record_vanished() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("PUT", "/watermarks(PartitionKey='1',RowKey='1')")
            .with_status(404)
            .create_async()
            .await;

        let store = store(&server.url());
        let record = TableRecord::new("1", "1");

        let err = store.replace("watermarks", &record).await.unwrap_err();
        assert!(matches!(
            err,
            TidemarkError::TableStore(TableStoreError::RecordNotFound(_))
        ));
        mock.assert_async().await;
    }
}
