//! HTTP client for the store's PostgREST API.

use std::fmt::Display;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use url::Url;

use crate::records::{ID_COLUMN, REST_PREFIX};
use crate::{Query, StoreConfig, StoreError};

/// Client for a hosted table store exposing a PostgREST API.
///
/// Each call is a single request; failures are returned as-is.
#[derive(Clone)]
pub struct StoreClient {
    http: Client,
    config: StoreConfig,
}

impl StoreClient {
    /// Create a new client for the configured store.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        Ok(self
            .config
            .url()
            .join(&format!("{}/{}", REST_PREFIX, table))?)
    }

    /// Attach the access credential to a request.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.config.api_key();
        request
            .header("apikey", key)
            .header("Authorization", format!("Bearer {}", key))
    }

    /// List rows of a table.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>, StoreError> {
        let url = self.table_url(table)?;
        let params = query.to_params();
        debug!(table = %table, params = ?params, "listing rows");

        let response = self
            .authorize(self.http.get(url))
            .query(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Insert one row and return the store's representation of it.
    pub async fn insert<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        record: &T,
    ) -> Result<R, StoreError> {
        let url = self.table_url(table)?;

        // PostgREST accepts a single object or an array; the array form always
        // returns an array representation.
        let body = serde_json::to_value([record])?;
        debug!(table = %table, body = %body, "inserting row");

        let response = self
            .authorize(self.http.post(url))
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;

        let rows: Vec<R> = self.handle_response(response).await?;
        first_row(rows, "insert")
    }

    /// Patch one row by id and return the store's updated representation.
    pub async fn update<P: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        id: impl Display,
        patch: &P,
    ) -> Result<R, StoreError> {
        let url = self.table_url(table)?;
        let filter = format!("eq.{}", id);
        debug!(table = %table, id = %id, "updating row");

        let response = self
            .authorize(self.http.patch(url))
            .query(&[(ID_COLUMN, filter.as_str())])
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;

        let rows: Vec<R> = self.handle_response(response).await?;
        first_row(rows, "update")
    }

    /// Handle HTTP response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            return Err(StoreError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            let text = response.text().await.map_err(|e| {
                StoreError::InvalidResponse(format!(
                    "request failed ({}): failed to read response: {}",
                    status, e
                ))
            })?;

            // Try to parse as a PostgREST error
            if let Ok(api_error) = serde_json::from_str::<ApiErrorBody>(&text) {
                warn!(status = status.as_u16(), code = ?api_error.code, "store rejected request");
                return Err(StoreError::Api {
                    status: status.as_u16(),
                    code: api_error.code,
                    message: api_error.message,
                    details: api_error.details,
                    hint: api_error.hint,
                });
            }

            return Err(StoreError::InvalidResponse(format!(
                "request failed ({}): {}",
                status, text
            )));
        }

        let body = response.json().await?;
        Ok(body)
    }
}

fn first_row<R>(rows: Vec<R>, operation: &str) -> Result<R, StoreError> {
    rows.into_iter().next().ok_or_else(|| {
        StoreError::InvalidResponse(format!("{} returned no representation", operation))
    })
}

/// PostgREST error response format.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    message: String,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}
