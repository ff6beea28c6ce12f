//! API client for the Learn Narish content server (a Directus instance).
//!
//! This module provides the `ApiClient` struct for reading paginated,
//! filtered item listings. It is the default [`RemoteSource`] behind the
//! sync engine.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::Collection;
use crate::sync::source::{changed_since_filter, RemotePage, RemoteSource};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL of the public content server
pub const DEFAULT_API_BASE_URL: &str = "https://learnnarish.llblumire.co.uk/data";

/// HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Deserialize)]
struct ItemsResponse {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    meta: Option<ItemsMeta>,
}

#[derive(Debug, Deserialize)]
struct ItemsMeta {
    /// Older servers send the count as a string.
    #[serde(default)]
    filter_count: Option<Value>,
}

impl ItemsResponse {
    fn filter_count(&self) -> Result<u64, ApiError> {
        let count = self.meta.as_ref().and_then(|m| m.filter_count.as_ref());
        match count {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.parse().ok(),
            _ => None,
        }
        .ok_or_else(|| ApiError::InvalidResponse("missing meta.filter_count".to_string()))
    }
}

/// API client for the content server.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    page_limit: Option<u32>,
}

impl ApiClient {
    /// Create a client for `base_url` with the default timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            page_limit: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Self::with_timeout(&config.api_base_url(), config.request_timeout())?;
        Ok(client.with_page_limit(config.page_limit))
    }

    /// Ask the server for `limit` records per page instead of its default
    pub fn with_page_limit(mut self, limit: Option<u32>) -> Self {
        self.page_limit = limit;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn items_url(&self, collection: Collection) -> String {
        format!("{}/items/{}", self.base_url, collection.as_str())
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        collection: Collection,
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(collection.as_str(), status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        collection: Collection,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.items_url(collection);
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(&url)
                .header(header::ACCEPT, "application/json")
                .query(query)
                .send()
                .await
                .map_err(ApiError::from)
                .with_context(|| format!("Failed to send GET request to {}", url))?;

            match Self::check_response_for_retry(collection, response).await? {
                Some(response) => {
                    return response
                        .json()
                        .await
                        .with_context(|| format!("Failed to parse JSON response from {}", url));
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = %url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }

    /// Fetch one page of `collection` records created or updated after `since`
    pub async fn fetch_changed(
        &self,
        collection: Collection,
        since: DateTime<Utc>,
        page: u32,
    ) -> Result<RemotePage> {
        let mut query = vec![
            ("filter", changed_since_filter(since).to_string()),
            ("meta", "filter_count".to_string()),
            ("page", page.to_string()),
        ];
        if let Some(limit) = self.page_limit {
            query.push(("limit", limit.to_string()));
        }

        let response: ItemsResponse = self.get(collection, &query).await?;
        let total = response.filter_count()?;
        debug!(
            collection = %collection,
            page,
            received = response.data.len(),
            total,
            "Fetched page"
        );

        Ok(RemotePage {
            records: response.data,
            total,
        })
    }
}

#[async_trait]
impl RemoteSource for ApiClient {
    async fn fetch_page(
        &self,
        collection: Collection,
        since: DateTime<Utc>,
        page: u32,
    ) -> Result<RemotePage> {
        self.fetch_changed(collection, since, page).await
    }
}
