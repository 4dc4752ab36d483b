//! HTTP client for a REST document store.
//!
//! This module provides a reqwest-based implementation of the
//! [`HealthStore`](crate::HealthStore) trait.
//! Documents live at:
//!
//! - `/v1/daily_health_data/{subject}/dates/{date}`
//! - `/v1/wellness_history/{subject}/scores/{date}`

use crate::retry::RetryPolicy;
use crate::{
    DailyHealthRecord, DatedHistoryPoint, HealthStore, StoreError, WellnessHistoryPoint,
};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};

const DAILY_COLLECTION: &str = "daily_health_data";
const HISTORY_COLLECTION: &str = "wellness_history";

/// Document store client using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestHealthStore {
    base_url: Url,
    api_key: SecretString,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl ReqwestHealthStore {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - Root URL of the document store (e.g., "https://store.example.com")
    /// * `api_key` - Bearer token sent with every request
    pub fn new(base_url: &str, api_key: SecretString) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| StoreError::Config(format!("invalid store url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Config(format!(
                "store url cannot be used as a base: {base_url}"
            )));
        }
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url,
            api_key,
            retry: RetryPolicy::default(),
            client,
        })
    }

    /// Replace the retry policy applied to reads.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Append percent-encoded path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Config("store url cannot be used as a base".into()))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    fn daily_url(&self, subject: &str, date: &str) -> Result<Url, StoreError> {
        self.url(&[DAILY_COLLECTION, subject, "dates", date])
    }

    fn history_url(&self, subject: &str, date: Option<&str>) -> Result<Url, StoreError> {
        match date {
            Some(d) => self.url(&[HISTORY_COLLECTION, subject, "scores", d]),
            None => self.url(&[HISTORY_COLLECTION, subject, "scores"]),
        }
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: Url) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(self.api_key.expose_secret())
    }

    /// Build an authenticated PUT request.
    fn put_request(&self, url: Url) -> reqwest::RequestBuilder {
        self.client
            .put(url)
            .bearer_auth(self.api_key.expose_secret())
    }

    /// Execute a request with no expected response body.
    async fn execute_empty(&self, request: reqwest::RequestBuilder) -> Result<(), StoreError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        Ok(())
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> StoreError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();

        match status {
            404 => StoreError::NotFound(body_snippet),
            401 | 403 => StoreError::Auth(body_snippet),
            _ => StoreError::from_status(status, body_snippet),
        }
    }

    async fn fetch_daily_record(&self, url: Url) -> Result<Option<DailyHealthRecord>, StoreError> {
        let resp = self.get_request(url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        let bytes = resp.bytes().await?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn fetch_history(
        &self,
        url: Url,
        since: &str,
    ) -> Result<Vec<DatedHistoryPoint>, StoreError> {
        let req = self
            .get_request(url)
            .query(&[("since", since), ("order", "desc")]);
        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl HealthStore for ReqwestHealthStore {
    async fn get_daily_record(
        &self,
        subject: &str,
        date: &str,
    ) -> Result<Option<DailyHealthRecord>, StoreError> {
        let url = self.daily_url(subject, date)?;
        self.retry
            .retry_async(
                || self.fetch_daily_record(url.clone()),
                StoreError::is_transient,
            )
            .await
    }

    async fn put_daily_record(
        &self,
        subject: &str,
        date: &str,
        record: &DailyHealthRecord,
    ) -> Result<(), StoreError> {
        let url = self.daily_url(subject, date)?;
        self.execute_empty(self.put_request(url).json(record)).await
    }

    async fn put_history_point(
        &self,
        subject: &str,
        date: &str,
        point: &WellnessHistoryPoint,
    ) -> Result<(), StoreError> {
        let url = self.history_url(subject, Some(date))?;
        self.execute_empty(self.put_request(url).json(point)).await
    }

    async fn get_history_since(
        &self,
        subject: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<DatedHistoryPoint>, StoreError> {
        let url = self.history_url(subject, None)?;
        let since = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut points = self
            .retry
            .retry_async(
                || self.fetch_history(url.clone(), &since),
                StoreError::is_transient,
            )
            .await?;
        // the store is asked for newest-first, but do not rely on it
        points.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(points)
    }
}
