//! Document-store accessor for daily health records and wellness score history.
//!
//! The [`HealthStore`] trait is the seam between the wellness core and whatever
//! provider holds durable state. Two implementations ship with the crate:
//! [`memory::InMemoryHealthStore`] and [`http_client::ReqwestHealthStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod memory;
pub mod retry;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("store returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        StoreError::Status {
            status,
            body: body.into(),
        }
    }

    /// Transport failures and 5xx answers may succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Http(_) => true,
            StoreError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Last-known metric values for one subject and day.
///
/// Every field is optional: `None` means "never reported", which is distinct
/// from a reported zero.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct DailyMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hydration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<f64>,
}

impl DailyMetrics {
    pub fn is_empty(&self) -> bool {
        self == &DailyMetrics::default()
    }
}

/// Merged state for one (subject, date) document.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct DailyHealthRecord {
    #[serde(flatten)]
    pub metrics: DailyMetrics,
    pub wellness_score: f64,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub last_update_source: Option<String>,
}

/// One score observation, stored under the date it belongs to.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct WellnessHistoryPoint {
    pub score: f64,
    pub timestamp: DateTime<Utc>,
}

/// A history point as read back, carrying its date key.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct DatedHistoryPoint {
    pub date: String,
    pub score: f64,
    pub timestamp: DateTime<Utc>,
}

#[async_trait]
pub trait HealthStore: Send + Sync + 'static {
    /// Fetch the daily record for a subject and date; `None` when nothing was stored yet.
    async fn get_daily_record(
        &self,
        subject: &str,
        date: &str,
    ) -> Result<Option<DailyHealthRecord>, StoreError>;

    /// Replace the daily record for a subject and date.
    async fn put_daily_record(
        &self,
        subject: &str,
        date: &str,
        record: &DailyHealthRecord,
    ) -> Result<(), StoreError>;

    /// Create or overwrite the history point for a subject and date.
    async fn put_history_point(
        &self,
        subject: &str,
        date: &str,
        point: &WellnessHistoryPoint,
    ) -> Result<(), StoreError>;

    /// History points with `timestamp >= since`, newest first.
    async fn get_history_since(
        &self,
        subject: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<DatedHistoryPoint>, StoreError>;
}
