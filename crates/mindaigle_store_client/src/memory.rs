//! Process-local [`HealthStore`] backed by hash maps.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    DailyHealthRecord, DatedHistoryPoint, HealthStore, StoreError, WellnessHistoryPoint,
};

type DayKey = (String, String);

#[derive(Debug, Default)]
pub struct InMemoryHealthStore {
    records: RwLock<HashMap<DayKey, DailyHealthRecord>>,
    history: RwLock<HashMap<DayKey, WellnessHistoryPoint>>,
}

impl InMemoryHealthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of history points stored for a subject, regardless of age.
    pub async fn history_len(&self, subject: &str) -> usize {
        let history = self.history.read().await;
        history.keys().filter(|(s, _)| s == subject).count()
    }
}

fn key(subject: &str, date: &str) -> DayKey {
    (subject.to_string(), date.to_string())
}

#[async_trait]
impl HealthStore for InMemoryHealthStore {
    async fn get_daily_record(
        &self,
        subject: &str,
        date: &str,
    ) -> Result<Option<DailyHealthRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(&key(subject, date)).cloned())
    }

    async fn put_daily_record(
        &self,
        subject: &str,
        date: &str,
        record: &DailyHealthRecord,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(key(subject, date), record.clone());
        Ok(())
    }

    async fn put_history_point(
        &self,
        subject: &str,
        date: &str,
        point: &WellnessHistoryPoint,
    ) -> Result<(), StoreError> {
        let mut history = self.history.write().await;
        history.insert(key(subject, date), point.clone());
        Ok(())
    }

    async fn get_history_since(
        &self,
        subject: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<DatedHistoryPoint>, StoreError> {
        let history = self.history.read().await;
        let mut points: Vec<DatedHistoryPoint> = history
            .iter()
            .filter(|((s, _), p)| s == subject && p.timestamp >= since)
            .map(|((_, date), p)| DatedHistoryPoint {
                date: date.clone(),
                score: p.score,
                timestamp: p.timestamp,
            })
            .collect();
        points.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(points)
    }
}
