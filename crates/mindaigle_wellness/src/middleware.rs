//! Middleware layer for cross-cutting concerns.
//!
//! Sits between the wellness service and the store and adds:
//! - Debug timings per store operation
//! - `store_operations_total` / `store_operation_seconds` metrics

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use mindaigle_store_client::{
    DailyHealthRecord, DatedHistoryPoint, HealthStore, StoreError, WellnessHistoryPoint,
};
use tracing::debug;

/// Wrapper for any [`HealthStore`] that records timings and outcomes.
#[derive(Clone)]
pub struct InstrumentedStore<S: HealthStore> {
    inner: Arc<S>,
}

impl<S: HealthStore> InstrumentedStore<S> {
    /// Create a new instrumented wrapper.
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Execute a fallible store operation with logging and metrics.
    async fn with_logging<F, Fut, T>(
        &self,
        operation: F,
        name: &'static str,
    ) -> Result<T, StoreError>
    where
        F: FnOnce(Arc<S>) -> Fut,
        Fut: std::future::Future<Output = Result<T, StoreError>>,
    {
        let start = Instant::now();
        debug!("Starting store operation: {}", name);

        let result = operation(self.inner.clone()).await;

        let duration = start.elapsed();
        let outcome = match &result {
            Ok(_) => {
                debug!("Store operation completed: {} in {:?}", name, duration);
                "ok"
            }
            Err(e) => {
                debug!("Store operation failed: {} in {:?} - error: {}", name, duration, e);
                "error"
            }
        };
        metrics::counter!("store_operations_total", "op" => name, "result" => outcome)
            .increment(1);
        metrics::histogram!("store_operation_seconds", "op" => name)
            .record(duration.as_secs_f64());

        result
    }
}

#[async_trait::async_trait]
impl<S: HealthStore> HealthStore for InstrumentedStore<S> {
    async fn get_daily_record(
        &self,
        subject: &str,
        date: &str,
    ) -> Result<Option<DailyHealthRecord>, StoreError> {
        self.with_logging(
            |store| async move { store.get_daily_record(subject, date).await },
            "get_daily_record",
        )
        .await
    }

    async fn put_daily_record(
        &self,
        subject: &str,
        date: &str,
        record: &DailyHealthRecord,
    ) -> Result<(), StoreError> {
        self.with_logging(
            |store| async move { store.put_daily_record(subject, date, record).await },
            "put_daily_record",
        )
        .await
    }

    async fn put_history_point(
        &self,
        subject: &str,
        date: &str,
        point: &WellnessHistoryPoint,
    ) -> Result<(), StoreError> {
        self.with_logging(
            |store| async move { store.put_history_point(subject, date, point).await },
            "put_history_point",
        )
        .await
    }

    async fn get_history_since(
        &self,
        subject: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<DatedHistoryPoint>, StoreError> {
        self.with_logging(
            |store| async move { store.get_history_since(subject, since).await },
            "get_history_since",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindaigle_store_client::DailyMetrics;
    use mindaigle_store_client::memory::InMemoryHealthStore;

    #[tokio::test]
    async fn passes_calls_through_to_inner_store() {
        let store = InstrumentedStore::new(InMemoryHealthStore::new());
        let record = DailyHealthRecord {
            metrics: DailyMetrics {
                steps: Some(1200.0),
                ..Default::default()
            },
            wellness_score: 12.0,
            last_updated: Utc::now(),
            last_update_source: None,
        };
        store
            .put_daily_record("u1", "2025-03-01", &record)
            .await
            .expect("put");
        let got = store
            .get_daily_record("u1", "2025-03-01")
            .await
            .expect("get");
        assert_eq!(got, Some(record));
        assert!(store.get_daily_record("u1", "2025-03-02").await.expect("get").is_none());
    }

    struct Broken;

    #[async_trait::async_trait]
    impl HealthStore for Broken {
        async fn get_daily_record(
            &self,
            _: &str,
            _: &str,
        ) -> Result<Option<DailyHealthRecord>, StoreError> {
            Err(StoreError::from_status(500, "boom"))
        }
        async fn put_daily_record(
            &self,
            _: &str,
            _: &str,
            _: &DailyHealthRecord,
        ) -> Result<(), StoreError> {
            Err(StoreError::from_status(500, "boom"))
        }
        async fn put_history_point(
            &self,
            _: &str,
            _: &str,
            _: &WellnessHistoryPoint,
        ) -> Result<(), StoreError> {
            Err(StoreError::from_status(500, "boom"))
        }
        async fn get_history_since(
            &self,
            _: &str,
            _: DateTime<Utc>,
        ) -> Result<Vec<DatedHistoryPoint>, StoreError> {
            Err(StoreError::from_status(500, "boom"))
        }
    }

    #[tokio::test]
    async fn errors_are_returned_unchanged() {
        let store = InstrumentedStore::new(Broken);
        let err = store.get_history_since("u1", Utc::now()).await.unwrap_err();
        assert!(matches!(err, StoreError::Status { status: 500, .. }));
    }
}
