use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{Instrument, Span, field, info, info_span, warn};
use uuid::Uuid;

use mindaigle_store_client::{DailyHealthRecord, DatedHistoryPoint, HealthStore};

use crate::domains::merge::{MergeOutcome, merge_daily_record};
use crate::domains::scoring::{
    adjusted_wellness_score, daily_percentage_score, groups_present, select_strategy,
    wellness_score,
};
use crate::domains::validation::{ValidationError, validate_metrics, validate_sample};
use crate::error::{WellnessError, WellnessResult};
use crate::types::{MetricSample, RawMetricSample, ScoreBreakdown};

/// History window used when the caller does not pass one.
pub const DEFAULT_HISTORY_DAYS: u32 = 7;

type DayKey = (String, String);
type DayLocks = Arc<StdMutex<HashMap<DayKey, Arc<Mutex<()>>>>>;

/// Handle on one (subject, date) lock. Dropping it removes the map entry once
/// no other submission holds or waits on the same key, including when the
/// submission future is cancelled mid-flight.
struct DayLockEntry {
    locks: DayLocks,
    key: DayKey,
    lock: Arc<Mutex<()>>,
}

impl DayLockEntry {
    fn new(locks: &DayLocks, key: DayKey) -> Self {
        let lock = {
            let mut map = locks.lock().unwrap_or_else(PoisonError::into_inner);
            map.entry(key.clone()).or_default().clone()
        };
        Self {
            locks: locks.clone(),
            key,
            lock,
        }
    }

    async fn acquire(&self) -> OwnedMutexGuard<()> {
        self.lock.clone().lock_owned().await
    }
}

impl Drop for DayLockEntry {
    fn drop(&mut self) {
        let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // one reference in the map, one in `self`
        if map.get(&self.key).is_some_and(|l| Arc::strong_count(l) == 2) {
            map.remove(&self.key);
        }
    }
}

/// Orchestrates validation, merging and persistence of daily submissions.
#[derive(Clone)]
pub struct WellnessService {
    store: Arc<dyn HealthStore>,
    day_locks: DayLocks,
}

impl WellnessService {
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self {
            store,
            day_locks: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    /// Validate a submission and merge it into the stored record for its day.
    ///
    /// Same-day submissions for one subject are serialized. When the score
    /// moved, the history point is written before the record, so a failed
    /// write never leaves a stored score without its history point.
    pub async fn submit_daily_data(&self, raw: &RawMetricSample) -> WellnessResult<MergeOutcome> {
        let span = info_span!(
            "submission",
            submission_id = %Uuid::new_v4(),
            subject = field::Empty,
            date = field::Empty,
        );
        let result = self
            .submit_in_span(raw, span.clone())
            .instrument(span)
            .await;

        let outcome = match &result {
            Ok(_) => "stored",
            Err(WellnessError::Validation(_)) => "rejected",
            Err(_) => "failed",
        };
        metrics::counter!("wellness_submissions_total", "outcome" => outcome).increment(1);
        result
    }

    async fn submit_in_span(
        &self,
        raw: &RawMetricSample,
        span: Span,
    ) -> WellnessResult<MergeOutcome> {
        let sample = validate_sample(raw).inspect_err(log_rejection)?;
        span.record("subject", sample.subject.as_str());
        span.record("date", sample.date.as_str());

        let entry = DayLockEntry::new(
            &self.day_locks,
            (sample.subject.clone(), sample.date.clone()),
        );
        let result = {
            let _held = entry.acquire().await;
            self.merge_and_persist(&sample).await
        };
        drop(entry);

        result.inspect_err(|e| warn!(error = %e, "submission failed"))
    }

    async fn merge_and_persist(&self, sample: &MetricSample) -> WellnessResult<MergeOutcome> {
        let prior = self
            .store
            .get_daily_record(&sample.subject, &sample.date)
            .await?;
        let outcome = merge_daily_record(sample, prior.as_ref(), Utc::now());

        // History points are keyed by date, so rewriting one on retry is harmless.
        if let Some(point) = outcome.history_point() {
            self.store
                .put_history_point(&sample.subject, &sample.date, &point)
                .await?;
            metrics::counter!("wellness_history_points_total").increment(1);
        }

        self.store
            .put_daily_record(&sample.subject, &sample.date, &outcome.record)
            .await?;

        info!(
            score = outcome.record.wellness_score,
            previous = ?outcome.previous_score,
            score_changed = outcome.score_changed,
            "daily record stored"
        );
        Ok(outcome)
    }

    pub async fn get_daily_record(
        &self,
        subject: &str,
        date: &str,
    ) -> WellnessResult<DailyHealthRecord> {
        self.store
            .get_daily_record(subject, date)
            .await?
            .ok_or_else(|| WellnessError::NotFound("No data found for this date".into()))
    }

    /// History points from the last `days` days (default 7), newest first.
    pub async fn get_wellness_history(
        &self,
        subject: &str,
        days: Option<u32>,
    ) -> WellnessResult<Vec<DatedHistoryPoint>> {
        let days = days.unwrap_or(DEFAULT_HISTORY_DAYS);
        let since = history_start(Utc::now(), days);
        let mut points = self.store.get_history_since(subject, since).await?;
        points.retain(|p| p.timestamp >= since);
        points.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(points)
    }

    /// Score an arbitrary sample with every strategy. Nothing is persisted and
    /// `uid`/`date` are not required.
    pub fn score_sample(&self, raw: &RawMetricSample) -> WellnessResult<ScoreBreakdown> {
        let metrics = validate_metrics(raw).inspect_err(log_rejection)?;
        Ok(ScoreBreakdown {
            wellness_score: wellness_score(&metrics),
            strategy: select_strategy(&metrics),
            adjusted_score: adjusted_wellness_score(&metrics),
            daily_percentage_score: daily_percentage_score(&metrics),
            groups_present: groups_present(&metrics),
        })
    }
}

fn log_rejection(e: &ValidationError) {
    info!(field = e.field.as_str(), reason = e.reason, "submission rejected");
}

fn history_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|d| now.checked_sub_signed(d))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
