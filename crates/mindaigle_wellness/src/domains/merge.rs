//! Folding a validated sample into the stored record for its day.

use chrono::{DateTime, Utc};
use mindaigle_store_client::{DailyHealthRecord, DailyMetrics, WellnessHistoryPoint};

use crate::domains::scoring::daily_percentage_score;
use crate::types::MetricSample;

/// The record to persist and whether its score moved.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub record: DailyHealthRecord,
    pub previous_score: Option<f64>,
    pub score_changed: bool,
}

impl MergeOutcome {
    /// History point to append, present only when the score changed.
    pub fn history_point(&self) -> Option<WellnessHistoryPoint> {
        self.score_changed.then(|| WellnessHistoryPoint {
            score: self.record.wellness_score,
            timestamp: self.record.last_updated,
        })
    }
}

/// Fields present in `incoming` replace those in `prior`; absent ones keep the prior value.
pub fn overlay_metrics(prior: &DailyMetrics, incoming: &DailyMetrics) -> DailyMetrics {
    DailyMetrics {
        steps: incoming.steps.or(prior.steps),
        heart_rate: incoming.heart_rate.or(prior.heart_rate),
        temperature: incoming.temperature.or(prior.temperature),
        sleep_duration: incoming.sleep_duration.or(prior.sleep_duration),
        exercise_duration: incoming.exercise_duration.or(prior.exercise_duration),
        age: incoming.age.or(prior.age),
        mood: incoming.mood.or(prior.mood),
        stress: incoming.stress.or(prior.stress),
        hydration: incoming.hydration.or(prior.hydration),
        nutrition: incoming.nutrition.or(prior.nutrition),
    }
}

/// Merge `sample` over `prior` and rescore the combined metrics.
///
/// The first submission of a day always counts as a score change.
pub fn merge_daily_record(
    sample: &MetricSample,
    prior: Option<&DailyHealthRecord>,
    now: DateTime<Utc>,
) -> MergeOutcome {
    let metrics = match prior {
        Some(p) => overlay_metrics(&p.metrics, &sample.metrics),
        None => sample.metrics.clone(),
    };
    let wellness_score = daily_percentage_score(&metrics);
    let previous_score = prior.map(|p| p.wellness_score);
    let score_changed = previous_score != Some(wellness_score);

    MergeOutcome {
        record: DailyHealthRecord {
            metrics,
            wellness_score,
            last_updated: now,
            last_update_source: sample.source.clone(),
        },
        previous_score,
        score_changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().expect("timestamp")
    }

    fn sample(metrics: DailyMetrics, source: Option<&str>) -> MetricSample {
        MetricSample {
            subject: "u1".into(),
            date: "2025-03-01".into(),
            source: source.map(str::to_string),
            metrics,
        }
    }

    #[test]
    fn first_submission_always_changes_score() {
        let s = sample(DailyMetrics::default(), Some("manual"));
        let out = merge_daily_record(&s, None, at("2025-03-01T08:00:00Z"));
        assert!(out.score_changed);
        assert_eq!(out.previous_score, None);
        assert_eq!(out.record.wellness_score, 0.0);
        let point = out.history_point().expect("point");
        assert_eq!(point.score, 0.0);
        assert_eq!(point.timestamp, at("2025-03-01T08:00:00Z"));
    }

    #[test]
    fn incoming_fields_overwrite_and_absent_fields_are_kept() {
        let prior = merge_daily_record(
            &sample(
                DailyMetrics {
                    steps: Some(4000.0),
                    mood: Some(3.0),
                    ..Default::default()
                },
                Some("watch"),
            ),
            None,
            at("2025-03-01T08:00:00Z"),
        )
        .record;

        let next = sample(
            DailyMetrics {
                steps: Some(9000.0),
                sleep_duration: Some(7.0),
                ..Default::default()
            },
            None,
        );
        let out = merge_daily_record(&next, Some(&prior), at("2025-03-01T21:00:00Z"));
        assert_eq!(out.record.metrics.steps, Some(9000.0));
        assert_eq!(out.record.metrics.mood, Some(3.0));
        assert_eq!(out.record.metrics.sleep_duration, Some(7.0));
        assert_eq!(out.record.last_updated, at("2025-03-01T21:00:00Z"));
        assert_eq!(out.record.last_update_source, None);
        assert_eq!(out.previous_score, Some(prior.wellness_score));
        assert!(out.score_changed);
    }

    #[test]
    fn resubmitting_the_same_values_is_idempotent() {
        let s = sample(
            DailyMetrics {
                steps: Some(5000.0),
                heart_rate: Some(72.0),
                ..Default::default()
            },
            Some("watch"),
        );
        let first = merge_daily_record(&s, None, at("2025-03-01T08:00:00Z"));
        let second = merge_daily_record(&s, Some(&first.record), at("2025-03-01T09:00:00Z"));
        assert_eq!(second.record.metrics, first.record.metrics);
        assert_eq!(second.record.wellness_score, first.record.wellness_score);
        assert!(!second.score_changed);
        assert!(second.history_point().is_none());
    }

    #[test]
    fn empty_sample_keeps_prior_metrics() {
        let prior = DailyHealthRecord {
            metrics: DailyMetrics {
                hydration: Some(4.0),
                ..Default::default()
            },
            wellness_score: 120.0,
            last_updated: at("2025-03-01T08:00:00Z"),
            last_update_source: Some("manual".into()),
        };
        let out = merge_daily_record(
            &sample(DailyMetrics::default(), Some("manual")),
            Some(&prior),
            at("2025-03-01T10:00:00Z"),
        );
        assert_eq!(out.record.metrics, prior.metrics);
        // stored score predates the cap, so the rescore differs
        assert_eq!(out.record.wellness_score, 100.0);
        assert!(out.score_changed);
    }

    #[test]
    fn merged_record_round_trips_through_json() {
        let out = merge_daily_record(
            &sample(
                DailyMetrics {
                    temperature: Some(36.6),
                    nutrition: Some(4.0),
                    ..Default::default()
                },
                Some("manual"),
            ),
            None,
            at("2025-03-01T08:00:00Z"),
        );
        let json = serde_json::to_value(&out.record).expect("json");
        assert_eq!(json["temperature"], 36.6);
        assert!(json.get("steps").is_none());
        let back: DailyHealthRecord = serde_json::from_value(json).expect("record");
        assert_eq!(back, out.record);
    }
}
