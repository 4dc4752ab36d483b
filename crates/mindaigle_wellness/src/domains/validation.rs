//! Range checks for inbound metric submissions.
//!
//! Fields are checked in a fixed order and the first violation wins, so a
//! given malformed body always reports the same error:
//!
//! 1. `uid`, `date` (mandatory)
//! 2. `steps`, `heart_rate`, `temperature`, `sleep_duration`
//! 3. `mood`, `stress`, `hydration`, `nutrition`
//! 4. `age`, `exercise_duration`

use mindaigle_store_client::DailyMetrics;
use serde::Serialize;
use thiserror::Error;

use crate::types::{MetricSample, NumberLike, RawMetricSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    Uid,
    Date,
    Steps,
    HeartRate,
    Temperature,
    SleepDuration,
    Mood,
    Stress,
    Hydration,
    Nutrition,
    Age,
    ExerciseDuration,
}

impl MetricField {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricField::Uid => "uid",
            MetricField::Date => "date",
            MetricField::Steps => "steps",
            MetricField::HeartRate => "heart_rate",
            MetricField::Temperature => "temperature",
            MetricField::SleepDuration => "sleep_duration",
            MetricField::Mood => "mood",
            MetricField::Stress => "stress",
            MetricField::Hydration => "hydration",
            MetricField::Nutrition => "nutrition",
            MetricField::Age => "age",
            MetricField::ExerciseDuration => "exercise_duration",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub min: f64,
    pub max: f64,
}

impl Bound {
    fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    NotANumber,
    OutOfRange,
}

struct RangeRule {
    field: MetricField,
    bound: Bound,
    reason: &'static str,
    details: &'static str,
}

const fn rule(
    field: MetricField,
    min: f64,
    max: f64,
    reason: &'static str,
    details: &'static str,
) -> RangeRule {
    RangeRule {
        field,
        bound: Bound { min, max },
        reason,
        details,
    }
}

const RANGE_RULES: [RangeRule; 10] = [
    rule(
        MetricField::Steps,
        0.0,
        100_000.0,
        "Invalid steps value",
        "Steps must be between 0 and 100000",
    ),
    rule(
        MetricField::HeartRate,
        30.0,
        220.0,
        "Invalid heart rate value",
        "Heart rate must be between 30 and 220",
    ),
    rule(
        MetricField::Temperature,
        35.0,
        42.0,
        "Invalid temperature value",
        "Temperature must be between 35°C and 42°C",
    ),
    rule(
        MetricField::SleepDuration,
        0.0,
        24.0,
        "Invalid sleep duration",
        "Sleep duration must be between 0 and 24 hours",
    ),
    rule(
        MetricField::Mood,
        1.0,
        5.0,
        "Invalid mood value",
        "mood must be between 1 and 5",
    ),
    rule(
        MetricField::Stress,
        1.0,
        5.0,
        "Invalid stress value",
        "stress must be between 1 and 5",
    ),
    rule(
        MetricField::Hydration,
        1.0,
        5.0,
        "Invalid hydration value",
        "hydration must be between 1 and 5",
    ),
    rule(
        MetricField::Nutrition,
        1.0,
        5.0,
        "Invalid nutrition value",
        "nutrition must be between 1 and 5",
    ),
    rule(
        MetricField::Age,
        0.0,
        120.0,
        "Invalid age value",
        "Age must be between 0 and 120",
    ),
    rule(
        MetricField::ExerciseDuration,
        0.0,
        1440.0,
        "Invalid exercise duration",
        "Exercise duration must be between 0 and 1440 minutes",
    ),
];

/// Rejection of a submission, naming the offending field and the bound it broke.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{reason}: {details}")]
pub struct ValidationError {
    pub field: MetricField,
    pub kind: ViolationKind,
    pub bound: Option<Bound>,
    pub reason: &'static str,
    pub details: &'static str,
}

impl ValidationError {
    fn missing(field: MetricField) -> Self {
        Self {
            field,
            kind: ViolationKind::Missing,
            bound: None,
            reason: "Missing required fields",
            details: "uid and date are required",
        }
    }

    fn violation(rule: &RangeRule, kind: ViolationKind) -> Self {
        Self {
            field: rule.field,
            kind,
            bound: Some(rule.bound),
            reason: rule.reason,
            details: rule.details,
        }
    }
}

fn raw_value(raw: &RawMetricSample, field: MetricField) -> Option<&NumberLike> {
    match field {
        MetricField::Steps => raw.steps.as_ref(),
        MetricField::HeartRate => raw.heart_rate.as_ref(),
        MetricField::Temperature => raw.temperature.as_ref(),
        MetricField::SleepDuration => raw.sleep_duration.as_ref(),
        MetricField::Mood => raw.mood.as_ref(),
        MetricField::Stress => raw.stress.as_ref(),
        MetricField::Hydration => raw.hydration.as_ref(),
        MetricField::Nutrition => raw.nutrition.as_ref(),
        MetricField::Age => raw.age.as_ref(),
        MetricField::ExerciseDuration => raw.exercise_duration.as_ref(),
        MetricField::Uid | MetricField::Date => None,
    }
}

fn metric_slot(metrics: &mut DailyMetrics, field: MetricField) -> Option<&mut Option<f64>> {
    let slot = match field {
        MetricField::Steps => &mut metrics.steps,
        MetricField::HeartRate => &mut metrics.heart_rate,
        MetricField::Temperature => &mut metrics.temperature,
        MetricField::SleepDuration => &mut metrics.sleep_duration,
        MetricField::Mood => &mut metrics.mood,
        MetricField::Stress => &mut metrics.stress,
        MetricField::Hydration => &mut metrics.hydration,
        MetricField::Nutrition => &mut metrics.nutrition,
        MetricField::Age => &mut metrics.age,
        MetricField::ExerciseDuration => &mut metrics.exercise_duration,
        MetricField::Uid | MetricField::Date => return None,
    };
    Some(slot)
}

fn mandatory(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty()).cloned()
}

/// Range-check the metric fields only. Used where no subject/date applies.
pub fn validate_metrics(raw: &RawMetricSample) -> Result<DailyMetrics, ValidationError> {
    let mut metrics = DailyMetrics::default();
    for rule in &RANGE_RULES {
        let Some(value) = raw_value(raw, rule.field) else {
            continue;
        };
        let v = value
            .as_f64()
            .ok_or_else(|| ValidationError::violation(rule, ViolationKind::NotANumber))?;
        if !rule.bound.contains(v) {
            return Err(ValidationError::violation(rule, ViolationKind::OutOfRange));
        }
        if let Some(slot) = metric_slot(&mut metrics, rule.field) {
            *slot = Some(v);
        }
    }
    Ok(metrics)
}

/// Validate a full submission. No side effects.
pub fn validate_sample(raw: &RawMetricSample) -> Result<MetricSample, ValidationError> {
    let subject =
        mandatory(raw.uid.as_ref()).ok_or_else(|| ValidationError::missing(MetricField::Uid))?;
    let date =
        mandatory(raw.date.as_ref()).ok_or_else(|| ValidationError::missing(MetricField::Date))?;
    let metrics = validate_metrics(raw)?;
    Ok(MetricSample {
        subject,
        date,
        source: raw.source.clone(),
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RawMetricSample {
        RawMetricSample {
            uid: Some("u1".into()),
            date: Some("2025-03-01".into()),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_minimal_submission() {
        let sample = validate_sample(&base()).expect("valid");
        assert_eq!(sample.subject, "u1");
        assert!(sample.metrics.is_empty());
    }

    #[test]
    fn missing_uid_or_date_is_rejected_first() {
        let mut raw = base();
        raw.uid = None;
        raw.heart_rate = Some(NumberLike::Num(500.0));
        let err = validate_sample(&raw).unwrap_err();
        assert_eq!(err.kind, ViolationKind::Missing);
        assert_eq!(err.field, MetricField::Uid);
        assert_eq!(err.reason, "Missing required fields");

        let mut raw = base();
        raw.date = Some("   ".into());
        let err = validate_sample(&raw).unwrap_err();
        assert_eq!(err.field, MetricField::Date);
    }

    #[test]
    fn heart_rate_below_range_reports_bound() {
        let mut raw = base();
        raw.heart_rate = Some(NumberLike::Num(25.0));
        let err = validate_sample(&raw).unwrap_err();
        assert_eq!(err.reason, "Invalid heart rate value");
        assert_eq!(err.details, "Heart rate must be between 30 and 220");
        assert_eq!(err.kind, ViolationKind::OutOfRange);
        assert_eq!(err.bound, Some(Bound { min: 30.0, max: 220.0 }));
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut raw = base();
        raw.steps = Some(NumberLike::Num(100_000.0));
        raw.heart_rate = Some(NumberLike::Num(30.0));
        raw.temperature = Some(NumberLike::Num(42.0));
        raw.sleep_duration = Some(NumberLike::Num(0.0));
        raw.mood = Some(NumberLike::Num(1.0));
        raw.nutrition = Some(NumberLike::Num(5.0));
        let sample = validate_sample(&raw).expect("valid");
        assert_eq!(sample.metrics.steps, Some(100_000.0));
        assert_eq!(sample.metrics.sleep_duration, Some(0.0));
    }

    #[test]
    fn first_violation_in_table_order_wins() {
        let mut raw = base();
        raw.nutrition = Some(NumberLike::Num(9.0));
        raw.temperature = Some(NumberLike::Num(50.0));
        raw.steps = Some(NumberLike::Num(-1.0));
        let err = validate_sample(&raw).unwrap_err();
        assert_eq!(err.field, MetricField::Steps);

        raw.steps = None;
        let err = validate_sample(&raw).unwrap_err();
        assert_eq!(err.field, MetricField::Temperature);
        assert_eq!(err.details, "Temperature must be between 35°C and 42°C");
    }

    #[test]
    fn unparseable_number_is_rejected_with_field_reason() {
        let mut raw = base();
        raw.stress = Some(NumberLike::Str("high".into()));
        let err = validate_sample(&raw).unwrap_err();
        assert_eq!(err.field, MetricField::Stress);
        assert_eq!(err.kind, ViolationKind::NotANumber);
        assert_eq!(err.reason, "Invalid stress value");
        assert_eq!(err.details, "stress must be between 1 and 5");
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let mut raw = base();
        raw.sleep_duration = Some(NumberLike::Str("7.5".into()));
        let sample = validate_sample(&raw).expect("valid");
        assert_eq!(sample.metrics.sleep_duration, Some(7.5));
    }

    #[test]
    fn score_inputs_are_range_checked_after_table_fields() {
        let mut raw = base();
        raw.age = Some(NumberLike::Num(-3.0));
        raw.mood = Some(NumberLike::Num(0.0));
        let err = validate_sample(&raw).unwrap_err();
        assert_eq!(err.field, MetricField::Mood);

        raw.mood = None;
        let err = validate_sample(&raw).unwrap_err();
        assert_eq!(err.field, MetricField::Age);
        assert_eq!(err.reason, "Invalid age value");
    }

    #[test]
    fn validate_metrics_ignores_mandatory_fields() {
        let raw = RawMetricSample {
            exercise_duration: Some(NumberLike::Num(45.0)),
            ..Default::default()
        };
        let metrics = validate_metrics(&raw).expect("valid");
        assert_eq!(metrics.exercise_duration, Some(45.0));
    }
}
