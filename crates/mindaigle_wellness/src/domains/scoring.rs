//! Wellness score strategies.
//!
//! - [`full_wellness_score`]: weighted formula over all five metric groups.
//! - [`adjusted_wellness_score`]: weights renormalized over the groups present.
//! - [`wellness_score`]: picks one of the two by completeness.
//! - [`daily_percentage_score`]: simple per-metric percentage stored on the
//!   daily record.
//!
//! All functions are pure.

use mindaigle_store_client::DailyMetrics;
use serde::Serialize;

/// Round to two decimals, halves rounding up.
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

fn cap100(value: f64) -> f64 {
    value.min(100.0)
}

pub fn age_score(age: f64) -> f64 {
    100.0 - age / 1.2
}

pub fn step_score(steps: f64) -> f64 {
    cap100(steps / 10_000.0 * 100.0)
}

pub fn exercise_score(exercise_minutes: f64) -> f64 {
    cap100(exercise_minutes / 60.0 * 100.0)
}

pub fn sleep_score(sleep_hours: f64) -> f64 {
    cap100(sleep_hours / 8.0 * 100.0)
}

/// 100 inside 60-100 bpm, minus 2 points per bpm outside it. Not floored.
pub fn heart_rate_score(heart_rate: f64) -> f64 {
    let score = if heart_rate < 60.0 {
        100.0 - (60.0 - heart_rate) * 2.0
    } else if heart_rate <= 100.0 {
        100.0
    } else {
        100.0 - (heart_rate - 100.0) * 2.0
    };
    cap100(score)
}

pub fn activity_score(steps: f64, exercise_minutes: f64) -> f64 {
    0.6 * step_score(steps) + 0.4 * exercise_score(exercise_minutes)
}

/// Self-report mix used by the full formula: 0.3/0.3/0.2/0.2.
pub fn self_report_weighted_score(mood: f64, stress: f64, hydration: f64, nutrition: f64) -> f64 {
    0.3 * mood * 20.0 + 0.3 * stress * 20.0 + 0.2 * hydration * 20.0 + 0.2 * nutrition * 20.0
}

/// Self-report mix used by the adjusted formula: plain mean.
pub fn self_report_mean_score(mood: f64, stress: f64, hydration: f64, nutrition: f64) -> f64 {
    (mood * 20.0 + stress * 20.0 + hydration * 20.0 + nutrition * 20.0) / 4.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricGroup {
    Age,
    Activity,
    Sleep,
    HeartRate,
    SelfReport,
}

impl MetricGroup {
    pub const ALL: [MetricGroup; 5] = [
        MetricGroup::Age,
        MetricGroup::Activity,
        MetricGroup::Sleep,
        MetricGroup::HeartRate,
        MetricGroup::SelfReport,
    ];

    /// Weight before renormalization in the adjusted formula.
    pub fn base_weight(self) -> f64 {
        match self {
            MetricGroup::Age => 0.10,
            MetricGroup::Activity => 0.30,
            MetricGroup::Sleep => 0.25,
            MetricGroup::HeartRate => 0.15,
            MetricGroup::SelfReport => 0.35,
        }
    }

    /// A group counts only when every one of its fields is known.
    pub fn is_present(self, m: &DailyMetrics) -> bool {
        match self {
            MetricGroup::Age => m.age.is_some(),
            MetricGroup::Activity => m.steps.is_some() && m.exercise_duration.is_some(),
            MetricGroup::Sleep => m.sleep_duration.is_some(),
            MetricGroup::HeartRate => m.heart_rate.is_some(),
            MetricGroup::SelfReport => {
                m.mood.is_some()
                    && m.stress.is_some()
                    && m.hydration.is_some()
                    && m.nutrition.is_some()
            }
        }
    }

    /// Sub-score for the adjusted formula, `None` when the group is incomplete.
    fn adjusted_score(self, m: &DailyMetrics) -> Option<f64> {
        match self {
            MetricGroup::Age => m.age.map(age_score),
            MetricGroup::Activity => Some(activity_score(m.steps?, m.exercise_duration?)),
            MetricGroup::Sleep => m.sleep_duration.map(sleep_score),
            MetricGroup::HeartRate => m.heart_rate.map(heart_rate_score),
            MetricGroup::SelfReport => Some(self_report_mean_score(
                m.mood?,
                m.stress?,
                m.hydration?,
                m.nutrition?,
            )),
        }
    }
}

pub fn groups_present(m: &DailyMetrics) -> Vec<MetricGroup> {
    MetricGroup::ALL
        .into_iter()
        .filter(|g| g.is_present(m))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStrategy {
    Full,
    Adjusted,
}

/// Every input of the full formula, known to be present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompleteMetrics {
    pub age: f64,
    pub steps: f64,
    pub exercise_duration: f64,
    pub sleep_duration: f64,
    pub heart_rate: f64,
    pub mood: f64,
    pub stress: f64,
    pub hydration: f64,
    pub nutrition: f64,
}

impl CompleteMetrics {
    pub fn from_metrics(m: &DailyMetrics) -> Option<Self> {
        Some(Self {
            age: m.age?,
            steps: m.steps?,
            exercise_duration: m.exercise_duration?,
            sleep_duration: m.sleep_duration?,
            heart_rate: m.heart_rate?,
            mood: m.mood?,
            stress: m.stress?,
            hydration: m.hydration?,
            nutrition: m.nutrition?,
        })
    }
}

/// Full formula. The weighted sum is not capped; only the sub-scores are.
pub fn full_wellness_score(m: &CompleteMetrics) -> f64 {
    let activity = activity_score(m.steps, m.exercise_duration);
    let self_report = self_report_weighted_score(m.mood, m.stress, m.hydration, m.nutrition);
    let score = 0.15 * age_score(m.age)
        + 0.25 * activity
        + 0.25 * sleep_score(m.sleep_duration)
        + 0.15 * heart_rate_score(m.heart_rate)
        + 0.20 * self_report;
    round2(score)
}

/// Adjusted formula: base weights of absent groups are zeroed and the rest
/// renormalized to sum to 1. Returns 0 when no group is complete.
///
/// With all five groups present this is exactly the full formula.
pub fn adjusted_wellness_score(m: &DailyMetrics) -> f64 {
    if let Some(complete) = CompleteMetrics::from_metrics(m) {
        return full_wellness_score(&complete);
    }
    let scored: Vec<(f64, f64)> = MetricGroup::ALL
        .into_iter()
        .filter_map(|g| g.adjusted_score(m).map(|s| (g.base_weight(), s)))
        .collect();
    let total_weight: f64 = scored.iter().map(|(w, _)| w).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let score: f64 = scored.iter().map(|(w, s)| w / total_weight * s).sum();
    round2(score)
}

pub fn select_strategy(m: &DailyMetrics) -> ScoreStrategy {
    if CompleteMetrics::from_metrics(m).is_some() {
        ScoreStrategy::Full
    } else {
        ScoreStrategy::Adjusted
    }
}

/// Full formula when all five groups are present, adjusted formula otherwise.
pub fn wellness_score(m: &DailyMetrics) -> f64 {
    match CompleteMetrics::from_metrics(m) {
        Some(complete) => full_wellness_score(&complete),
        None => adjusted_wellness_score(m),
    }
}

fn in_band(value: f64, low: f64, high: f64) -> bool {
    value >= low && value <= high
}

/// Percentage score over whichever daily metrics are present.
///
/// Wearable metrics contribute up to 10 points, self-report metrics up to 15;
/// the sum is divided by 10 points per metric present. Capped at 100.
pub fn daily_percentage_score(m: &DailyMetrics) -> f64 {
    let wearable = [
        m.steps.map(|v| (v / 10_000.0).min(1.0) * 10.0),
        m.sleep_duration.map(|v| (v / 8.0).min(1.0) * 10.0),
        m.heart_rate
            .map(|v| if in_band(v, 60.0, 100.0) { 10.0 } else { 5.0 }),
        m.temperature
            .map(|v| if in_band(v, 36.1, 37.2) { 10.0 } else { 5.0 }),
    ];
    let self_report =
        [m.mood, m.stress, m.hydration, m.nutrition].map(|o| o.map(|v| v / 5.0 * 15.0));

    let (total, count) = wearable
        .into_iter()
        .chain(self_report)
        .flatten()
        .fold((0.0, 0u32), |(sum, n), s| (sum + s, n + 1));

    if count == 0 {
        return 0.0;
    }
    round2(cap100(total / (f64::from(count) * 10.0) * 100.0))
}
