use serde::{Deserialize, Serialize};

use mindaigle_store_client::{DailyHealthRecord, DailyMetrics};

use crate::domains::scoring::{MetricGroup, ScoreStrategy};

/// A numeric field as clients send it: a JSON number or a numeric string.
/// Anything else lands in `Other` so it can be rejected by validation rather
/// than failing body parsing.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum NumberLike {
    Num(f64),
    Str(String),
    Other(serde_json::Value),
}

impl NumberLike {
    /// Finite value, or `None` when the input is not a usable number.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            NumberLike::Num(v) => *v,
            NumberLike::Str(s) => s.trim().parse::<f64>().ok()?,
            NumberLike::Other(_) => return None,
        };
        v.is_finite().then_some(v)
    }
}

impl From<f64> for NumberLike {
    fn from(v: f64) -> Self {
        NumberLike::Num(v)
    }
}

/// Submission body as received over the wire, before validation.
///
/// Keys follow the mobile client (`uid`, `heartRate`, ...); snake_case
/// spellings are accepted as aliases. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetricSample {
    #[serde(default, alias = "subject")]
    pub uid: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub steps: Option<NumberLike>,
    #[serde(default, alias = "heart_rate")]
    pub heart_rate: Option<NumberLike>,
    #[serde(default)]
    pub temperature: Option<NumberLike>,
    #[serde(default, alias = "sleep_duration")]
    pub sleep_duration: Option<NumberLike>,
    #[serde(default)]
    pub mood: Option<NumberLike>,
    #[serde(default)]
    pub stress: Option<NumberLike>,
    #[serde(default)]
    pub hydration: Option<NumberLike>,
    #[serde(default)]
    pub nutrition: Option<NumberLike>,
    #[serde(default)]
    pub age: Option<NumberLike>,
    #[serde(default, alias = "exercise_duration")]
    pub exercise_duration: Option<NumberLike>,
}

/// A validated submission.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub subject: String,
    pub date: String,
    pub source: Option<String>,
    pub metrics: DailyMetrics,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub message: &'static str,
    pub data: DailyHealthRecord,
    pub score_changed: bool,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub days: Option<u32>,
}

/// Result of evaluating a sample against every scoring strategy.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreBreakdown {
    pub wellness_score: f64,
    pub strategy: ScoreStrategy,
    pub adjusted_score: f64,
    pub daily_percentage_score: f64,
    pub groups_present: Vec<MetricGroup>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}
