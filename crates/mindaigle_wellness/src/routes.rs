//! Axum router exposing the wellness service over HTTP.

use std::sync::Arc;
use std::time::Duration;

use axum::debug_handler;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use mindaigle_store_client::{DailyHealthRecord, DatedHistoryPoint};

use crate::error::WellnessError;
use crate::state::AppState;
use crate::types::{ErrorBody, HistoryParams, RawMetricSample, ScoreBreakdown, SubmissionResponse};

type ApiError = (StatusCode, Json<ErrorBody>);

/// Limits applied to every route.
#[derive(Clone, Copy, Debug)]
pub struct RouterLimits {
    pub max_body_size: usize,
    pub request_timeout: Duration,
}

impl Default for RouterLimits {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024,
            request_timeout: Duration::from_secs(30),
        }
    }
}

pub fn router(state: Arc<AppState>, limits: RouterLimits) -> Router {
    let health = Router::new()
        .route("/daily-data", post(submit_daily_data))
        .route("/daily-data/{uid}/{date}", get(get_daily_data))
        .route("/wellness-history/{uid}", get(get_wellness_history))
        .route("/wellness-score", post(score_sample));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics_endpoint))
        .nest("/health", health)
        .layer(DefaultBodyLimit::max(limits.max_body_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            limits.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[debug_handler]
async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[debug_handler]
async fn metrics_endpoint(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [("content-type", "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

#[debug_handler]
async fn submit_daily_data(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<RawMetricSample>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let outcome = state
        .service
        .submit_daily_data(&raw)
        .await
        .map_err(map_err)?;
    Ok(Json(SubmissionResponse {
        message: "Health data stored successfully",
        data: outcome.record,
        score_changed: outcome.score_changed,
    }))
}

#[debug_handler]
async fn get_daily_data(
    State(state): State<Arc<AppState>>,
    Path((uid, date)): Path<(String, String)>,
) -> Result<Json<DailyHealthRecord>, ApiError> {
    state
        .service
        .get_daily_record(&uid, &date)
        .await
        .map(Json)
        .map_err(map_err)
}

#[debug_handler]
async fn get_wellness_history(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<DatedHistoryPoint>>, ApiError> {
    state
        .service
        .get_wellness_history(&uid, params.days)
        .await
        .map(Json)
        .map_err(map_err)
}

#[debug_handler]
async fn score_sample(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<RawMetricSample>,
) -> Result<Json<ScoreBreakdown>, ApiError> {
    state.service.score_sample(&raw).map(Json).map_err(map_err)
}

fn map_err(e: WellnessError) -> ApiError {
    let (status, body) = match e {
        WellnessError::Validation(v) => (
            StatusCode::BAD_REQUEST,
            ErrorBody {
                error: v.reason.to_string(),
                details: v.details.to_string(),
                field: Some(v.field.as_str()),
                min: v.bound.map(|b| b.min),
                max: v.bound.map(|b| b.max),
            },
        ),
        WellnessError::NotFound(details) => (
            StatusCode::NOT_FOUND,
            ErrorBody {
                error: "Not found".to_string(),
                details,
                field: None,
                min: None,
                max: None,
            },
        ),
        WellnessError::Store(e) => (
            StatusCode::BAD_GATEWAY,
            ErrorBody {
                error: "Server error".to_string(),
                details: e.to_string(),
                field: None,
                min: None,
                max: None,
            },
        ),
    };
    (status, Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::validate_sample;
    use crate::types::NumberLike;
    use mindaigle_store_client::StoreError;

    #[test]
    fn validation_errors_map_to_400_with_bounds() {
        let raw = RawMetricSample {
            uid: Some("u1".into()),
            date: Some("2025-03-01".into()),
            temperature: Some(NumberLike::from(43.0)),
            ..Default::default()
        };
        let err = validate_sample(&raw).unwrap_err();
        let (status, Json(body)) = map_err(err.into());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Invalid temperature value");
        assert_eq!(body.field, Some("temperature"));
        assert_eq!(body.min, Some(35.0));
        assert_eq!(body.max, Some(42.0));
    }

    #[test]
    fn missing_fields_carry_no_bounds() {
        let err = validate_sample(&RawMetricSample::default()).unwrap_err();
        let (status, Json(body)) = map_err(err.into());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.field, Some("uid"));
        assert!(body.min.is_none());
    }

    #[test]
    fn store_errors_map_to_bad_gateway() {
        let (status, Json(body)) = map_err(StoreError::from_status(500, "down").into());
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.error, "Server error");
        assert_eq!(body.details, "store returned status 500: down");
    }
}
